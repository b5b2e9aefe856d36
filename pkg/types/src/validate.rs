use anyhow::{Result, bail, ensure};

const MAX_NAMESPACE_LEN: usize = 63;

/// Check a `--namespace` filter before any kubectl call is made.
///
/// Namespace names are DNS-1123 labels. The error points at the first
/// offending character so a typo is easy to spot.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    ensure!(!namespace.is_empty(), "namespace filter is empty");
    ensure!(
        namespace.len() <= MAX_NAMESPACE_LEN,
        "namespace '{}' is {} characters long, the limit is {}",
        namespace,
        namespace.len(),
        MAX_NAMESPACE_LEN
    );

    let last = namespace.len() - 1;
    for (i, c) in namespace.char_indices() {
        match c {
            'a'..='z' | '0'..='9' => {}
            '-' if i != 0 && i != last => {}
            '-' => bail!(
                "namespace '{}' has a hyphen at position {}; names begin and end with a letter or digit",
                namespace,
                i
            ),
            'A'..='Z' => bail!(
                "namespace '{}' has uppercase '{}' at position {}; did you mean '{}'?",
                namespace,
                c,
                i,
                namespace.to_ascii_lowercase()
            ),
            _ => bail!(
                "namespace '{}' has invalid character '{}' at position {}",
                namespace,
                c,
                i
            ),
        }
    }
    Ok(())
}

/// Probe timeouts and concurrency must allow at least one unit of work.
pub fn validate_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        bail!("{} must be at least 1", field);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_namespaces() {
        assert!(validate_namespace("prod").is_ok());
        assert!(validate_namespace("kube-system").is_ok());
        assert!(validate_namespace("team-42").is_ok());
    }

    #[test]
    fn invalid_namespaces() {
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("my_ns").is_err());
        assert!(validate_namespace("-leading").is_err());
        assert!(validate_namespace("trailing-").is_err());
        assert!(validate_namespace("-").is_err());
        assert!(validate_namespace("prod.eu").is_err());
        assert!(validate_namespace(&"n".repeat(64)).is_err());
        assert!(validate_namespace(&"n".repeat(63)).is_ok());
    }

    #[test]
    fn errors_point_at_the_offending_character() {
        let err = validate_namespace("Prod").unwrap_err().to_string();
        assert!(err.contains("uppercase 'P' at position 0"), "{}", err);
        assert!(err.contains("did you mean 'prod'?"), "{}", err);

        let err = validate_namespace("team_a").unwrap_err().to_string();
        assert!(err.contains("'_' at position 4"), "{}", err);

        let err = validate_namespace("café").unwrap_err().to_string();
        assert!(err.contains("'é' at position 3"), "{}", err);
    }

    #[test]
    fn zero_is_rejected() {
        assert!(validate_positive("timeout", 0).is_err());
        assert!(validate_positive("timeout", 10).is_ok());
    }
}
