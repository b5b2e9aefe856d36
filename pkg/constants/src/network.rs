//! Endpoint probing constants.

/// Default per-probe HTTP timeout (connect and total), in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default number of endpoint probes in flight at once.
pub const DEFAULT_PROBE_CONCURRENCY: usize = 8;

/// Scheme used for every discovered endpoint.
pub const DEFAULT_ENDPOINT_SCHEME: &str = "https";

/// Path used when an ingress rule declares none.
pub const DEFAULT_ENDPOINT_PATH: &str = "/";

/// Lowest HTTP status that counts as a reachable endpoint.
pub const REACHABLE_STATUS_MIN: u16 = 200;

/// Highest HTTP status that counts as a reachable endpoint.
pub const REACHABLE_STATUS_MAX: u16 = 599;
