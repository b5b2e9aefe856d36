use futures_util::stream::{self, StreamExt};
use pkg_constants::network::{REACHABLE_STATUS_MAX, REACHABLE_STATUS_MIN};
use pkg_types::endpoint::{EndpointCandidate, EndpointResult, ProbeVerdict};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Two-stage endpoint liveness check: DNS resolution, then a bounded HTTP GET.
///
/// A DNS failure short-circuits the check; no HTTP request is made and no
/// status code is recorded. Any HTTP status in `200..=599` counts as healthy
/// because the probe validates reachability, not application success.
pub struct EndpointProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl EndpointProbe {
    /// Build a probe whose connect and total request time are both bounded by `timeout`.
    pub fn new(timeout: Duration, insecure: bool) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe a single URL.
    pub async fn probe(&self, url: &str) -> EndpointResult {
        self.probe_cancellable(url, &CancellationToken::new()).await
    }

    /// Probe a single URL, giving up as soon as `cancel` fires.
    ///
    /// Cancellation during resolution reports `DnsFailed`, during the request `HttpFailed`.
    pub async fn probe_cancellable(&self, url: &str, cancel: &CancellationToken) -> EndpointResult {
        let host = host_of(url).unwrap_or_default();
        let result = |verdict, status_code| EndpointResult {
            url: url.to_string(),
            host: host.clone(),
            namespace: String::new(),
            ingress_name: String::new(),
            verdict,
            status_code,
        };

        // 1. DNS
        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            ok = self.resolve(url) => ok,
        };
        if !resolved {
            warn!("Endpoint {}: DNS resolution failed", url);
            return result(ProbeVerdict::DnsFailed, None);
        }
        debug!("Endpoint {}: resolved", url);

        // 2. HTTP
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            resp = self.client.get(url).send() => Some(resp),
        };
        match response {
            Some(Ok(resp)) => {
                let code = resp.status().as_u16();
                if (REACHABLE_STATUS_MIN..=REACHABLE_STATUS_MAX).contains(&code) {
                    debug!("Endpoint {}: HTTP {}", url, code);
                    result(ProbeVerdict::Healthy, Some(code))
                } else {
                    warn!("Endpoint {}: unexpected HTTP status {}", url, code);
                    result(ProbeVerdict::HttpFailed, Some(code))
                }
            }
            Some(Err(e)) => {
                warn!("Endpoint {}: HTTP request failed: {}", url, e);
                result(ProbeVerdict::HttpFailed, None)
            }
            None => {
                warn!("Endpoint {}: probe cancelled", url);
                result(ProbeVerdict::HttpFailed, None)
            }
        }
    }

    /// Probe every candidate with at most `concurrency` requests in flight.
    ///
    /// Results come back in candidate order regardless of completion order,
    /// each tagged with the ingress it was discovered from.
    pub async fn probe_all(
        &self,
        candidates: &[EndpointCandidate],
        concurrency: usize,
        cancel: &CancellationToken,
    ) -> Vec<EndpointResult> {
        stream::iter(candidates)
            .map(|candidate| async move {
                let mut result = self.probe_cancellable(&candidate.url(), cancel).await;
                result.namespace = candidate.namespace.clone();
                result.ingress_name = candidate.ingress_name.clone();
                result
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Resolve the URL's host within the probe timeout. IP literals resolve to themselves.
    async fn resolve(&self, url: &str) -> bool {
        let Ok(parsed) = reqwest::Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
        let port = parsed.port_or_known_default().unwrap_or(443);

        match tokio::time::timeout(self.timeout, tokio::net::lookup_host((host.as_str(), port)))
            .await
        {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                debug!("Resolving {} failed: {}", host, e);
                false
            }
            Err(_) => {
                debug!("Resolving {} timed out", host);
                false
            }
        }
    }
}

/// Probe one URL with a fresh client bounded by `timeout_secs`.
pub async fn probe_url(url: &str, timeout_secs: u64) -> reqwest::Result<EndpointResult> {
    let probe = EndpointProbe::new(Duration::from_secs(timeout_secs), false)?;
    Ok(probe.probe(url).await)
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `status` to every connection on an ephemeral local port.
    async fn serve_status(status: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        port
    }

    /// Accept connections but never answer.
    async fn serve_silence() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        port
    }

    fn make_probe(secs: u64) -> EndpointProbe {
        EndpointProbe::new(Duration::from_secs(secs), false).unwrap()
    }

    #[tokio::test]
    async fn test_dns_failure_short_circuits() {
        let result = make_probe(2).probe("https://no-such-host.invalid/").await;
        assert_eq!(result.verdict, ProbeVerdict::DnsFailed);
        assert_eq!(result.status_code, None);
        assert_eq!(result.host, "no-such-host.invalid");
        assert!(result.namespace.is_empty());
    }

    #[tokio::test]
    async fn test_probe_url_one_shot() {
        let port = serve_status("200 OK").await;
        let result = probe_url(&format!("http://127.0.0.1:{}/metrics", port), 5)
            .await
            .unwrap();
        assert_eq!(result.verdict, ProbeVerdict::Healthy);
        assert_eq!(result.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_ok_response_is_healthy() {
        let port = serve_status("200 OK").await;
        let result = make_probe(5).probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(result.verdict, ProbeVerdict::Healthy);
        assert_eq!(result.status_code, Some(200));
    }

    #[tokio::test]
    async fn test_error_status_still_proves_reachability() {
        let port = serve_status("503 Service Unavailable").await;
        let result = make_probe(5).probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(result.verdict, ProbeVerdict::Healthy);
        assert_eq!(result.status_code, Some(503));
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let port = serve_status("302 Found").await;
        let result = make_probe(5).probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(result.verdict, ProbeVerdict::Healthy);
        assert_eq!(result.status_code, Some(302));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = make_probe(2).probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(result.verdict, ProbeVerdict::HttpFailed);
        assert_eq!(result.status_code, None);
    }

    #[tokio::test]
    async fn test_timeout_is_http_failure() {
        let port = serve_silence().await;
        let started = std::time::Instant::now();
        let result = make_probe(1).probe(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(result.verdict, ProbeVerdict::HttpFailed);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_cancellation_stops_inflight_probe() {
        let port = serve_silence().await;
        let probe = make_probe(30);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = probe
            .probe_cancellable(&format!("http://127.0.0.1:{}/", port), &cancel)
            .await;
        assert_eq!(result.verdict, ProbeVerdict::HttpFailed);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_probe_all_preserves_order() {
        let port = serve_status("200 OK").await;
        let candidates: Vec<EndpointCandidate> = ["127.0.0.1", "no-such-host.invalid", "127.0.0.1"]
            .iter()
            .enumerate()
            .map(|(i, host)| EndpointCandidate {
                namespace: "monitoring".to_string(),
                ingress_name: format!("ing-{}", i),
                host: format!("{}:{}", host, port),
                path: "/".to_string(),
            })
            .collect();

        // Candidates always use https; the plain-HTTP server makes the
        // reachable ones fail at the TLS layer, which still orders results.
        let results = make_probe(2)
            .probe_all(&candidates, 3, &CancellationToken::new())
            .await;
        assert_eq!(results.len(), 3);
        assert!(results[0].url.starts_with("https://127.0.0.1"));
        assert_eq!(results[1].verdict, ProbeVerdict::DnsFailed);
        assert!(results[2].url.starts_with("https://127.0.0.1"));
        assert_eq!(results[0].verdict, ProbeVerdict::HttpFailed);
        let ingresses: Vec<&str> = results.iter().map(|r| r.ingress_name.as_str()).collect();
        assert_eq!(ingresses, vec!["ing-0", "ing-1", "ing-2"]);
        assert!(results.iter().all(|r| r.namespace == "monitoring"));
    }
}
