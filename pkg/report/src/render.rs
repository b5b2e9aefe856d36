use crossterm::style::Stylize;
use pkg_types::endpoint::{ProbeVerdict, ServiceRole};
use pkg_types::health::{Domain, Verdict};
use pkg_types::report::{ClusterReport, EndpointStatus, OverallVerdict};
use std::fmt::Write;

use crate::aggregate::{breakdown, outages, summary_rows};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Also list every probed endpoint
    pub verbose: bool,
    /// Emit ANSI colors
    pub color: bool,
}

/// Render the report as JSON.
pub fn render_json(report: &ClusterReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render the delivery report as plain text.
pub fn render_text(report: &ClusterReport, opts: RenderOptions) -> String {
    let mut out = String::new();
    let paint = Painter { color: opts.color };

    // ─── Cluster ───────────────────────────────────────────────────────────
    heading(&mut out, "Cluster");
    let identity = &report.identity;
    let _ = writeln!(out, "{:<14}{}", "Cluster:", or_unknown(&identity.name));
    let _ = writeln!(out, "{:<14}{}", "Context:", or_unknown(&identity.context));
    let _ = writeln!(out, "{:<14}{}", "Version:", or_unknown(&identity.version));
    let _ = writeln!(
        out,
        "{:<14}{}",
        "Service mesh:",
        identity.mesh_version.as_deref().unwrap_or("not installed")
    );
    if let Some(nodes) = report.domain(Domain::Nodes) {
        let _ = writeln!(out, "{:<14}{}/{} ready", "Nodes:", nodes.healthy, nodes.total);
    }
    let _ = writeln!(
        out,
        "{:<14}{}",
        "Generated:",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    // ─── Endpoints ─────────────────────────────────────────────────────────
    heading(&mut out, "Endpoints");
    for role in ServiceRole::ALL {
        let status = report.discovered.status(role);
        let value = match status {
            EndpointStatus::Found(_) => status.to_string(),
            _ => paint.dim(&status.to_string()),
        };
        let _ = writeln!(out, "{:<14}{}", role.label(), value);
    }

    // ─── Summary ───────────────────────────────────────────────────────────
    heading(&mut out, "Summary");
    let _ = writeln!(
        out,
        "{:<16} {:<10} {:>8} {:>8} {:>8}",
        "COMPONENT", "STATUS", "HEALTHY", "TOTAL", "ISSUES"
    );
    for row in summary_rows(report) {
        let _ = writeln!(
            out,
            "{:<16} {} {:>8} {:>8} {:>8}",
            row.domain.label(),
            paint.status(row.status, 10),
            row.healthy,
            row.total,
            row.issues
        );
    }
    let pods = report.pods;
    let _ = writeln!(
        out,
        "\nPods: {} running, {} pending, {} failed ({} total)",
        pods.running, pods.pending, pods.failed, pods.total
    );

    // ─── Issues ────────────────────────────────────────────────────────────
    match report.verdict {
        OverallVerdict::AllHealthy => {
            heading(&mut out, "Result");
            let _ = writeln!(out, "{}", paint.status("ALL HEALTHY", 0));
        }
        OverallVerdict::IssuesFound(count) => {
            heading(&mut out, &format!("Issues ({})", count));
            for section in breakdown(report) {
                let _ = writeln!(out, "{}", section.domain.label());
                for issue in section.issues {
                    let marker = match issue.severity {
                        Verdict::Failed => paint.status("FAILED", 9),
                        _ => paint.status("DEGRADED", 9),
                    };
                    let _ = writeln!(out, "  {} {}: {}", marker, issue.id, issue.reason);
                }
            }
            let outages = outages(report);
            if !outages.is_empty() {
                let _ = writeln!(out, "Unavailable");
                for (domain, reason) in outages {
                    let _ = writeln!(
                        out,
                        "  {} {}: retrieval failed: {}",
                        paint.status("UNKNOWN", 9),
                        domain.label(),
                        reason
                    );
                }
            }
        }
    }

    if opts.verbose && !report.endpoints.is_empty() {
        heading(&mut out, "Probed endpoints");
        for endpoint in &report.endpoints {
            let code = endpoint
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            let verdict = match endpoint.verdict {
                ProbeVerdict::Healthy => paint.status("HEALTHY", 12),
                other => paint.status_as(&other.to_string(), "FAILED", 12),
            };
            let _ = writeln!(out, "{} {:>4}  {}", verdict, code, endpoint.url);
        }
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n═══ {} {}", title, "═".repeat(60usize.saturating_sub(title.len())));
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}

struct Painter {
    color: bool,
}

impl Painter {
    /// Pad `label` to `width` and color it by the status it names.
    fn status(&self, label: &str, width: usize) -> String {
        self.status_as(label, label, width)
    }

    fn status_as(&self, label: &str, status: &str, width: usize) -> String {
        let padded = format!("{:<width$}", label, width = width);
        if !self.color {
            return padded;
        }
        match status {
            "HEALTHY" | "ALL HEALTHY" => padded.green().to_string(),
            "DEGRADED" => padded.yellow().to_string(),
            "FAILED" => padded.red().to_string(),
            _ => padded.dark_grey().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}
