use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Targets of the workspace crates that make up the proxy.
pub const WORKSPACE_TARGETS: [&str; 5] = [
    "ai_llm_service",
    "plant_qa",
    "plant_store",
    "api",
    "ayurvedic_atlas_backend",
];

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Compact single-line formatting layer.
///
/// - RFC3339 UTC timestamps
/// - level, target and `file:line`
/// - span close events (durations of instrumented functions)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(
            fmt::format()
                .compact()
                .with_timer(ChronoRfc3339Utc)
                .with_level(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
}

/// Level directives for every workspace crate, e.g. `plant_qa=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let lvl = level.as_str().to_lowercase();
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|target| Directive::from_str(&format!("{target}={lvl}")).ok())
        .collect()
}

/// `RUST_LOG` if set, otherwise `default` plus `level` for the workspace crates.
///
/// Example: `default = "warn"`, `level = Level::INFO` shows only warnings from
/// dependencies and INFO from the proxy itself.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), EnvFilter::add_directive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_workspace_crate() {
        let d = level_directives(Level::DEBUG);
        assert_eq!(d.len(), WORKSPACE_TARGETS.len());
        assert!(d.iter().any(|d| d.to_string() == "plant_qa=debug"));
    }
}
