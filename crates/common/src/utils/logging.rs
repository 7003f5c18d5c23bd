use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset. sqlx statement logging is noisy at info.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else, or nothing, is compact.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber on stdout. A second call is a no-op.
pub fn init_logging(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter()).with_target(false).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn init_logging_default() {
    init_logging(LogFormat::Compact);
}

pub fn init_logging_json() {
    init_logging(LogFormat::Json);
}

/// Pick the output format from `LOG_FORMAT`.
pub fn init_logging_from_env() {
    init_logging(LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_from_env_value() {
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" json ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
    }
}
