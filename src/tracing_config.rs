//! Diagnostic logging for the `gentype` binary.
//!
//! Logging is off unless a filter is supplied, either with `--log` or through
//! `GENTYPE_LOG` (falling back to `RUST_LOG`). `--trace-queries` adds the
//! resolver's structured query events (target `gentype::query_json`) on top of
//! whatever filter is active. Output always goes to stderr, so stdout only ever
//! carries reports.
//!
//! ```bash
//! # Resolver decisions as an indented tree
//! gentype --log debug --log-format tree -c types.json subtype 'Map<String,Long>' HashMap
//!
//! # One JSON object per resolver query
//! gentype --trace-queries --log-format json -c types.json resolve 'List<String>'
//! ```

use clap::ValueEnum;
use gentype_solver::QUERY_TRACE_TARGET;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Flat text lines.
    #[default]
    Text,
    /// Indented span tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a `GENTYPE_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives; `None` leaves logging disabled.
    pub filter: Option<String>,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Combine command-line settings with the environment.
    ///
    /// Flags win over `GENTYPE_LOG`/`GENTYPE_LOG_FORMAT`, which win over
    /// `RUST_LOG`. `env` looks up one variable.
    pub fn resolve(
        log: Option<&str>,
        log_format: Option<LogFormat>,
        trace_queries: bool,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut filter = log
            .map(str::to_string)
            .or_else(|| env("GENTYPE_LOG"))
            .or_else(|| env("RUST_LOG"))
            .filter(|directives| !directives.trim().is_empty());

        if trace_queries {
            let query = format!("{QUERY_TRACE_TARGET}=trace");
            filter = Some(match filter {
                Some(existing) => format!("{existing},{query}"),
                None => query,
            });
        }

        let format = log_format
            .or_else(|| env("GENTYPE_LOG_FORMAT").map(|value| LogFormat::parse(&value)))
            .unwrap_or_default();

        Self { filter, format }
    }

    pub fn from_env(log: Option<&str>, log_format: Option<LogFormat>, trace_queries: bool) -> Self {
        Self::resolve(log, log_format, trace_queries, |name| std::env::var(name).ok())
    }

    /// Install the global subscriber.
    ///
    /// Returns `false` when logging is disabled or a subscriber is already
    /// installed.
    pub fn init(&self) -> bool {
        let Some(directives) = &self.filter else {
            return false;
        };
        let filter = EnvFilter::builder().parse_lossy(directives);

        let installed = match self.format {
            LogFormat::Tree => {
                let tree_layer = tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_targets(true);
                Registry::default().with(filter).with(tree_layer).try_init().is_ok()
            }
            LogFormat::Json => {
                let json_layer = fmt::layer().json().with_writer(std::io::stderr);
                Registry::default().with(filter).with(json_layer).try_init().is_ok()
            }
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
        };
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
    }

    #[test]
    fn test_disabled_without_filter() {
        let config = TracingConfig::resolve(None, None, false, env(&[]));
        assert_eq!(config.filter, None);
        assert_eq!(config.format, LogFormat::Text);
        assert!(!config.init());

        let blank = TracingConfig::resolve(None, None, false, env(&[("GENTYPE_LOG", " ")]));
        assert_eq!(blank.filter, None);
    }

    #[test]
    fn test_flag_beats_environment() {
        let vars = [
            ("GENTYPE_LOG", "info"),
            ("RUST_LOG", "warn"),
            ("GENTYPE_LOG_FORMAT", "json"),
        ];
        let config = TracingConfig::resolve(Some("debug"), Some(LogFormat::Tree), false, env(&vars));
        assert_eq!(config.filter.as_deref(), Some("debug"));
        assert_eq!(config.format, LogFormat::Tree);

        let config = TracingConfig::resolve(None, None, false, env(&vars));
        assert_eq!(config.filter.as_deref(), Some("info"));
        assert_eq!(config.format, LogFormat::Json);

        let config = TracingConfig::resolve(None, None, false, env(&vars[1..2]));
        assert_eq!(config.filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_trace_queries_adds_query_target() {
        let config = TracingConfig::resolve(None, Some(LogFormat::Json), true, env(&[]));
        assert_eq!(config.filter.as_deref(), Some("gentype::query_json=trace"));

        let config = TracingConfig::resolve(Some("gentype_solver=debug"), None, true, env(&[]));
        assert_eq!(
            config.filter.as_deref(),
            Some("gentype_solver=debug,gentype::query_json=trace")
        );
    }
}
