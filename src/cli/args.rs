use crate::tracing_config::{LogFormat, TracingConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the gentype binary.
#[derive(Parser, Debug)]
#[command(
    name = "gentype",
    version,
    about = "Resolve generic nominal types against a type catalog"
)]
pub struct CliArgs {
    /// JSON file declaring the types to resolve against.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Output format for results and diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Do not memoize resolved types between queries.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a type's brief and full description.
    Resolve {
        /// Type expression, e.g. `HashMap<String,Long>`.
        #[arg(value_name = "TYPE")]
        ty: String,
    },
    /// Infer a descendant's own bindings from a known ancestor instance.
    Subtype {
        /// The known ancestor, e.g. `Map<String,Long>`.
        ancestor: String,
        /// Name of the descendant declaration, e.g. `StringKeyMap`.
        target: String,
    },
    /// View a type as one of its ancestors.
    Supertype {
        #[arg(value_name = "TYPE")]
        ty: String,
        /// Name of the ancestor declaration.
        ancestor: String,
    },
    /// List every ancestor of a type, breadth-first.
    Ancestors {
        #[arg(value_name = "TYPE")]
        ty: String,
    },
    /// Print the declaration header of every catalog type.
    Declarations,
}

/// Diagnostic logging to stderr.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    /// Logging filter, e.g. `debug` or `gentype_solver=trace`.
    /// Overrides `GENTYPE_LOG` and `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Log layout. Overrides `GENTYPE_LOG_FORMAT`.
    #[arg(long, value_enum, ignore_case = true)]
    pub log_format: Option<LogFormat>,

    /// Emit one structured event per resolver query.
    #[arg(long)]
    pub trace_queries: bool,
}

impl LogArgs {
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig::from_env(self.log.as_deref(), self.log_format, self.trace_queries)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
