use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "order-tracking")]
#[command(about = "Attach carrier tracking numbers to orders and list them")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the order store path from config
    #[arg(long)]
    pub store: Option<String>,

    /// Caller id recorded in logs
    #[arg(long, default_value = "cli")]
    pub caller: String,

    /// Roles of the caller, checked against the authorization config
    #[arg(long, value_delimiter = ',', default_value = "administrator")]
    pub roles: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Attach one tracking number to an order
    Add { order: String, number: String },

    /// Attach every number found in a block of text (argument, --file, or stdin)
    BulkAdd {
        order: String,
        input: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Remove the tracking number at a position
    Delete {
        order: String,
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Show the tracking numbers of an order
    List {
        order: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Answer newline-delimited JSON requests from stdin on stdout
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_with_negative_index() {
        let args = CliArgs::parse_from(["order-tracking", "delete", "1042", "-1"]);
        match args.command {
            Command::Delete { order, index } => {
                assert_eq!(order, "1042");
                assert_eq!(index, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_format_and_roles() {
        let args = CliArgs::parse_from([
            "order-tracking",
            "--roles",
            "customer,vip",
            "list",
            "7",
            "--format",
            "csv",
        ]);
        assert_eq!(args.roles, vec!["customer", "vip"]);
        assert!(matches!(
            args.command,
            Command::List {
                format: OutputFormat::Csv,
                ..
            }
        ));
    }
}
