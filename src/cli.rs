use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "walkthrough")]
#[command(
    author,
    version,
    about = "Register merchants and products as temp views and query them"
)]
pub struct Cli {
    /// Directory containing data/merchants.csv and data/products.csv
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// SQL to run against the registered views
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output format for query results
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// CSV delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Number of execution partitions (defaults to the CPU count)
    #[arg(long)]
    pub partitions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["walkthrough"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.delimiter, ',');
        assert!(cli.query.is_none());
    }

    #[test]
    fn test_query_and_format() {
        let cli = Cli::try_parse_from([
            "walkthrough",
            "--data-dir",
            "/tmp/shop",
            "-q",
            "SELECT * FROM merchants",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(cli.query.as_deref(), Some("SELECT * FROM merchants"));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
