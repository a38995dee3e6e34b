use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mcat",
    about = "Model catalog: storage and HTTP service for 3D assets",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create the storage container
    Init(StorageArgs),
    /// Print the model catalog
    List(ListArgs),
    /// Print the effective configuration
    Config(StorageArgs),
}

/// Storage overrides shared by every command. At most one backend flag
/// may be given.
#[derive(Args, Clone, Debug, Default)]
pub struct StorageArgs {
    /// Store assets under this directory
    #[arg(long, conflicts_with_all = ["bucket", "ephemeral"])]
    pub root: Option<PathBuf>,
    /// Store assets in this S3 bucket
    #[arg(long, conflicts_with = "ephemeral")]
    pub bucket: Option<String>,
    /// Bucket region
    #[arg(long, requires = "bucket")]
    pub region: Option<String>,
    /// Custom S3 endpoint
    #[arg(long, requires = "bucket")]
    pub endpoint: Option<String>,
    /// Keep everything in memory
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
    #[command(flatten)]
    pub storage: StorageArgs,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
    #[command(flatten)]
    pub storage: StorageArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_with_overrides() {
        let cli = Cli::try_parse_from(["mcat", "serve", "--bind", "127.0.0.1:8080", "--root", "/srv/models"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind, Some("127.0.0.1:8080".parse().unwrap()));
                assert_eq!(args.storage.root, Some(PathBuf::from("/srv/models")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn backend_flags_conflict() {
        assert!(Cli::try_parse_from(["mcat", "init", "--root", "x", "--bucket", "y"]).is_err());
        assert!(Cli::try_parse_from(["mcat", "init", "--region", "eu-west-1"]).is_err());
    }

    #[test]
    fn list_json_format() {
        let cli = Cli::try_parse_from(["mcat", "list", "--format", "json", "--ephemeral"]).unwrap();
        assert!(matches!(cli.command, Command::List(ListArgs { format: OutputFormat::Json, .. })));
    }
}
