use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::{debug, info};

use mcat_catalog::CatalogService;
use mcat_server::{CatalogServer, ServerConfig, StorageConfig};
use mcat_store::S3Settings;
use mcat_types::ModelRecord;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Init(args) => cmd_init(apply_storage(config, &args)).await,
        Command::List(args) => cmd_list(apply_storage(config, &args.storage), args.format).await,
        Command::Config(args) => cmd_config(apply_storage(config, &args)),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            ServerConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))
        }
        None => Ok(ServerConfig::default()),
    }
}

/// Command-line storage flags win over the configuration file.
pub fn apply_storage(mut config: ServerConfig, args: &StorageArgs) -> ServerConfig {
    if args.ephemeral {
        config.storage = StorageConfig::Memory;
    } else if let Some(root) = &args.root {
        config.storage = StorageConfig::Fs { root: root.clone() };
    } else if let Some(bucket) = &args.bucket {
        let mut settings = S3Settings::new(bucket.clone());
        if let Some(region) = &args.region {
            settings.region = region.clone();
        }
        settings.endpoint = args.endpoint.clone();
        config.storage = StorageConfig::S3(settings);
    }
    config
}

fn open_service(config: ServerConfig) -> anyhow::Result<Arc<CatalogService>> {
    CatalogServer::new(config)
        .build_service()
        .context("opening storage")
}

async fn cmd_serve(config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = apply_storage(config, &args.storage);
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} Serving model catalog on {}",
        "✓".green().bold(),
        config.bind_addr.to_string().bold()
    );
    CatalogServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_init(config: ServerConfig) -> anyhow::Result<()> {
    info!(storage = ?config.storage, "preparing storage container");
    let service = open_service(config)?;
    service.init().await.context("preparing storage container")?;
    println!("{} Storage container ready", "✓".green().bold());
    Ok(())
}

async fn cmd_list(config: ServerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let models = service.list_models().await?;
    debug!(count = models.len(), "catalog read");
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&models)?),
        OutputFormat::Text => print_models(&models),
    }
    Ok(())
}

fn print_models(models: &[ModelRecord]) {
    if models.is_empty() {
        println!("No models registered.");
        return;
    }
    for m in models {
        println!("{}  {}", m.filename.yellow().bold(), m.name);
        println!(
            "  position {}  rotation {}  scale {}",
            m.position, m.rotation, m.scale
        );
        if m.price > 0.0 {
            println!("  price {}", format!("{:.2}", m.price).green());
        }
        if !m.details.is_empty() {
            println!("  {}", m.details.dimmed());
        }
    }
    println!("{} model(s)", models.len().to_string().bold());
}

fn cmd_config(config: ServerConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn ephemeral_flag_selects_memory() {
        let args = StorageArgs { ephemeral: true, ..StorageArgs::default() };
        let config = apply_storage(ServerConfig::default(), &args);
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn bucket_flags_build_s3_settings() {
        let args = StorageArgs {
            bucket: Some("3d-store-challenge".into()),
            region: Some("eu-west-1".into()),
            ..StorageArgs::default()
        };
        match apply_storage(ServerConfig::default(), &args).storage {
            StorageConfig::S3(s) => {
                assert_eq!(s.bucket, "3d-store-challenge");
                assert_eq!(s.region, "eu-west-1");
                assert!(s.endpoint.is_none());
            }
            other => panic!("expected s3, got {other:?}"),
        }
    }

    #[test]
    fn no_flags_keep_file_config() {
        let mut base = ServerConfig::default();
        base.storage = StorageConfig::Fs { root: PathBuf::from("/srv") };
        let config = apply_storage(base.clone(), &StorageArgs::default());
        assert_eq!(config, base);
    }

    #[tokio::test]
    async fn list_on_ephemeral_storage_is_empty() {
        let service = open_service(ServerConfig::ephemeral()).unwrap();
        assert!(service.list_models().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn init_creates_storage_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        let mut config = ServerConfig::default();
        config.storage = StorageConfig::Fs { root: root.clone() };

        cmd_init(config.clone()).await.unwrap();
        assert!(root.is_dir());
        cmd_list(config, OutputFormat::Json).await.unwrap();
    }
}
