use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use folio_crypto::PasswordHasher;
use folio_gate::Credentials;
use folio_server::{Environment, FolioServer, ServerConfig};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::HashPassword(args) => cmd_hash_password(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::load(path)?),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let env = Environment::from_env();
    if let Some(root) = args.data_root {
        match env {
            Environment::Development => config.data_root = root,
            Environment::Test => config.test_data_root = root,
        }
    }

    debug!(?config, ?env, "resolved server config");

    let server = FolioServer::new(config, env).context("failed to start server")?;
    println!(
        "{} Folio on {} (root: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().store_root(env).display(),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_hash_password(args: HashPasswordArgs) -> anyhow::Result<()> {
    let hasher = match args.cost {
        Some(cost) => PasswordHasher::new(cost)?,
        None => PasswordHasher::DEFAULT,
    };
    println!("{}", hasher.hash(&args.password)?);
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let env = Environment::from_env();

    println!("{} Config OK", "✓".green().bold());
    println!("  Bind: {}", config.bind_addr.to_string().bold());
    println!("  Environment: {:?}", env);
    println!("  Store root: {}", config.store_root(env).display());

    match &config.credentials_path {
        Some(path) => {
            let credentials = Credentials::load(path)
                .with_context(|| format!("failed to load credentials from {}", path.display()))?;
            println!("  Users: {}", credentials.len().to_string().cyan());
            for user in credentials.usernames() {
                println!("    {}", user.yellow());
            }
        }
        None => println!("  Users: {} (no credentials file; sign-in disabled)", "0".yellow()),
    }
    Ok(())
}
