mod backends;
mod boxfile;
mod catalog;
mod cli;
mod commands;
mod error;
mod manager;
mod query;
mod ui;
mod uri;
mod version;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Add {
            catalog,
            box_path,
            name,
            description,
            version,
            provider,
            checksum_type,
        } => {
            commands::add::add(
                catalog,
                box_path,
                name,
                description,
                version,
                provider,
                checksum_type,
            )
            .await
        }
        Commands::Query {
            catalog,
            version,
            provider,
        } => commands::query::query(catalog, version, provider).await,
        Commands::Delete {
            catalog,
            version,
            provider,
        } => commands::delete::delete(catalog, version, provider).await,
        Commands::Show { catalog } => commands::show::show(catalog).await,
    }
}
