// CLI module for handling command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "boxcat")]
#[command(about = "Manage versioned Vagrant box catalogs across storage backends")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a box file to a catalog
    Add {
        /// Catalog URI (file:// or s3://); a bare local path is also accepted
        #[arg(long)]
        catalog: String,
        /// Local path to the .box file
        #[arg(long = "box")]
        box_path: PathBuf,
        /// Name of the box tracked in the catalog
        #[arg(long)]
        name: String,
        /// Description stored in the catalog; always overwrites the previous one
        #[arg(long, default_value = "")]
        description: String,
        /// Exact version being added (no query specifiers)
        #[arg(long)]
        version: String,
        /// Provider name; detected from the box's metadata.json when omitted
        #[arg(long)]
        provider: Option<String>,
        /// Checksum algorithm recorded in the catalog (sha1 or sha256)
        #[arg(long, default_value = "sha1")]
        checksum_type: String,
    },
    /// List boxes matching a version expression and provider regex
    Query {
        /// Catalog URI (file:// or s3://); a bare local path is also accepted
        #[arg(long)]
        catalog: String,
        /// Version expression like '>=1.2.5'; empty matches every version
        #[arg(long, default_value = "")]
        version: String,
        /// Provider name regex; empty matches every provider
        #[arg(long, default_value = "")]
        provider: String,
    },
    /// Delete every box matching a query, both catalog entries and files
    Delete {
        /// Catalog URI (file:// or s3://); a bare local path is also accepted
        #[arg(long)]
        catalog: String,
        /// Version expression like '<1.0.0'
        #[arg(long)]
        version: String,
        /// Provider name regex
        #[arg(long)]
        provider: String,
    },
    /// Print the whole catalog
    Show {
        /// Catalog URI (file:// or s3://); a bare local path is also accepted
        #[arg(long)]
        catalog: String,
    },
}
