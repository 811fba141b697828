//! CLI entry point for asciiblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "asciiblog")]
#[command(version)]
#[command(about = "A markdown blog server with box-drawn headings, RSS and sitemap", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "0.0.0.0")]
        ip: String,

        /// Show draft posts and pages
        #[arg(long)]
        preview_drafts: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "asciiblog=debug,info"
    } else {
        "asciiblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Commands::Server {
            port,
            ip,
            preview_drafts,
        } => {
            let mut blog = asciiblog::Blog::new(&base_dir)?;
            if preview_drafts {
                blog.config.preview_drafts = true;
            }
            let port = port.unwrap_or(blog.config.port);

            if blog.config.preview_drafts {
                tracing::info!("Draft preview enabled");
            }
            tracing::info!("Starting server at http://{}:{}", ip, port);
            asciiblog::server::start(&blog, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let blog = asciiblog::Blog::new(&base_dir)?;
            asciiblog::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Version => {
            println!("asciiblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
