//! CLI entry point for mdposts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdposts")]
#[command(version)]
#[command(about = "Markdown blog posts with front-matter, served as pages", long_about = None)]
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
    /// Initialize a new blog directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post, replacing any post with the same slug
    New {
        /// Title of the new post
        title: String,

        /// File stem to use (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Read the markdown body from this file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List all posts
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a post rendered as HTML
    Show {
        slug: String,

        /// Print the whole page rather than just the body
        #[arg(long)]
        page: bool,
    },

    /// Start the page server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdposts=debug,info"
    } else {
        "mdposts=info"
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
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            mdposts::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New { title, slug, file } => {
            let blog = mdposts::Blog::new(&base_dir)?;
            let post =
                mdposts::commands::new::create_post(&blog, &title, slug.as_deref(), file.as_deref())
                    .await?;
            println!("Created: {:?}", blog.posts_dir.join(format!("{}.md", post.slug)));
        }

        Commands::List { json } => {
            let blog = mdposts::Blog::new(&base_dir)?;
            mdposts::commands::list::run(&blog, json).await?;
        }

        Commands::Show { slug, page } => {
            let blog = mdposts::Blog::new(&base_dir)?;
            mdposts::commands::show::run(&blog, &slug, page).await?;
        }

        Commands::Server { port, ip } => {
            let blog = mdposts::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Serving posts from {:?}", blog.posts_dir);
            mdposts::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("mdposts version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
