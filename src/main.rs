use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use picasa_feed::util::strip_control_chars;
use picasa_feed::{Config, Document, Paginate, Picasa, RequestOptions, Resource};

/// Get the config file path (~/.config/picasa-feed/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("picasa-feed")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "picasa-feed", about = "Browse Picasa Web Albums feeds from the terminal")]
struct Args {
    /// Config file (default: ~/.config/picasa-feed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print records as JSON instead of a listing
    #[arg(long, global = true)]
    json: bool,

    /// Number of pages to print, following `next` links
    #[arg(long, global = true, default_value_t = 1)]
    pages: usize,

    #[command(flatten)]
    query: QueryArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct QueryArgs {
    #[arg(long, global = true)]
    max_results: Option<u32>,

    #[arg(long, global = true)]
    start_index: Option<u32>,

    /// Thumbnail size codes, comma separated (e.g. 72c,144)
    #[arg(long, global = true)]
    thumbsize: Option<String>,

    /// Largest image size code for content urls
    #[arg(long, global = true)]
    imgmax: Option<String>,
}

impl QueryArgs {
    fn options(&self) -> RequestOptions {
        RequestOptions {
            max_results: self.max_results,
            start_index: self.start_index,
            thumbsize: self.thumbsize.clone(),
            imgmax: self.imgmax.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// A user's albums (default: the authenticated user)
    User { user_id: Option<String> },
    /// Photos of one album
    Album {
        album_id: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// A user's recently uploaded photos
    Recent { user_id: Option<String> },
    /// Photos matching a query across all users
    Search { query: String },
    /// Any feed url
    Url { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .with_env_overrides();
    tracing::debug!(?config, "Effective configuration");

    let picasa = Picasa::new(&config).context("Failed to create HTTP client")?;
    let options = args.query.options();

    let first = match &args.command {
        Command::User { user_id } => picasa.user(user_id.as_deref(), options).await,
        Command::Album { album_id, user } => {
            let options = RequestOptions {
                user_id: user.clone(),
                ..options
            };
            picasa.album(album_id, options).await
        }
        Command::Recent { user_id } => picasa.recent_photos(user_id.as_deref(), options).await,
        Command::Search { query } => picasa.search(query, options).await,
        Command::Url { url } => picasa.get_url(url, options).await,
    }
    .context("Request failed")?;

    let Some(mut document) = first else {
        eprintln!("No feed found.");
        std::process::exit(1);
    };

    let pages = args.pages.max(1);
    for page in 1..=pages {
        print_document(&document, args.json)?;
        if page == pages {
            break;
        }
        match document.next().await.context("Failed to fetch next page")? {
            Some(next) => document = next,
            None => break,
        }
    }

    Ok(())
}

fn print_document(document: &Document, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(document).context("Failed to serialize record")?;
        println!("{text}");
        return Ok(());
    }

    let title = document.as_resource().title().unwrap_or("(untitled)");
    println!("{:?}: {}", document.kind(), strip_control_chars(title));
    match document {
        Document::User(user) => {
            for album in user.albums() {
                println!(
                    "  {:<40} {:>5} photos  {}",
                    clean(album.header.title.as_deref()),
                    album.numphotos.unwrap_or(0),
                    clean(album.rights.as_deref()),
                );
            }
        }
        Document::Album(album) => print_photos(&album.entries),
        Document::Search(search) => print_photos(&search.entries),
        Document::RecentPhotos(recent) => print_photos(recent.photos()),
        Document::Photo(photo) => print_photos(std::slice::from_ref(photo)),
    }
    Ok(())
}

fn print_photos(photos: &[picasa_feed::Photo]) {
    for photo in photos {
        let dimensions = match (photo.width, photo.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => String::new(),
        };
        println!(
            "  {:<40} {:>11}  {}",
            clean(photo.header.title.as_deref()),
            dimensions,
            clean(photo.url(None)),
        );
    }
}

fn clean(text: Option<&str>) -> String {
    strip_control_chars(text.unwrap_or("")).into_owned()
}
