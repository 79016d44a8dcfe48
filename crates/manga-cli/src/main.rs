//! Catalog administration CLI.
//!
//! Registers books by ISBN lookup, inspects the catalog and its series
//! index, and queries the externally known latest volume for a title.

use anyhow::{bail, Context, Result};
use books_api::{BookInfo, RakutenClient};
use clap::{Parser, Subcommand};
use shared::{volume, Catalog, CatalogError, Config, MangaRecord, Store};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a book by ISBN lookup
    Add {
        /// ISBN (or JAN) code
        isbn: String,
    },
    /// List all registered books
    List,
    /// Query the externally known latest volume for a title
    Latest {
        /// Series or book title
        title: String,
    },
    /// Show tracked series, or the books of one series
    Series {
        /// Series name; omit to list all tracked series
        name: Option<String>,
    },
    /// Delete a book by ISBN
    Remove {
        /// ISBN code of the registered book
        isbn: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    config.apply_env();

    // Console-only logging; command output goes to stdout.
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "manga-cli".to_string(),
        default_level: log_level,
        console: true,
        file: false,
        json_format: false,
    })?;

    std::fs::create_dir_all(config.data_dir()).context("Failed to create data directory")?;

    let store = Store::open(config.database_path()).context("Failed to open store")?;
    let catalog = Catalog::new(store);

    match args.command {
        Command::Add { isbn } => add(&catalog, &config, &isbn).await,
        Command::List => list(&catalog),
        Command::Latest { title } => latest(&config, &title).await,
        Command::Series { name } => series(&catalog, name.as_deref()),
        Command::Remove { isbn } => remove(&catalog, &isbn),
    }
}

fn search_client(config: &Config) -> Result<RakutenClient> {
    if config.rakuten.application_id.is_empty() {
        bail!("Rakuten application ID is required. Set it in config.toml or RAKUTEN_APP_ID env var");
    }
    RakutenClient::new(
        config.rakuten.base_url.clone(),
        config.rakuten.application_id.clone(),
        config.rakuten.requests_per_second,
    )
    .context("Failed to create books API client")
}

async fn add(catalog: &Catalog, config: &Config, isbn: &str) -> Result<()> {
    let client = search_client(config)?;

    println!("Looking up ISBN: {isbn}");
    let book = client
        .search_by_isbn(isbn)
        .await
        .with_context(|| format!("Failed to find book for ISBN {isbn}"))?;

    let mut record = MangaRecord {
        isbn: book.isbn.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        series: None,
        volume: 0,
        publisher: book.publisher.clone(),
        publish_date: book.sales_date.clone(),
        url: book.item_url.clone(),
        tags: Vec::new(),
    };
    if record.isbn.is_empty() {
        record.isbn = isbn.to_string();
    }

    if volume::should_track_as_volume(&book.title, &book.author) {
        let info = volume::extract(&book.title);
        record.volume = info.volume;
        record.series = Some(info.title);
    }

    let existing = match catalog.get_by_isbn(&record.isbn) {
        Ok(_) => true,
        Err(CatalogError::NotFound(_)) => false,
        Err(e) => return Err(e.into()),
    };

    catalog.register(&record)?;

    if existing {
        println!("Updated: {} ({})", record.title, record.author);
    } else {
        println!("Added: {} ({})", record.title, record.author);
    }
    if let Some(series) = record.tracked_series() {
        println!("Tracking series: {} Vol.{}", series, record.volume);
    }

    Ok(())
}

fn list(catalog: &Catalog) -> Result<()> {
    let books = catalog.list()?;

    if books.is_empty() {
        println!("No manga registered yet.");
        return Ok(());
    }

    println!("Registered Manga:");
    println!("==================");
    for b in &books {
        match b.tracked_series() {
            Some(series) => println!(
                "- {} Vol.{} [{}] ({}) - {}",
                b.title, b.volume, series, b.author, b.isbn
            ),
            None => println!("- {} ({}) - {}", b.title, b.author, b.isbn),
        }
    }

    Ok(())
}

async fn latest(config: &Config, title: &str) -> Result<()> {
    let client = search_client(config)?;

    // Volume-agnostic query: "ダンダダン 5" searches the whole series.
    let query = volume::normalize_for_search(title);

    println!("Checking latest volume for: {query}");
    let books = client
        .search_by_title(&query, "-releaseDate", config.rakuten.max_results)
        .await
        .context("Search failed")?;

    if books.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let mut best: Option<(u32, &BookInfo)> = None;
    for book in &books {
        let info = volume::extract(&book.title);
        if info.has_volume && best.map_or(true, |(v, _)| info.volume > v) {
            best = Some((info.volume, book));
        }
    }

    match best {
        Some((vol, book)) => {
            println!("\n📚 Latest Volume Found:");
            println!("  Title: {}", book.title);
            println!("  Volume: {vol}");
            println!("  Author: {}", book.author);
            println!("  Publisher: {}", book.publisher);
            println!("  ISBN: {}", book.isbn);
            println!("  Release Date: {}", book.sales_date);
            println!("  URL: {}", book.item_url);
        }
        None => println!("No numbered volumes found."),
    }

    println!("\nFound {} total result(s) for \"{query}\"", books.len());

    Ok(())
}

fn series(catalog: &Catalog, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let records = catalog.get_by_series(name)?;
            if records.is_empty() {
                println!("No books recorded for series \"{name}\".");
                return Ok(());
            }

            let latest = catalog.latest_volume_in_series(name)?;
            println!("{name} (latest owned: Vol.{latest})");
            for b in &records {
                println!("  - {} Vol.{} ({}) - {}", b.title, b.volume, b.author, b.isbn);
            }
        }
        None => {
            let names = catalog.list_series_names()?;
            if names.is_empty() {
                println!("No series tracked yet.");
                return Ok(());
            }

            println!("Tracked Series:");
            for name in &names {
                println!("- {name}");
            }
        }
    }

    Ok(())
}

fn remove(catalog: &Catalog, isbn: &str) -> Result<()> {
    match catalog.delete(isbn) {
        Ok(()) => {
            println!("Removed {isbn}.");
            println!("Note: any series index entry for this ISBN is kept as is.");
            Ok(())
        }
        Err(CatalogError::NotFound(_)) => {
            println!("No book registered under ISBN {isbn}.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
