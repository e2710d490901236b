use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::error;

use vinodex_core::auth::AdminAuth;
use vinodex_core::ingest::CsvImporter;
use vinodex_core::query::DirectoryQuery;
use vinodex_core::record::Winery;
use vinodex_core::sample;
use vinodex_core::store::DirectoryStore;

const USAGE: &str = "\
usage: vinodex <command>

commands:
  import <file.csv>      bulk-import winery records (all-or-nothing)
  add <file.json>        insert a single record
  feature <id> [on|off]  set a record's featured flag (default on)
  search <term>          keyword search over name, city, state, description
  show <id>              print one record
  featured [limit]       list featured records (default limit 6)
  history                list receipts of committed imports
  sample [path]          write a reference CSV (default sample-wineries.csv)

environment:
  VINODEX_STORAGE_PATH        store directory (default data/directory)
  VINODEX_ADMIN_CREDENTIALS   JSON map of admin email -> password
  VINODEX_ADMIN_EMAIL         sign-in for mutating commands
  VINODEX_ADMIN_PASSWORD
  VINODEX_LOG                 log level (default info)
";

#[tokio::main]
async fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprint!("{USAGE}");
        std::process::exit(2);
    };

    // Storage path from env or default
    let storage_path =
        env::var("VINODEX_STORAGE_PATH").unwrap_or_else(|_| "data/directory".to_string());

    if let Err(e) = run(command, &args[1..], &storage_path).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: &str, args: &[String], storage_path: &str) -> Result<()> {
    match command {
        "import" => {
            let file = args.first().context("usage: vinodex import <file.csv>")?;
            sign_in_admin()?;
            let store = Arc::new(DirectoryStore::open(storage_path)?);
            let importer = CsvImporter::new(store);
            let receipt = importer.import_path(Path::new(file)).await?;
            println!(
                "Imported {} wineries from {} (batch {})",
                receipt.records_written, receipt.source, receipt.batch_id
            );
        }
        "add" => {
            let file = args.first().context("usage: vinodex add <file.json>")?;
            sign_in_admin()?;
            let content = fs::read_to_string(file)
                .with_context(|| format!("could not read record file {file}"))?;
            let record: Winery = serde_json::from_str(&content)?;
            let store = DirectoryStore::open(storage_path)?;
            let inserted = store.insert_one(record).await?;
            println!(
                "Added {} ({})",
                inserted.name,
                inserted.id.as_deref().unwrap_or("?")
            );
        }
        "feature" => {
            let id = args
                .first()
                .context("usage: vinodex feature <id> [on|off]")?;
            let featured = match args.get(1).map(String::as_str) {
                None | Some("on") => true,
                Some("off") => false,
                Some(other) => bail!("expected on or off, got {other}"),
            };
            sign_in_admin()?;
            let store = DirectoryStore::open(storage_path)?;
            let updated = store.set_featured(id, featured).await?;
            println!(
                "{} is {} featured",
                updated.name,
                if updated.featured { "now" } else { "no longer" }
            );
        }
        "search" => {
            let term = args.first().context("usage: vinodex search <term>")?;
            let results = match open_for_reads(storage_path) {
                Some(store) => DirectoryQuery::new(store).search_by_keyword(term).await,
                None => Vec::new(),
            };
            if results.is_empty() {
                println!("No wineries match \"{term}\"");
            }
            for winery in &results {
                print_line(winery);
            }
        }
        "show" => {
            let id = args.first().context("usage: vinodex show <id>")?;
            let found = match open_for_reads(storage_path) {
                Some(store) => DirectoryQuery::new(store).get_by_id(id).await,
                None => None,
            };
            match found {
                Some(winery) => print_full(&winery),
                None => println!("No winery with id {id}"),
            }
        }
        "featured" => {
            let limit = match args.first() {
                Some(raw) => raw.parse().context("limit must be a number")?,
                None => 6,
            };
            let results = match open_for_reads(storage_path) {
                Some(store) => DirectoryQuery::new(store).list_featured(limit).await,
                None => Vec::new(),
            };
            if results.is_empty() {
                println!("No featured wineries");
            }
            for winery in &results {
                print_line(winery);
            }
        }
        "history" => {
            let store = DirectoryStore::open(storage_path)?;
            let history = store.import_history();
            if history.is_empty() {
                println!("No imports recorded");
            }
            for receipt in &history {
                println!(
                    "{}  {:>5} records  {}  (batch {})",
                    receipt.committed_at.to_rfc3339(),
                    receipt.records_written,
                    receipt.source,
                    receipt.batch_id
                );
            }
        }
        "sample" => {
            let path = args
                .first()
                .map(String::as_str)
                .unwrap_or("sample-wineries.csv");
            sample::write_sample(path)?;
            println!("Wrote {path}");
        }
        _ => {
            eprint!("{USAGE}");
            bail!("unknown command: {command}");
        }
    }
    Ok(())
}

/// Gate mutating commands behind the auth boundary.
///
/// With no credentials configured the boundary admits anonymous admin use.
/// Once VINODEX_ADMIN_CREDENTIALS is set, VINODEX_ADMIN_EMAIL and
/// VINODEX_ADMIN_PASSWORD must match one of its entries.
fn sign_in_admin() -> Result<AdminAuth> {
    let auth = AdminAuth::new();
    auth.load_from_env();
    if let (Ok(email), Ok(password)) = (
        env::var("VINODEX_ADMIN_EMAIL"),
        env::var("VINODEX_ADMIN_PASSWORD"),
    ) {
        auth.sign_in(&email, &password)?;
    }
    auth.check()?;
    Ok(auth)
}

/// Read-only commands degrade instead of failing: an unavailable store is
/// logged and served as an empty directory.
fn open_for_reads(storage_path: &str) -> Option<Arc<DirectoryStore>> {
    match DirectoryStore::open(storage_path) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            error!(error = %e, "directory store unavailable, serving empty results");
            None
        }
    }
}

fn print_line(winery: &Winery) {
    println!(
        "{}  {} ({}, {})  rating {:.1}{}",
        winery.id.as_deref().unwrap_or("?"),
        winery.name,
        winery.city,
        winery.state,
        winery.rating,
        if winery.featured { "  [featured]" } else { "" }
    );
}

fn print_full(winery: &Winery) {
    print_line(winery);
    println!("  address:  {}", winery.address);
    if !winery.phone.is_empty() {
        println!("  phone:    {}", winery.phone);
    }
    if !winery.site_url.is_empty() {
        println!("  site:     {}", winery.site_url);
    }
    if !winery.image_url.is_empty() {
        println!("  image:    {}", winery.image_url);
    }
    let amenities: Vec<&str> = [
        ("couples", winery.good_for_couples),
        ("groups", winery.good_for_groups),
        ("families", winery.good_for_families),
        ("pet-friendly", winery.pet_friendly),
        ("outdoor seating", winery.outdoor_seating),
        ("live music", winery.live_music),
    ]
    .iter()
    .filter(|(_, on)| *on)
    .map(|(label, _)| *label)
    .collect();
    if !amenities.is_empty() {
        println!("  good for: {}", amenities.join(", "));
    }
    if !winery.description.is_empty() {
        println!("  {}", winery.description);
    }
}

fn init_logging() {
    let level = env::var("VINODEX_LOG")
        .ok()
        .and_then(|raw| raw.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
