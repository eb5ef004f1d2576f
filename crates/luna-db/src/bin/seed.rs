//! # Seed Data Loader
//!
//! Creates the database (if needed), applies migrations and loads the
//! Luna Dine sample dataset.
//!
//! ## Usage
//! ```bash
//! # Seed ./lunadine.db (or $LUNA_DATABASE_PATH)
//! cargo run -p luna-db --bin seed
//!
//! # Specify database path
//! cargo run -p luna-db --bin seed -- --db ./data/lunadine.db
//! ```

use std::env;

use luna_db::seed::seed_sample_data;
use luna_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./lunadine.db";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path =
        env::var("LUNA_DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Luna Dine Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Luna Dine Seed Data Loader");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().list_branches().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} branches", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    seed_sample_data(db.pool()).await?;

    println!();
    for branch in db.catalog().list_branches().await? {
        let menu = db.catalog().menu(branch.id).await?;
        let items: usize = menu.categories.iter().map(|c| c.items.len()).sum();
        let tables = db.catalog().list_tables(branch.id).await?;
        println!(
            "  {} ({}): {} categories, {} items, {} tables",
            branch.name,
            branch.status.as_str(),
            menu.categories.len(),
            items,
            tables.len()
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
