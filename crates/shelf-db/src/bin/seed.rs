//! # Seed Data Generator
//!
//! Populates the catalog with categories and books for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./data/shelf.db
//! cargo run -p shelf-db --bin seed
//!
//! # Specify database path
//! cargo run -p shelf-db --bin seed -- --db ./data/dev.db
//! ```
//!
//! Prices are deterministic (derived from the book's position) so a fresh
//! database always looks the same.

use std::env;

use anyhow::Context;
use shelf_core::NewBook;
use shelf_db::{Database, DbConfig};

/// Catalog: (category, [(title, author)])
const CATALOG: &[(&str, &[(&str, &str)])] = &[
    (
        "Fiction",
        &[
            ("Dune", "Frank Herbert"),
            ("The Left Hand of Darkness", "Ursula K. Le Guin"),
            ("Beloved", "Toni Morrison"),
            ("One Hundred Years of Solitude", "Gabriel Garcia Marquez"),
            ("The Remains of the Day", "Kazuo Ishiguro"),
        ],
    ),
    (
        "Programming",
        &[
            ("The Rust Programming Language", "Steve Klabnik"),
            ("Programming Rust", "Jim Blandy"),
            ("Structure and Interpretation of Computer Programs", "Harold Abelson"),
            ("The Pragmatic Programmer", "Andrew Hunt"),
        ],
    ),
    (
        "History",
        &[
            ("The Guns of August", "Barbara Tuchman"),
            ("SPQR", "Mary Beard"),
            ("The Silk Roads", "Peter Frankopan"),
        ],
    ),
    (
        "Science",
        &[
            ("A Brief History of Time", "Stephen Hawking"),
            ("The Selfish Gene", "Richard Dawkins"),
            ("The Gene", "Siddhartha Mukherjee"),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./data/shelf.db".to_string();

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
                println!("Shelf Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/shelf.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shelf Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .context("opening database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0usize;
    for (category, books) in CATALOG {
        let category_id = db
            .books()
            .insert_category(category)
            .await
            .with_context(|| format!("inserting category {category}"))?;

        for (title, author) in books.iter() {
            let book = NewBook {
                title: title.to_string(),
                author: author.to_string(),
                price_cents: price_for(generated),
                category_id,
            };

            if let Err(e) = db.books().insert(&book).await {
                eprintln!("Failed to insert {}: {}", book.title, e);
                continue;
            }
            generated += 1;
        }

        println!("  {:<12} {} books", category, books.len());
    }

    println!();
    println!("✓ Seed complete! {} books", generated);

    Ok(())
}

/// Price between 7.99 and 29.99, stepping through the range.
fn price_for(index: usize) -> i64 {
    799 + ((index as i64 * 375) % 2200)
}
