//! Search and Backup Features Example
//!
//! Exercises the server-side search endpoints (structured, fuzzy, vector)
//! and the backup endpoints, including the quick per-rack archive download.
//!
//! Prerequisites:
//! 1. An OpenDBS server listening on http://localhost:4402
//! 2. The default admin account (admin / admin123)
//!
//! Run with: cargo run --example search_and_backup

use opendbs_rs::{Client, RackType, Result};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🚀 OpenDBS search and backup example\n");

    let mut client = Client::new("http://localhost:4402")?;

    if let Err(e) = run(&mut client).await {
        println!("\n❌ Error: {e}");
        if e.is_connect() {
            println!("   👉 Please ensure the OpenDBS server is running on port 4402.");
        }
    }

    cleanup(&client).await;
    println!("\n✨ Example run finished.");
    Ok(())
}

async fn run(client: &mut Client) -> Result<()> {
    println!("🔑 Logging in...");
    client.login("admin", "admin123").await?;

    println!("📂 Setting up 'search_demo' database...");
    let _ = client.create_database("search_demo").await;
    let _ = client
        .create_rack("search_demo", "articles", RackType::Nosql, None)
        .await;

    println!("📝 Inserting articles with embeddings...");
    let articles = [
        ("Rust in Production", "systems", [0.9, 0.1, 0.0, 0.2]),
        ("Async IO Patterns", "systems", [0.8, 0.3, 0.1, 0.1]),
        ("Query Planners Explained", "databases", [0.1, 0.9, 0.3, 0.0]),
        ("Vector Indexes in Practice", "databases", [0.2, 0.8, 0.5, 0.1]),
        ("Writing Better Docs", "craft", [0.0, 0.1, 0.9, 0.7]),
    ];
    for (title, category, embedding) in &articles {
        client
            .insert(
                "search_demo",
                "articles",
                &json!({
                    "title": title,
                    "category": category,
                    "embedding": embedding
                }),
            )
            .await?;
        println!("   Added: {title}");
    }

    println!("\n🔍 Structured search for category 'databases'...");
    let hits = client
        .search("search_demo", "articles", &json!({"category": "databases"}))
        .await?;
    for hit in &hits {
        println!("   - {}", hit["title"].as_str().unwrap_or("?"));
    }

    println!("\n⚡ Fuzzy search for 'Vectr Indxes'...");
    let fuzzy = client
        .fuzzy_search("search_demo", "articles", "title", "Vectr Indxes")
        .await?;
    println!("   {} match(es)", fuzzy.len());

    let query = [0.15f32, 0.85, 0.4, 0.05];
    println!("\n🧭 Vector search near {query:?}...");
    let nearest = client
        .vector_search("search_demo", "articles", "embedding", &query)
        .await?;
    println!("   {} results with the server default k", nearest.len());

    let top_two = client
        .vector_search_with_k("search_demo", "articles", "embedding", &query, 2)
        .await?;
    println!("   Top 2:");
    for hit in &top_two {
        println!("   - {hit}");
    }

    println!("\n💾 Backups...");
    client.create_backup().await?;
    let backups = client.list_backups().await?;
    println!("   Server now has {} backup(s).", backups.len());

    let url = client.quick_backup_rack_url("search_demo", "articles");
    println!("   Quick backup URL: {url}");

    let archive = client
        .download_quick_backup("search_demo", "articles")
        .await?;
    println!("   Downloaded quick backup: {} bytes.", archive.len());

    Ok(())
}

async fn cleanup(client: &Client) {
    println!("\n🧹 Cleaning up...");
    if client.delete_database("search_demo").await.is_ok() {
        println!("   🗑️ Deleted database: search_demo");
    }
}
