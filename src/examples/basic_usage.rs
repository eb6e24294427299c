//! Basic OpenDBS Client Example
//!
//! A walkthrough of everyday client usage: login, database and rack
//! provisioning, document inserts, SQL, queries, and cleanup.
//!
//! Prerequisites:
//! 1. An OpenDBS server listening on http://localhost:4402
//! 2. The default admin account (admin / admin123)
//!
//! Run with: cargo run --example basic_usage

use opendbs_rs::{Client, RackType, Result};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🚀 Starting OpenDBS Rust client example...\n");

    let mut client = Client::new("http://localhost:4402")?;

    if let Err(e) = run(&mut client).await {
        println!("\n❌ Error: {e}");
        if e.is_connect() {
            println!("   👉 Please ensure the OpenDBS server is running on port 4402.");
        }
    }

    // Cleanup runs even when the walkthrough fails halfway.
    cleanup(&client).await;
    println!("\n✨ Example run finished.");
    Ok(())
}

async fn run(client: &mut Client) -> Result<()> {
    println!("🔑 Logging in...");
    let login = client.login("admin", "admin123").await?;
    let username = login
        .user
        .as_ref()
        .and_then(|u| u.get("username"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    println!("✅ Logged in as: {username}");

    println!("📂 Creating database 'rust_demo_db'...");
    match client.create_database("rust_demo_db").await {
        Ok(_) => println!("   Database created."),
        Err(e) => println!("   ℹ️  Database might already exist ({e})"),
    }

    println!("📦 Creating racks...");
    if client
        .create_rack("rust_demo_db", "users", RackType::Nosql, None)
        .await
        .is_ok()
    {
        println!("   NoSQL rack 'users' created.");
    }

    let order_schema = json!({
        "id": { "type": "number", "required": true },
        "total": { "type": "number", "required": true }
    });
    if client
        .create_rack("rust_demo_db", "orders", RackType::Sql, Some(&order_schema))
        .await
        .is_ok()
    {
        println!("   SQL rack 'orders' created.");
    }

    println!("📝 Inserting data...");
    client
        .insert(
            "rust_demo_db",
            "users",
            &json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "role": "admin"
            }),
        )
        .await?;

    if let Err(e) = client
        .sql("rust_demo_db", "INSERT INTO orders (id, total) VALUES (101, 150.50)")
        .await
    {
        println!("⚠️ SQL insert failed: {e}");
    }
    println!("✅ Data inserted.");

    println!("🔍 Searching...");
    let users = client.find("rust_demo_db", "users", &[], false).await?;
    println!("   Found {} users.", users.len());

    println!("⚡ Testing fuzzy search...");
    // Typo on purpose: the server still resolves it to Jane.
    let fuzzy = client
        .fuzzy_search("rust_demo_db", "users", "name", "Jne")
        .await?;
    println!("   Fuzzy results for 'Jne': {}", json!(fuzzy));

    Ok(())
}

async fn cleanup(client: &Client) {
    println!("\n🧹 Cleaning up resources...");
    if client.delete_rack("rust_demo_db", "users").await.is_ok() {
        println!("   🗑️ Deleted rack: users");
    }
    if client.delete_rack("rust_demo_db", "orders").await.is_ok() {
        println!("   🗑️ Deleted rack: orders");
    }
    if client.delete_database("rust_demo_db").await.is_ok() {
        println!("   🗑️ Deleted database: rust_demo_db");
    }
}
