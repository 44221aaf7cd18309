//! # Seed Data Generator
//!
//! Populates a development database with categories, products and clients.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p tendero-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p tendero-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p tendero-db --bin seed -- --db ./data/tendero.db
//! ```
//!
//! ## Generated Data
//! - Products spread over five categories, code `{CATEGORY}-{INDEX}`
//! - Sale price 1.00 - 9.99, purchase price 60-80% of it
//! - Special price on every fifth product
//! - Stock 0 - 50 against a minimum of 5, so some rows show as low stock
//! - A handful of clients with distinct legal ids

use std::env;
use tendero_core::{ClientInput, ProductInput};
use tendero_db::{Database, DbConfig};

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "BEB",
        "Bebidas",
        &[
            "Agua mineral",
            "Gaseosa cola",
            "Jugo de naranja",
            "Té helado",
            "Café molido",
            "Leche entera",
        ],
    ),
    (
        "ABA",
        "Abarrotes",
        &[
            "Arroz blanco",
            "Azúcar",
            "Harina de trigo",
            "Aceite vegetal",
            "Sal",
            "Lentejas",
            "Fideos",
        ],
    ),
    (
        "LIM",
        "Limpieza",
        &["Jabón en barra", "Detergente", "Cloro", "Esponja", "Papel higiénico"],
    ),
    (
        "SNK",
        "Snacks",
        &["Papas fritas", "Galletas", "Maní salado", "Chocolate", "Caramelos"],
    ),
    (
        "FER",
        "Ferretería",
        &["Clavos", "Tornillos", "Cinta aislante", "Foco LED", "Pegamento"],
    ),
];

/// Size variants for products
const SIZES: &[(&str, i64)] = &[
    ("pequeño", 0),
    ("mediano", 150),
    ("grande", 300),
    ("familiar", 500),
];

const CLIENTS: &[(&str, &str)] = &[
    ("Ana Torres", "0102030405"),
    ("José Pérez", "0911223344"),
    ("María Gómez", "1712345678"),
    ("Ferretería El Clavo", "1790012345001"),
    ("Luis Andrade", "0604050607"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./tendero_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tendero Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./tendero_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tendero Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.dashboard().data().await?;
    if existing.products > 0 {
        println!("⚠ Database already has {} products", existing.products);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_code, category_name, products) in CATEGORIES.iter() {
        for (product_idx, product_name) in products.iter().enumerate() {
            for (size_idx, (size_name, price_addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated * 7 + product_idx * SIZES.len() + size_idx;
                let input = generate_product(
                    category_code,
                    category_name,
                    product_name,
                    size_name,
                    *price_addon,
                    generated + 1,
                    seed,
                );

                if let Err(e) = db.products().insert(&input).await {
                    eprintln!("Failed to insert {}: {}", input.code, e);
                    continue;
                }

                generated += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Generating clients...");
    for (name, legal_id) in CLIENTS {
        let input = ClientInput {
            name: name.to_string(),
            legal_id: legal_id.to_string(),
            phone: Some(format!("09{}", &legal_id[..8])),
            ..Default::default()
        };
        if let Err(e) = db.clients().insert(&input).await {
            eprintln!("Failed to insert client {}: {}", name, e);
        }
    }

    let data = db.dashboard().data().await?;
    println!("✓ {} clients", data.clients);
    println!("  Low stock products: {}", data.low_stock_products);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product input with plausible data.
fn generate_product(
    category_code: &str,
    category_name: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    index: usize,
    seed: usize,
) -> ProductInput {
    let sale_price_cents = 100 + ((seed * 37) % 900) as i64 + price_addon;
    let cost_pct = 60 + (seed % 21) as i64;

    ProductInput {
        code: format!("{}-{:04}", category_code, index),
        name: format!("{} {}", name, size),
        category: Some(category_name.to_string()),
        purchase_price_cents: sale_price_cents * cost_pct / 100,
        sale_price_cents,
        special_price_cents: if index % 5 == 0 {
            sale_price_cents * 90 / 100
        } else {
            0
        },
        stock: (seed % 51) as i64,
        min_stock: 5,
    }
}
