// server/src/db.rs

//! Development-time database seeding.
//!
//! Inserts two demo vendors and a handful of their products with fixed ids,
//! so a fresh database is immediately usable for manual testing. Every insert
//! is `ON CONFLICT DO NOTHING`, so re-running on startup is harmless.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::{uuid, Uuid};

use crate::errors::Result;
use crate::services::auth::hash_password;

const VENDOR_ALPHA: Uuid = uuid!("11111111-1111-4111-8111-111111111111");
const VENDOR_BETA: Uuid = uuid!("22222222-2222-4222-8222-222222222222");

struct SeedProduct {
  id: Uuid,
  name: &'static str,
  description: &'static str,
  price: &'static str,
  stock_quantity: i32,
  vendor_id: Uuid,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
  SeedProduct {
    id: uuid!("aaaaaaa1-0000-4000-8000-000000000001"),
    name: "Walnut Desk Organizer",
    description: "Five-compartment organizer, oiled walnut.",
    price: "34.50",
    stock_quantity: 40,
    vendor_id: VENDOR_ALPHA,
  },
  SeedProduct {
    id: uuid!("aaaaaaa1-0000-4000-8000-000000000002"),
    name: "Brass Desk Lamp",
    description: "Adjustable arm, warm LED.",
    price: "89.00",
    stock_quantity: 12,
    vendor_id: VENDOR_ALPHA,
  },
  SeedProduct {
    id: uuid!("bbbbbbb2-0000-4000-8000-000000000001"),
    name: "Ceramic Pour-Over Set",
    description: "Dripper and carafe, matte glaze.",
    price: "48.00",
    stock_quantity: 25,
    vendor_id: VENDOR_BETA,
  },
  SeedProduct {
    id: uuid!("bbbbbbb2-0000-4000-8000-000000000002"),
    name: "Hand-Thrown Mug",
    description: "350ml stoneware mug.",
    price: "18.00",
    stock_quantity: 0, // Deliberately out of stock for checkout testing
    vendor_id: VENDOR_BETA,
  },
];

#[instrument(name = "db::seed", skip(pool))]
pub async fn seed_db(pool: &PgPool) -> Result<()> {
  // Demo vendors are also users; they never sign in interactively, but the
  // hash is a real one so the row shape stays honest.
  let vendor_hash = hash_password("demo-vendor-password")?;

  for (vendor_id, email) in [
    (VENDOR_ALPHA, "alpha-woodworks@example.com"),
    (VENDOR_BETA, "beta-ceramics@example.com"),
  ] {
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING")
      .bind(vendor_id)
      .bind(email)
      .bind(&vendor_hash)
      .execute(pool)
      .await?;
  }

  for product in SEED_PRODUCTS {
    let price: Decimal = product
      .price
      .parse()
      .map_err(|e| crate::errors::AppError::Internal(format!("Bad seed price '{}': {}", product.price, e)))?;
    sqlx::query(
      "INSERT INTO products (id, name, description, price, stock_quantity, vendor_id) \
       VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO NOTHING",
    )
    .bind(product.id)
    .bind(product.name)
    .bind(product.description)
    .bind(price)
    .bind(product.stock_quantity)
    .bind(product.vendor_id)
    .execute(pool)
    .await?;
  }

  info!(vendors = 2, products = SEED_PRODUCTS.len(), "database seeded");
  Ok(())
}
