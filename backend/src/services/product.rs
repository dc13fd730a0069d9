//! Product catalog service
//!
//! Owns product master data only. Stock fields (`locations`, `stock_qty`)
//! are never mutated here; every quantity change goes through the stock
//! service or the invoice engine so it lands in the movement ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{CreateProductInput, LocationMap, Product, UpdateProductInput};

use crate::error::{AppError, AppResult};

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
    default_low_stock: Decimal,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    sku: String,
    hsn: String,
    price: Decimal,
    stock_qty: Decimal,
    locations: Json<LocationMap>,
    low_stock_threshold: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            sku: row.sku,
            hsn: row.hsn,
            price: row.price,
            stock_qty: row.stock_qty,
            locations: row.locations.0,
            low_stock_threshold: row.low_stock_threshold,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool, default_low_stock: Decimal) -> Self {
        Self {
            db,
            default_low_stock,
        }
    }

    /// Add a product to the catalog. Stock starts at zero with an empty
    /// locations map; quantities arrive only through stock entries.
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let threshold = input.low_stock_threshold.unwrap_or(self.default_low_stock);

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, sku, hsn, price, low_stock_threshold)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, sku, hsn, price, stock_qty, locations,
                      low_stock_threshold, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.hsn.unwrap_or_default())
        .bind(input.price)
        .bind(threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Edit product master data. The stock map is untouched.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, sku = $2, hsn = $3, price = $4,
                low_stock_threshold = COALESCE($5, low_stock_threshold),
                updated_at = now()
            WHERE id = $6
            RETURNING id, name, sku, hsn, price, stock_qty, locations,
                      low_stock_threshold, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.hsn.unwrap_or_default())
        .bind(input.price)
        .bind(input.low_stock_threshold)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Delete a product. Historical invoice items and movements keep their
    /// name snapshots, so past paperwork stays readable.
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, sku, hsn, price, stock_qty, locations,
                   low_stock_threshold, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Products at or below their low-stock threshold, for the dashboard
    /// alert panel.
    pub async fn low_stock_products(&self) -> AppResult<Vec<Product>> {
        let products = self.list_products().await?;
        Ok(products.into_iter().filter(Product::is_low_stock).collect())
    }

    /// List all products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, sku, hsn, price, stock_qty, locations,
                   low_stock_threshold, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
