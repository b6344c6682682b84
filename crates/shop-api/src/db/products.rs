//! Product catalog repository. Read-only from the storefront's perspective,
//! except for the admin create endpoint and the checkout stock decrement
//! (which lives in the order repository so it shares the order transaction).

use rust_decimal::Decimal;
use shop_core::{Product, ShopResult};
use sqlx::PgPool;

/// Repository for catalog rows
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, oldest first
    pub async fn list(&self) -> ShopResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock_quantity, image_url, category, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Single product by id
    pub async fn find(&self, id: i32) -> ShopResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock_quantity, image_url, category, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a catalog entry (admin-only capability)
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        stock_quantity: i32,
        image_url: Option<&str>,
        category: Option<&str>,
    ) -> ShopResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock_quantity, image_url, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, stock_quantity, image_url, category, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock_quantity)
        .bind(image_url)
        .bind(category)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }
}
