//! Order ledger repository.
//!
//! Order creation validates the cart against live catalog rows, computes the
//! total from server-side prices, and persists the order, its line items,
//! and the stock decrement in one transaction. The decrement re-checks
//! availability at write time (`stock_quantity >= quantity` in the UPDATE),
//! so two concurrent checkouts against the same low-stock product cannot
//! both succeed: the catalog is never oversold.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shop_core::{
    order_total, CartItem, Order, OrderItem, OrderStatus, Product, ShopError, ShopResult,
};
use sqlx::PgPool;
use tracing::{info, warn};

/// A freshly persisted pending order, with the catalog rows it was priced
/// against (for building the payment-provider handoff).
#[derive(Debug)]
pub struct CreatedOrder {
    pub order_id: i32,
    pub total_amount: Decimal,
    pub lines: Vec<(Product, i32)>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_amount: Decimal,
    status: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    order_id: i32,
    product_id: i32,
    product_name: String,
    quantity: i32,
    price_at_purchase: Decimal,
}

/// Repository for orders and their line items
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Validate a cart and persist a pending order with its line items.
    ///
    /// Atomicity: everything happens in one transaction. Any validation
    /// failure (unknown product, insufficient stock) rolls the whole thing
    /// back; nothing is persisted for a failed checkout.
    pub async fn create_pending(
        &self,
        user_id: i32,
        items: &[CartItem],
        shipping_address: &str,
    ) -> ShopResult<CreatedOrder> {
        if items.is_empty() {
            return Err(ShopError::EmptyCart);
        }
        for item in items {
            if item.quantity < 1 {
                return Err(ShopError::Validation(format!(
                    "quantity for product {} must be at least 1",
                    item.product_id
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        // One batch read, locked for the duration of the transaction.
        // ORDER BY keeps the row-lock order deterministic, so two
        // overlapping carts cannot deadlock each other.
        let ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock_quantity, image_url, category, created_at
            FROM products
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut lines: Vec<(Product, i32)> = Vec::with_capacity(items.len());
        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(ShopError::ProductNotFound {
                    product_id: item.product_id,
                })?;

            if !product.has_stock(item.quantity) {
                return Err(ShopError::InsufficientStock {
                    product_id: product.id,
                    name: product.name.clone(),
                });
            }

            lines.push((product.clone(), item.quantity));
        }

        // Total from catalog prices at this moment, never from the client
        let total_amount = order_total(lines.iter().map(|(p, q)| (&p.price, *q)));

        let (order_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, total_amount, status, shipping_address)
            VALUES ($1, $2, 'pending', $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        for (product, quantity) in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(product.id)
            .bind(quantity)
            .bind(product.price)
            .execute(&mut *tx)
            .await?;

            // Re-validate at write time; rows_affected == 0 means another
            // transaction took the stock between our read and this write
            let decremented = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - $2
                WHERE id = $1 AND stock_quantity >= $2
                "#,
            )
            .bind(product.id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(ShopError::InsufficientStock {
                    product_id: product.id,
                    name: product.name.clone(),
                });
            }
        }

        tx.commit().await?;

        info!(order_id, user_id, %total_amount, "created pending order");

        Ok(CreatedOrder {
            order_id,
            total_amount,
            lines,
        })
    }

    /// Transition a pending order to `paid` (payment-confirmation webhook).
    ///
    /// Idempotent: terminal orders are left untouched and `false` is returned.
    pub async fn mark_paid(&self, order_id: i32) -> ShopResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE orders SET status = 'paid'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .execute(self.pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    /// Compensation for a failed payment-session creation: cancel the
    /// pending order and put its stock back, so no unpayable pending order
    /// is left behind.
    pub async fn cancel_and_restock(&self, order_id: i32) -> ShopResult<()> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query(
            r#"
            UPDATE orders SET status = 'cancelled'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        if cancelled.rows_affected() == 0 {
            // Already terminal; nothing to restock
            warn!(order_id, "cancel requested for non-pending order");
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE products p
            SET stock_quantity = p.stock_quantity + oi.quantity
            FROM order_items oi
            WHERE oi.order_id = $1 AND p.id = oi.product_id
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_id, "cancelled order and restored stock");
        Ok(())
    }

    /// The user's own orders, newest first, each with its line items.
    pub async fn list_for_user(&self, user_id: i32) -> ShopResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, total_amount, status, shipping_address, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT oi.order_id, oi.product_id, p.name AS product_name,
                   oi.quantity, oi.price_at_purchase
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let status = OrderStatus::parse(&row.status).ok_or_else(|| {
                ShopError::Database(format!("invalid order status in database: {}", row.status))
            })?;

            let items = item_rows
                .iter()
                .filter(|i| i.order_id == row.id)
                .map(|i| OrderItem {
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    quantity: i.quantity,
                    price_at_purchase: i.price_at_purchase,
                })
                .collect();

            orders.push(Order {
                id: row.id,
                user_id: row.user_id,
                total_amount: row.total_amount,
                status,
                shipping_address: row.shipping_address,
                created_at: row.created_at,
                items,
            });
        }

        Ok(orders)
    }
}
