use chrono::{DateTime, Utc};
use shop_types::domain::order::{Item, NewItem, NewOrder, Order, OrderStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::schema::{SqliteQuery, SqliteSchema};

impl SqliteSchema for NewOrder {
    const ROOT_TABLE: &'static str = "orders";
    const ROOT_COLUMNS: &'static [&'static str] = &["customer_id", "status", "total_cents"];
    const CHILD_TABLE: &'static str = "order_items";
    const CHILD_FOREIGN_KEY: &'static str = "order_id";
    const CHILD_COLUMNS: &'static [&'static str] =
        &["product_id", "name", "unit_price_cents", "quantity"];
    const MIGRATIONS: &'static [&'static str] = &[
        include_str!("../../migrations/0003_create_orders.sql"),
        include_str!("../../migrations/0004_create_order_items.sql"),
    ];

    fn bind_root<'q>(query: SqliteQuery<'q>, root: &Order) -> SqliteQuery<'q> {
        query
            .bind(root.customer_id.clone())
            .bind(root.status.as_str())
            .bind(root.total_cents)
    }

    fn bind_child<'q>(query: SqliteQuery<'q>, child: &NewItem) -> SqliteQuery<'q> {
        query
            .bind(child.product_id.clone())
            .bind(child.name.clone())
            .bind(child.unit_price_cents)
            .bind(i64::from(child.quantity))
    }

    fn decode_root(
        row: &SqliteRow,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Order, sqlx::Error> {
        let status: String = row.try_get("r_status")?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e: anyhow::Error| sqlx::Error::Decode(e.into()))?;
        Ok(Order {
            id,
            customer_id: row.try_get("r_customer_id")?,
            status,
            total_cents: row.try_get("r_total_cents")?,
            items: Vec::new(),
            created_at,
            updated_at,
        })
    }

    fn decode_child(row: &SqliteRow, id: i64, root_id: Uuid) -> Result<Item, sqlx::Error> {
        let quantity: i64 = row.try_get("c_quantity")?;
        let quantity = u32::try_from(quantity).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Item {
            id,
            order_id: root_id,
            product_id: row.try_get("c_product_id")?,
            name: row.try_get("c_name")?,
            unit_price_cents: row.try_get("c_unit_price_cents")?,
            quantity,
        })
    }
}
