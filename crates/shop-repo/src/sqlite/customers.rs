use chrono::{DateTime, Utc};
use shop_types::domain::customer::{Address, Customer, NewAddress, NewCustomer};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::schema::{SqliteQuery, SqliteSchema};

impl SqliteSchema for NewCustomer {
    const ROOT_TABLE: &'static str = "customers";
    const ROOT_COLUMNS: &'static [&'static str] = &["name", "email"];
    const CHILD_TABLE: &'static str = "customer_addresses";
    const CHILD_FOREIGN_KEY: &'static str = "customer_id";
    const CHILD_COLUMNS: &'static [&'static str] = &["street", "city", "state", "zip"];
    const MIGRATIONS: &'static [&'static str] = &[
        include_str!("../../migrations/0001_create_customers.sql"),
        include_str!("../../migrations/0002_create_customer_addresses.sql"),
    ];

    fn bind_root<'q>(query: SqliteQuery<'q>, root: &Customer) -> SqliteQuery<'q> {
        query.bind(root.name.clone()).bind(root.email.clone())
    }

    fn bind_child<'q>(query: SqliteQuery<'q>, child: &NewAddress) -> SqliteQuery<'q> {
        query
            .bind(child.street.clone())
            .bind(child.city.clone())
            .bind(child.state.clone())
            .bind(child.zip.clone())
    }

    fn decode_root(
        row: &SqliteRow,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, sqlx::Error> {
        Ok(Customer {
            id,
            name: row.try_get("r_name")?,
            email: row.try_get("r_email")?,
            addresses: Vec::new(),
            created_at,
            updated_at,
        })
    }

    fn decode_child(row: &SqliteRow, id: i64, root_id: Uuid) -> Result<Address, sqlx::Error> {
        Ok(Address {
            id,
            customer_id: root_id,
            street: row.try_get("c_street")?,
            city: row.try_get("c_city")?,
            state: row.try_get("c_state")?,
            zip: row.try_get("c_zip")?,
        })
    }
}
