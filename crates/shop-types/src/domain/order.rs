use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregate::{Aggregate, AggregateDraft};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    AwaitingPayment,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awaiting_payment" => Ok(OrderStatus::AwaitingPayment),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => anyhow::bail!("unknown order status `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub order_id: Uuid,
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub items: Vec<NewItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(customer_id: String, items: Vec<NewItem>) -> anyhow::Result<Self> {
        if items.is_empty() {
            anyhow::bail!("items empty");
        }
        let total = items.iter().try_fold(0i64, |total, it| {
            if it.quantity == 0 {
                anyhow::bail!("item quantity must be > 0");
            }
            if it.unit_price_cents < 0 {
                anyhow::bail!("item unit price must not be negative");
            }
            let Some(line) = it.unit_price_cents.checked_mul(i64::from(it.quantity)) else {
                anyhow::bail!("order total overflows");
            };
            match total.checked_add(line) {
                Some(total) => Ok(total),
                None => anyhow::bail!("order total overflows"),
            }
        })?;
        Ok(Self {
            customer_id,
            status: OrderStatus::AwaitingPayment,
            total_cents: total,
            items,
        })
    }
}

impl Aggregate for Order {
    type Child = Item;

    const KIND: &'static str = "order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn children(&self) -> &[Item] {
        &self.items
    }

    fn children_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

impl AggregateDraft for NewOrder {
    type Root = Order;
    type ChildDraft = NewItem;

    fn into_parts(self, id: Uuid, at: DateTime<Utc>) -> (Order, Vec<NewItem>) {
        let order = Order {
            id,
            customer_id: self.customer_id,
            status: self.status,
            total_cents: self.total_cents,
            items: Vec::with_capacity(self.items.len()),
            created_at: at,
            updated_at: at,
        };
        (order, self.items)
    }

    fn attach_child(child: NewItem, root_id: Uuid, child_id: i64) -> Item {
        Item {
            id: child_id,
            order_id: root_id,
            product_id: child.product_id,
            name: child.name,
            unit_price_cents: child.unit_price_cents,
            quantity: child.quantity,
        }
    }
}
