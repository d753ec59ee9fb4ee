use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregate::{Aggregate, AggregateDraft};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    pub customer_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub addresses: Vec<NewAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewCustomer {
    pub fn new(name: String, email: String, addresses: Vec<NewAddress>) -> anyhow::Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("name empty");
        }
        if !email.contains('@') {
            anyhow::bail!("invalid email");
        }
        Ok(Self {
            name,
            email,
            addresses,
        })
    }
}

impl Aggregate for Customer {
    type Child = Address;

    const KIND: &'static str = "customer";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn children(&self) -> &[Address] {
        &self.addresses
    }

    fn children_mut(&mut self) -> &mut Vec<Address> {
        &mut self.addresses
    }
}

impl AggregateDraft for NewCustomer {
    type Root = Customer;
    type ChildDraft = NewAddress;

    fn into_parts(self, id: Uuid, at: DateTime<Utc>) -> (Customer, Vec<NewAddress>) {
        let customer = Customer {
            id,
            name: self.name,
            email: self.email,
            addresses: Vec::with_capacity(self.addresses.len()),
            created_at: at,
            updated_at: at,
        };
        (customer, self.addresses)
    }

    fn attach_child(child: NewAddress, root_id: Uuid, child_id: i64) -> Address {
        Address {
            id: child_id,
            customer_id: root_id,
            street: child.street,
            city: child.city,
            state: child.state,
            zip: child.zip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rua_a() -> NewAddress {
        NewAddress {
            street: "Rua A".into(),
            city: "Lisboa".into(),
            state: "LX".into(),
            zip: "1000-001".into(),
        }
    }

    #[test]
    fn validation_errors() {
        assert!(NewCustomer::new("".into(), "ana@x.com".into(), vec![]).is_err());
        assert!(NewCustomer::new("Ana".into(), "ana.x.com".into(), vec![]).is_err());
        assert!(NewCustomer::new("Ana".into(), "ana@x.com".into(), vec![]).is_ok());
    }

    #[test]
    fn into_parts_stamps_identity_and_keeps_child_order() {
        let mut second = rua_a();
        second.street = "Rua B".into();
        let draft = NewCustomer::new("Ana".into(), "ana@x.com".into(), vec![rua_a(), second])
            .unwrap();

        let id = Uuid::new_v4();
        let at = Utc::now();
        let (customer, children) = draft.into_parts(id, at);

        assert_eq!(customer.id, id);
        assert_eq!(customer.created_at, customer.updated_at);
        assert!(customer.addresses.is_empty());
        let streets: Vec<_> = children.iter().map(|a| a.street.as_str()).collect();
        assert_eq!(streets, ["Rua A", "Rua B"]);
    }

    #[test]
    fn attach_child_sets_back_reference() {
        let root = Uuid::new_v4();
        let address = NewCustomer::attach_child(rua_a(), root, 7);
        assert_eq!(address.id, 7);
        assert_eq!(address.customer_id, root);
        assert_eq!(address.street, "Rua A");
    }
}
