//! Rebuilds aggregates from the rows of a root-to-child LEFT JOIN.
//!
//! Every joined row repeats the root columns and carries at most one child.
//! A root without children shows up as a single row whose child segment is
//! entirely NULL; callers pass `None` for that segment.

use std::collections::HashMap;

use shop_types::domain::aggregate::Aggregate;
use uuid::Uuid;

/// Streaming fold of joined rows into roots in first-seen order.
///
/// Roots live in an arena indexed by identity, so a root whose rows are not
/// adjacent is still merged into one aggregate.
pub struct Reconstructor<R: Aggregate> {
    index: HashMap<Uuid, usize>,
    roots: Vec<R>,
}

impl<R: Aggregate> Default for Reconstructor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Aggregate> Reconstructor<R> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Feeds one joined row. `root` must carry an empty child collection; it
    /// is dropped when its identity has been seen already.
    pub fn push(&mut self, root: R, child: Option<R::Child>) {
        let id = root.id();
        let slot = match self.index.get(&id) {
            Some(&slot) => slot,
            None => {
                let slot = self.roots.len();
                self.roots.push(root);
                self.index.insert(id, slot);
                slot
            }
        };
        if let Some(child) = child {
            self.roots[slot].children_mut().push(child);
        }
    }

    pub fn finish(self) -> Vec<R> {
        self.roots
    }

    /// Point-lookup variant: the single reconstructed root, if any row
    /// arrived.
    pub fn finish_one(self) -> Option<R> {
        self.roots.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shop_types::domain::customer::{Address, Customer};

    fn customer(id: Uuid, name: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id,
            name: name.into(),
            email: format!("{}@x.com", name.to_lowercase()),
            addresses: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn address(id: i64, customer_id: Uuid, street: &str) -> Address {
        Address {
            id,
            customer_id,
            street: street.into(),
            city: "Lisboa".into(),
            state: "LX".into(),
            zip: "1000".into(),
        }
    }

    #[test]
    fn groups_children_under_first_seen_root() {
        let ana = Uuid::new_v4();
        let bia = Uuid::new_v4();
        let mut r = Reconstructor::new();
        r.push(customer(ana, "Ana"), Some(address(1, ana, "Rua A")));
        r.push(customer(ana, "Ana"), Some(address(2, ana, "Rua B")));
        r.push(customer(bia, "Bia"), Some(address(3, bia, "Rua C")));

        let out = r.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, ana);
        assert_eq!(out[1].id, bia);
        let streets: Vec<_> = out[0].addresses.iter().map(|a| a.street.as_str()).collect();
        assert_eq!(streets, ["Rua A", "Rua B"]);
        assert_eq!(out[1].addresses.len(), 1);
    }

    #[test]
    fn null_child_segment_yields_empty_collection() {
        let ana = Uuid::new_v4();
        let mut r = Reconstructor::new();
        r.push(customer(ana, "Ana"), None);

        let out = r.finish();
        assert_eq!(out.len(), 1);
        assert!(out[0].addresses.is_empty());
    }

    #[test]
    fn merges_non_adjacent_rows_by_identity() {
        let ana = Uuid::new_v4();
        let bia = Uuid::new_v4();
        let mut r = Reconstructor::new();
        r.push(customer(ana, "Ana"), Some(address(1, ana, "Rua A")));
        r.push(customer(bia, "Bia"), None);
        r.push(customer(ana, "Ana"), Some(address(5, ana, "Rua E")));

        let out = r.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, ana);
        assert_eq!(out[0].addresses.len(), 2);
        assert_eq!(out[0].addresses[1].id, 5);
        assert_eq!(out[1].id, bia);
        assert!(out[1].addresses.is_empty());
    }

    #[test]
    fn finish_one_on_no_rows_is_none() {
        let r: Reconstructor<Customer> = Reconstructor::new();
        assert!(r.finish_one().is_none());
    }
}
