use async_trait::async_trait;
use dashmap::DashMap;
use shop_types::domain::aggregate::{Aggregate, AggregateDraft};
use shop_types::ports::repository::{AggregateRepository, RepoError};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::{self, SharedClock};

pub struct InMemoryRepo<D: AggregateDraft> {
    pub map: Arc<DashMap<Uuid, D::Root>>,
    next_child_id: Arc<AtomicI64>,
    clock: SharedClock,
}

// Manual impl: `D` itself does not need to be `Clone`.
impl<D: AggregateDraft> Clone for InMemoryRepo<D> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            next_child_id: self.next_child_id.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<D: AggregateDraft> InMemoryRepo<D> {
    pub fn new() -> Self {
        Self::with_clock(clock::system_clock())
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            next_child_id: Arc::new(AtomicI64::new(1)),
            clock,
        }
    }
}

impl<D: AggregateDraft> Default for InMemoryRepo<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: AggregateDraft> AggregateRepository<D> for InMemoryRepo<D> {
    async fn save(&self, draft: D) -> Result<D::Root, RepoError> {
        let id = Uuid::new_v4();
        let at = clock::stamp(self.clock.as_ref());
        let (mut root, children) = draft.into_parts(id, at);
        for child in children {
            let child_id = self.next_child_id.fetch_add(1, Ordering::Relaxed);
            root.children_mut().push(D::attach_child(child, id, child_id));
        }
        self.map.insert(id, root.clone());
        Ok(root)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<D::Root, RepoError> {
        self.map
            .get(&id)
            .map(|r| r.clone())
            .ok_or(RepoError::NotFound {
                kind: <D::Root as Aggregate>::KIND,
                id,
            })
    }

    async fn list_all(&self) -> Result<Vec<D::Root>, RepoError> {
        let mut roots: Vec<D::Root> = self.map.iter().map(|kv| kv.value().clone()).collect();
        roots.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(roots)
    }
}
