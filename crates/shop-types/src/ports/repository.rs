use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::aggregate::AggregateDraft;
use crate::domain::customer::NewCustomer;
use crate::domain::order::NewOrder;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("constraint violation: {0}")]
    Constraint(#[source] BoxError),

    #[error("db error: {0}")]
    Database(#[source] BoxError),

    #[error("malformed row: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

/// Save / point lookup / list contract over one aggregate type.
#[async_trait]
pub trait AggregateRepository<D: AggregateDraft>: Send + Sync + 'static {
    /// Assigns identity and timestamps and persists root and children
    /// atomically.
    async fn save(&self, draft: D) -> Result<D::Root, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<D::Root, RepoError>;

    /// All aggregates, newest first, ties broken by identity ascending.
    async fn list_all(&self) -> Result<Vec<D::Root>, RepoError>;
}

pub trait CustomerRepository: AggregateRepository<NewCustomer> {}

impl<T: AggregateRepository<NewCustomer>> CustomerRepository for T {}

pub trait OrderRepository: AggregateRepository<NewOrder> {}

impl<T: AggregateRepository<NewOrder>> OrderRepository for T {}
