#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use async_trait::async_trait;
use shop_types::ports::repository::{AggregateRepository, RepoError};
use uuid::Uuid;

pub mod clock;
pub mod reconstruct;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// What an aggregate needs to be storable by the enabled backends.
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSchema as Schema;
#[cfg(not(feature = "sqlite"))]
pub use shop_types::domain::aggregate::AggregateDraft as Schema;

/// Repository selected by the enabled cargo features. SQLite wins when
/// both are on.
pub enum Repo<D: Schema> {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo<D>),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo<D>),
}

impl<D: Schema> Clone for Repo<D> {
    fn clone(&self) -> Self {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => Repo::Memory(r.clone()),
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => Repo::Sqlite(r.clone()),
        }
    }
}

pub async fn build_repo<D: Schema>(url: Option<&str>) -> anyhow::Result<Repo<D>> {
    Repo::build_repo(url).await
}

impl<D: Schema> Repo<D> {
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        Self::build_with(database_url, 5).await
    }

    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_with(_: Option<&str>, _: u32) -> anyhow::Result<Self> {
        Ok(Repo::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(feature = "sqlite")]
    pub async fn build_with(
        database_url: Option<&str>,
        max_connections: u32,
    ) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://shop.db");
        let settings = sqlite::PoolSettings {
            max_connections,
            ..Default::default()
        };
        let sqlite = sqlite::SqliteRepo::with_settings(url, &settings).await?;
        tracing::info!(url, max_connections, "sqlite repository ready");
        Ok(Repo::Sqlite(sqlite))
    }
}

#[async_trait]
impl<D: Schema> AggregateRepository<D> for Repo<D> {
    async fn save(&self, draft: D) -> Result<D::Root, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.save(draft).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.save(draft).await,
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<D::Root, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.find_by_id(id).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.find_by_id(id).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<D::Root>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.list_all().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(r) => r.list_all().await,
        }
    }
}
