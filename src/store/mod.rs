use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::StoreResult,
    models::{NewThought, Thought},
};

mod memory;
mod postgres;

pub use memory::MemoryThoughtStore;
pub use postgres::PgThoughtStore;

/// Storage operations for thought documents
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Returns up to `limit` thoughts, newest `created_at` first.
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Thought>>;

    /// Persists a validated thought and returns it with its assigned id.
    async fn insert(&self, thought: NewThought) -> StoreResult<Thought>;

    /// Flips the parity of `hearts` in a single atomic step.
    ///
    /// Returns `None` without mutating anything when no thought has this id.
    async fn toggle_hearts(&self, id: Uuid) -> StoreResult<Option<Thought>>;
}
