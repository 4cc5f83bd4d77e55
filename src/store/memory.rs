use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ThoughtStore;
use crate::{
    error::StoreResult,
    models::{NewThought, Thought},
};

/// In-process [`ThoughtStore`], kept in insertion order.
#[derive(Default)]
pub struct MemoryThoughtStore {
    thoughts: Mutex<Vec<Thought>>,
}

impl MemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.thoughts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.thoughts.lock().await.is_empty()
    }
}

#[async_trait]
impl ThoughtStore for MemoryThoughtStore {
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Thought>> {
        let thoughts = self.thoughts.lock().await;
        // newest insertion first, so equal timestamps keep a stable newest-first order
        let mut recent: Vec<Thought> = thoughts.iter().rev().cloned().collect();
        drop(thoughts);

        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn insert(&self, thought: NewThought) -> StoreResult<Thought> {
        let thought = Thought::from_new(Uuid::new_v4(), thought);
        self.thoughts.lock().await.push(thought.clone());
        Ok(thought)
    }

    async fn toggle_hearts(&self, id: Uuid) -> StoreResult<Option<Thought>> {
        // read and write happen under one lock
        let mut thoughts = self.thoughts.lock().await;
        Ok(thoughts.iter_mut().find(|t| t.id == id).map(|thought| {
            thought.toggle_hearts();
            thought.clone()
        }))
    }
}
