//! In-Memory State Storage Adapter
//!
//! Stores conversation state and step outputs in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::ai_engine::{values::StructuredOutput, ConversationState};
use crate::domain::foundation::{ComponentType, CycleId};
use crate::ports::{StateStorage, StateStorageError};

/// In-memory storage for conversation state
#[derive(Debug, Clone)]
pub struct InMemoryStateStorage {
    states: Arc<RwLock<HashMap<CycleId, ConversationState>>>,
    outputs: Arc<RwLock<HashMap<(CycleId, ComponentType), String>>>,
}

impl InMemoryStateStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            outputs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.states.write().await.clear();
        self.outputs.write().await.clear();
    }

    /// Get the number of stored states
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }

    /// Get the number of stored outputs
    pub async fn output_count(&self) -> usize {
        self.outputs.read().await.len()
    }
}

impl Default for InMemoryStateStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStorage for InMemoryStateStorage {
    async fn save_state(
        &self,
        cycle_id: CycleId,
        state: &ConversationState,
    ) -> Result<(), StateStorageError> {
        let mut states = self.states.write().await;
        states.insert(cycle_id, state.clone());
        Ok(())
    }

    async fn load_state(&self, cycle_id: CycleId) -> Result<ConversationState, StateStorageError> {
        let states = self.states.read().await;
        states
            .get(&cycle_id)
            .cloned()
            .ok_or(StateStorageError::NotFound(cycle_id))
    }

    async fn save_step_output(
        &self,
        cycle_id: CycleId,
        component: ComponentType,
        output: &dyn StructuredOutput,
    ) -> Result<(), StateStorageError> {
        let yaml = output
            .to_yaml()
            .map_err(|e| StateStorageError::SerializationFailed(e.to_string()))?;

        let mut outputs = self.outputs.write().await;
        outputs.insert((cycle_id, component), yaml);
        Ok(())
    }

    async fn load_step_output(
        &self,
        cycle_id: CycleId,
        component: ComponentType,
    ) -> Result<String, StateStorageError> {
        let outputs = self.outputs.read().await;
        outputs
            .get(&(cycle_id, component))
            .cloned()
            .ok_or(StateStorageError::OutputNotFound {
                cycle_id,
                component,
            })
    }

    async fn exists(&self, cycle_id: CycleId) -> Result<bool, StateStorageError> {
        let states = self.states.read().await;
        Ok(states.contains_key(&cycle_id))
    }

    async fn delete(&self, cycle_id: CycleId) -> Result<(), StateStorageError> {
        // Remove state
        self.states.write().await.remove(&cycle_id);

        // Remove all outputs for this cycle
        let mut outputs = self.outputs.write().await;
        outputs.retain(|(cid, _), _| *cid != cycle_id);

        Ok(())
    }
}
