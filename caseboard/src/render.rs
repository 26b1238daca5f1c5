//! Opaque per-entity render handles.
//!
//! A host draws each node or edge as several primitives. It registers the
//! handles it created here so the session can hand them back when the
//! entity goes away, without knowing anything about the backend.

use crate::model::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderHandle(pub u64);

#[derive(Clone, Debug, Default)]
pub struct RenderRegistry {
    handles: HashMap<EntityRef, Vec<RenderHandle>>,
}

impl RenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: EntityRef, handle: RenderHandle) {
        let list = self.handles.entry(entity).or_default();
        if !list.contains(&handle) {
            list.push(handle);
        }
    }

    pub fn handles_of(&self, entity: EntityRef) -> &[RenderHandle] {
        self.handles.get(&entity).map_or(&[], Vec::as_slice)
    }

    pub fn release(&mut self, entity: EntityRef) -> Vec<RenderHandle> {
        self.handles.remove(&entity).unwrap_or_default()
    }

    pub fn release_all(&mut self) -> Vec<(EntityRef, Vec<RenderHandle>)> {
        let mut all: Vec<_> = self.handles.drain().collect();
        all.sort_by_key(|(e, _)| *e);
        all
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
