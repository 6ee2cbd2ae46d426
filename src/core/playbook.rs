//! The playbook: the user-ordered list of pipelines to run.
//!
//! Order is execution order. Every entry carries an [`ItemKey`] handed out
//! by a counter owned by the playbook, so keys are unique for the life of
//! the process and never depend on clock resolution.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DeckError, DeckResult, Pipeline, PipelineId};

/// Stable key of a playbook entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(u64);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pipeline placed in the playbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookItem {
    /// Copy of the catalog record
    #[serde(flatten)]
    pub pipeline: Pipeline,

    /// Key of this entry
    #[serde(rename = "uniqueId")]
    pub unique_id: ItemKey,
}

impl PlaybookItem {
    /// Display name of the underlying pipeline.
    pub fn name(&self) -> &str {
        &self.pipeline.name
    }
}

/// Result of adding a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended under the given key
    Added(ItemKey),
    /// A pipeline with the same id is already present
    Duplicate,
}

/// Ordered list of playbook entries.
#[derive(Debug, Clone, Default)]
pub struct Playbook {
    items: Vec<PlaybookItem>,
    next_key: u64,
}

impl Playbook {
    /// Create an empty playbook.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_key(&mut self) -> ItemKey {
        self.next_key += 1;
        ItemKey(self.next_key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the playbook is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in execution order.
    pub fn items(&self) -> &[PlaybookItem] {
        &self.items
    }

    /// Entry at a position.
    pub fn get(&self, index: usize) -> Option<&PlaybookItem> {
        self.items.get(index)
    }

    /// Position of the entry with the given key.
    pub fn position(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|item| item.unique_id == key)
    }

    /// Whether a pipeline with this id is already in the playbook.
    pub fn contains_pipeline(&self, id: PipelineId) -> bool {
        self.items.iter().any(|item| item.pipeline.id == id)
    }

    /// Append a copy of a catalog pipeline unless its id is already present.
    pub fn add(&mut self, pipeline: &Pipeline) -> AddOutcome {
        if self.contains_pipeline(pipeline.id) {
            return AddOutcome::Duplicate;
        }
        AddOutcome::Added(self.push(pipeline.clone()))
    }

    /// Append a pipeline synthesized from a file name.
    ///
    /// Only the file name is used; the file is never opened. The id is the
    /// supplied timestamp in milliseconds and the entry is appended without
    /// a duplicate check.
    pub fn add_file(&mut self, path: &Path, timestamp_ms: u64) -> (ItemKey, &PlaybookItem) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let key = self.push(Pipeline::new(timestamp_ms, name, "file uploaded"));
        let index = self.items.len() - 1;
        (key, &self.items[index])
    }

    fn push(&mut self, pipeline: Pipeline) -> ItemKey {
        let unique_id = self.next_key();
        self.items.push(PlaybookItem { pipeline, unique_id });
        unique_id
    }

    /// Remove exactly the entry with the given key.
    pub fn remove(&mut self, key: ItemKey) -> DeckResult<PlaybookItem> {
        let index = self.position(key).ok_or(DeckError::ItemNotFound(key))?;
        Ok(self.items.remove(index))
    }

    /// Drop the dragged entry onto the target entry.
    ///
    /// The dragged entry is taken out and reinserted at the index the target
    /// held before the move, so it ends up exactly where the target was.
    /// Returns the new index of the dragged entry.
    pub fn reorder(&mut self, dragged: ItemKey, target: ItemKey) -> DeckResult<usize> {
        let from = self.position(dragged).ok_or(DeckError::ItemNotFound(dragged))?;
        let to = self.position(target).ok_or(DeckError::ItemNotFound(target))?;
        self.move_to(from, to)?;
        Ok(to)
    }

    /// Move the entry at `from` so it occupies `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> DeckResult<()> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(DeckError::OutOfRange { index, len });
            }
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        Ok(())
    }

    /// Pretty JSON dump of the playbook.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.items)
    }
}
