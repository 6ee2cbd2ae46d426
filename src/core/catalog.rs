//! Pipeline catalog.
//!
//! The catalog is the fixed list of pipelines the dashboard offers. It
//! stands in for a DevOps API: four built-in mock entries, optionally
//! extended from the `[[pipelines]]` section of the config file.

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config as NucleoConfig, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use super::{DeckError, DeckResult};

/// Identifier of a catalog pipeline.
pub type PipelineId = u64;

/// A named catalog entry with its parameter string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Catalog identifier
    pub id: PipelineId,

    /// Display name
    pub name: String,

    /// Free-form parameter string (e.g. `branch=main`)
    #[serde(default)]
    pub params: String,
}

impl Pipeline {
    /// Create a new pipeline record.
    pub fn new(id: PipelineId, name: impl Into<String>, params: impl Into<String>) -> Self {
        Self { id, name: name.into(), params: params.into() }
    }
}

/// Ordered collection of pipelines available to the playbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pipelines: Vec<Pipeline>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in mock pipelines.
    pub fn builtin() -> Self {
        Self {
            pipelines: vec![
                Pipeline::new(1, "Build Pipeline", "branch=main"),
                Pipeline::new(2, "Deploy Pipeline", "env=staging"),
                Pipeline::new(3, "Test Pipeline", "scope=unit"),
                Pipeline::new(4, "Cleanup Pipeline", "resource=temp"),
            ],
        }
    }

    /// Append extra pipelines, skipping any whose id is already taken.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = Pipeline>) -> Self {
        for pipeline in extra {
            if self.find(pipeline.id).is_some() {
                tracing::warn!(id = pipeline.id, name = %pipeline.name, "duplicate pipeline id in config, skipping");
                continue;
            }
            self.pipelines.push(pipeline);
        }
        self
    }

    /// Number of pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether the catalog has no pipelines.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Pipeline at a display position.
    pub fn get(&self, index: usize) -> Option<&Pipeline> {
        self.pipelines.get(index)
    }

    /// Look up a pipeline by id.
    pub fn find(&self, id: PipelineId) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| p.id == id)
    }

    /// All pipelines in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.iter()
    }

    /// Fuzzy search pipeline names.
    ///
    /// Returns catalog indices, best match first. An empty query returns
    /// every index in catalog order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return (0..self.pipelines.len()).collect();
        }

        let mut matcher = Matcher::new(NucleoConfig::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut buf = Vec::new();
        let mut scored: Vec<(usize, u32)> = self
            .pipelines
            .iter()
            .enumerate()
            .filter_map(|(index, p)| {
                let haystack = Utf32Str::new(&p.name, &mut buf);
                pattern.score(haystack, &mut matcher).map(|score| (index, score))
            })
            .collect();

        // Stable sort keeps catalog order between equal scores
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(index, _)| index).collect()
    }

    /// Resolve a user reference to a pipeline.
    ///
    /// A numeric reference is treated as an id; anything else is matched
    /// against names and the best hit wins.
    pub fn resolve(&self, reference: &str) -> DeckResult<&Pipeline> {
        let reference = reference.trim();
        if let Ok(id) = reference.parse::<PipelineId>() {
            return self.find(id).ok_or(DeckError::MissingPipeline(id));
        }

        self.search(reference)
            .first()
            .and_then(|&index| self.get(index))
            .ok_or_else(|| DeckError::UnknownPipeline(reference.to_string()))
    }
}
