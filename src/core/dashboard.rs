//! Dashboard state.
//!
//! [`Dashboard`] owns the catalog, the playbook, the activity log and the
//! run simulator. Every change goes through [`Dashboard::apply`], which
//! mutates the model, writes the matching log line and bumps the revision
//! the view renders from.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::{
    ActivityLog, AddOutcome, Catalog, DeckError, ItemKey, Pipeline, PipelineId, Playbook,
    RunSimulator,
};

/// Something the user (or the clock) asked the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a catalog pipeline to the playbook
    AddPipeline(PipelineId),
    /// Add a pipeline named after a file
    AddFile(PathBuf),
    /// Remove a playbook entry
    Remove(ItemKey),
    /// Drop one playbook entry onto another
    Reorder { dragged: ItemKey, target: ItemKey },
    /// Move the entry at one position to another
    Move { from: usize, to: usize },
    /// Start a simulated run of the playbook
    Run,
    /// Stop and cancel pending run messages
    Stop,
    /// Schedule the playbook for a time (logged only)
    Schedule(String),
    /// Dump the playbook to the log
    SaveConfiguration,
    /// Save edits to a catalog pipeline (logged only)
    SavePipeline { id: PipelineId, name: String, params: String },
    /// Release due run messages
    Tick,
}

/// The dashboard model.
#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Catalog,
    playbook: Playbook,
    log: ActivityLog,
    simulator: RunSimulator,
    revision: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Catalog::builtin(), crate::core::simulation::DEFAULT_INTERVAL)
    }
}

impl Dashboard {
    /// Create a dashboard over a catalog and announce the loaded pipelines.
    pub fn new(catalog: Catalog, interval: Duration) -> Self {
        let mut log = ActivityLog::new();
        log.push("Loaded pipelines from DevOps API (mock). Select one to add to playbook.");

        Self {
            catalog,
            playbook: Playbook::new(),
            log,
            simulator: RunSimulator::new(interval),
            revision: 0,
        }
    }

    /// The pipeline catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The playbook.
    pub fn playbook(&self) -> &Playbook {
        &self.playbook
    }

    /// The activity log.
    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// The run simulator.
    pub fn simulator(&self) -> &RunSimulator {
        &self.simulator
    }

    /// Increments on every applied action that changed the model or log.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Earliest pending run message, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.simulator.next_due()
    }

    /// Apply an action at time `now`.
    pub fn apply(&mut self, action: Action, now: Instant) {
        let before = (self.log.len(), self.playbook.len());

        match action {
            Action::AddPipeline(id) => match self.catalog.find(id).cloned() {
                Some(pipeline) => self.add_pipeline(&pipeline),
                None => self.log.push(DeckError::MissingPipeline(id).to_string() + "."),
            },
            Action::AddFile(path) => {
                let timestamp = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
                let (_, item) = self.playbook.add_file(&path, timestamp);
                let name = item.name().to_string();
                self.log.push(format!("Added '{}' to the playbook.", name));
                self.log.push(format!("Uploaded and added pipeline file: {}", name));
            }
            Action::Remove(key) => match self.playbook.remove(key) {
                Ok(_) => self.log.push("Pipeline removed from playbook."),
                Err(e) => tracing::warn!("remove ignored: {e}"),
            },
            Action::Reorder { dragged, target } => {
                if let Err(e) = self.playbook.reorder(dragged, target) {
                    tracing::warn!("reorder ignored: {e}");
                } else {
                    self.revision += 1;
                }
            }
            Action::Move { from, to } => {
                if let Err(e) = self.playbook.move_to(from, to) {
                    tracing::warn!("move ignored: {e}");
                } else {
                    self.revision += 1;
                }
            }
            Action::Run => self.run(now),
            Action::Stop => {
                let cancelled = self.simulator.cancel_all();
                tracing::debug!(cancelled, "run messages cancelled");
                self.log.push("⏹ Pipelines stopped.");
            }
            Action::Schedule(time) => {
                if self.playbook.is_empty() {
                    self.log.push("Cannot schedule. The playbook is empty.");
                } else {
                    self.log.push(format!(
                        "Scheduled playbook with {} pipelines to run at {}.",
                        self.playbook.len(),
                        time
                    ));
                }
            }
            Action::SaveConfiguration => match self.playbook.to_pretty_json() {
                Ok(config) => self.log.push(format!("Configuration saved:\n{config}")),
                Err(e) => tracing::error!("failed to serialize playbook: {e}"),
            },
            Action::SavePipeline { id, name, params } => {
                tracing::debug!(id, %name, %params, "pipeline edit submitted");
                self.log.push("Pipeline changes saved (mock).");
            }
            Action::Tick => {
                for message in self.simulator.poll(now) {
                    self.log.push(message.message);
                }
            }
        }

        if (self.log.len(), self.playbook.len()) != before {
            self.revision += 1;
        }
    }

    fn add_pipeline(&mut self, pipeline: &Pipeline) {
        match self.playbook.add(pipeline) {
            AddOutcome::Added(_) => {
                self.log.push(format!("Added '{}' to the playbook.", pipeline.name));
            }
            AddOutcome::Duplicate => {
                self.log.push(format!("'{}' is already in the playbook.", pipeline.name));
            }
        }
    }

    fn run(&mut self, now: Instant) {
        if self.playbook.is_empty() {
            self.log.push("Cannot run. The playbook is empty.");
            return;
        }
        self.log.push("Running all pipelines in the playbook...");
        self.simulator.start(self.playbook.items(), now);
    }
}
