//! Core types and functionality for Playdeck.
//!
//! This module contains the dashboard model: the pipeline catalog, the
//! playbook, the activity log, the run simulator and configuration.

mod activity;
mod catalog;
mod config;
mod dashboard;
mod error;
mod playbook;
pub mod simulation;

pub use activity::{ActivityLog, LogLine};
pub use catalog::{Catalog, Pipeline, PipelineId};
pub use config::{Config, CustomColorsConfig, GeneralConfig, RunConfig, UiConfig};
pub use dashboard::{Action, Dashboard};
pub use error::{DeckError, DeckResult};
pub use playbook::{AddOutcome, ItemKey, Playbook, PlaybookItem};
pub use simulation::{drive, PendingMessage, RunId, RunSimulator, COMPLETION_MESSAGE};
