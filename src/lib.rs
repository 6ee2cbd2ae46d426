#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]

//! # Playdeck
//!
//! Pipeline playbook dashboard for your terminal.
//!
//! Playdeck offers a catalog of pipelines, lets you assemble them into an
//! ordered playbook, reorder it with the keyboard or by dragging rows, and
//! dry-run it as a staggered sequence of log messages.
//!
//! ## Features
//!
//! - **Catalog**: Built-in mock pipelines, extendable from config, fuzzy searchable (nucleo)
//! - **Playbook**: Duplicate-safe adds, file-based adds, drag-and-drop reordering
//! - **Run Simulation**: Timed log output per pipeline, cancellable with stop
//! - **Scriptable**: Every dashboard action is available from the CLI
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the dashboard
//! playdeck
//!
//! # Dry-run a playbook from the shell
//! playdeck run build deploy --interval-ms 200
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod core;
pub mod tui;

// Re-export commonly used types
pub use app::App;
pub use core::{Action, Catalog, Config, Dashboard, Pipeline, Playbook};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "playdeck";
