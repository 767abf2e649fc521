//! Core Services
//!
//! The request-facing building blocks of the index: entry shapes,
//! directory listing, protected-route gating, download resolution, and
//! recursive search. Each service holds a shared gateway handle and no
//! other state, so one instance serves all requests concurrently.

pub mod auth_gate;
pub mod download;
pub mod entry;
pub mod lister;
pub mod search;

pub use auth_gate::{AuthGate, RouteOutcome};
pub use download::{DownloadOutcome, DownloadService};
pub use entry::{Entry, EntryKind, Page};
pub use lister::DirectoryLister;
pub use search::SearchEngine;
