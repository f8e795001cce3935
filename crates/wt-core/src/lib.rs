//! Core domain logic for the workspace time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Timer state: the engine enforcing the single-active-timer rule
//! - Aggregation: totals and averages over recorded entries
//! - Filtering: workspace and date-window predicates over the history
//! - Export: deterministic CSV serialization of the entry set
//!
//! Storage is behind the [`store::EntryStore`] trait; nothing in this crate
//! performs I/O. Every date-sensitive function takes its reference instant
//! (and thereby its timezone) as a parameter.

pub mod aggregate;
pub mod clock;
pub mod export;
pub mod filter;
pub mod store;
pub mod tracker;
pub mod types;

pub use store::{EntryStore, NewEntry, StoreError};
pub use tracker::{EngineError, TimerSnapshot, Tracker};
pub use types::{Entry, EntryId, TimerState, ValidationError, Workspace, WorkspaceId};
