#![forbid(unsafe_code)]

//! `merrow` parses Mermaid-style diagram text into typed trees and writes them back out.
//!
//! The parsing and generation pipeline lives in `merrow-core` and is re-exported here. This crate
//! adds the layers that work on finished trees:
//!
//! - [`ids`]: validated identifier newtypes
//! - [`visit`]: read-only traversal ([`Visitor`]) and owned rewriting ([`Transform`])
//! - [`builder`]: building or editing diagrams without writing source text
//! - [`validate`]: reserved-word and gantt dependency checks over a whole program

pub use merrow_core::*;

pub mod builder;
pub mod ids;
pub mod validate;
pub mod visit;

mod error;

pub use builder::{FlowchartBuilder, GanttBuilder, SequenceBuilder, push_diagram};
pub use error::{Error, Result};
pub use ids::{IdError, NodeId, ParticipantId, TaskId};
pub use validate::{ValidationError, validate};
pub use visit::{RenameIds, Transform, Visitor};
