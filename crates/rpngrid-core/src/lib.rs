//! rpngrid-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::Document;
pub use error::{Result, RpnGridError};
pub use storage::OutputFormat;

pub use rpngrid_engine::engine::{CellRef, EvalOptions, EvaluatedGrid};
