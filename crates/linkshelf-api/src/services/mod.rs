//! Request-level workflows that span several repository calls.

pub mod batch_import;

pub use batch_import::{import_batch, plan_batch, BatchEntry};
