//! Shared types: the transaction model, diagnostics, and collection aliases.

pub mod collections;
pub mod diagnostics;
pub mod transaction;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use transaction::{BodyKind, Request, RequestBody, Response, ResponseBody, Transaction};
