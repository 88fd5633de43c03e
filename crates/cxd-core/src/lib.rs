//! # cxd-core
//!
//! Core value types and error types for the C++ diagnostic labeler.
//!
//! This crate provides the plain data shared across all `cxd` crates:
//! - `SourceUnit` and its content hash
//! - `Diagnostic` and compiler-output parsing
//! - `ContextRecord`, the serializable snapshot of what surrounds a diagnostic line
//! - `FixCategory` and `LabelResult` produced by the rule engine
//! - CLI response types
//! - Cross-cutting error types
//!
//! Nothing in here holds a reference into an AST. Every type is a value that can
//! be logged, stored or serialized after the parse that produced it is gone.

pub mod context;
pub mod diagnostic;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod source;
