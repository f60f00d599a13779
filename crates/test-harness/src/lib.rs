//! Test harness for the part generators.
//!
//! Provides verdict-returning oracles over kernel bodies and their meshes,
//! plus assertion helpers that turn failed verdicts into readable errors.
//!
//! # Key Components
//!
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`assertions`]: Assertion helpers with diagnostics
//! - [`helpers`]: Error type and mesh edge bookkeeping

pub mod assertions;
pub mod helpers;
pub mod oracle;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
