//! Test harness for scripted IgnisCAD scenarios.
//!
//! Provides programmatic tools for building models step by step, verifying
//! the geometry at every step, and reporting failures with context.
//!
//! # Key Components
//!
//! - [`ModelBuilder`]: Fluent API for building and verifying models
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`helpers`]: Error type and mesh math
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use workflow::ModelBuilder;
