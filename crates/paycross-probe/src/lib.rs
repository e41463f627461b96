//! On-Chain Adapter Probe (SPEC_FULL.md §4.3).
//!
//! - [`snapshot`] — [`snapshot::ConfigSnapshot`] and the preflight row types.
//! - [`autofix`] — [`autofix::build_autofix_plan`].
//! - [`probe`] — [`probe::AdapterProbe`], the call-sequence orchestration.
//! - [`error`] — [`error::ProbeError`].

pub mod autofix;
pub mod error;
pub mod probe;
pub mod snapshot;

pub use autofix::{build_autofix_plan, AutoFixStatus, AutoFixStep, AutoFixStepKind};
pub use error::ProbeError;
pub use probe::AdapterProbe;
pub use snapshot::{ConfigSnapshot, PreflightErrorCode, PreflightRow};
