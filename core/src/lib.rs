//! Batch submission of mediation cases.
//!
//! Rows of a spreadsheet supply the applicant and respondent names; a
//! configured case template supplies everything else. Each row becomes
//! one form POST to the mediation endpoint, retried a bounded number of
//! times, with failures logged and skipped.

pub mod column;
pub mod config;
pub mod dates;
pub mod error;
pub mod journal;
pub mod payload;
pub mod rng;
pub mod runner;
pub mod source;
pub mod submit;
pub mod template;
pub mod types;
pub mod validate;

pub use config::RunConfig;
pub use error::{CaseError, CaseResult};
pub use runner::{CaseRunner, RunSummary};
