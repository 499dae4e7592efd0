//! # monobuild-driver
//!
//! Runs the fixed task sequence against each selected project and collects a
//! per-project pass/fail report.
//!
//! [`drive`] never stops early: a failing project is recorded and the next
//! one starts. Within a project, the first failing task ends its sequence.

pub mod driver;
pub mod error;
pub mod tool;

pub use driver::{drive, BuildReport, ProjectOutcome, ProjectReport};
pub use error::DriverError;
pub use tool::{BuildTool, GradleTool, TaskStatus};
