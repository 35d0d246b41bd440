// File: ./src/client/mod.rs
pub mod rest;
pub mod sink;

pub use rest::RestSink;
pub use sink::{DryRunSink, SubmissionRequest, SubmissionSink, SubmissionTarget};
