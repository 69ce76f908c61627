//! Workflow pipelines orchestrating stateless services.

pub mod sign;

pub use sign::SignWorkflow;
