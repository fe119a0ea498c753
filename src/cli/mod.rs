//! Workflow layer between the clap front end and the library

pub mod orchestration;

pub use orchestration::{
    run_workflow, tag_listing, Outcome, Stage, Workflow, WorkflowArgs, WorkflowResult,
};
