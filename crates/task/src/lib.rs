//! Execution planning for task graphs
//!
//! This crate turns a graph of task nodes connected by dependency,
//! must-run-after and should-run-after edges into a linear execution plan,
//! breaking cycles through should-run-after edges where it can, and then
//! tracks which planned tasks are ready to run as completions come in.

pub mod config;
pub mod graph;
pub mod plan;
pub mod render;
pub mod walker;

pub use config::PlannerConfig;
pub use graph::{EdgeKind, GraphEdge, TaskId, TaskNode, WorkGraph, WorkItem};
pub use plan::ExecutionPlan;
pub use render::{
    AnsiTextOutput, DirectedGraphRenderer, GraphNodeRenderer, IdentityPathRenderer, Style,
    StyledTextOutput,
};
pub use walker::CycleWalker;
