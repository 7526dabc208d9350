//! Discussion board server — runs controller pipelines against a store.
//!
//! Each action is an ordered [`Pipeline`] of stages (validation, resource
//! handler, redirect dispatch, view render). The server owns the store and
//! one pipeline per action, and implements the transport's
//! `RequestHandler`.

pub mod context;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod validation;
pub mod views;

pub use context::Locals;
pub use normalize::normalize;
pub use pipeline::{Flow, Pipeline, PipelineOutcome, Reply, Stage, StageResult};
pub use policy::{ErrorPolicy, Operation};
pub use router::{BoardServer, pipeline_for};
pub use validation::{Rule, RuleSet, Validate};
