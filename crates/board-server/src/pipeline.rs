//! Staged request pipelines.
//!
//! A pipeline is an ordered list of stages. Each stage may continue to the
//! next one or answer the request; an error ends the pipeline and goes to the
//! generic error handler. Running past the last stage answers "not found".

use std::future::Future;
use std::pin::Pin;

use board_protocol::{BoardError, BoardRequest, Template};
use board_store::Store;
use tracing::debug;

use crate::context::Locals;

/// How a pipeline answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Redirect(String),
    Render(Template),
    Error(BoardError),
    NotFound,
}

/// What a stage wants the driver to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Respond(Reply),
}

pub type StageResult = Result<Flow, BoardError>;

/// One step of a pipeline.
pub trait Stage<S: Store>: Send + Sync {
    fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> impl Future<Output = StageResult> + Send;

    /// Stage name for logging.
    fn name(&self) -> &str;
}

/// Object-safe version of Stage — all refs share lifetime `'a`.
trait StageDyn<S>: Send + Sync {
    fn run_dyn<'a>(
        &'a self,
        store: &'a S,
        request: &'a mut BoardRequest,
        locals: &'a mut Locals,
    ) -> Pin<Box<dyn Future<Output = StageResult> + Send + 'a>>;

    fn name_dyn(&self) -> &str;
}

impl<S: Store, T: Stage<S>> StageDyn<S> for T {
    fn run_dyn<'a>(
        &'a self,
        store: &'a S,
        request: &'a mut BoardRequest,
        locals: &'a mut Locals,
    ) -> Pin<Box<dyn Future<Output = StageResult> + Send + 'a>> {
        Box::pin(self.run(store, request, locals))
    }

    fn name_dyn(&self) -> &str {
        self.name()
    }
}

/// The final reply together with the locals that produced it.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub reply: Reply,
    pub locals: Locals,
}

/// An ordered chain of stages for one action.
pub struct Pipeline<S> {
    stages: Vec<Box<dyn StageDyn<S>>>,
}

impl<S: Store> Pipeline<S> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn then<T: Stage<S> + 'static>(mut self, stage: T) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Drive `request` through every stage with fresh locals.
    pub async fn run(&self, store: &S, request: &mut BoardRequest) -> PipelineOutcome {
        let mut locals = Locals::default();

        for stage in &self.stages {
            debug!(stage = stage.name_dyn(), "running stage");
            match stage.run_dyn(store, request, &mut locals).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Respond(reply)) => return PipelineOutcome { reply, locals },
                Err(err) => {
                    return PipelineOutcome {
                        reply: Reply::Error(err),
                        locals,
                    };
                }
            }
        }

        PipelineOutcome {
            reply: Reply::NotFound,
            locals,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name_dyn()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<S: Store> Default for Pipeline<S> {
    fn default() -> Self {
        Self::new()
    }
}
