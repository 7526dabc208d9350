//! Board server: owns the store and one pipeline per action.

use std::collections::HashMap;
use std::sync::Arc;

use board_protocol::{Action, BoardRequest, BoardResponse, Template};
use board_store::Store;
use board_transport::RequestHandler;
use tracing::{debug, info};

use crate::handlers::{Create, Delete, Edit, Index, RedirectView, RenderView, Show, Update};
use crate::pipeline::{Pipeline, PipelineOutcome, Reply};
use crate::validation::Validate;
use crate::views;

/// The stock pipeline for `action`.
pub fn pipeline_for<S: Store>(action: Action) -> Pipeline<S> {
    match action {
        Action::New => Pipeline::new().then(RenderView(Template::New)),
        Action::Create => Pipeline::new()
            .then(Validate::default())
            .then(Create)
            .then(RedirectView),
        Action::Index => Pipeline::new()
            .then(Index)
            .then(RenderView(Template::Index)),
        Action::Show => Pipeline::new().then(Show).then(RenderView(Template::Show)),
        Action::Edit => Pipeline::new().then(Edit),
        Action::Update => Pipeline::new().then(Update).then(RedirectView),
        Action::Delete => Pipeline::new().then(Delete).then(RedirectView),
    }
}

/// The board server — routes each request through its action's pipeline.
pub struct BoardServer<S> {
    store: Arc<S>,
    pipelines: HashMap<Action, Pipeline<S>>,
}

impl<S: Store> BoardServer<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    pub fn with_shared_store(store: Arc<S>) -> Self {
        let pipelines = Action::ALL
            .into_iter()
            .map(|action| (action, pipeline_for(action)))
            .collect();

        info!("Board server ready ({} actions)", Action::ALL.len());
        Self { store, pipelines }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pipeline(&self, action: Action) -> Option<&Pipeline<S>> {
        self.pipelines.get(&action)
    }

    /// Swap the pipeline used for `action`.
    pub fn set_pipeline(&mut self, action: Action, pipeline: Pipeline<S>) {
        self.pipelines.insert(action, pipeline);
    }

    /// Run `request` through its pipeline without rendering.
    pub async fn run(&self, request: &mut BoardRequest) -> PipelineOutcome {
        match self.pipelines.get(&request.action) {
            Some(pipeline) => pipeline.run(&self.store, request).await,
            None => PipelineOutcome {
                reply: Reply::NotFound,
                locals: Default::default(),
            },
        }
    }

    /// Run `request` and turn the outcome into a response.
    pub async fn dispatch(&self, mut request: BoardRequest) -> BoardResponse {
        let PipelineOutcome { reply, locals } = self.run(&mut request).await;
        debug!(action = request.action.name(), ?reply, "pipeline finished");

        let response = match reply {
            Reply::Redirect(location) => BoardResponse::redirect(location),
            Reply::Render(template) => {
                BoardResponse::html(200, views::render(template, &locals, &request.flash))
            }
            Reply::Error(err) => {
                BoardResponse::html(err.status(), views::error_page(&err, &request.flash))
            }
            Reply::NotFound => BoardResponse::html(404, views::not_found_page(&request.flash)),
        };

        response.with_flash(locals.flash)
    }
}

impl<S: Store> RequestHandler for BoardServer<S> {
    async fn handle_request(&self, request: BoardRequest) -> BoardResponse {
        self.dispatch(request).await
    }
}
