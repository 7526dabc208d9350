//! Resource handler stages for the discussion routes.

use board_protocol::{BoardError, BoardRequest, FlashMessage, Routes, Template};
use board_store::{Populate, Store};
use tracing::{debug, info};

use crate::context::Locals;
use crate::normalize::normalize;
use crate::pipeline::{Flow, Reply, Stage, StageResult};
use crate::policy::Operation;

fn member_id(request: &BoardRequest) -> Result<String, BoardError> {
    request
        .id
        .clone()
        .ok_or_else(|| BoardError::not_found("Discussion id missing"))
}

/// Persist a validated submission.
pub struct Create;

impl<S: Store> Stage<S> for Create {
    async fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        if locals.skip {
            return Ok(Flow::Continue);
        }

        let params = normalize(&request.fields, request.user.as_deref());
        match store.create(params).await {
            Ok(discussion) => {
                info!(id = %discussion.id, "Discussion created");
                locals.redirect = Some(Routes::DISCUSSIONS.to_string());
                locals.created = true;
                locals.discussion = Some(discussion);
                locals.flash.push(FlashMessage::success("Discussion created"));
                Ok(Flow::Continue)
            }
            Err(e) => Operation::Create.fail(e),
        }
    }

    fn name(&self) -> &str {
        "create"
    }
}

/// Load every discussion with its author.
pub struct Index;

impl<S: Store> Stage<S> for Index {
    async fn run(
        &self,
        store: &S,
        _request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        match store.find_all(Populate::AUTHOR).await {
            Ok(discussions) => {
                debug!(count = discussions.len(), "discussions loaded");
                locals.discussions = discussions;
                Ok(Flow::Continue)
            }
            Err(e) => Operation::Index.fail(e),
        }
    }

    fn name(&self) -> &str {
        "index"
    }
}

/// Load one discussion and count the view.
///
/// The count is read, bumped and written back as two separate store calls,
/// so concurrent views of the same discussion can lose increments.
pub struct Show;

impl<S: Store> Stage<S> for Show {
    async fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        let id = member_id(request)?;

        let mut discussion = match store.find_by_id(&id, Populate::ALL).await {
            Ok(discussion) => discussion,
            Err(e) => return Operation::Show.fail(e),
        };

        discussion.views += 1;
        if let Err(e) = store.save_views(&id, discussion.views).await {
            return Operation::Show.fail(e);
        }

        locals.discussion = Some(discussion);
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "show"
    }
}

/// Load one discussion and answer with its edit form.
pub struct Edit;

impl<S: Store> Stage<S> for Edit {
    async fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        let id = member_id(request)?;

        match store.find_by_id(&id, Populate::ALL).await {
            Ok(discussion) => {
                locals.discussion = Some(discussion);
                Ok(Flow::Respond(Reply::Render(Template::Edit)))
            }
            Err(e) => Operation::Edit.fail(e),
        }
    }

    fn name(&self) -> &str {
        "edit"
    }
}

/// Apply submitted fields to an existing discussion.
///
/// Normalised without an acting user, so the stored author is never touched.
pub struct Update;

impl<S: Store> Stage<S> for Update {
    async fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        let id = member_id(request)?;
        let params = normalize(&request.fields, None);

        match store
            .find_by_id_and_update(&id, params, Populate::AUTHOR)
            .await
        {
            Ok(discussion) => {
                info!(id = %discussion.id, "Discussion updated");
                locals.redirect = Some(Routes::discussion(&id));
                locals.discussion = Some(discussion);
                locals.flash.push(FlashMessage::success("Discussion updated"));
                Ok(Flow::Continue)
            }
            Err(e) => Operation::Update.fail(e),
        }
    }

    fn name(&self) -> &str {
        "update"
    }
}

/// Remove a discussion. Store failures are logged and otherwise ignored.
pub struct Delete;

impl<S: Store> Stage<S> for Delete {
    async fn run(
        &self,
        store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        let id = member_id(request)?;

        match store.find_by_id_and_remove(&id).await {
            Ok(removed) => {
                if let Some(discussion) = removed {
                    info!(id = %discussion.id, "Discussion deleted");
                    locals.flash.push(FlashMessage::success("Discussion deleted"));
                }
                locals.redirect = Some(Routes::DISCUSSIONS.to_string());
                Ok(Flow::Continue)
            }
            Err(e) => Operation::Delete.fail(e),
        }
    }

    fn name(&self) -> &str {
        "delete"
    }
}

/// Answer with the pending redirect, if one was set.
pub struct RedirectView;

impl<S: Store> Stage<S> for RedirectView {
    async fn run(
        &self,
        _store: &S,
        _request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        Ok(match &locals.redirect {
            Some(target) => Flow::Respond(Reply::Redirect(target.clone())),
            None => Flow::Continue,
        })
    }

    fn name(&self) -> &str {
        "redirect-view"
    }
}

/// Answer with a rendered template.
pub struct RenderView(pub Template);

impl<S: Store> Stage<S> for RenderView {
    async fn run(
        &self,
        _store: &S,
        _request: &mut BoardRequest,
        _locals: &mut Locals,
    ) -> StageResult {
        Ok(Flow::Respond(Reply::Render(self.0)))
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}
