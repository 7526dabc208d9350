//! HTML views.
//!
//! Every page shares one layout carrying the title, navigation and any flash
//! messages handed over from the previous request.

use board_protocol::{BoardError, CATEGORIES, Discussion, FlashMessage, Routes, Template};
use maud::{DOCTYPE, Markup, html};

use crate::context::Locals;

/// Render `template` with the request's locals and incoming flash.
pub fn render(template: Template, locals: &Locals, flash: &[FlashMessage]) -> String {
    let body = match template {
        Template::New => new_form(),
        Template::Index => index(&locals.discussions),
        Template::Show => match &locals.discussion {
            Some(discussion) => show(discussion),
            None => missing(),
        },
        Template::Edit => match &locals.discussion {
            Some(discussion) => edit_form(discussion),
            None => missing(),
        },
    };

    layout(template.title(), template.page(), flash, body).into_string()
}

/// Page for an error that reached the generic error handler.
pub fn error_page(err: &BoardError, flash: &[FlashMessage]) -> String {
    let title = match err.status() {
        404 => "Not Found",
        400 => "Bad Request",
        _ => "Error",
    };
    let body = html! {
        h1 { (err.status()) " " (title) }
        p.error-message { (err.message) }
        a href=(Routes::DISCUSSIONS) { "Back to discussions" }
    };
    layout(title, "error", flash, body).into_string()
}

/// Page for a request no stage answered.
pub fn not_found_page(flash: &[FlashMessage]) -> String {
    let body = html! {
        h1 { "404 Not Found" }
        p { "Nothing here." }
        a href=(Routes::DISCUSSIONS) { "Back to discussions" }
    };
    layout("Not Found", "not-found", flash, body).into_string()
}

fn layout(title: &str, page: &str, flash: &[FlashMessage], body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body data-page=(page) {
                nav {
                    a href=(Routes::DISCUSSIONS) { "Discussions" }
                    " "
                    a href=(Routes::DISCUSSIONS_NEW) { "New discussion" }
                }
                @for message in flash {
                    div class=(format!("flash flash-{}", message.severity.as_str())) {
                        (message.message)
                    }
                }
                main { (body) }
            }
        }
    }
}

fn missing() -> Markup {
    html! { p { "Discussion not found." } }
}

fn index(discussions: &[Discussion]) -> Markup {
    html! {
        h1 { "All Discussions" }
        @if discussions.is_empty() {
            p.empty { "No discussions yet." }
        } @else {
            ul.discussions {
                @for discussion in discussions {
                    li {
                        a href=(Routes::discussion(&discussion.id)) { (discussion.title) }
                        @if let Some(name) = discussion.author_name() {
                            " by " span.author { (name) }
                        }
                        " " span.views { (discussion.views) " views" }
                    }
                }
            }
        }
    }
}

fn show(discussion: &Discussion) -> Markup {
    html! {
        article.discussion {
            h1 { (discussion.title) }
            p.meta {
                @if let Some(name) = discussion.author_name() {
                    "By " span.author { (name) } " · "
                }
                @if let Some(category) = &discussion.category {
                    span.category { (category) } " · "
                }
                span.views { (discussion.views) " views" }
            }
            div.description { (discussion.description) }
            @if !discussion.tags.is_empty() {
                ul.tags {
                    @for tag in &discussion.tags {
                        li { (tag) }
                    }
                }
            }
            section.comments {
                h2 { "Comments (" (discussion.comments.len()) ")" }
                @for comment in &discussion.comments {
                    @if let Some(comment) = comment.populated() {
                        div.comment { (comment.content) }
                    }
                }
            }
            p.actions {
                a href=(Routes::discussion_edit(&discussion.id)) { "Edit" }
                form method="post" action=(Routes::discussion_delete(&discussion.id)) {
                    button type="submit" { "Delete" }
                }
            }
        }
    }
}

fn category_select(selected: Option<&str>) -> Markup {
    html! {
        select name="category" {
            @for category in CATEGORIES {
                option value=(category) selected[selected == Some(*category)] { (category) }
            }
        }
    }
}

fn new_form() -> Markup {
    html! {
        h1 { "New Discussion" }
        form method="post" action=(Routes::DISCUSSIONS_CREATE) {
            label { "Title" input type="text" name="title"; }
            label { "Description" textarea name="description" {} }
            label { "Category" (category_select(Some("general"))) }
            label { "Tags" input type="text" name="tags"; }
            button type="submit" { "Create" }
        }
    }
}

fn edit_form(discussion: &Discussion) -> Markup {
    html! {
        h1 { "Edit Discussion" }
        form method="post" action=(Routes::discussion_update(&discussion.id)) {
            label { "Title" input type="text" name="title" value=(discussion.title); }
            label { "Description" textarea name="description" { (discussion.description) } }
            label { "Category" (category_select(discussion.category.as_deref())) }
            @for tag in &discussion.tags {
                input type="hidden" name="tags" value=(tag);
            }
            button type="submit" { "Save" }
        }
    }
}
