//! Submission validation for the creation path.
//!
//! Rules run in order over the submitted fields and every failing rule
//! contributes its message. A failed submission is not an error: the stage
//! queues an error flash, points the pending redirect back at the form, marks
//! the request as skipped and lets the pipeline continue.

use board_protocol::{BoardRequest, FlashMessage, FormFields, Routes};
use board_store::Store;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::context::Locals;
use crate::pipeline::{Flow, Stage, StageResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether a rule fires when its field was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing counts as a failure.
    Required,
    /// Missing is fine; the check only runs on submitted values.
    IfPresent,
}

/// One field check.
#[derive(Debug, Clone)]
pub struct Rule {
    pub field: &'static str,
    pub presence: Presence,
    /// Applied before the check; the sanitised value replaces the submitted one.
    pub sanitizer: Option<fn(&str) -> String>,
    pub check: fn(&str) -> bool,
    pub message: &'static str,
}

impl Rule {
    pub fn required(field: &'static str, check: fn(&str) -> bool, message: &'static str) -> Self {
        Self {
            field,
            presence: Presence::Required,
            sanitizer: None,
            check,
            message,
        }
    }

    pub fn if_present(field: &'static str, check: fn(&str) -> bool, message: &'static str) -> Self {
        Self {
            field,
            presence: Presence::IfPresent,
            sanitizer: None,
            check,
            message,
        }
    }

    pub fn sanitize(mut self, sanitizer: fn(&str) -> String) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Run the rule, rewriting the field if it has a sanitiser.
    /// Returns the failure message, if any.
    pub fn apply(&self, fields: &mut FormFields) -> Option<&'static str> {
        let Some(raw) = fields.get(self.field) else {
            return match self.presence {
                Presence::Required => Some(self.message),
                Presence::IfPresent => None,
            };
        };

        let value = match self.sanitizer {
            Some(sanitize) => {
                let clean = sanitize(raw);
                fields.set(self.field, clean.clone());
                clean
            }
            None => raw.to_string(),
        };

        (!(self.check)(&value)).then_some(self.message)
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Apply every rule in order, collecting failure messages.
    pub fn check(&self, fields: &mut FormFields) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(fields))
            .collect()
    }
}

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

fn not_empty(value: &str) -> bool {
    !value.is_empty()
}

/// Rules applied to a new discussion.
pub fn discussion_rules() -> RuleSet {
    RuleSet::new()
        .rule(Rule::required("title", not_blank, "Title cannot be empty"))
        .rule(Rule::required(
            "description",
            not_blank,
            "Description cannot be empty",
        ))
        .rule(
            Rule::if_present("email", is_valid_email, "Email is invalid")
                .sanitize(normalize_email),
        )
        .rule(Rule::if_present(
            "password",
            not_empty,
            "Password cannot be empty",
        ))
}

/// Join failure messages into the single flash line.
pub fn join_messages(messages: &[&str]) -> String {
    messages.join(" and ")
}

/// Validation stage.
pub struct Validate {
    rules: RuleSet,
}

impl Validate {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl Default for Validate {
    fn default() -> Self {
        Self::new(discussion_rules())
    }
}

impl<S: Store> Stage<S> for Validate {
    async fn run(
        &self,
        _store: &S,
        request: &mut BoardRequest,
        locals: &mut Locals,
    ) -> StageResult {
        let failures = self.rules.check(&mut request.fields);
        if failures.is_empty() {
            return Ok(Flow::Continue);
        }

        let message = join_messages(&failures);
        debug!(%message, "submission rejected");

        locals.skip = true;
        locals.flash.push(FlashMessage::error(message));
        locals.redirect = Some(Routes::DISCUSSIONS_NEW.to_string());
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "validate"
    }
}
