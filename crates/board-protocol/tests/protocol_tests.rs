//! Protocol layer tests — form fields, references, errors, routes.

#[cfg(test)]
mod tests {
    use board_protocol::*;
    use chrono::Utc;
    use serde_json::json;

    // ─────────────────────────────────────────────────────────────────────
    // FormFields
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn form_fields_get_returns_first_value() {
        let fields: FormFields = [("tags", "a"), ("tags", "b"), ("title", "T")]
            .into_iter()
            .collect();
        assert_eq!(fields.get("tags"), Some("a"));
        assert_eq!(fields.get_all("tags"), vec!["a", "b"]);
        assert_eq!(fields.get("title"), Some("T"));
        assert_eq!(fields.get("missing"), None);
    }

    #[test]
    fn form_fields_set_replaces_all_values() {
        let mut fields: FormFields = [("email", " A@B.COM "), ("email", "x")]
            .into_iter()
            .collect();
        fields.set("email", "a@b.com");
        assert_eq!(fields.get_all("email"), vec!["a@b.com"]);
    }

    #[test]
    fn form_fields_has_distinguishes_empty_from_missing() {
        let fields: FormFields = [("password", "")].into_iter().collect();
        assert!(fields.has("password"));
        assert!(!fields.has("email"));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reference
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn bare_reference_deserializes_as_id() {
        let r: Reference<User> = serde_json::from_value(json!("user-1")).unwrap();
        assert_eq!(r, Reference::Id("user-1".into()));
        assert_eq!(r.id(), "user-1");
        assert!(!r.is_populated());
    }

    #[test]
    fn populated_reference_exposes_entity() {
        let user = User {
            id: "user-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: Utc::now(),
        };
        let r = Reference::Populated(user.clone());
        assert_eq!(r.id(), "user-1");
        assert_eq!(r.populated(), Some(&user));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["name"], "Ada");
    }

    #[test]
    fn discussion_author_name_requires_population() {
        let now = Utc::now();
        let mut discussion = Discussion {
            id: "d1".into(),
            title: "T".into(),
            description: "D".into(),
            author: Some(Reference::Id("user-1".into())),
            category: None,
            tags: vec![],
            views: 0,
            comments: vec![],
            created_at: now,
            updated_at: now,
        };
        assert_eq!(discussion.author_name(), None);
        assert_eq!(discussion.author_id(), Some("user-1"));

        discussion.author = Some(Reference::Populated(User {
            id: "user-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: now,
        }));
        assert_eq!(discussion.author_name(), Some("Ada"));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn error_codes_map_to_statuses() {
        assert_eq!(BoardError::not_found("x").status(), 404);
        assert_eq!(BoardError::invalid_params("x").status(), 400);
        assert_eq!(BoardError::storage("x").status(), 500);
        assert_eq!(BoardError::internal("x").status(), 500);
    }

    #[test]
    fn error_display_includes_status_and_message() {
        let err = BoardError::not_found("Discussion not found: abc");
        assert_eq!(err.to_string(), "Board Error [404]: Discussion not found: abc");
        assert!(err.is_not_found());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Routes and templates
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn route_builders() {
        assert_eq!(Routes::discussion("abc"), "/discussions/abc");
        assert_eq!(Routes::discussion_edit("abc"), "/discussions/abc/edit");
        assert_eq!(Routes::discussion_update("abc"), "/discussions/abc/update");
        assert_eq!(Routes::discussion_delete("abc"), "/discussions/abc/delete");
    }

    #[test]
    fn templates_carry_page_and_title() {
        assert_eq!(Template::New.name(), "discussions/new");
        assert_eq!(Template::Index.page(), "discussions");
        assert_eq!(Template::Show.title(), "Discussion Details");
        assert_eq!(Template::Edit.page(), "edit-discussion");
    }

    #[test]
    fn flash_severity_serializes_lowercase() {
        let flash = FlashMessage::error("Title cannot be empty");
        let json = serde_json::to_value(&flash).unwrap();
        assert_eq!(json, json!({ "severity": "error", "message": "Title cannot be empty" }));
    }
}
