use board_protocol::{DiscussionParams, FormFields};

/// Project submitted fields onto a discussion record.
///
/// Values are copied as submitted. A field that was not submitted stays
/// `None`; `tags` collects every submitted `tags` value in order.
pub fn normalize(fields: &FormFields, user: Option<&str>) -> DiscussionParams {
    let tags = fields.get_all("tags");

    DiscussionParams {
        title: fields.get("title").map(str::to_string),
        description: fields.get("description").map(str::to_string),
        author: user.map(str::to_string),
        category: fields.get("category").map(str::to_string),
        tags: (!tags.is_empty()).then(|| tags.into_iter().map(str::to_string).collect()),
    }
}
