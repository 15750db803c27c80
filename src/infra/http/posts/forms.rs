use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::posts::{FieldErrors, PostInput};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PostListQuery {
    pub(crate) q: Option<String>,
    pub(crate) page: Option<String>,
}

/// Raw authoring form. `draft` arrives as a checkbox value when ticked and is
/// absent otherwise; `publish` as an optional RFC 3339 timestamp.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PostForm {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) draft: Option<String>,
    pub(crate) publish: Option<String>,
}

impl PostForm {
    /// Parse into service input. A malformed timestamp becomes a field error;
    /// blank-field validation happens in the service.
    pub(crate) fn parse(self) -> (PostInput, FieldErrors) {
        let mut errors = FieldErrors::default();

        let publish = match self
            .publish
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        {
            None => None,
            Some(raw) => match OffsetDateTime::parse(raw, &Rfc3339) {
                Ok(when) => Some(when),
                Err(_) => {
                    errors.push("publish", "Enter a valid RFC 3339 timestamp.");
                    None
                }
            },
        };

        let input = PostInput {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            image: self
                .image
                .map(|image| image.trim().to_string())
                .filter(|image| !image.is_empty()),
            draft: matches!(self.draft.as_deref(), Some("on" | "true" | "1")),
            publish,
        };

        (input, errors)
    }
}
