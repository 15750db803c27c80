use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::application::error::{ErrorReport, HttpError};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

const EXCERPT_CHARS: usize = 240;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// The shared 404 page. Used for genuinely missing resources, hidden drafts
/// and unauthorized mutations alike; the body never distinguishes them.
pub fn render_not_found_response(source: &'static str) -> Response {
    let view = ErrorPageView {
        heading: "Not found",
        message: "There is no such page here.",
    };
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(source, StatusCode::NOT_FOUND, "Resource not found")
        .attach(&mut response);
    response
}

/// A consumed flash message, ready for the template.
#[derive(Debug, Clone)]
pub struct FlashView {
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct PostCardView {
    pub title: String,
    pub slug: String,
    pub author: String,
    pub published_label: String,
    pub is_draft: bool,
    pub excerpt: String,
}

#[derive(Debug, Clone)]
pub struct PaginationView {
    pub number: u64,
    pub total_pages: u64,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostListContext {
    pub posts: Vec<PostCardView>,
    pub pagination: PaginationView,
    pub query: Option<String>,
    pub can_edit: bool,
    pub flash: Vec<FlashView>,
}

#[derive(Template)]
#[template(path = "post_list.html")]
pub struct PostListTemplate {
    pub view: PostListContext,
}

#[derive(Debug, Clone)]
pub struct PostDetailContext {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub image: Option<String>,
    pub author: String,
    pub published_label: String,
    pub is_draft: bool,
    pub can_edit: bool,
    pub flash: Vec<FlashView>,
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailTemplate {
    pub view: PostDetailContext,
}

#[derive(Debug, Clone)]
pub struct FieldErrorView {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub struct PostFormContext {
    pub heading: String,
    pub action: String,
    pub delete_action: Option<String>,
    pub title: String,
    pub content: String,
    pub image: String,
    pub draft: bool,
    pub publish: String,
    pub errors: Vec<FieldErrorView>,
    pub flash: Vec<FlashView>,
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub view: PostFormContext,
}

#[derive(Debug, Clone)]
pub struct ErrorPageView {
    pub heading: &'static str,
    pub message: &'static str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}

pub fn format_human_date(when: OffsetDateTime) -> String {
    when.date()
        .format(HUMAN_DATE_FORMAT)
        .expect("valid calendar date")
}

/// Listing URL for a page number, preserving the active search query.
pub fn listing_href(page: u64, query: Option<&str>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(q) = query {
        serializer.append_pair("q", q);
    }
    serializer.append_pair("page", &page.to_string());
    format!("/?{}", serializer.finish())
}

/// Leading slice of the content for the listing card.
pub fn excerpt_of(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }

    let cut: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}
