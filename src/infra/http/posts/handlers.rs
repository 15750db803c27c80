use axum::{
    extract::{Extension, Form, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use time::format_description::well_known::Rfc3339;

use crate::application::error::HttpError;
use crate::application::posts::{FieldErrors, PostInput, PostListing, PostServiceError};
use crate::application::repos::RepoError;
use crate::domain::entities::PostWithAuthor;
use crate::domain::viewer::Viewer;
use crate::presentation::views::{
    FieldErrorView, FlashView, PaginationView, PostCardView, PostDetailContext, PostDetailTemplate,
    PostFormContext, PostFormTemplate, PostListContext, PostListTemplate, excerpt_of,
    format_human_date, listing_href, render_not_found_response, render_template_response,
};

use crate::infra::http::HttpState;
use crate::infra::http::flash::{FlashMessage, push_message, take_messages};

use super::forms::{PostForm, PostListQuery};

pub(crate) async fn list(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<PostListQuery>,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = take_messages(jar);

    match state
        .posts
        .list(&viewer, query.q.as_deref(), query.page.as_deref())
        .await
    {
        Ok(listing) => {
            let view = build_list_context(&listing, flash_views(flash));
            (
                jar,
                render_template_response(PostListTemplate { view }, StatusCode::OK),
            )
                .into_response()
        }
        Err(err) => service_error_response("infra::http::posts::list", err),
    }
}

pub(crate) async fn detail(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = take_messages(jar);

    match state.posts.get_visible(&slug, &viewer).await {
        Ok(found) => {
            let view = build_detail_context(&found, viewer.is_privileged(), flash_views(flash));
            (
                jar,
                render_template_response(PostDetailTemplate { view }, StatusCode::OK),
            )
                .into_response()
        }
        Err(err) => service_error_response("infra::http::posts::detail", err),
    }
}

pub(crate) async fn new_form(
    Extension(viewer): Extension<Viewer>,
    jar: CookieJar,
) -> Response {
    if !viewer.is_privileged() {
        return render_not_found_response("infra::http::posts::new_form");
    }

    let (jar, flash) = take_messages(jar);
    let view = form_context(
        FormMode::Create,
        &blank_input(),
        &FieldErrors::default(),
        flash_views(flash),
    );
    (
        jar,
        render_template_response(PostFormTemplate { view }, StatusCode::OK),
    )
        .into_response()
}

pub(crate) async fn create(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Response {
    if !viewer.is_privileged() {
        return render_not_found_response("infra::http::posts::create");
    }

    let (input, errors) = form.parse();
    if !errors.is_empty() {
        return invalid_form_response(FormMode::Create, &input, &errors);
    }

    match state.posts.create(&viewer, input.clone()).await {
        Ok(post) => {
            let jar = push_message(
                jar,
                FlashMessage::success(format!("Post \"{}\" created.", post.title)),
            );
            (jar, permanent_redirect(&format!("/posts/{}", post.slug))).into_response()
        }
        Err(PostServiceError::Validation(errors)) => {
            invalid_form_response(FormMode::Create, &input, &errors)
        }
        Err(PostServiceError::Conflict { .. }) => {
            let mut errors = FieldErrors::default();
            errors.push("title", "A post with a very similar title already exists.");
            invalid_form_response(FormMode::Create, &input, &errors)
        }
        Err(err) => service_error_response("infra::http::posts::create", err),
    }
}

pub(crate) async fn edit_form(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    if !viewer.is_privileged() {
        return render_not_found_response("infra::http::posts::edit_form");
    }

    let (jar, flash) = take_messages(jar);

    match state.posts.get_visible(&slug, &viewer).await {
        Ok(found) => {
            let input = PostInput {
                title: found.post.title.clone(),
                content: found.post.content.clone(),
                image: found.post.image.clone(),
                draft: found.post.draft,
                publish: Some(found.post.publish),
            };
            let view = form_context(
                FormMode::Edit(slug),
                &input,
                &FieldErrors::default(),
                flash_views(flash),
            );
            (
                jar,
                render_template_response(PostFormTemplate { view }, StatusCode::OK),
            )
                .into_response()
        }
        Err(err) => service_error_response("infra::http::posts::edit_form", err),
    }
}

pub(crate) async fn update(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Response {
    if !viewer.is_privileged() {
        return render_not_found_response("infra::http::posts::update");
    }

    let (input, errors) = form.parse();
    if !errors.is_empty() {
        return invalid_form_response(FormMode::Edit(slug), &input, &errors);
    }

    match state.posts.update(&viewer, &slug, input.clone()).await {
        Ok(post) => {
            let jar = push_message(
                jar,
                FlashMessage::success(format!("Post \"{}\" updated.", post.title)),
            );
            (jar, permanent_redirect(&format!("/posts/{}", post.slug))).into_response()
        }
        Err(PostServiceError::Validation(errors)) => {
            invalid_form_response(FormMode::Edit(slug), &input, &errors)
        }
        Err(err) => service_error_response("infra::http::posts::update", err),
    }
}

pub(crate) async fn delete(
    State(state): State<HttpState>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    match state.posts.delete(&viewer, &slug).await {
        Ok(post) => {
            let jar = push_message(
                jar,
                FlashMessage::success(format!("Post \"{}\" deleted.", post.title)),
            );
            (jar, Redirect::to("/")).into_response()
        }
        Err(err) => service_error_response("infra::http::posts::delete", err),
    }
}

enum FormMode {
    Create,
    Edit(String),
}

fn blank_input() -> PostInput {
    PostInput {
        title: String::new(),
        content: String::new(),
        image: None,
        draft: true,
        publish: None,
    }
}

fn flash_views(messages: Vec<FlashMessage>) -> Vec<FlashView> {
    messages
        .into_iter()
        .map(|message| FlashView {
            kind: message.kind.as_str(),
            text: message.text,
        })
        .collect()
}

fn build_list_context(listing: &PostListing, flash: Vec<FlashView>) -> PostListContext {
    let posts = listing
        .page
        .items
        .iter()
        .map(|entry| PostCardView {
            title: entry.post.title.clone(),
            slug: entry.post.slug.clone(),
            author: entry.author.display_name(),
            published_label: format_human_date(entry.post.publish),
            is_draft: entry.post.draft,
            excerpt: excerpt_of(&entry.post.content),
        })
        .collect();

    let query = listing.search.as_deref();
    let pagination = PaginationView {
        number: listing.page.number,
        total_pages: listing.page.total_pages,
        previous_href: listing
            .page
            .has_previous()
            .then(|| listing_href(listing.page.number - 1, query)),
        next_href: listing
            .page
            .has_next()
            .then(|| listing_href(listing.page.number + 1, query)),
    };

    PostListContext {
        posts,
        pagination,
        query: listing.search.clone(),
        can_edit: listing.privileged,
        flash,
    }
}

fn build_detail_context(
    found: &PostWithAuthor,
    can_edit: bool,
    flash: Vec<FlashView>,
) -> PostDetailContext {
    PostDetailContext {
        title: found.post.title.clone(),
        slug: found.post.slug.clone(),
        content: found.post.content.clone(),
        image: found.post.image.clone(),
        author: found.author.display_name(),
        published_label: format_human_date(found.post.publish),
        is_draft: found.post.draft,
        can_edit,
        flash,
    }
}

fn form_context(
    mode: FormMode,
    input: &PostInput,
    errors: &FieldErrors,
    flash: Vec<FlashView>,
) -> PostFormContext {
    let (heading, action, delete_action) = match &mode {
        FormMode::Create => ("New post".to_string(), "/posts/new".to_string(), None),
        FormMode::Edit(slug) => (
            "Edit post".to_string(),
            format!("/posts/{slug}/edit"),
            Some(format!("/posts/{slug}/delete")),
        ),
    };

    PostFormContext {
        heading,
        action,
        delete_action,
        title: input.title.clone(),
        content: input.content.clone(),
        image: input.image.clone().unwrap_or_default(),
        draft: input.draft,
        publish: input
            .publish
            .map(|when| when.format(&Rfc3339).expect("RFC 3339 timestamp"))
            .unwrap_or_default(),
        errors: errors
            .iter()
            .map(|error| FieldErrorView {
                field: error.field,
                message: error.message,
            })
            .collect(),
        flash,
    }
}

fn invalid_form_response(mode: FormMode, input: &PostInput, errors: &FieldErrors) -> Response {
    let notice = match &mode {
        FormMode::Create => "Post was not created.",
        FormMode::Edit(_) => "Post was not updated.",
    };
    let flash = vec![FlashView {
        kind: "error",
        text: notice.to_string(),
    }];

    let view = form_context(mode, input, errors, flash);
    render_template_response(PostFormTemplate { view }, StatusCode::UNPROCESSABLE_ENTITY)
}

fn service_error_response(source: &'static str, err: PostServiceError) -> Response {
    match err {
        PostServiceError::NotFound => render_not_found_response(source),
        PostServiceError::Validation(_) => HttpError::new(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request could not be processed",
            "validation failed outside a form flow",
        )
        .into_response(),
        PostServiceError::Conflict { constraint } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Duplicate record",
            constraint,
        )
        .into_response(),
        PostServiceError::Repo(RepoError::Timeout) => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable",
            "database timeout",
        )
        .into_response(),
        PostServiceError::Repo(err) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            err.to_string(),
        )
        .into_response(),
    }
}

/// 301, matching the original permanent-redirect-on-success contract.
/// Browsers convert the follow-up request to GET.
fn permanent_redirect(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
