//! Civic issue reporting and status management
//!
//! Submission accepts either a JSON body or `multipart/form-data` with an
//! optional `image` file. In multipart bodies `location` is a JSON string.

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, post, put},
    Extension, Json, Router,
};
use tracing::warn;

use ppc_core::constants::DEFAULT_ISSUE_PAGE_SIZE;
use ppc_core::error::{codes, DomainError};
use ppc_core::registry::IssueRegistry;
use ppc_core::types::{IssueFilter, IssueId, Location, NewIssue, PageRequest, StatusUpdate};

use crate::dto::{parse_number, ApiResponse, CommentRequest, IssueData, IssueList, IssueQuery, StatusRequest};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::{admin_only, protected};

pub fn router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/issues/:id/status", put(update_status))
        .route("/issues/:id/comments", post(add_comment));

    Router::new()
        .route("/issues", get(list_issues))
        .merge(protected(state, Router::new().route("/issues", post(submit_issue))))
        .route("/issues/:id", get(get_issue))
        .merge(admin_only(state, admin))
}

/// Image part of a multipart submission
struct ImageUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn multipart_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(codes::VALIDATION_ERROR, format!("Invalid form data: {}", e))
}

async fn read_issue_form(mut multipart: Multipart) -> ApiResult<(NewIssue, Option<ImageUpload>)> {
    let mut input = NewIssue::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "title" | "description" | "category" | "location" => {
                let value = field.text().await.map_err(multipart_error)?;
                match name.as_str() {
                    "title" => input.title = Some(value),
                    "description" => input.description = Some(value),
                    "category" => input.category = Some(value),
                    _ => {
                        let location: Location = serde_json::from_str(&value).map_err(|_| {
                            ApiError::bad_request(codes::INVALID_LOCATION, "Invalid location format")
                        })?;
                        input.location = Some(location);
                    }
                }
            }
            _ => {}
        }
    }

    Ok((input, image))
}

pub async fn submit_issue(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    request: Request,
) -> ApiResult<(StatusCode, Json<ApiResponse<IssueData>>)> {
    let (input, image) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(multipart_error)?;
        read_issue_form(multipart).await?
    } else {
        let ApiJson(input) = ApiJson::<NewIssue>::from_request(request, &state).await?;
        (input, None)
    };

    let image_url = match &image {
        Some(upload) => Some(
            state
                .uploads
                .save_issue_image(
                    upload.file_name.as_deref(),
                    upload.content_type.as_deref(),
                    &upload.bytes,
                )
                .await?,
        ),
        None => None,
    };

    let result = state
        .issues
        .submit_issue(&claims.actor(), input, image_url.clone())
        .await;

    match result {
        Ok(issue) => Ok(ApiResponse::created(IssueData { issue })),
        Err(e) => {
            if let Some(url) = image_url {
                warn!(url = %url, "Issue rejected, discarding uploaded image");
                state.uploads.discard(&url).await;
            }
            Err(e.into())
        }
    }
}

pub async fn list_issues(
    State(state): State<AppState>,
    Query(query): Query<IssueQuery>,
) -> ApiResult<Json<ApiResponse<IssueList>>> {
    let filter = IssueFilter::from_query(
        query.status.as_deref(),
        query.category.as_deref(),
        query.search.as_deref(),
    )?;
    let page = PageRequest::new(
        parse_number(query.page.as_deref()),
        parse_number(query.limit.as_deref()),
        DEFAULT_ISSUE_PAGE_SIZE,
    );

    let page = state.issues.list_issues(filter, page).await?;
    Ok(ApiResponse::ok(IssueList {
        issues: page.items,
        pagination: page.pagination,
    }))
}

pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IssueData>>> {
    let issue = state
        .issues
        .get_issue(&IssueId::new(id))
        .await?
        .ok_or(DomainError::NotFound("Issue"))?;

    Ok(ApiResponse::ok(IssueData { issue }))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> ApiResult<Json<ApiResponse<IssueData>>> {
    let update = StatusUpdate::new(req.status.as_deref(), req.comment.as_deref())?;
    let issue = state
        .issues
        .update_status(&claims.actor(), &IssueId::new(id), update)
        .await?;

    Ok(ApiResponse::ok(IssueData { issue }))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> ApiResult<Json<ApiResponse<IssueData>>> {
    let issue = state
        .issues
        .add_comment(
            &claims.actor(),
            &IssueId::new(id),
            req.comment.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::ok(IssueData { issue }))
}
