//! Comment handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::post::{CommentDraft, CommentService, CommentView};
use crate::web::dto::{ApiResponse, CommentRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::auth::AppState;

/// GET /api/v1/posts/{id}/comments - Comments on a post, oldest first.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    let comments = CommentService::new(&state.db).list(post_id).await?;
    Ok(Json(ApiResponse::new(comments)))
}

/// POST /api/v1/posts/{id}/comments - Comment on a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let comment = CommentService::new(&state.db)
        .create(&account, post_id, &CommentDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::new(comment)))
}

/// PUT /api/v1/comments/{id} - Edit a comment (writer only).
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(comment_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let comment = CommentService::new(&state.db)
        .update(&account, comment_id, &CommentDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::new(comment)))
}

/// DELETE /api/v1/comments/{id} - Delete a comment (writer only).
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let account = state.current_account(&claims).await?;
    CommentService::new(&state.db)
        .delete(&account, comment_id)
        .await?;
    Ok(Json(ApiResponse::new(())))
}
