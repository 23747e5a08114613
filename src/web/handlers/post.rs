//! Post and like handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::post::{PagedPosts, PostDraft, PostService, PostView};
use crate::web::dto::{
    ApiResponse, LikeStatus, PageQuery, PostRequest, TransferRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::auth::AppState;

/// GET /api/v1/posts - All posts.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<PostView>>>, ApiError> {
    let posts = PostService::new(&state.db).list_all().await?;
    Ok(Json(ApiResponse::new(posts)))
}

/// GET /api/v1/posts/paged - One page of posts.
pub async fn list_paged_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PagedPosts>>, ApiError> {
    let size = query
        .size
        .unwrap_or(state.default_page_size)
        .min(state.max_page_size);
    let page = PostService::new(&state.db)
        .list_paged(query.page, size, &query.order)
        .await?;
    Ok(Json(ApiResponse::new(page)))
}

/// GET /api/v1/posts/me - Posts owned by the caller, newest first.
pub async fn list_my_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<PostView>>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let posts = PostService::new(&state.db).list_by_account(&account).await?;
    Ok(Json(ApiResponse::new(posts)))
}

/// POST /api/v1/posts - Create a post.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<PostRequest>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let post = PostService::new(&state.db)
        .create(&account, &PostDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::new(post)))
}

/// GET /api/v1/posts/{id} - Get a post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let post = PostService::new(&state.db).get_by_id(post_id).await?;
    Ok(Json(ApiResponse::new(post)))
}

/// PUT /api/v1/posts/{id} - Update a post (owner only).
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<PostRequest>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let post = PostService::new(&state.db)
        .update(&account, post_id, &PostDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::new(post)))
}

/// DELETE /api/v1/posts/{id} - Delete a post (owner only).
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let account = state.current_account(&claims).await?;
    PostService::new(&state.db).delete(&account, post_id).await?;
    Ok(Json(ApiResponse::new(())))
}

/// PUT /api/v1/posts/{id}/owner - Hand a post to another account (owner only).
pub async fn transfer_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<i64>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let account = state.current_account(&claims).await?;
    let post = PostService::new(&state.db)
        .transfer(&account, post_id, req.account_id)
        .await?;
    Ok(Json(ApiResponse::new(post)))
}

/// POST /api/v1/posts/{id}/likes - Like a post.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<LikeStatus>>, ApiError> {
    let account = state.current_account(&claims).await?;
    PostService::new(&state.db).like(&account, post_id).await?;
    Ok(Json(ApiResponse::new(LikeStatus {
        post_id,
        account_id: account.id,
        liked: true,
    })))
}

/// GET /api/v1/posts/{id}/likes/{account_id} - Check the caller's like.
pub async fn check_like(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((post_id, account_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<LikeStatus>>, ApiError> {
    let account = state.current_account(&claims).await?;
    PostService::new(&state.db)
        .check_like(&account, post_id, account_id)
        .await?;
    Ok(Json(ApiResponse::new(LikeStatus {
        post_id,
        account_id,
        liked: true,
    })))
}

/// DELETE /api/v1/posts/{id}/likes/{account_id} - Remove the caller's like.
pub async fn unlike_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((post_id, account_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<LikeStatus>>, ApiError> {
    let account = state.current_account(&claims).await?;
    PostService::new(&state.db)
        .unlike(&account, post_id, account_id)
        .await?;
    Ok(Json(ApiResponse::new(LikeStatus {
        post_id,
        account_id,
        liked: false,
    })))
}
