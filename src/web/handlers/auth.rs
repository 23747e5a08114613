//! Authentication handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::auth::{AuthService, Signup};
use crate::config::WebConfig;
use crate::db::Account;
use crate::web::dto::{
    AccountInfo, ApiResponse, AvailabilityResponse, EmailQuery, LoginRequest, LogoutRequest,
    NicknameQuery, RefreshRequest, SignupRequest, TokenResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims, JwtState};
use crate::{Database, SooonError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool handle.
    pub db: Database,
    /// JWT signing and verification keys.
    pub jwt: Arc<JwtState>,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
    /// Page size when a paged listing omits `size`.
    pub default_page_size: u32,
    /// Largest accepted page size.
    pub max_page_size: u32,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, jwt: Arc<JwtState>, config: &WebConfig) -> Self {
        Self {
            db,
            jwt,
            access_token_expiry: config.jwt_access_token_expiry_secs,
            refresh_token_expiry: config.jwt_refresh_token_expiry_days,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Generate an access token for an account.
    pub fn generate_access_token(&self, account: &Account) -> Result<String, ApiError> {
        self.jwt.issue(&JwtClaims::new(
            account.id,
            &account.email,
            self.access_token_expiry,
        ))
    }

    /// Generate a refresh token.
    pub fn generate_refresh_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Resolve the account behind verified claims.
    ///
    /// A token for a deleted account is treated as unauthenticated.
    pub async fn current_account(&self, claims: &JwtClaims) -> Result<Account, ApiError> {
        match AuthService::new(&self.db).account(claims.sub).await {
            Ok(account) => Ok(account),
            Err(SooonError::NotFound(_)) => Err(ApiError::unauthorized("Account not found")),
            Err(e) => Err(e.into()),
        }
    }

    async fn issue_tokens(&self, account: &Account) -> Result<TokenResponse, ApiError> {
        let access_token = self.generate_access_token(account)?;
        let refresh_token = self.generate_refresh_token();
        AuthService::new(&self.db)
            .start_session(account, &refresh_token, self.refresh_token_expiry)
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
            account: AccountInfo::from(account),
        })
    }
}

/// POST /api/v1/auth/signup - Register and log in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let account = AuthService::new(&state.db)
        .signup(&Signup::from(req))
        .await?;
    let response = state.issue_tokens(&account).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/v1/auth/login - Log in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let account = AuthService::new(&state.db)
        .login(&req.email, &req.password)
        .await?;
    let response = state.issue_tokens(&account).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/v1/auth/logout - Revoke a refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    AuthService::new(&state.db)
        .end_session(&req.refresh_token)
        .await?;
    Ok(Json(ApiResponse::new(())))
}

/// POST /api/v1/auth/refresh - Exchange a refresh token for new tokens.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let new_refresh_token = state.generate_refresh_token();
    let account = AuthService::new(&state.db)
        .rotate_session(
            &req.refresh_token,
            &new_refresh_token,
            state.refresh_token_expiry,
        )
        .await?;

    let response = TokenResponse {
        access_token: state.generate_access_token(&account)?,
        refresh_token: new_refresh_token,
        expires_in: state.access_token_expiry,
        account: AccountInfo::from(&account),
    };
    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/v1/auth/me - Current account.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<AccountInfo>>, ApiError> {
    let account = state.current_account(&claims).await?;
    Ok(Json(ApiResponse::new(AccountInfo::from(&account))))
}

/// GET /api/v1/auth/check-email - Whether an email is still free.
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let available = AuthService::new(&state.db)
        .email_available(&query.email)
        .await?;
    Ok(Json(ApiResponse::new(AvailabilityResponse { available })))
}

/// GET /api/v1/auth/check-nickname - Whether a nickname is still free.
pub async fn check_nickname(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NicknameQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let available = AuthService::new(&state.db)
        .nickname_available(&query.nickname)
        .await?;
    Ok(Json(ApiResponse::new(AvailabilityResponse { available })))
}
