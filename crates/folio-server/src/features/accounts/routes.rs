//! Account API routes
//!
//! - `POST /register` - Create a user account
//! - `POST /login` - Issue a bearer token
//! - `GET /auth` - Report session state (optional token)
//! - `GET /signout` - Revoke the presented token

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::AuthUser;
use crate::features::FeatureState;

use super::commands::{
    login, register, signout, LoginCommand, LoginError, RegisterCommand, RegisterError,
    SignoutError,
};
use super::queries::{session, SessionError};

/// Routes that never require a token
pub fn public_routes() -> Router<FeatureState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

/// `GET /auth`, mounted behind `optional_auth`
pub fn session_probe_routes() -> Router<FeatureState> {
    Router::new().route("/auth", get(check_session))
}

/// Routes mounted behind `require_auth`
pub fn session_routes() -> Router<FeatureState> {
    Router::new().route("/signout", get(signout_user))
}

#[tracing::instrument(skip(state, command), fields(email = %command.email))]
async fn register_user(
    State(state): State<FeatureState>,
    Json(command): Json<RegisterCommand>,
) -> Result<Response, AccountApiError> {
    let response = register::handle(state.db, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(email = %command.email))]
async fn login_user(
    State(state): State<FeatureState>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AccountApiError> {
    let response = login::handle(state.db, &state.auth, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, user))]
async fn check_session(
    State(state): State<FeatureState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Response, AccountApiError> {
    let user_id = user.map(|Extension(u)| u.id);
    let response = session::handle(state.db, user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
async fn signout_user(
    State(state): State<FeatureState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, AccountApiError> {
    let response = signout::handle(state.db, &user.claims).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for account endpoints
#[derive(Debug)]
enum AccountApiError {
    Register(RegisterError),
    Login(LoginError),
    Session(SessionError),
    Signout(SignoutError),
}

impl From<RegisterError> for AccountApiError {
    fn from(err: RegisterError) -> Self {
        Self::Register(err)
    }
}

impl From<LoginError> for AccountApiError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl From<SessionError> for AccountApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<SignoutError> for AccountApiError {
    fn from(err: SignoutError) -> Self {
        Self::Signout(err)
    }
}

impl IntoResponse for AccountApiError {
    fn into_response(self) -> Response {
        match self {
            AccountApiError::Register(
                err @ (RegisterError::NameValidation(_)
                | RegisterError::EmailValidation(_)
                | RegisterError::PasswordValidation(_)),
            ) => bad_request(err.to_string()),
            AccountApiError::Register(err @ RegisterError::DuplicateEmail(_)) => {
                bad_request(err.to_string())
            }
            AccountApiError::Register(RegisterError::Hashing) => {
                tracing::error!("Password hashing failed during registration");
                server_error()
            }
            AccountApiError::Register(RegisterError::Database(err)) => {
                tracing::error!(error = %err, "Database error during registration");
                server_error()
            }

            AccountApiError::Login(
                err @ (LoginError::EmailValidation(_) | LoginError::PasswordRequired),
            ) => bad_request(err.to_string()),
            AccountApiError::Login(err @ LoginError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response(),
            AccountApiError::Login(LoginError::TokenSigning) => {
                tracing::error!("Token signing failed during login");
                server_error()
            }
            AccountApiError::Login(LoginError::Database(err)) => {
                tracing::error!(error = %err, "Database error during login");
                server_error()
            }

            AccountApiError::Session(SessionError::Database(err)) => {
                tracing::error!(error = %err, "Database error during session probe");
                server_error()
            }

            AccountApiError::Signout(SignoutError::Database(err)) => {
                tracing::error!(error = %err, "Database error during signout");
                server_error()
            }
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Server error")),
    )
        .into_response()
}
