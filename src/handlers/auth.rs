use super::common::success_response;
use super::ApiJson;
use crate::{
    dto::{LoginRequest, LoginResponse},
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::post,
    Router,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchange a username and password for a signed token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid credentials or inactive user", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.services.auth.login(payload).await?;
    Ok(success_response(response))
}
