use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::{NewUser, SessionUser};
use crate::errors::AppError;
use crate::AuthSvc;

use super::blocking;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<SessionUser> for SessionResponse {
    fn from(session: SessionUser) -> Self {
        SessionResponse {
            id: session.id,
            email: session.email,
            first_name: session.first_name,
            last_name: session.last_name,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and session recorded", body = SessionResponse),
        (status = 400, description = "Password too short or email empty"),
        (status = 409, description = "An account with this email already exists"),
    ),
    tag = "auth"
)]
pub async fn register(
    auth: web::Data<AuthSvc>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = NewUser {
        email: body.email,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
    };
    let svc = auth.into_inner();
    let session = blocking(move || svc.register(input)).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// POST /auth/login
///
/// Unknown email and wrong password get the same answer.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session recorded", body = SessionResponse),
        (status = 401, description = "Incorrect credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    auth: web::Data<AuthSvc>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let svc = auth.into_inner();
    let session = blocking(move || svc.login(&body.email, &body.password)).await?;
    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}

/// POST /auth/logout
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tag = "auth"
)]
pub async fn logout(auth: web::Data<AuthSvc>) -> Result<HttpResponse, AppError> {
    let svc = auth.into_inner();
    blocking(move || svc.logout()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Nobody is logged in"),
    ),
    tag = "auth"
)]
pub async fn me(auth: web::Data<AuthSvc>) -> Result<HttpResponse, AppError> {
    let svc = auth.into_inner();
    let session = blocking(move || svc.current_user()).await?;
    match session {
        Some(session) => Ok(HttpResponse::Ok().json(SessionResponse::from(session))),
        None => Err(AppError::Unauthorized {
            redirect: Some("/auth/login"),
        }),
    }
}
