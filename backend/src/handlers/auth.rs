use axum::{
    extract::{Extension, State},
    http::header::SET_COOKIE,
    response::AppendHeaders,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::time::Duration;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse, UserRole},
    repositories::user as user_repo,
    utils::{
        cookies::{
            build_auth_cookie, build_clear_cookie, CookieOptions, TOKEN_COOKIE_NAME,
            TOKEN_COOKIE_PATH,
        },
        jwt::create_session_token,
        password::{hash_password, verify_password},
    },
};

type SetCookie = AppendHeaders<[(axum::http::HeaderName, String); 1]>;

pub async fn register(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let existing = user_repo::find_user_by_email(&pool, &payload.email)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        payload.name,
        payload.email,
        password_hash,
        payload.phone,
        UserRole::User,
    );

    user_repo::insert_user(&pool, &user)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?;

    Ok(Json(json!({
        "message": "Registration successful",
        "user": UserResponse::from(user),
    })))
}

pub async fn login(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<LoginRequest>,
) -> Result<(SetCookie, Json<LoginResponse>), AppError> {
    let missing_credentials =
        || AppError::BadRequest("Email and password are required".to_string());
    let email = payload
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(missing_credentials)?;
    let password = payload
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(missing_credentials)?;

    // Unknown user and wrong password collapse into one response so the API
    // never leaks which accounts exist.
    let user = user_repo::find_user_by_email(&pool, &email)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let matches = verify_password(&password, &user.password_hash)?;
    if !matches {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = create_session_token(
        user.id.clone(),
        user.email.clone(),
        user.role.as_str().to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )?;

    let cookie = build_auth_cookie(
        TOKEN_COOKIE_NAME,
        &token,
        Duration::from_secs(config.jwt_expiration_hours * 3600),
        TOKEN_COOKIE_PATH,
        CookieOptions {
            secure: config.cookie_secure,
            same_site: config.cookie_same_site,
        },
    );

    let response = LoginResponse {
        message: "Login successful".to_string(),
        user: UserResponse::from(user),
    };

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

/// Logout is purely client-side: the token is not revocable before expiry,
/// so the server only asks the client to discard the cookie.
pub async fn logout(
    State((_pool, config)): State<(PgPool, Config)>,
) -> (SetCookie, Json<Value>) {
    let cookie = build_clear_cookie(
        TOKEN_COOKIE_NAME,
        TOKEN_COOKIE_PATH,
        CookieOptions {
            secure: config.cookie_secure,
            same_site: config.cookie_same_site,
        },
    );
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({"message": "Logged out"})),
    )
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
