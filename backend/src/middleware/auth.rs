use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::user::User,
    repositories::user as user_repo,
    utils::{
        cookies::{extract_cookie_value, TOKEN_COOKIE_NAME},
        jwt::{verify_session_token, Claims},
    },
};

/// Verifies the session token before the handler runs and makes the claims
/// and the resolved user available as request extensions.
pub async fn auth(
    State((pool, config)): State<(PgPool, Config)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (auth_header, cookie_header) = extract_auth_headers(request.headers());
    let (claims, user) = authenticate_request(
        auth_header.as_deref(),
        cookie_header.as_deref(),
        &pool,
        &config,
    )
    .await?;
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

async fn authenticate_request(
    auth_header: Option<&str>,
    cookie_header: Option<&str>,
    pool: &PgPool,
    config: &Config,
) -> Result<(Claims, User), AppError> {
    let token = auth_header
        .and_then(parse_bearer_token)
        .map(|value| value.to_string())
        .or_else(|| cookie_header.and_then(|raw| extract_cookie_value(raw, TOKEN_COOKIE_NAME)))
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = verify_session_token(&token, &config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = user_repo::find_user_by_id(pool, &claims.sub)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok((claims, user))
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

fn extract_auth_headers(headers: &axum::http::HeaderMap) -> (Option<String>, Option<String>) {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned());
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned());
    (auth_header, cookie_header)
}
