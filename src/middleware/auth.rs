use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use crate::app::AppState;
use crate::errors::AppError;
use crate::services::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity proven by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Checks the `Authorization` header and resolves it to an [`AuthUser`].
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AppError::AuthFormat)?;

    let user_id = tokens.verify(token)?;
    Ok(AuthUser { user_id })
}

/// Route layer for protected routes. Rejected requests never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.tokens).map_err(|e| {
        tracing::debug!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
        e
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;
    use crate::errors::TokenError;

    fn tokens() -> TokenService {
        TokenService::new("gate-secret", Duration::hours(1)).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_format_error() {
        let result = authenticate(&HeaderMap::new(), &tokens());
        assert!(matches!(result, Err(AppError::AuthFormat)));
    }

    #[test]
    fn wrong_scheme_is_format_error() {
        let tokens = tokens();
        let token = tokens.issue("u1").unwrap();
        for value in [format!("Basic {}", token), token.clone(), format!("bearer {}", token)] {
            let result = authenticate(&headers_with(&value), &tokens);
            assert!(matches!(result, Err(AppError::AuthFormat)), "{}", value);
        }
    }

    #[test]
    fn bad_token_is_invalid() {
        let result = authenticate(&headers_with("Bearer nonsense"), &tokens());
        assert!(matches!(result, Err(AppError::AuthInvalid(TokenError::Malformed))));
    }

    #[test]
    fn valid_token_yields_user() {
        let tokens = tokens();
        let header = format!("Bearer {}", tokens.issue("u1").unwrap());
        let user = authenticate(&headers_with(&header), &tokens).unwrap();
        assert_eq!(user, AuthUser { user_id: "u1".into() });
    }
}
