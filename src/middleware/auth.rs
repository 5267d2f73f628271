use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the caller's user ID, set by the authenticating gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// The already-authenticated caller of a private route
///
/// Token verification happens in front of this service; handlers only need
/// the resolved user ID, which the gateway forwards in `x-user-id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no user identity".to_string()))?;

        header
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(AuthUser)
            .ok_or_else(|| {
                AppError::Unauthorized("Not authorized, invalid user identity".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/api/movies/user/ratings");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_user_header() {
        let user = Uuid::new_v4();
        let resolved = extract(Some(&user.to_string())).await.unwrap();
        assert_eq!(resolved, AuthUser(user));
    }

    #[tokio::test]
    async fn test_missing_user_header() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_malformed_user_header() {
        let err = extract(Some("not-a-uuid")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
