use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use uuid::Uuid;

static USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user, as forwarded by the identity provider in front of the service.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Caller(Uuid);

impl Caller {
    pub fn id(&self) -> Uuid {
        self.0
    }

    fn from_parts(parts: &Parts) -> Option<Self> {
        let header = parts.headers.get(USER_ID_HEADER)?;
        let id = Uuid::parse_str(header.to_str().ok()?.trim()).ok()?;
        Some(Caller(id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Caller::from_parts(parts).ok_or_else(|| {
            tracing::debug!("missing or malformed {USER_ID_HEADER} header");
            StatusCode::UNAUTHORIZED
        })
    }
}
