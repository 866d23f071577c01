mod attribute;
mod book;
mod cart;
mod liked_item;
mod review;

pub use self::{attribute::*, book::*, cart::*, liked_item::*, review::*};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: Uuid,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self)).into_response()
    }
}

/// Detail responses answer 404 when the service found nothing.
pub fn or_not_found<R: IntoResponse>(response: Option<R>) -> Response {
    response
        .map(IntoResponse::into_response)
        .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}
