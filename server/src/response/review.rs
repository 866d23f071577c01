use crate::controller::Exhaust;
use crate::response::CreatedResponse;
use application::transfer::ReviewDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    value: i32,
    comment: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<ReviewDto> for ReviewResponse {
    fn from(value: ReviewDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            book_id: value.book_id,
            value: value.value,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

impl IntoResponse for ReviewResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct ReviewPresenter;

impl Exhaust<()> for ReviewPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for ReviewPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Option<ReviewDto>> for ReviewPresenter {
    type To = Option<ReviewResponse>;
    fn emit(&self, input: Option<ReviewDto>) -> Self::To {
        input.map(ReviewResponse::from)
    }
}

impl Exhaust<Vec<ReviewDto>> for ReviewPresenter {
    type To = axum::Json<Vec<ReviewResponse>>;
    fn emit(&self, input: Vec<ReviewDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(ReviewResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
