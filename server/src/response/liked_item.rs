use crate::controller::Exhaust;
use crate::response::{BookResponse, CreatedResponse};
use application::transfer::LikedItemDto;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LikedItemResponse {
    id: Uuid,
    book: BookResponse,
}

pub struct LikedItemPresenter;

impl Exhaust<()> for LikedItemPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for LikedItemPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Vec<LikedItemDto>> for LikedItemPresenter {
    type To = axum::Json<Vec<LikedItemResponse>>;
    fn emit(&self, input: Vec<LikedItemDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(|item| LikedItemResponse {
                id: item.id,
                book: BookResponse::from(item.book),
            })
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
