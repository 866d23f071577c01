use crate::controller::Exhaust;
use crate::response::{BookResponse, CreatedResponse};
use application::transfer::CartLineDto;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    id: Uuid,
    quantity: i32,
    book: BookResponse,
}

impl From<CartLineDto> for CartLineResponse {
    fn from(value: CartLineDto) -> Self {
        Self {
            id: value.item.id,
            quantity: value.item.quantity,
            book: BookResponse::from(value.book),
        }
    }
}

pub struct CartPresenter;

impl Exhaust<()> for CartPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for CartPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Vec<CartLineDto>> for CartPresenter {
    type To = axum::Json<Vec<CartLineResponse>>;
    fn emit(&self, input: Vec<CartLineDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(CartLineResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
