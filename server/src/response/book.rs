use crate::controller::Exhaust;
use crate::response::{AttributeResponse, CreatedResponse};
use application::transfer::BookDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::AttributeKind;
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: Uuid,
    title: String,
    isbn13: String,
    publication_date: Option<Date>,
    available_quantity: i32,
    price: Decimal,
    description: String,
    rating: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    genres: Vec<AttributeResponse>,
    authors: Vec<AttributeResponse>,
    languages: Vec<AttributeResponse>,
    bookshelves: Vec<AttributeResponse>,
    publishers: Vec<AttributeResponse>,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        let mut genres = Vec::new();
        let mut authors = Vec::new();
        let mut languages = Vec::new();
        let mut bookshelves = Vec::new();
        let mut publishers = Vec::new();
        for attribute in value.attributes {
            let list = match attribute.kind {
                AttributeKind::Genre => &mut genres,
                AttributeKind::Author => &mut authors,
                AttributeKind::Language => &mut languages,
                AttributeKind::Bookshelf => &mut bookshelves,
                AttributeKind::Publisher => &mut publishers,
            };
            list.push(AttributeResponse::from(attribute));
        }
        Self {
            id: value.id,
            title: value.title,
            isbn13: value.isbn13,
            publication_date: value.publication_date,
            available_quantity: value.available_quantity,
            price: value.price,
            description: value.description,
            rating: value.rating,
            created_at: value.created_at,
            genres,
            authors,
            languages,
            bookshelves,
            publishers,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<()> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for BookPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(BookResponse::from)
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = axum::Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(BookResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
