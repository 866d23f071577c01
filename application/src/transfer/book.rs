use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::prelude::entity::{Attribute, AttributeKind, Book, DestructBook};

use crate::transfer::AttributeDto;

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub isbn13: String,
    pub publication_date: Option<Date>,
    pub available_quantity: i32,
    pub price: Decimal,
    pub description: String,
    pub rating: Decimal,
    pub created_at: OffsetDateTime,
    pub attributes: Vec<AttributeDto>,
}

impl BookDto {
    pub fn new(book: Book, attributes: Vec<Attribute>) -> Self {
        let DestructBook {
            id,
            title,
            isbn13,
            publication_date,
            available_quantity,
            price,
            description,
            rating,
            created_at,
        } = book.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            isbn13: isbn13.into(),
            publication_date: publication_date.map(Into::into),
            available_quantity: available_quantity.into(),
            price: price.into(),
            description: description.into(),
            rating: rating.into(),
            created_at: created_at.into(),
            attributes: attributes.into_iter().map(AttributeDto::from).collect(),
        }
    }

    pub fn attributes_of(&self, kind: AttributeKind) -> impl Iterator<Item = &AttributeDto> {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.kind == kind)
    }
}

/// Names of every attribute of `kind` the book should be linked to.
/// Unknown names are created on the fly.
#[derive(Debug, Clone)]
pub struct ReplaceAttributesDto {
    pub kind: AttributeKind,
    pub names: Vec<String>,
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct CreateBookDto {
    pub title: String,
    pub isbn13: String,
    pub publication_date: Option<Date>,
    pub available_quantity: i32,
    pub price: Decimal,
    pub description: String,
    pub attributes: Vec<ReplaceAttributesDto>,
}

pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub isbn13: Option<String>,
    /// `Some(None)` clears the date.
    pub publication_date: Option<Option<Date>>,
    pub available_quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub attributes: Vec<ReplaceAttributesDto>,
}

pub struct DeleteBookDto {
    pub id: Uuid,
}
