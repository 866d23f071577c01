use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;
use crate::request::{check_text, nullable};
use application::transfer::{
    CreateBookDto, DeleteBookDto, GetBookDto, GetBookReviewsDto, ReplaceAttributesDto,
    UpdateBookDto,
};
use kernel::prelude::entity::{
    AttributeKind, AttributeName, BookAvailableQuantity, BookIsbn, BookPrice, BookTitle,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

/// Attribute names of a book, grouped by kind. An omitted list means "no change" on update.
#[derive(Debug, Default, Deserialize)]
pub struct AttributeNamesRequest {
    genres: Option<Vec<String>>,
    authors: Option<Vec<String>>,
    languages: Option<Vec<String>>,
    bookshelves: Option<Vec<String>>,
    publishers: Option<Vec<String>>,
}

impl AttributeNamesRequest {
    fn into_dtos(self) -> Result<Vec<ReplaceAttributesDto>, ErrorStatus> {
        let lists = [
            (AttributeKind::Genre, self.genres),
            (AttributeKind::Author, self.authors),
            (AttributeKind::Language, self.languages),
            (AttributeKind::Bookshelf, self.bookshelves),
            (AttributeKind::Publisher, self.publishers),
        ];
        let mut dtos = Vec::new();
        for (kind, names) in lists {
            let Some(names) = names else { continue };
            for name in &names {
                check_text(kind.as_str(), name, AttributeName::MAX_LENGTH)?;
            }
            dtos.push(ReplaceAttributesDto { kind, names });
        }
        Ok(dtos)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    title: String,
    isbn13: String,
    #[serde(default)]
    publication_date: Option<Date>,
    #[serde(default)]
    available_quantity: i32,
    price: Decimal,
    #[serde(default)]
    description: String,
    #[serde(flatten)]
    attributes: AttributeNamesRequest,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    isbn13: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    publication_date: Option<Option<Date>>,
    available_quantity: Option<i32>,
    price: Option<Decimal>,
    description: Option<String>,
    #[serde(flatten)]
    attributes: AttributeNamesRequest,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookReviewsRequest {
    book_id: Uuid,
}

impl GetBookReviewsRequest {
    pub fn new(book_id: Uuid) -> Self {
        Self { book_id }
    }
}

fn check_isbn(isbn13: &str) -> Result<(), ErrorStatus> {
    check_text("isbn13", isbn13, BookIsbn::MAX_LENGTH)
}

pub struct BookTransformer;

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = ErrorStatus;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        check_text("title", &input.title, BookTitle::MAX_LENGTH)?;
        check_isbn(&input.isbn13)?;
        BookAvailableQuantity::try_new(input.available_quantity)?;
        BookPrice::try_new(input.price)?;
        Ok(CreateBookDto {
            title: input.title,
            isbn13: input.isbn13,
            publication_date: input.publication_date,
            available_quantity: input.available_quantity,
            price: input.price,
            description: input.description,
            attributes: input.attributes.into_dtos()?,
        })
    }
}

impl TryIntake<(Uuid, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    type Error = ErrorStatus;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        if let Some(title) = &input.title {
            check_text("title", title, BookTitle::MAX_LENGTH)?;
        }
        if let Some(isbn13) = &input.isbn13 {
            check_isbn(isbn13)?;
        }
        input
            .available_quantity
            .map(BookAvailableQuantity::try_new)
            .transpose()?;
        input.price.map(BookPrice::try_new).transpose()?;
        Ok(UpdateBookDto {
            id,
            title: input.title,
            isbn13: input.isbn13,
            publication_date: input.publication_date,
            available_quantity: input.available_quantity,
            price: input.price,
            description: input.description,
            attributes: input.attributes.into_dtos()?,
        })
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl Intake<GetBookReviewsRequest> for BookTransformer {
    type To = GetBookReviewsDto;
    fn emit(&self, input: GetBookReviewsRequest) -> Self::To {
        GetBookReviewsDto {
            book_id: input.book_id,
        }
    }
}
