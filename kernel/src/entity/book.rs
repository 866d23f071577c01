mod description;
mod id;
mod isbn;
mod price;
mod publication_date;
mod quantity;
mod rating;
mod title;

pub use self::{
    description::*, id::*, isbn::*, price::*, publication_date::*, quantity::*, rating::*,
    title::*,
};
use crate::entity::common::CreatedAt;
use destructure::{Destructure, Mutation};
use vodca::References;

/// Catalog entry and aggregate root for reviews and cart lines.
///
/// `rating` and `available_quantity` are derived from the child collections and are only
/// rewritten by the rating aggregator and the inventory adjuster (or an explicit stock update).
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    isbn13: BookIsbn,
    publication_date: Option<BookPublicationDate>,
    available_quantity: BookAvailableQuantity,
    price: BookPrice,
    description: BookDescription,
    rating: BookRating,
    created_at: CreatedAt<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        isbn13: BookIsbn,
        publication_date: Option<BookPublicationDate>,
        available_quantity: BookAvailableQuantity,
        price: BookPrice,
        description: BookDescription,
        rating: BookRating,
        created_at: CreatedAt<Book>,
    ) -> Self {
        Self {
            id,
            title,
            isbn13,
            publication_date,
            available_quantity,
            price,
            description,
            rating,
            created_at,
        }
    }
}
