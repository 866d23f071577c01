mod comment;
mod id;
mod value;

pub use self::{comment::*, id::*, value::*};
use crate::entity::{BookId, CreatedAt, UserId};
use destructure::{Destructure, Mutation};
use vodca::References;

/// A user's score for a book. Unique per (user, book).
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Review {
    id: ReviewId,
    user_id: UserId,
    book_id: BookId,
    value: ReviewValue,
    comment: ReviewComment,
    created_at: CreatedAt<Review>,
}

impl Review {
    pub fn new(
        id: ReviewId,
        user_id: UserId,
        book_id: BookId,
        value: ReviewValue,
        comment: ReviewComment,
        created_at: CreatedAt<Review>,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            value,
            comment,
            created_at,
        }
    }
}
