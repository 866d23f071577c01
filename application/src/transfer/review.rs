use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructReview, Review};

#[derive(Debug, Clone)]
pub struct ReviewDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub value: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        let DestructReview {
            id,
            user_id,
            book_id,
            value,
            comment,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            book_id: book_id.into(),
            value: value.into(),
            comment: comment.into(),
            created_at: created_at.into(),
        }
    }
}

pub struct GetReviewDto {
    pub id: Uuid,
}

pub struct GetBookReviewsDto {
    pub book_id: Uuid,
}

pub struct CreateReviewDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub value: i32,
    pub comment: String,
}

pub struct UpdateReviewDto {
    pub id: Uuid,
    pub value: Option<i32>,
    pub comment: Option<String>,
}

pub struct DeleteReviewDto {
    pub id: Uuid,
}
