mod id;

pub use self::id::*;
use crate::entity::{BookId, UserId};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct LikedItem {
    id: LikedItemId,
    user_id: UserId,
    book_id: BookId,
}

impl LikedItem {
    pub fn new(id: LikedItemId, user_id: UserId, book_id: BookId) -> Self {
        Self {
            id,
            user_id,
            book_id,
        }
    }
}
