mod id;
mod quantity;

pub use self::{id::*, quantity::*};
use crate::entity::{BookId, UserId};
use destructure::{Destructure, Mutation};
use vodca::References;

/// A cart line: a pending reservation of `quantity` copies of a book. Unique per (user, book).
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct OrderItem {
    id: OrderItemId,
    user_id: UserId,
    book_id: BookId,
    quantity: OrderItemQuantity,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        user_id: UserId,
        book_id: BookId,
        quantity: OrderItemQuantity,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            quantity,
        }
    }
}
