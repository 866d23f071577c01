use uuid::Uuid;

use kernel::prelude::entity::{DestructOrderItem, OrderItem};

use crate::transfer::BookDto;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

impl From<OrderItem> for OrderItemDto {
    fn from(value: OrderItem) -> Self {
        let DestructOrderItem {
            id,
            user_id,
            book_id,
            quantity,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            book_id: book_id.into(),
            quantity: quantity.into(),
        }
    }
}

/// A cart line together with the book it reserves.
#[derive(Debug, Clone)]
pub struct CartLineDto {
    pub item: OrderItemDto,
    pub book: BookDto,
}

pub struct GetCartDto {
    pub user_id: Uuid,
}

pub struct CreateOrderItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

pub struct UpdateOrderItemDto {
    pub user_id: Uuid,
    pub id: Uuid,
    pub quantity: i32,
}

pub struct DeleteOrderItemDto {
    pub user_id: Uuid,
    pub id: Uuid,
}
