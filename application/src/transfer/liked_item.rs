use uuid::Uuid;

use crate::transfer::BookDto;

#[derive(Debug, Clone)]
pub struct LikedItemDto {
    pub id: Uuid,
    pub book: BookDto,
}

pub struct GetLikedItemsDto {
    pub user_id: Uuid,
}

pub struct CreateLikedItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

pub struct DeleteLikedItemDto {
    pub user_id: Uuid,
    pub id: Uuid,
}
