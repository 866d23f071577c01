use crate::controller::Intake;
use crate::identity::Caller;
use application::transfer::{CreateLikedItemDto, DeleteLikedItemDto, GetLikedItemsDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateLikedItemRequest {
    book_id: Uuid,
}

#[derive(Debug)]
pub struct DeleteLikedItemRequest {
    caller: Caller,
    id: Uuid,
}

impl DeleteLikedItemRequest {
    pub fn new(caller: Caller, id: Uuid) -> Self {
        Self { caller, id }
    }
}

pub struct LikedItemTransformer;

impl Intake<Caller> for LikedItemTransformer {
    type To = GetLikedItemsDto;
    fn emit(&self, input: Caller) -> Self::To {
        GetLikedItemsDto {
            user_id: input.id(),
        }
    }
}

impl Intake<(Caller, CreateLikedItemRequest)> for LikedItemTransformer {
    type To = CreateLikedItemDto;
    fn emit(&self, input: (Caller, CreateLikedItemRequest)) -> Self::To {
        let (caller, input) = input;
        CreateLikedItemDto {
            user_id: caller.id(),
            book_id: input.book_id,
        }
    }
}

impl Intake<DeleteLikedItemRequest> for LikedItemTransformer {
    type To = DeleteLikedItemDto;
    fn emit(&self, input: DeleteLikedItemRequest) -> Self::To {
        DeleteLikedItemDto {
            user_id: input.caller.id(),
            id: input.id,
        }
    }
}
