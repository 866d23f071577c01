use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;
use crate::identity::Caller;
use application::transfer::{CreateReviewDto, DeleteReviewDto, GetReviewDto, UpdateReviewDto};
use kernel::prelude::entity::ReviewValue;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    book_id: Uuid,
    value: i32,
    #[serde(default)]
    comment: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    value: Option<i32>,
    comment: Option<String>,
}

#[derive(Debug)]
pub struct GetReviewRequest {
    id: Uuid,
}

impl GetReviewRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteReviewRequest {
    id: Uuid,
}

impl DeleteReviewRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct ReviewTransformer;

impl TryIntake<(Caller, CreateReviewRequest)> for ReviewTransformer {
    type To = CreateReviewDto;
    type Error = ErrorStatus;
    fn emit(&self, input: (Caller, CreateReviewRequest)) -> Result<Self::To, Self::Error> {
        let (caller, input) = input;
        ReviewValue::try_new(input.value)?;
        Ok(CreateReviewDto {
            user_id: caller.id(),
            book_id: input.book_id,
            value: input.value,
            comment: input.comment,
        })
    }
}

impl TryIntake<(Uuid, UpdateReviewRequest)> for ReviewTransformer {
    type To = UpdateReviewDto;
    type Error = ErrorStatus;
    fn emit(&self, input: (Uuid, UpdateReviewRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        input.value.map(ReviewValue::try_new).transpose()?;
        Ok(UpdateReviewDto {
            id,
            value: input.value,
            comment: input.comment,
        })
    }
}

impl Intake<GetReviewRequest> for ReviewTransformer {
    type To = GetReviewDto;
    fn emit(&self, input: GetReviewRequest) -> Self::To {
        GetReviewDto { id: input.id }
    }
}

impl Intake<DeleteReviewRequest> for ReviewTransformer {
    type To = DeleteReviewDto;
    fn emit(&self, input: DeleteReviewRequest) -> Self::To {
        DeleteReviewDto { id: input.id }
    }
}
