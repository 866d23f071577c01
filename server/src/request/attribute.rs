use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;
use crate::request::check_text;
use application::transfer::{
    CreateAttributeDto, DeleteAttributeDto, GetAttributeDto, UpdateAttributeDto,
};
use kernel::prelude::entity::{AttributeKind, AttributeName};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateAttributeRequest {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAttributeRequest {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug)]
pub struct GetAttributeRequest {
    kind: AttributeKind,
    id: Uuid,
}

impl GetAttributeRequest {
    pub fn new(kind: AttributeKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

#[derive(Debug)]
pub struct GetAllAttributesRequest {
    kind: AttributeKind,
}

impl GetAllAttributesRequest {
    pub fn new(kind: AttributeKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug)]
pub struct DeleteAttributeRequest {
    kind: AttributeKind,
    id: Uuid,
}

impl DeleteAttributeRequest {
    pub fn new(kind: AttributeKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

pub struct AttributeTransformer;

impl TryIntake<(AttributeKind, CreateAttributeRequest)> for AttributeTransformer {
    type To = CreateAttributeDto;
    type Error = ErrorStatus;
    fn emit(
        &self,
        input: (AttributeKind, CreateAttributeRequest),
    ) -> Result<Self::To, Self::Error> {
        let (kind, input) = input;
        check_text("name", &input.name, AttributeName::MAX_LENGTH)?;
        Ok(CreateAttributeDto {
            kind,
            name: input.name,
            description: input.description,
        })
    }
}

impl TryIntake<(AttributeKind, Uuid, UpdateAttributeRequest)> for AttributeTransformer {
    type To = UpdateAttributeDto;
    type Error = ErrorStatus;
    fn emit(
        &self,
        input: (AttributeKind, Uuid, UpdateAttributeRequest),
    ) -> Result<Self::To, Self::Error> {
        let (kind, id, input) = input;
        if let Some(name) = &input.name {
            check_text("name", name, AttributeName::MAX_LENGTH)?;
        }
        Ok(UpdateAttributeDto {
            kind,
            id,
            name: input.name,
            description: input.description,
        })
    }
}

impl Intake<GetAttributeRequest> for AttributeTransformer {
    type To = GetAttributeDto;
    fn emit(&self, input: GetAttributeRequest) -> Self::To {
        GetAttributeDto {
            kind: input.kind,
            id: input.id,
        }
    }
}

impl Intake<GetAllAttributesRequest> for AttributeTransformer {
    type To = AttributeKind;
    fn emit(&self, input: GetAllAttributesRequest) -> Self::To {
        input.kind
    }
}

impl Intake<DeleteAttributeRequest> for AttributeTransformer {
    type To = DeleteAttributeDto;
    fn emit(&self, input: DeleteAttributeRequest) -> Self::To {
        DeleteAttributeDto {
            kind: input.kind,
            id: input.id,
        }
    }
}
