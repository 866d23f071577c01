use uuid::Uuid;

use kernel::prelude::entity::{Attribute, AttributeKind, DestructAttribute};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AttributeDto {
    pub id: Uuid,
    pub kind: AttributeKind,
    pub name: String,
    pub description: Option<String>,
}

impl From<Attribute> for AttributeDto {
    fn from(value: Attribute) -> Self {
        let DestructAttribute {
            id,
            kind,
            name,
            description,
        } = value.into_destruct();
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: description.map(Into::into),
        }
    }
}

pub struct GetAttributeDto {
    pub kind: AttributeKind,
    pub id: Uuid,
}

pub struct CreateAttributeDto {
    pub kind: AttributeKind,
    pub name: String,
    pub description: Option<String>,
}

pub struct UpdateAttributeDto {
    pub kind: AttributeKind,
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct DeleteAttributeDto {
    pub kind: AttributeKind,
    pub id: Uuid,
}
