use crate::controller::Exhaust;
use crate::response::CreatedResponse;
use application::transfer::AttributeDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::AttributeKind;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AttributeResponse {
    id: Uuid,
    kind: AttributeKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<AttributeDto> for AttributeResponse {
    fn from(value: AttributeDto) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            name: value.name,
            description: value.description,
        }
    }
}

impl IntoResponse for AttributeResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct AttributePresenter;

impl Exhaust<()> for AttributePresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for AttributePresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Option<AttributeDto>> for AttributePresenter {
    type To = Option<AttributeResponse>;
    fn emit(&self, input: Option<AttributeDto>) -> Self::To {
        input.map(AttributeResponse::from)
    }
}

impl Exhaust<Vec<AttributeDto>> for AttributePresenter {
    type To = axum::Json<Vec<AttributeResponse>>;
    fn emit(&self, input: Vec<AttributeDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(AttributeResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
