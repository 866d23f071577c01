use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;
use crate::identity::Caller;
use application::transfer::{
    CreateOrderItemDto, DeleteOrderItemDto, GetCartDto, UpdateOrderItemDto,
};
use kernel::prelude::entity::OrderItemQuantity;
use serde::Deserialize;
use uuid::Uuid;

fn default_quantity() -> i32 {
    OrderItemQuantity::MIN
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderItemRequest {
    book_id: Uuid,
    #[serde(default = "default_quantity")]
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderItemRequest {
    quantity: i32,
}

#[derive(Debug)]
pub struct DeleteOrderItemRequest {
    caller: Caller,
    id: Uuid,
}

impl DeleteOrderItemRequest {
    pub fn new(caller: Caller, id: Uuid) -> Self {
        Self { caller, id }
    }
}

pub struct CartTransformer;

impl Intake<Caller> for CartTransformer {
    type To = GetCartDto;
    fn emit(&self, input: Caller) -> Self::To {
        GetCartDto {
            user_id: input.id(),
        }
    }
}

impl TryIntake<(Caller, CreateOrderItemRequest)> for CartTransformer {
    type To = CreateOrderItemDto;
    type Error = ErrorStatus;
    fn emit(&self, input: (Caller, CreateOrderItemRequest)) -> Result<Self::To, Self::Error> {
        let (caller, input) = input;
        OrderItemQuantity::try_new(input.quantity)?;
        Ok(CreateOrderItemDto {
            user_id: caller.id(),
            book_id: input.book_id,
            quantity: input.quantity,
        })
    }
}

impl TryIntake<(Caller, Uuid, UpdateOrderItemRequest)> for CartTransformer {
    type To = UpdateOrderItemDto;
    type Error = ErrorStatus;
    fn emit(
        &self,
        input: (Caller, Uuid, UpdateOrderItemRequest),
    ) -> Result<Self::To, Self::Error> {
        let (caller, id, input) = input;
        OrderItemQuantity::try_new(input.quantity)?;
        Ok(UpdateOrderItemDto {
            user_id: caller.id(),
            id,
            quantity: input.quantity,
        })
    }
}

impl Intake<DeleteOrderItemRequest> for CartTransformer {
    type To = DeleteOrderItemDto;
    fn emit(&self, input: DeleteOrderItemRequest) -> Self::To {
        DeleteOrderItemDto {
            user_id: input.caller.id(),
            id: input.id,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::controller::TryIntake;
    use crate::request::{CartTransformer, CreateOrderItemRequest};
    use serde_json::json;
    use uuid::Uuid;

    fn request(body: serde_json::Value) -> CreateOrderItemRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn quantity_defaults_to_one() {
        let caller = crate::identity::test::caller();
        let dto = CartTransformer
            .emit((caller, request(json!({ "book_id": Uuid::new_v4() }))))
            .unwrap();
        assert_eq!(dto.quantity, 1);
        assert_eq!(dto.user_id, caller.id());
    }

    #[test]
    fn rejects_empty_line() {
        let caller = crate::identity::test::caller();
        let body = json!({ "book_id": Uuid::new_v4(), "quantity": 0 });
        assert!(CartTransformer.emit((caller, request(body))).is_err());
    }
}
