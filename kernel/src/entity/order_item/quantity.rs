use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderItemQuantity(i32);

impl OrderItemQuantity {
    pub const MIN: i32 = 1;

    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    pub fn try_new(quantity: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let quantity = quantity.into();
        if quantity < Self::MIN {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("quantity {quantity} is below {}", Self::MIN)));
        }
        Ok(Self(quantity))
    }
}

impl Default for OrderItemQuantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}
