use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::OrderItemQuantity;
use crate::KernelError;

/// Stock that is not reserved by any cart line. Never negative.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookAvailableQuantity(i32);

impl BookAvailableQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    pub fn try_new(quantity: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let quantity = quantity.into();
        if quantity < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("available quantity {quantity} is negative")));
        }
        Ok(Self(quantity))
    }

    /// Takes `quantity` out of stock. Fails without side effects when stock is insufficient.
    pub fn reserve(&self, quantity: &OrderItemQuantity) -> error_stack::Result<Self, KernelError> {
        let requested = *quantity.as_ref();
        self.0
            .checked_sub(requested)
            .filter(|remaining| *remaining >= 0)
            .map(Self)
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable(format!(
                    "requested {requested} but only {} available",
                    self.0
                ))
            })
    }

    pub fn release(&self, quantity: &OrderItemQuantity) -> error_stack::Result<Self, KernelError> {
        let released = *quantity.as_ref();
        self.0.checked_add(released).map(Self).ok_or_else(|| {
            Report::new(KernelError::Validation)
                .attach_printable(format!("releasing {released} overflows the stock counter"))
        })
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{BookAvailableQuantity, OrderItemQuantity};
    use crate::KernelError;

    #[test]
    fn reserve_subtracts() {
        let stock = BookAvailableQuantity::new(10);
        let stock = stock.reserve(&OrderItemQuantity::new(2)).unwrap();
        assert_eq!(stock, BookAvailableQuantity::new(8));
    }

    #[test]
    fn reserve_whole_stock() {
        let stock = BookAvailableQuantity::new(3);
        let stock = stock.reserve(&OrderItemQuantity::new(3)).unwrap();
        assert_eq!(stock, BookAvailableQuantity::new(0));
    }

    #[test]
    fn reserve_more_than_available() {
        let stock = BookAvailableQuantity::new(1);
        let error = stock.reserve(&OrderItemQuantity::new(2)).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }

    #[test]
    fn release_adds_back() {
        let stock = BookAvailableQuantity::new(5);
        let stock = stock.release(&OrderItemQuantity::new(3)).unwrap();
        assert_eq!(stock, BookAvailableQuantity::new(8));
    }

    #[test]
    fn negative_is_rejected() {
        assert!(BookAvailableQuantity::try_new(-1).is_err());
        assert!(BookAvailableQuantity::try_new(0).is_ok());
    }
}
