use error_stack::Report;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookPrice(Decimal);

impl BookPrice {
    pub const SCALE: u32 = 2;

    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }

    /// Accepts `0 <= price < 1000` with at most two fractional digits (`NUMERIC(5, 2)`).
    pub fn try_new(price: impl Into<Decimal>) -> error_stack::Result<Self, KernelError> {
        let price = price.into();
        if price.is_sign_negative()
            || price >= Decimal::ONE_THOUSAND
            || price.normalize().scale() > Self::SCALE
        {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("price {price} is out of range")));
        }
        Ok(Self(price))
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use crate::entity::BookPrice;

    #[test]
    fn accepts_cents() {
        assert!(BookPrice::try_new(Decimal::new(550, 2)).is_ok());
        assert!(BookPrice::try_new(Decimal::new(5500, 3)).is_ok());
        assert!(BookPrice::try_new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(BookPrice::try_new(Decimal::new(-1, 0)).is_err());
        assert!(BookPrice::try_new(Decimal::ONE_THOUSAND).is_err());
        assert!(BookPrice::try_new(Decimal::new(5555, 3)).is_err());
    }
}
