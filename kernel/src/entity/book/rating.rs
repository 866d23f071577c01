use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Mean review value with one fractional digit (`NUMERIC(2, 1)`).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookRating(Decimal);

impl BookRating {
    pub const SCALE: u32 = 1;

    pub fn new(rating: impl Into<Decimal>) -> Self {
        Self(rating.into())
    }

    /// `None` means the book has no reviews and maps to zero.
    pub fn from_mean(mean: Option<Decimal>) -> Self {
        mean.map(|mean| {
            Self(mean.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
        })
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use crate::entity::BookRating;

    #[test]
    fn no_reviews_is_zero() {
        assert_eq!(BookRating::from_mean(None), BookRating::new(Decimal::ZERO));
    }

    #[test]
    fn keeps_one_digit() {
        let rating = BookRating::from_mean(Some(Decimal::new(35, 1)));
        assert_eq!(rating, BookRating::new(Decimal::new(35, 1)));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 11 / 3
        let rating = BookRating::from_mean(Some(Decimal::from(11) / Decimal::from(3)));
        assert_eq!(rating, BookRating::new(Decimal::new(37, 1)));
        let rating = BookRating::from_mean(Some(Decimal::new(425, 2)));
        assert_eq!(rating, BookRating::new(Decimal::new(43, 1)));
    }
}
