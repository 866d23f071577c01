mod attribute;
mod book;
mod cart;
mod liked_item;
mod review;

pub use self::{attribute::*, book::*, cart::*, liked_item::*, review::*};

use serde::{Deserialize, Deserializer};

use crate::error::ErrorStatus;

/// Keeps an explicit `null` apart from an omitted field: omitted stays `None` via
/// `#[serde(default)]`, `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rejects blank text and text longer than `max` characters.
fn check_text(field: &str, value: &str, max: usize) -> Result<(), ErrorStatus> {
    if value.trim().is_empty() {
        return Err(ErrorStatus::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(ErrorStatus::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::request::check_text;

    #[test]
    fn text_limits() {
        assert!(check_text("title", "Kokoro", 255).is_ok());
        assert!(check_text("title", "   ", 255).is_err());
        assert!(check_text("title", &"a".repeat(256), 255).is_err());
        // counted in characters, not bytes
        assert!(check_text("title", &"心".repeat(255), 255).is_ok());
    }
}
