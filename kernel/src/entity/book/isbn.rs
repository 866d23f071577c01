use vodca::{AsRefln, Fromln};

/// ISBN-13 as printed, hyphens included (e.g. `978-3-16-148410-0`).
#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookIsbn(String);

impl BookIsbn {
    pub const MAX_LENGTH: usize = 17;

    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }
}
