use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }
}
