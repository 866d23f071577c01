use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct AttributeName(String);

impl AttributeName {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
