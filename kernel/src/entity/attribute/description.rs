use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, Eq, PartialEq, Fromln, AsRefln)]
pub struct AttributeDescription(String);

impl AttributeDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}
