mod description;
mod id;
mod kind;
mod name;

pub use self::{description::*, id::*, kind::*, name::*};
use destructure::{Destructure, Mutation};
use vodca::References;

/// A catalog attribute that books link to: a genre, author, language, bookshelf or publisher.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Attribute {
    id: AttributeId,
    kind: AttributeKind,
    name: AttributeName,
    description: Option<AttributeDescription>,
}

impl Attribute {
    /// Drops `description` for kinds that do not carry one.
    pub fn new(
        id: AttributeId,
        kind: AttributeKind,
        name: AttributeName,
        description: Option<AttributeDescription>,
    ) -> Self {
        let description = if kind.has_description() {
            Some(description.unwrap_or_default())
        } else {
            None
        };
        Self {
            id,
            kind,
            name,
            description,
        }
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::entity::{Attribute, AttributeDescription, AttributeId, AttributeKind, AttributeName};

    #[test]
    fn description_follows_kind() {
        let genre = Attribute::new(
            AttributeId::new(Uuid::new_v4()),
            AttributeKind::Genre,
            AttributeName::new("Fantasy"),
            None,
        );
        assert_eq!(genre.description(), &Some(AttributeDescription::default()));

        let author = Attribute::new(
            AttributeId::new(Uuid::new_v4()),
            AttributeKind::Author,
            AttributeName::new("Ursula K. Le Guin"),
            Some(AttributeDescription::new("ignored")),
        );
        assert_eq!(author.description(), &None);
    }
}
