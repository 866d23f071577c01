use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Genre,
    Author,
    Language,
    Bookshelf,
    Publisher,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::Genre,
        AttributeKind::Author,
        AttributeKind::Language,
        AttributeKind::Bookshelf,
        AttributeKind::Publisher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Genre => "genre",
            AttributeKind::Author => "author",
            AttributeKind::Language => "language",
            AttributeKind::Bookshelf => "bookshelf",
            AttributeKind::Publisher => "publisher",
        }
    }

    /// Authors and languages are identified by name alone.
    pub fn has_description(&self) -> bool {
        !matches!(self, AttributeKind::Author | AttributeKind::Language)
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable(format!("unknown attribute kind `{s}`"))
            })
    }
}

#[cfg(test)]
mod test {
    use crate::entity::AttributeKind;

    #[test]
    fn parses_own_names() {
        for kind in AttributeKind::ALL {
            assert_eq!(kind.as_str().parse::<AttributeKind>().unwrap(), kind);
        }
        assert!("shelf".parse::<AttributeKind>().is_err());
    }
}
