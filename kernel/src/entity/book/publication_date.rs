use time::Date;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookPublicationDate(Date);

impl BookPublicationDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }
}
