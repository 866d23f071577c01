use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};

pub use self::{
    attribute::*, book::*, cart::*, inventory::*, liked_item::*, rating::*, review::*,
};

mod attribute;
mod book;
mod cart;
mod inventory;
mod liked_item;
mod rating;
mod review;

/// The transaction type a module's repositories operate on.
pub type TransactionOf<T> =
    <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction;
