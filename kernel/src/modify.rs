mod attribute;
mod book;
mod liked_item;
mod order_item;
mod review;

pub use self::{attribute::*, book::*, liked_item::*, order_item::*, review::*};
