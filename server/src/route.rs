mod attribute;
mod book;
mod cart;
mod liked_item;
mod review;

pub use self::{attribute::*, book::*, cart::*, liked_item::*, review::*};
