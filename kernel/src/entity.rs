mod attribute;
mod book;
mod common;
mod liked_item;
mod order_item;
mod review;
mod user;

pub use self::{attribute::*, book::*, common::*, liked_item::*, order_item::*, review::*, user::*};
