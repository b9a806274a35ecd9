//! Database models split into one module per table.

pub mod character;
pub mod favorite;
pub mod planet;
pub mod user;

pub use character::*;
pub use favorite::*;
pub use planet::*;
pub use user::*;
