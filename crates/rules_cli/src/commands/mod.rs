pub mod check;
pub mod handlers;
pub mod validate;
