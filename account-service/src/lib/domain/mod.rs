pub mod authentication;
pub mod product;
pub mod user;
