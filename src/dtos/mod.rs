pub mod auth;
pub mod product;
pub mod response;
