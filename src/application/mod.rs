pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod landing;
pub mod resilience;
pub mod wishlist;
