//! HTTP request handlers.

pub mod recipes;
pub mod resolve;
pub mod users;
