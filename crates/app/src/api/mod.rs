//! Laundry backend REST API.

mod auth;
mod catalog;
mod client;
mod dashboard;
mod errors;
mod orders;
mod users;

pub use auth::*;
pub use catalog::*;
pub use client::HttpApi;
pub use dashboard::*;
pub use errors::ApiError;
pub use orders::*;
pub use users::*;
