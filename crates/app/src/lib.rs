//! Steamline client: backend API, durable session state and the workflows
//! behind each page.

pub mod admin;
pub mod api;
pub mod checkout;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod logistics;
pub mod notifications;
pub mod observability;
pub mod polling;
pub mod portal;
pub mod pos;
pub mod session;
pub mod storage;
pub mod tracking;
