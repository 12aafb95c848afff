//! Steamline
//!
//! Domain core of the Steamline laundry client: typed ids, money, the service
//! catalog, the cart and checkout snapshot, order status progress, the
//! tracking view state machine, roles and routes, dashboards and receipts.
//!
//! Nothing in this crate performs IO beyond writing receipts; the
//! `steamline-app` crate talks to the backend and drives these types.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod ids;
pub mod money;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod quantity;
pub mod receipt;
pub mod roles;
pub mod status;
pub mod timestamps;
pub mod tracking;
