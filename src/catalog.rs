//! Catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ServiceId;

/// A laundry service offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service id
    pub id: ServiceId,

    /// Service name
    pub name: String,

    /// Unit the service is sold in (`kg`, `pcs`, ...)
    pub unit: String,

    /// Price per unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Payload used to create or update a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    /// Service name
    pub name: String,

    /// Unit the service is sold in
    pub unit: String,

    /// Price per unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Service {
    /// Look up a service by id in a catalog listing.
    pub fn find(catalog: &[Service], id: ServiceId) -> Option<&Service> {
        catalog.iter().find(|service| service.id == id)
    }
}
