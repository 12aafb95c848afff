//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::Service,
    ids::ServiceId,
    money::{self, line_total},
    quantity::{Quantity, QuantityError},
};

/// Errors raised by cart edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The service has no line in the cart.
    #[error("service {0} is not in the cart")]
    UnknownService(ServiceId),

    /// The requested quantity exceeds what a line may hold.
    #[error(transparent)]
    Quantity(QuantityError),
}

/// A requested quantity change for an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Replace the quantity with this value.
    Set(Decimal),

    /// Add this (possibly negative) amount to the current quantity.
    Delta(Decimal),
}

/// Result of applying a [`QuantityChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineUpdate {
    /// The line now holds this quantity.
    Updated(Quantity),

    /// The quantity dropped to zero or below and the line was deleted.
    Removed,
}

/// One service in the cart, with its price captured when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Service id
    pub service_id: ServiceId,

    /// Service name
    pub name: String,

    /// Unit price at the time the line was added
    pub unit_price: Decimal,

    /// Unit label
    pub unit: String,

    /// Quantity, always positive
    pub quantity: Quantity,
}

impl CartLine {
    fn from_service(service: &Service, quantity: Quantity) -> Self {
        CartLine {
            service_id: service.id,
            name: service.name.clone(),
            unit_price: service.price,
            unit: service.unit.clone(),
            quantity,
        }
    }

    /// Unit price times quantity.
    pub fn subtotal(&self) -> Decimal {
        line_total(self.unit_price, self.quantity.value())
    }
}

/// Ordered collection of cart lines, at most one per service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Add one unit of `service`.
    pub fn add_item(&mut self, service: &Service) {
        self.add_item_by(service, Quantity::ONE);
    }

    /// Add `amount` of `service`, merging into the existing line if there is one.
    ///
    /// Merged quantities are capped at [`crate::quantity::MAX_QUANTITY`].
    pub fn add_item_by(&mut self, service: &Service, amount: Quantity) {
        match self.line_mut(service.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(amount),
            None => self.lines.push(CartLine::from_service(service, amount)),
        }
    }

    /// Apply a quantity change to the line for `service_id`.
    ///
    /// The result is rounded to one decimal place; a result of zero or less
    /// deletes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownService`] if the service has no line, or
    /// [`CartError::Quantity`] if the result exceeds the per-line cap.
    pub fn update_quantity(
        &mut self,
        service_id: ServiceId,
        change: QuantityChange,
    ) -> Result<LineUpdate, CartError> {
        let line = self
            .line_mut(service_id)
            .ok_or(CartError::UnknownService(service_id))?;

        let requested = match change {
            QuantityChange::Set(value) => value,
            QuantityChange::Delta(delta) => line
                .quantity
                .value()
                .checked_add(delta)
                .ok_or(CartError::Quantity(QuantityError::TooLarge(delta)))?,
        };

        match Quantity::new(requested) {
            Ok(quantity) => {
                line.quantity = quantity;

                Ok(LineUpdate::Updated(quantity))
            }
            Err(QuantityError::NonPositive(_)) => {
                self.remove_item(service_id);

                Ok(LineUpdate::Removed)
            }
            Err(error @ QuantityError::TooLarge(_)) => Err(CartError::Quantity(error)),
        }
    }

    /// Replace the quantity of a line.
    ///
    /// # Errors
    ///
    /// See [`Cart::update_quantity`].
    pub fn set_quantity(
        &mut self,
        service_id: ServiceId,
        quantity: Decimal,
    ) -> Result<LineUpdate, CartError> {
        self.update_quantity(service_id, QuantityChange::Set(quantity))
    }

    /// Adjust the quantity of a line by `delta`.
    ///
    /// # Errors
    ///
    /// See [`Cart::update_quantity`].
    pub fn adjust_quantity(
        &mut self,
        service_id: ServiceId,
        delta: Decimal,
    ) -> Result<LineUpdate, CartError> {
        self.update_quantity(service_id, QuantityChange::Delta(delta))
    }

    /// Remove the line for `service_id`, returning it if it existed.
    pub fn remove_item(&mut self, service_id: ServiceId) -> Option<CartLine> {
        let position = self
            .lines
            .iter()
            .position(|line| line.service_id == service_id)?;

        Some(self.lines.remove(position))
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Decimal {
        money::sum(self.lines.iter().map(CartLine::subtotal))
    }

    /// Cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find the line for a service.
    pub fn line(&self, service_id: ServiceId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.service_id == service_id)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, service_id: ServiceId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.service_id == service_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Rebuild a cart from lines, merging duplicates.
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();

        for line in lines {
            match cart.line_mut(line.service_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.lines.push(line),
            }
        }

        cart
    }
}
