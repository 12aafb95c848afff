//! Receipt

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::PendingCheckout,
    money::{self, format_rupiah},
    orders::OrderDetail,
    payment::PaymentReceipt,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output could not be written.
    #[error("IO error")]
    IO(#[from] io::Error),
}

/// A printable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Service name
    pub name: String,

    /// Quantity with unit, e.g. `2.5 kg`
    pub quantity: String,

    /// Unit price, when known
    pub unit_price: Option<Decimal>,

    /// Line subtotal
    pub subtotal: Decimal,
}

impl From<&CartLine> for ReceiptLine {
    fn from(line: &CartLine) -> Self {
        ReceiptLine {
            name: line.name.clone(),
            quantity: format!("{} {}", line.quantity, line.unit),
            unit_price: Some(line.unit_price),
            subtotal: line.subtotal(),
        }
    }
}

/// A cart summary or order receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    title: String,
    lines: Vec<ReceiptLine>,
    total: Decimal,
    payment: Option<PaymentReceipt>,
}

impl Receipt {
    /// Summary of cart lines.
    pub fn for_cart(title: impl Into<String>, lines: &[CartLine]) -> Self {
        let lines: Vec<ReceiptLine> = lines.iter().map(ReceiptLine::from).collect();
        let total = money::sum(lines.iter().map(|line| line.subtotal));

        Receipt {
            title: title.into(),
            lines,
            total,
            payment: None,
        }
    }

    /// Summary of a pending checkout, using its frozen total.
    pub fn for_checkout(pending: &PendingCheckout) -> Self {
        Receipt {
            total: pending.total,
            ..Receipt::for_cart("Checkout", &pending.items)
        }
    }

    /// Receipt for a placed order.
    pub fn for_order(detail: &OrderDetail) -> Self {
        let lines = detail
            .items
            .iter()
            .map(|item| {
                let quantity = item.quantity.normalize();

                ReceiptLine {
                    name: item.service_name.clone(),
                    quantity: match item.unit.as_deref() {
                        Some(unit) => format!("{quantity} {unit}"),
                        None => quantity.to_string(),
                    },
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                }
            })
            .collect();

        Receipt {
            title: detail.order.reference(),
            lines,
            total: detail.order.total_price,
            payment: None,
        }
    }

    /// Attach a cash payment.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentReceipt) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Receipt total.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Receipt lines.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Write the receipt as a text table.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Service", "Qty", "Unit Price", "Subtotal"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.clone(),
                line.unit_price.map_or_else(|| "-".to_string(), format_rupiah),
                format_rupiah(line.subtotal),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Columns::new(1..4), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{}", self.title)?;
        writeln!(out, "{table}")?;

        let mut summary = vec![("Total", format_rupiah(self.total))];

        if let Some(payment) = &self.payment {
            summary.push(("Paid", format_rupiah(payment.paid)));
            summary.push(("Change", format_rupiah(payment.change)));
        }

        let value_width = summary.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in summary {
            writeln!(out, " {label:<8}{value:>value_width$}")?;
        }

        Ok(())
    }
}
