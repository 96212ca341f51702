use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{to_meters, LineItem, RawLineItem, Unit};

/// Which numeric item field failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Quantity,
    Rate,
    Count,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemField::Quantity => "square feet",
            ItemField::Rate => "rate",
            ItemField::Count => "quantity",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please enter valid numbers: {field} {value:?} is not a valid {expected}")]
pub struct InvalidInputError {
    pub field: ItemField,
    pub value: String,
    pub expected: &'static str,
}

/// Ordered, append-only list of the current session's line items
#[derive(Debug, Default)]
pub struct Ledger {
    items: Vec<LineItem>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, convert and append one item.
    ///
    /// All three numeric fields are parsed before anything is pushed, so a
    /// failure leaves the ledger as it was.
    pub fn append(&mut self, raw: &RawLineItem, unit: Unit) -> Result<&LineItem, InvalidInputError> {
        let quantity = parse_decimal(ItemField::Quantity, &raw.quantity)?;
        let rate = parse_decimal(ItemField::Rate, &raw.rate)?;
        let quantity_count = parse_count(&raw.count)?;

        let normalized_quantity = to_meters(quantity, unit);
        let amount = normalized_quantity * rate * quantity_count as f64;
        let serial_number = self.items.len() as u32 + 1;

        debug!(serial_number, %unit, quantity, normalized_quantity, "converted item quantity");

        self.items.push(LineItem {
            serial_number,
            size: raw.size.clone(),
            description: raw.description.clone(),
            normalized_quantity,
            rate,
            quantity_count,
            amount,
        });

        info!(serial_number, amount, total = self.total(), "line item added");

        Ok(&self.items[self.items.len() - 1])
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().fold(0.0, |total, item| total + item.amount)
    }
}

fn parse_decimal(field: ItemField, raw: &str) -> Result<f64, InvalidInputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| InvalidInputError {
            field,
            value: raw.to_string(),
            expected: "number",
        })
}

fn parse_count(raw: &str) -> Result<i64, InvalidInputError> {
    raw.trim().parse::<i64>().map_err(|_| InvalidInputError {
        field: ItemField::Count,
        value: raw.to_string(),
        expected: "whole number",
    })
}
