//! Fixed single-page invoice layout.
//!
//! Coordinates are PDF points measured from the bottom-left corner of an A4
//! page. There is no pagination: rows that run past the bottom margin fall off
//! the page.

use crate::models::{CustomerRecord, LineItem};

pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;

pub const TITLE: &str = "HVAC Ducting Invoice";
pub const TITLE_X: f64 = 100.0;
pub const TITLE_Y: f64 = 800.0;
pub const TITLE_SIZE: f64 = 16.0;

pub const LOGO_X: f64 = 450.0;
pub const LOGO_Y: f64 = 770.0;
pub const LOGO_WIDTH: f64 = 80.0;
pub const LOGO_HEIGHT: f64 = 50.0;

pub const CUSTOMER_X: f64 = 100.0;
pub const CUSTOMER_TOP_Y: f64 = 760.0;
pub const CUSTOMER_LINE_STEP: f64 = 20.0;
pub const CUSTOMER_SIZE: f64 = 12.0;

pub const TABLE_HEADER_Y: f64 = 680.0;
pub const TABLE_SIZE: f64 = 10.0;
pub const ROW_STEP: f64 = 20.0;

pub const COLUMNS: [(&str, f64); 7] = [
    ("S.No", 50.0),
    ("Size", 100.0),
    ("Description", 180.0),
    ("Sq.Ft", 280.0),
    ("Rate", 340.0),
    ("Quantity", 400.0),
    ("Amount", 470.0),
];

pub const TOTAL_X: f64 = 400.0;

pub const FOOTER: &str = "Thank you for your business!";
pub const FOOTER_X: f64 = 100.0;
pub const FOOTER_Y: f64 = 50.0;
pub const FOOTER_SIZE: f64 = 10.0;

pub const CURRENCY: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Oblique,
}

/// A single line of text placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub face: Face,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl TextRun {
    fn new(face: Face, size: f64, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            face,
            size,
            x,
            y,
            text: text.into(),
        }
    }
}

pub fn format_money(value: f64) -> String {
    format!("{}{:.2}", CURRENCY, value)
}

pub fn total_line(total: f64) -> String {
    format!("Total Amount: {}", format_money(total))
}

/// Lay out every text element of the invoice, top to bottom.
///
/// The logo is not part of the run list; it sits at `LOGO_X`/`LOGO_Y`.
pub fn compose(customer: &CustomerRecord, items: &[LineItem], total: f64) -> Vec<TextRun> {
    let mut runs = Vec::with_capacity(13 + items.len() * COLUMNS.len());

    runs.push(TextRun::new(Face::Bold, TITLE_SIZE, TITLE_X, TITLE_Y, TITLE));

    let customer_lines = [
        format!("Customer Name: {}", customer.name),
        format!("Address: {}", customer.address),
        format!("Contact: {}", customer.contact),
        format!("Email: {}", customer.email),
    ];
    for (i, line) in customer_lines.into_iter().enumerate() {
        let y = CUSTOMER_TOP_Y - CUSTOMER_LINE_STEP * i as f64;
        runs.push(TextRun::new(Face::Regular, CUSTOMER_SIZE, CUSTOMER_X, y, line));
    }

    let mut y = TABLE_HEADER_Y;
    for (label, x) in COLUMNS {
        runs.push(TextRun::new(Face::Bold, TABLE_SIZE, x, y, label));
    }

    y -= ROW_STEP;
    for item in items {
        let cells = [
            item.serial_number.to_string(),
            item.size.clone(),
            item.description.clone(),
            format!("{:.2}", item.normalized_quantity),
            format!("{:.2}", item.rate),
            item.quantity_count.to_string(),
            format_money(item.amount),
        ];
        for (cell, (_, x)) in cells.into_iter().zip(COLUMNS) {
            runs.push(TextRun::new(Face::Regular, TABLE_SIZE, x, y, cell));
        }
        y -= ROW_STEP;
    }

    // one blank row between the table and the total
    y -= ROW_STEP;
    runs.push(TextRun::new(Face::Regular, TABLE_SIZE, TOTAL_X, y, total_line(total)));

    runs.push(TextRun::new(Face::Oblique, FOOTER_SIZE, FOOTER_X, FOOTER_Y, FOOTER));

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    fn customer() -> CustomerRecord {
        CustomerRecord {
            name: "Priya Raman".to_string(),
            address: "14 Mill Road".to_string(),
            contact: "555-0199".to_string(),
            email: "priya@example.com".to_string(),
        }
    }

    fn item(serial_number: u32, quantity: f64, rate: f64, count: i64) -> LineItem {
        LineItem {
            serial_number,
            size: "12in".to_string(),
            description: "Elbow".to_string(),
            normalized_quantity: quantity,
            rate,
            quantity_count: count,
            amount: quantity * rate * count as f64,
        }
    }

    fn texts(runs: &[TextRun]) -> Vec<&str> {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn empty_invoice_has_header_customer_table_header_and_zero_total() {
        let ledger = Ledger::new();
        let runs = compose(&customer(), ledger.items(), ledger.total());
        assert_eq!(
            texts(&runs),
            vec![
                "HVAC Ducting Invoice",
                "Customer Name: Priya Raman",
                "Address: 14 Mill Road",
                "Contact: 555-0199",
                "Email: priya@example.com",
                "S.No",
                "Size",
                "Description",
                "Sq.Ft",
                "Rate",
                "Quantity",
                "Amount",
                "Total Amount: $0.00",
                "Thank you for your business!",
            ]
        );
        let total = &runs[12];
        assert_eq!((total.x, total.y), (TOTAL_X, 640.0));
    }

    #[test]
    fn rows_are_formatted_and_stepped_down_the_page() {
        let items = [item(1, 2.0, 5.0, 3), item(2, 1.0, 10.0, 1)];
        let runs = compose(&customer(), &items, 40.0);

        let first_row: Vec<&TextRun> = runs.iter().filter(|r| r.y == 660.0).collect();
        assert_eq!(
            first_row.iter().map(|r| r.text.as_str()).collect::<Vec<_>>(),
            vec!["1", "12in", "Elbow", "2.00", "5.00", "3", "$30.00"]
        );
        assert!(first_row.iter().all(|r| r.face == Face::Regular && r.size == TABLE_SIZE));
        let xs: Vec<f64> = first_row.iter().map(|r| r.x).collect();
        assert_eq!(xs, COLUMNS.iter().map(|(_, x)| *x).collect::<Vec<_>>());

        let second_row: Vec<&str> = runs
            .iter()
            .filter(|r| r.y == 640.0)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(second_row, vec!["2", "12in", "Elbow", "1.00", "10.00", "1", "$10.00"]);

        let total = runs.iter().find(|r| r.text.starts_with("Total")).unwrap();
        assert_eq!(total.text, "Total Amount: $40.00");
        assert_eq!(total.y, 600.0);
    }

    #[test]
    fn fonts_follow_the_fixed_style_sheet() {
        let ledger = Ledger::new();
        let runs = compose(&customer(), ledger.items(), ledger.total());
        assert_eq!((runs[0].face, runs[0].size), (Face::Bold, 16.0));
        assert!(runs[1..5].iter().all(|r| r.face == Face::Regular && r.size == 12.0));
        assert!(runs[5..12].iter().all(|r| r.face == Face::Bold && r.size == 10.0));
        let footer = runs.last().unwrap();
        assert_eq!((footer.face, footer.size, footer.y), (Face::Oblique, 10.0, FOOTER_Y));
    }

    #[test]
    fn long_ledgers_run_off_the_page_instead_of_paginating() {
        let items: Vec<LineItem> = (1..=40).map(|n| item(n, 1.0, 1.0, 1)).collect();
        let runs = compose(&customer(), &items, 40.0);
        let total = runs.iter().find(|r| r.text.starts_with("Total")).unwrap();
        assert!(total.y < 0.0);
    }

    #[test]
    fn money_is_rounded_to_cents() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.5), "$1234.50");
        assert_eq!(format_money(0.125 + 0.0001), "$0.13");
    }
}
