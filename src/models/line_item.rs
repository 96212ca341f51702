/// One row of the invoice. Built only by `Ledger::append` and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub serial_number: u32,
    pub size: String,
    pub description: String,
    /// Quantity after conversion to meters
    pub normalized_quantity: f64,
    pub rate: f64,
    pub quantity_count: i64,
    pub amount: f64,
}

/// Item fields exactly as entered, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLineItem {
    pub size: String,
    pub description: String,
    pub quantity: String,
    pub rate: String,
    pub count: String,
}
