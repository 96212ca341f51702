pub mod config;
pub mod invoice_gen;
pub mod ledger;
pub mod models;
pub mod ui;
