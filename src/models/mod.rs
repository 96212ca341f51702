mod customer;
mod line_item;
mod unit;

pub use customer::CustomerRecord;
pub use line_item::{LineItem, RawLineItem};
pub use unit::{to_meters, Unit};
