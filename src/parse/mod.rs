//! Numeric fields derived from normalized text: date ranges and series ordinals.

pub mod date;
pub mod order;

pub use date::derive_date_range;
pub use order::extract_order;
