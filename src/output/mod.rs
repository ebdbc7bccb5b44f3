//! Output formatting for listing records and groups
//!
//! Records are printed either as JSON (through `serde_json`) or as the
//! labelled text summary produced by this module.

mod summary;

pub use summary::{
    format_brand, format_fulfillment, format_groups, format_rank, format_record, format_stock,
    format_unavailable, PLACEHOLDER,
};
