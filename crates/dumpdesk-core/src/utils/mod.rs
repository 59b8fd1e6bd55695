//! Utility functions for string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    date_input, format_currency, format_date, format_document, format_optional, format_phone,
    is_valid_date_input, truncate_string,
};
