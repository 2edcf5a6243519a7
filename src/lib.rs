#![doc(test(attr(deny(warnings))))]

//! Report Core provides the currency formatting and report persistence helpers
//! behind the expense-report screens.
//!
//! ```
//! use report_core::currency::{format_currency_string, get_grand_total};
//!
//! assert_eq!(format_currency_string("1234.5 USD"), "1,234.50 USD");
//! assert_eq!(get_grand_total("4000 KHR", "1 USD", "USD"), "2.00 USD");
//! ```

pub mod config;
pub mod currency;
pub mod errors;
pub mod storage;
pub mod utils;

pub use config::{ConfigManager, ReportConfig};
pub use currency::{format_currency_string, get_grand_total};
pub use errors::{ConfigError, CurrencyError, StorageError};
pub use storage::{JsonFileBackend, KeyValueBackend, MemoryBackend, ReportStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Report Core tracing initialized.");
    });
}
