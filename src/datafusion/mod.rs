mod context;
mod conversion;
mod error;
mod loader;

pub use context::{CsvOptions, DataFusionContext, SessionOptions};
pub use conversion::record_batch_to_table;
pub use error::{DataFusionError, ErrorKind, Result};
pub use loader::{
    create_temp_tables, TempTableLoader, TempViewSession, MERCHANTS_CSV, MERCHANTS_VIEW,
    PRODUCTS_CSV, PRODUCTS_VIEW, TEMP_TABLES,
};
