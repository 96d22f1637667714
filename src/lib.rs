pub mod cli;
pub mod datafusion;
pub mod output;
pub mod storage;

pub use self::datafusion::{
    create_temp_tables, DataFusionContext, DataFusionError, Result as DataFusionResult,
    TempTableLoader, TempViewSession,
};
pub use storage::table::{Column, DataType, Schema, Table, Value};
