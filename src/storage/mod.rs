pub mod table;

pub use table::{Column, DataType, Row, Schema, Table, Value};
