use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType as ArrowDataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::storage::table::{Column, DataType, Row, Schema, Table, Value};

use super::error::{DataFusionError, Result};

/// Flattens engine output into a [`Table`] of runtime-tagged values.
pub fn record_batch_to_table(
    table_name: impl Into<String>,
    batches: Vec<RecordBatch>,
) -> Result<Table> {
    let first = batches.first().ok_or_else(|| {
        DataFusionError::Conversion("No record batches to convert".to_string())
    })?;

    let schema = convert_schema(&first.schema())?;
    let total_rows = batches.iter().map(|b| b.num_rows()).sum();
    let mut rows = Vec::with_capacity(total_rows);

    for batch in &batches {
        for row_idx in 0..batch.num_rows() {
            let values = batch
                .columns()
                .iter()
                .map(|array| convert_array_value(array, row_idx))
                .collect::<Result<Vec<_>>>()?;
            rows.push(Row::new(values));
        }
    }

    Ok(Table::with_rows(table_name, schema, rows))
}

pub fn convert_schema(arrow_schema: &arrow::datatypes::Schema) -> Result<Schema> {
    let columns = arrow_schema
        .fields()
        .iter()
        .map(|field| Column::new(field.name().clone(), convert_data_type(field.data_type())))
        .collect();

    Ok(Schema::new(columns))
}

fn convert_data_type(arrow_type: &ArrowDataType) -> DataType {
    match arrow_type {
        t if t.is_integer() => DataType::Integer,
        t if t.is_floating() => DataType::Float,
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Null => DataType::Null,
        // Text, dates and timestamps all surface as strings
        _ => DataType::String,
    }
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DataFusionError::Conversion(format!(
            "array does not match its declared type {}",
            array.data_type()
        ))
    })
}

fn convert_array_value(array: &ArrayRef, index: usize) -> Result<Value> {
    if array.is_null(index) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        ArrowDataType::Int8 => Value::Integer(downcast::<Int8Array>(array)?.value(index) as i64),
        ArrowDataType::Int16 => Value::Integer(downcast::<Int16Array>(array)?.value(index) as i64),
        ArrowDataType::Int32 => Value::Integer(downcast::<Int32Array>(array)?.value(index) as i64),
        ArrowDataType::Int64 => Value::Integer(downcast::<Int64Array>(array)?.value(index)),
        ArrowDataType::UInt8 => Value::Integer(downcast::<UInt8Array>(array)?.value(index) as i64),
        ArrowDataType::UInt16 => {
            Value::Integer(downcast::<UInt16Array>(array)?.value(index) as i64)
        }
        ArrowDataType::UInt32 => {
            Value::Integer(downcast::<UInt32Array>(array)?.value(index) as i64)
        }
        ArrowDataType::UInt64 => {
            let raw = downcast::<UInt64Array>(array)?.value(index);
            let value = i64::try_from(raw).map_err(|_| {
                DataFusionError::Conversion(format!("unsigned value {} exceeds i64", raw))
            })?;
            Value::Integer(value)
        }
        ArrowDataType::Float32 => {
            Value::Float(downcast::<Float32Array>(array)?.value(index) as f64)
        }
        ArrowDataType::Float64 => Value::Float(downcast::<Float64Array>(array)?.value(index)),
        ArrowDataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array)?.value(index)),
        ArrowDataType::Utf8 => {
            Value::String(downcast::<StringArray>(array)?.value(index).to_string())
        }
        ArrowDataType::LargeUtf8 => {
            Value::String(downcast::<LargeStringArray>(array)?.value(index).to_string())
        }
        ArrowDataType::Date32 => {
            let days = downcast::<Date32Array>(array)?.value(index);
            let date = NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
                .ok_or_else(|| out_of_range(days as i64))?;
            Value::String(date.format("%Y-%m-%d").to_string())
        }
        ArrowDataType::Date64 => {
            let millis = downcast::<Date64Array>(array)?.value(index);
            let datetime =
                DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| out_of_range(millis))?;
            Value::String(datetime.format("%Y-%m-%d").to_string())
        }
        ArrowDataType::Timestamp(unit, _) => Value::String(format_timestamp(array, unit, index)?),
        ArrowDataType::Null => Value::Null,
        _ => Value::String(format!("{:?}", array.slice(index, 1))),
    };

    Ok(value)
}

fn format_timestamp(array: &ArrayRef, unit: &TimeUnit, index: usize) -> Result<String> {
    let (raw, datetime, pattern): (i64, Option<NaiveDateTime>, &str) = match unit {
        TimeUnit::Second => {
            let raw = downcast::<TimestampSecondArray>(array)?.value(index);
            (raw, DateTime::<Utc>::from_timestamp(raw, 0).map(|d| d.naive_utc()), "%Y-%m-%d %H:%M:%S")
        }
        TimeUnit::Millisecond => {
            let raw = downcast::<TimestampMillisecondArray>(array)?.value(index);
            (
                raw,
                DateTime::<Utc>::from_timestamp_millis(raw).map(|d| d.naive_utc()),
                "%Y-%m-%d %H:%M:%S%.3f",
            )
        }
        TimeUnit::Microsecond => {
            let raw = downcast::<TimestampMicrosecondArray>(array)?.value(index);
            (
                raw,
                DateTime::<Utc>::from_timestamp_micros(raw).map(|d| d.naive_utc()),
                "%Y-%m-%d %H:%M:%S%.6f",
            )
        }
        TimeUnit::Nanosecond => {
            let raw = downcast::<TimestampNanosecondArray>(array)?.value(index);
            (
                raw,
                Some(DateTime::<Utc>::from_timestamp_nanos(raw).naive_utc()),
                "%Y-%m-%d %H:%M:%S%.9f",
            )
        }
    };

    datetime
        .map(|d| d.format(pattern).to_string())
        .ok_or_else(|| out_of_range(raw))
}

fn out_of_range(raw: i64) -> DataFusionError {
    DataFusionError::Conversion(format!("temporal value {} is out of range", raw))
}
