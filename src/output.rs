use std::fmt::Write;

use arrow::record_batch::RecordBatch;

use crate::cli::OutputFormat;
use crate::datafusion::{record_batch_to_table, DataFusionError, Result};
use crate::storage::table::Table;

/// Renders query output. Batches must carry at least one (possibly empty)
/// batch so the column header survives an empty result.
pub fn render(batches: &[RecordBatch], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let table = record_batch_to_table("result", batches.to_vec())?;
            Ok(render_table(&table))
        }
        OutputFormat::Csv => render_csv(batches),
        OutputFormat::Json => render_json(batches),
    }
}

pub fn render_table(table: &Table) -> String {
    let mut out = String::new();
    if table.row_count() == 0 {
        out.push_str("(0 rows)\n");
        return out;
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.values.iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .fold(col.name.len(), usize::max)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:w$}", v, w = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let _ = writeln!(out, "{}", line(table.schema.column_names()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &cells {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    let _ = writeln!(out, "({} rows)", table.row_count());
    out
}

pub fn render_csv(batches: &[RecordBatch]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = arrow::csv::Writer::new(&mut buf);
        for batch in batches {
            writer.write(batch)?;
        }
    }
    into_string(buf)
}

pub fn render_json(batches: &[RecordBatch]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = arrow::json::ArrayWriter::new(&mut buf);
        for batch in batches {
            writer.write(batch)?;
        }
        writer.finish()?;
    }
    let mut out = into_string(buf)?;
    out.push('\n');
    Ok(out)
}

fn into_string(buf: Vec<u8>) -> Result<String> {
    String::from_utf8(buf).map_err(|e| DataFusionError::Conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType as ArrowDataType, Field, Schema as ArrowSchema};
    use std::sync::Arc;

    fn products() -> RecordBatch {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("sku", ArrowDataType::Utf8, false),
            Field::new("price", ArrowDataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["P1", "P,2"])),
                Arc::new(Float64Array::from(vec![Some(9.99), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_render_table() {
        let out = render(&[products()], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "sku | price");
        assert_eq!(lines[1], "----+------");
        assert_eq!(lines[2], "P1  | 9.99 ");
        assert_eq!(lines[3], "P,2 | NULL ");
        assert_eq!(lines[lines.len() - 1], "(2 rows)");
    }

    #[test]
    fn test_render_csv_quotes_delimiters() {
        let out = render_csv(&[products()]).unwrap();
        assert_eq!(out, "sku,price\nP1,9.99\n\"P,2\",\n");
    }

    #[test]
    fn test_render_json() {
        let out = render_json(&[products()]).unwrap();
        assert_eq!(out, "[{\"sku\":\"P1\",\"price\":9.99},{\"sku\":\"P,2\"}]\n");
    }

    #[test]
    fn test_empty_result_keeps_header() {
        let empty = RecordBatch::new_empty(products().schema());
        assert_eq!(render(&[empty.clone()], OutputFormat::Table).unwrap(), "(0 rows)\n");
        assert_eq!(render_csv(&[empty]).unwrap(), "sku,price\n");
    }
}
