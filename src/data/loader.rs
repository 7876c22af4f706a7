use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{HouseDataset, HouseRecord};
use crate::error::DashboardError;

/// Columns every source must provide. Any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = ["location", "house_type", "bedrooms", "price", "date"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the house sale records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required columns (the default source)
/// * `.json`    – `[{ "location": ..., "price": ..., ... }, ...]`
/// * `.parquet` – one column per field; dates as `Date32`, timestamps or text
///
/// Every failure is reported as [`DashboardError::DataUnavailable`].
pub fn load_file(path: &Path) -> Result<HouseDataset, DashboardError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow!("Unsupported file extension: .{other}")),
    };

    records
        .map(HouseDataset::from_records)
        .map_err(|e| DashboardError::data_unavailable(path, &e))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<HouseRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: HashMap<String, usize> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let mut idx = [0usize; 5];
    for (slot, col) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *headers
            .get(col)
            .with_context(|| format!("CSV missing '{col}' column"))?;
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let record = csv_record(&row, idx).with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(records)
}

fn csv_record(row: &csv::StringRecord, idx: [usize; 5]) -> Result<HouseRecord> {
    let [loc_idx, type_idx, bed_idx, price_idx, date_idx] = idx;
    let field = |i: usize| row.get(i).unwrap_or("").trim();

    Ok(HouseRecord {
        location: field(loc_idx).to_string(),
        house_type: field(type_idx).to_string(),
        bedrooms: parse_bedrooms(field(bed_idx))?,
        price: parse_price(field(price_idx))?,
        date: parse_date(field(date_idx))?,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "location": "Pune", "house_type": "Villa", "bedrooms": 3,
///     "price": 5400000, "date": "2022-03-14" },
///   ...
/// ]
/// ```
///
/// Numeric dates are epoch milliseconds, the pandas default.
fn load_json(path: &Path) -> Result<Vec<HouseRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            json_record(obj).with_context(|| format!("Row {i}"))
        })
        .collect()
}

fn json_record(obj: &serde_json::Map<String, JsonValue>) -> Result<HouseRecord> {
    let get = |col: &str| {
        obj.get(col)
            .filter(|v| !v.is_null())
            .with_context(|| format!("missing '{col}'"))
    };

    let date = match get("date")? {
        JsonValue::Number(n) => {
            let ms = n.as_i64().context("date is not an integer timestamp")?;
            DateTime::from_timestamp_millis(ms)
                .map(|dt| dt.date_naive())
                .with_context(|| format!("timestamp {ms} out of range"))?
        }
        other => parse_date(&json_text(other))?,
    };

    Ok(HouseRecord {
        location: json_text(get("location")?),
        house_type: json_text(get("house_type")?),
        bedrooms: parse_bedrooms(&json_text(get("bedrooms")?))?,
        price: parse_price(&json_text(get("price")?))?,
        date,
    })
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Columns are cast to a common type before reading, so integer prices,
/// `Int32` bedrooms, `Date64` or timestamp dates all work.
fn load_parquet(path: &Path) -> Result<Vec<HouseRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    // A file with no rows yields no batches, so the schema is checked up front.
    for name in REQUIRED_COLUMNS {
        if builder.schema().index_of(name).is_err() {
            bail!("Parquet file missing '{name}' column");
        }
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<ArrayRef> {
            let i = schema
                .index_of(name)
                .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
            Ok(batch.column(i).clone())
        };

        let location = cast(column("location")?.as_ref(), &DataType::Utf8)
            .context("casting 'location' to text")?;
        let house_type = cast(column("house_type")?.as_ref(), &DataType::Utf8)
            .context("casting 'house_type' to text")?;
        let bedrooms = cast(column("bedrooms")?.as_ref(), &DataType::Float64)
            .context("casting 'bedrooms' to float")?;
        let price = cast(column("price")?.as_ref(), &DataType::Float64)
            .context("casting 'price' to float")?;
        let date = date_column(column("date")?)?;

        let location = location.as_string::<i32>();
        let house_type = house_type.as_string::<i32>();
        let bedrooms = bedrooms.as_primitive::<Float64Type>();
        let price = price.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let record = read_parquet_row(row, location, house_type, bedrooms, price, &date)
                .with_context(|| format!("Row {row}"))?;
            records.push(record);
        }
    }

    Ok(records)
}

/// Text dates stay text and go through [`parse_date`]; everything else is
/// cast to `Date32`.
enum DateColumn {
    Text(ArrayRef),
    Days(ArrayRef),
}

fn date_column(col: ArrayRef) -> Result<DateColumn> {
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(DateColumn::Text(
            cast(col.as_ref(), &DataType::Utf8).context("casting 'date' to text")?,
        )),
        _ => Ok(DateColumn::Days(
            cast(col.as_ref(), &DataType::Date32).context("casting 'date' to Date32")?,
        )),
    }
}

fn read_parquet_row(
    row: usize,
    location: &arrow::array::StringArray,
    house_type: &arrow::array::StringArray,
    bedrooms: &arrow::array::Float64Array,
    price: &arrow::array::Float64Array,
    date: &DateColumn,
) -> Result<HouseRecord> {
    for (name, col) in [
        ("location", location as &dyn Array),
        ("house_type", house_type as &dyn Array),
        ("bedrooms", bedrooms as &dyn Array),
        ("price", price as &dyn Array),
    ] {
        if col.is_null(row) {
            bail!("null '{name}'");
        }
    }

    let date = match date {
        DateColumn::Text(arr) => {
            if arr.is_null(row) {
                bail!("null 'date'");
            }
            parse_date(arr.as_string::<i32>().value(row))?
        }
        DateColumn::Days(arr) => {
            if arr.is_null(row) {
                bail!("null 'date'");
            }
            arr.as_primitive::<Date32Type>()
                .value_as_date(row)
                .context("date out of range")?
        }
    };

    Ok(HouseRecord {
        location: location.value(row).trim().to_string(),
        house_type: house_type.value(row).trim().to_string(),
        bedrooms: bedrooms_from_f64(bedrooms.value(row))?,
        price: check_price(price.value(row))?,
        date,
    })
}

// ---------------------------------------------------------------------------
// Cell parsers shared by all formats
// ---------------------------------------------------------------------------

fn parse_bedrooms(s: &str) -> Result<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Ok(n);
    }
    let v = s
        .parse::<f64>()
        .with_context(|| format!("bedrooms '{s}' is not a number"))?;
    bedrooms_from_f64(v)
}

/// Accepts integral floats such as `3.0`, which pandas writes for columns
/// that once held nulls.
fn bedrooms_from_f64(v: f64) -> Result<u32> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        bail!("bedrooms {v} is not a non-negative whole number")
    }
}

fn parse_price(s: &str) -> Result<f64> {
    let v = s
        .parse::<f64>()
        .with_context(|| format!("price '{s}' is not a number"))?;
    check_price(v)
}

fn check_price(v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        bail!("price {v} must be finite and non-negative")
    }
}

/// Parse a calendar date; a time-of-day part, if present, is dropped.
/// Ambiguous numeric dates are month-first.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    let s = s.trim();
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    bail!("Invalid date '{s}'. Expected YYYY-MM-DD, YYYY/MM/DD, MM-DD-YYYY or MM/DD/YYYY")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;
    use crate::data::model::tests::date;

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    fn reason(err: DashboardError) -> String {
        match err {
            DashboardError::DataUnavailable { reason, .. } => reason,
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let tmp = temp_file(
            ".csv",
            "id,location,house_type,bedrooms,price,date,area\n\
             1,Pune,Villa,4,8500000,2022-03-14,2400\n\
             2,Delhi,Apartment,2,4200000.5,2021-11-02 10:30:00,900\n",
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].location, "Pune");
        assert_eq!(ds.records[0].bedrooms, 4);
        assert_eq!(ds.records[1].price, 4200000.5);
        assert_eq!(ds.records[1].date, date(2021, 11, 2));
    }

    #[test]
    fn missing_column_is_data_unavailable() {
        let tmp = temp_file(".csv", "location,house_type,bedrooms,date\nPune,Villa,3,2022-01-01\n");
        let msg = reason(load_file(tmp.path()).unwrap_err());
        assert!(msg.contains("'price'"), "{msg}");
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = load_file(Path::new("/nonexistent/house_prices.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn malformed_cells_are_rejected() {
        for body in [
            "Pune,Villa,3,abc,2022-01-01",
            "Pune,Villa,3,-5,2022-01-01",
            "Pune,Villa,-1,100,2022-01-01",
            "Pune,Villa,2.5,100,2022-01-01",
            "Pune,Villa,3,100,not-a-date",
        ] {
            let tmp = temp_file(".csv", &format!("location,house_type,bedrooms,price,date\n{body}\n"));
            let msg = reason(load_file(tmp.path()).unwrap_err());
            assert!(msg.contains("CSV row 0"), "{msg}");
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = temp_file(".xlsx", "");
        let msg = reason(load_file(tmp.path()).unwrap_err());
        assert!(msg.contains(".xlsx"), "{msg}");
    }

    #[test]
    fn loads_json_records_with_epoch_dates() {
        let tmp = temp_file(
            ".json",
            r#"[
                {"location": "Pune", "house_type": "Villa", "bedrooms": 3.0, "price": 100, "date": "2022-05-01"},
                {"location": "Goa", "house_type": "Flat", "bedrooms": 1, "price": 50.5, "date": 1640995200000}
            ]"#,
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.records[0].bedrooms, 3);
        assert_eq!(ds.records[1].date, date(2022, 1, 1));
        assert_eq!(ds.records[1].price, 50.5);
    }

    #[test]
    fn loads_parquet_with_date32_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("location", DataType::Utf8, false),
            Field::new("house_type", DataType::Utf8, false),
            Field::new("bedrooms", DataType::Int64, false),
            Field::new("price", DataType::Int64, false),
            Field::new("date", DataType::Date32, false),
        ]));
        // 19000 days after the epoch is 2022-01-08.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Pune", "Goa"])),
                Arc::new(StringArray::from(vec!["Villa", "Flat"])),
                Arc::new(Int64Array::from(vec![3, 2])),
                Arc::new(Int64Array::from(vec![700, 300])),
                Arc::new(Date32Array::from(vec![19000, 19001])),
            ],
        )
        .unwrap();

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let file = std::fs::File::create(tmp.path()).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].price, 700.0);
        assert_eq!(ds.records[0].date, date(2022, 1, 8));
        assert_eq!(ds.records[1].house_type, "Flat");
    }

    #[test]
    fn empty_parquet_missing_column_is_data_unavailable() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("location", DataType::Utf8, false),
            Field::new("house_type", DataType::Utf8, false),
            Field::new("bedrooms", DataType::Int64, false),
            Field::new("date", DataType::Date32, false),
        ]));

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let file = std::fs::File::create(tmp.path()).unwrap();
        let writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.close().unwrap();

        let msg = reason(load_file(tmp.path()).unwrap_err());
        assert!(msg.contains("'price'"), "{msg}");
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        assert_eq!(parse_date("2023-02-01").unwrap(), date(2023, 2, 1));
        assert_eq!(parse_date("2023/02/01").unwrap(), date(2023, 2, 1));
        assert_eq!(parse_date("01-02-2023").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_date("01/02/2023").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_date("12/31/2023").unwrap(), date(2023, 12, 31));
        assert!(parse_date("31/12/2023").is_err());
        assert_eq!(parse_date("2023-02-01T08:00:00").unwrap(), date(2023, 2, 1));
        assert_eq!(parse_date("2023-02-01T08:00:00+05:30").unwrap(), date(2023, 2, 1));
        assert!(parse_date("February").is_err());
    }
}
