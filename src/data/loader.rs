use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::DatasetError;
use crate::models::Candle;

/// Header positions of the required columns. Missing ones are reported in
/// field order.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(DatasetError::MissingColumn(name))
        };

        Ok(Self {
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

/// Load an OHLCV table with a header row into ordered candles.
///
/// Extra columns are ignored. Checks run in this order: file exists, CSV is
/// well formed, at least one data row, all required columns present, every
/// required cell is a finite number.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| DatasetError::InvalidFormat(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::InvalidFormat(e.to_string()))?
        .clone();

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatasetError::InvalidFormat(e.to_string()))?;

    if headers.is_empty() || records.is_empty() {
        return Err(DatasetError::Empty);
    }

    let columns = ColumnIndex::resolve(&headers)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_candle(index, record, &columns))
        .collect()
}

fn parse_candle(
    index: usize,
    record: &StringRecord,
    columns: &ColumnIndex,
) -> Result<Candle, DatasetError> {
    let cell = |position: usize, column: &'static str| -> Result<f64, DatasetError> {
        let raw = record.get(position).unwrap_or_default();
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(DatasetError::InvalidValue {
                row: index + 1,
                column,
                raw: raw.to_string(),
            }),
        }
    };

    Ok(Candle::new(
        index,
        cell(columns.open, "open")?,
        cell(columns.high, "high")?,
        cell(columns.low, "low")?,
        cell(columns.close, "close")?,
        cell(columns.volume, "volume")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_csv() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-01,1.0,1.5,0.5,1.2,100\n\
             2024-01-02,1.2,1.8,1.1,1.7,200\n",
        );

        let candles = load_candles(file.path()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].index, 0);
        assert_eq!(candles[1].index, 1);
        assert_eq!(candles[1].close, 1.7);
        assert_eq!(candles[1].volume, 200.0);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let file = write_csv("close,volume,low,high,open\n5,10,4,6,4.5\n");

        let candles = load_candles(file.path()).unwrap();
        assert_eq!(candles[0], Candle::new(0, 4.5, 6.0, 4.0, 5.0, 10.0));
    }

    #[test]
    fn test_missing_file() {
        let result = load_candles(Path::new("/definitely/not/here/data.csv"));
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn test_missing_volume_column() {
        let file = write_csv("open,high,low,close\n1,2,0.5,1.5\n");

        let err = load_candles(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required column: volume");
    }

    #[test]
    fn test_header_only_is_empty() {
        let file = write_csv("open,high,low,close,volume\n");

        let result = load_candles(file.path());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_zero_byte_file_is_empty() {
        let file = write_csv("");

        let result = load_candles(file.path());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_ragged_row_is_format_error() {
        let file = write_csv("open,high,low,close,volume\n1,2,0.5,1.5,10\n1,2\n");

        let result = load_candles(file.path());
        assert!(matches!(result, Err(DatasetError::InvalidFormat(_))));
    }

    #[test]
    fn test_non_numeric_close() {
        let file = write_csv("open,high,low,close,volume\n1,2,0.5,1.5,10\n1,2,0.5,abc,10\n");

        let err = load_candles(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' in column 'close' at row 2"
        );
    }

    #[test]
    fn test_nan_rejected() {
        let file = write_csv("open,high,low,close,volume\n1,2,0.5,NaN,10\n");

        let result = load_candles(file.path());
        assert!(matches!(
            result,
            Err(DatasetError::InvalidValue { column: "close", .. })
        ));
    }
}
