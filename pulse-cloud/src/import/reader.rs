//! Raw row extraction from CSV and spreadsheet uploads

use std::borrow::Cow;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::ImportError;
use super::numbers::{parse_integer, parse_number};

/// One cell as read from the upload
///
/// Spreadsheet numbers stay numeric so they never go through the
/// locale-guessing text parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                Cow::Owned(format!("{v:.0}"))
            }
            Cell::Number(v) => Cow::Owned(v.to_string()),
        }
    }

    pub fn number(&self) -> f64 {
        match self {
            Cell::Empty => 0.0,
            Cell::Text(s) => parse_number(s),
            Cell::Number(v) if v.is_finite() => *v,
            Cell::Number(_) => 0.0,
        }
    }

    pub fn integer(&self) -> i64 {
        match self {
            Cell::Text(s) => parse_integer(s),
            _ => self.number().round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Detect by file extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

pub fn read_rows(bytes: &[u8], format: FileFormat) -> Result<Vec<Vec<Cell>>, ImportError> {
    match format {
        FileFormat::Csv => read_csv(bytes),
        FileFormat::Spreadsheet => read_spreadsheet(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ImportError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Unreadable(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

/// `;` wins over `,` only when the first line has more of them
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// First worksheet only
fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect())
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Text(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(FileFormat::from_filename("orders.CSV"), Some(FileFormat::Csv));
        assert_eq!(
            FileFormat::from_filename("Order.all.20240501_20240531.xlsx"),
            Some(FileFormat::Spreadsheet)
        );
        assert_eq!(FileFormat::from_filename("report.pdf"), None);
        assert_eq!(FileFormat::from_filename("no_extension"), None);
    }

    #[test]
    fn reads_csv_with_bom_and_quotes() {
        let csv = "\u{feff}Mã đơn hàng,Tên sản phẩm,Giá gốc\nA1,\"Áo, thun\",\"120.000\"\n";
        let rows = read_rows(csv.as_bytes(), FileFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Cell::Text("Mã đơn hàng".into()));
        assert_eq!(rows[1][1], Cell::Text("Áo, thun".into()));
        assert_eq!(rows[1][2].number(), 120_000.0);
    }

    #[test]
    fn reads_semicolon_csv_with_ragged_rows() {
        let csv = "Order ID;Quantity;Deal Price\nA1;2\nA2;1;12,5\n";
        let rows = read_rows(csv.as_bytes(), FileFormat::Csv).unwrap();
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[2][2].number(), 12.5);
    }

    #[test]
    fn garbage_spreadsheet_is_unreadable() {
        let err = read_rows(b"not a workbook", FileFormat::Spreadsheet).unwrap_err();
        assert!(matches!(err, ImportError::Unreadable(_)));
    }

    #[test]
    fn numeric_cells_render_as_plain_text() {
        assert_eq!(Cell::Number(240_512_345_678.0).text(), "240512345678");
        assert_eq!(Cell::Number(12.5).text(), "12.5");
        assert_eq!(Cell::Number(2.6).integer(), 3);
        assert!(Cell::Text("  ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }
}
