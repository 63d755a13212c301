//! Tabular source reader.
//!
//! Parses delimited text into [`RawRow`]s. The header row is resolved once,
//! up front, against [`HEADER_TABLE`]; a source missing one of the
//! [`REQUIRED_FIELDS`] is rejected before any data row is read.
//!
//! Handling rules:
//!
//! - A leading UTF-8 byte-order mark is stripped.
//! - Header names are matched after trimming surrounding whitespace.
//! - Columns with unrecognized headers are ignored (and reported).
//! - Fully empty lines are skipped.
//! - Rows shorter than the header leave the trailing fields absent; extra
//!   cells are ignored.
//! - Cell values are kept untrimmed.

use thiserror::Error;

use crate::models::{Field, RawRow};

/// Recognized header names: source-language headers first, then English
/// aliases.
pub const HEADER_TABLE: &[(&str, Field)] = &[
    ("หมวดหมู่", Field::Category),
    ("หัวข้อ", Field::Topic),
    ("กฎหมายที่ให้สิทธิ", Field::Law),
    ("รู้สิทธิตัวเอง", Field::Rights),
    ("วิธีสังเกตุ", Field::Identification),
    ("วิธีช่วยตัวเอง", Field::SelfHelp),
    ("remark", Field::Remark),
    ("category", Field::Category),
    ("topic", Field::Topic),
    ("law", Field::Law),
    ("knowYourRights", Field::Rights),
    ("howToIdentify", Field::Identification),
    ("selfHelp", Field::SelfHelp),
];

/// Fields whose header must be present.
pub const REQUIRED_FIELDS: &[Field] = &[Field::Category, Field::Topic];

/// Fatal errors raised while reading the tabular source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("malformed tabular source: {0}")]
    Csv(#[from] csv::Error),

    #[error("source is empty: expected a header row")]
    Empty,

    #[error("missing required header(s): {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("headers '{first}' and '{second}' both map to field '{field}'")]
    DuplicateHeader {
        field: &'static str,
        first: String,
        second: String,
    },
}

/// Look up the canonical field for a header name.
pub fn field_for_header(header: &str) -> Option<Field> {
    let name = header.trim();
    HEADER_TABLE
        .iter()
        .find(|(h, _)| *h == name)
        .map(|(_, f)| *f)
}

/// Mapping from column position to canonical field, validated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Option<Field>>,
    ignored: Vec<String>,
}

impl ColumnLayout {
    /// Resolve a header row. Fails if a required field is missing or two
    /// headers map to the same field.
    pub fn resolve<'a, I>(headers: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns = Vec::new();
        let mut ignored = Vec::new();
        let mut seen: Vec<(Field, String)> = Vec::new();

        for header in headers {
            match field_for_header(header) {
                Some(field) => {
                    if let Some((_, first)) = seen.iter().find(|(f, _)| *f == field) {
                        return Err(SourceError::DuplicateHeader {
                            field: field.as_str(),
                            first: first.clone(),
                            second: header.trim().to_string(),
                        });
                    }
                    seen.push((field, header.trim().to_string()));
                    columns.push(Some(field));
                }
                None => {
                    ignored.push(header.to_string());
                    columns.push(None);
                }
            }
        }

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !columns.contains(&Some(**f)))
            .map(|f| f.as_str().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::MissingHeaders(missing));
        }

        Ok(Self { columns, ignored })
    }

    /// Whether the source has a column for `field`.
    pub fn has(&self, field: Field) -> bool {
        self.columns.contains(&Some(field))
    }

    /// Optional fields with no column in this source.
    pub fn missing_optional(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !REQUIRED_FIELDS.contains(f) && !self.has(*f))
            .collect()
    }

    /// Header names that matched no known field.
    pub fn ignored_headers(&self) -> &[String] {
        &self.ignored
    }

    fn row_from<'a, I>(&self, cells: I) -> RawRow
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut row = RawRow::new();
        for (field, value) in self.columns.iter().zip(cells) {
            if let Some(field) = field {
                row.set(*field, value);
            }
        }
        row
    }
}

/// A parsed source: its column layout and data rows in file order.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub layout: ColumnLayout,
    pub rows: Vec<RawRow>,
}

/// Parse delimited text into a [`SourceTable`].
pub fn parse_source(input: &str, delimiter: u8) -> Result<SourceTable, SourceError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SourceError::Empty);
    }
    let layout = ColumnLayout::resolve(headers.iter())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(layout.row_from(record.iter()));
    }

    Ok(SourceTable { layout, rows })
}
