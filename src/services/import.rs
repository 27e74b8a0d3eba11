//! CSV import pipeline: parse, map columns, validate, then commit rows one by
//! one against the record store.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::domain::client::{Contact, NewClient};
use crate::domain::types::{ClientName, ContactEmail, Priority};
use crate::repository::ClientWriter;
use crate::services::store::RecordStore;
use crate::services::{ServiceError, ServiceResult};

const BOM: char = '\u{feff}';

/// Parsed CSV: the first non-blank record is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A line with no content at all. Rows of bare delimiters are data rows.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// Splits CSV text into a header row and positional data rows. Quoting
/// follows RFC 4180; both `\n` and `\r\n` line endings are accepted and blank
/// lines are dropped.
pub fn parse_csv(text: &str) -> ServiceResult<CsvTable> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| {
            log::warn!("Rejected CSV upload: {err}");
            ServiceError::Parse(err.to_string())
        })?;
        if !is_blank(&record) {
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
    }

    if records.len() < 2 {
        return Err(ServiceError::Parse(
            "a header row and at least one data row are required".to_string(),
        ));
    }

    let rows = records.split_off(1);
    let headers = records.remove(0);
    Ok(CsvTable { headers, rows })
}

/// Client fields a CSV column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportField {
    Name,
    Company,
    Email,
    Phone,
    Priority,
    Notes,
}

impl ImportField {
    pub const ALL: [ImportField; 6] = [
        ImportField::Name,
        ImportField::Company,
        ImportField::Email,
        ImportField::Phone,
        ImportField::Priority,
        ImportField::Notes,
    ];

    /// Lower-cased header spellings recognized by [`ColumnMapping::auto_map`].
    fn aliases(self) -> &'static [&'static str] {
        match self {
            ImportField::Name => &["name", "client name"],
            ImportField::Company => &["company", "company name"],
            ImportField::Email => &["email"],
            ImportField::Phone => &["phone"],
            ImportField::Priority => &["priority"],
            ImportField::Notes => &["notes"],
        }
    }
}

/// Zero-based column index feeding each field; `None` leaves it unmapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: Option<usize>,
    pub company: Option<usize>,
    pub email: Option<usize>,
    pub phone: Option<usize>,
    pub priority: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnMapping {
    /// Maps each field to the first header matching one of its aliases,
    /// ignoring case and surrounding whitespace.
    pub fn auto_map(headers: &[String]) -> Self {
        let mut mapping = Self::default();
        for field in ImportField::ALL {
            let column = headers.iter().position(|header| {
                let header = header.trim().to_lowercase();
                field.aliases().contains(&header.as_str())
            });
            mapping.set(field, column);
        }
        mapping
    }

    pub fn get(&self, field: ImportField) -> Option<usize> {
        match field {
            ImportField::Name => self.name,
            ImportField::Company => self.company,
            ImportField::Email => self.email,
            ImportField::Phone => self.phone,
            ImportField::Priority => self.priority,
            ImportField::Notes => self.notes,
        }
    }

    pub fn set(&mut self, field: ImportField, column: Option<usize>) {
        let slot = match field {
            ImportField::Name => &mut self.name,
            ImportField::Company => &mut self.company,
            ImportField::Email => &mut self.email,
            ImportField::Phone => &mut self.phone,
            ImportField::Priority => &mut self.priority,
            ImportField::Notes => &mut self.notes,
        };
        *slot = column;
    }

    /// Checks the mapping can be committed against `table`: `name` must be
    /// mapped and every mapped column must exist.
    pub fn validate(&self, table: &CsvTable) -> ServiceResult<()> {
        if self.name.is_none() {
            return Err(ServiceError::Mapping("the name column is not mapped".to_string()));
        }
        let width = table.headers.len();
        let out_of_range = ImportField::ALL.into_iter().find_map(|field| {
            self.get(field)
                .filter(|&column| column >= width)
                .map(|column| (field, column))
        });
        if let Some((field, column)) = out_of_range {
            return Err(ServiceError::Mapping(format!(
                "column {column} mapped to {field:?} does not exist"
            )));
        }
        Ok(())
    }

    fn has_contact_columns(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }

    fn cell<'a>(&self, row: &'a [String], field: ImportField) -> Option<&'a str> {
        self.get(field)
            .and_then(|column| row.get(column))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }
}

/// A data row the record store (or local validation) rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based index among data rows.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success_count: usize,
    pub error_count: usize,
    /// Rows without a name; ignored rather than counted as failures.
    pub skipped_count: usize,
    pub errors: Vec<RowError>,
}

/// Builds the client for one data row, or `None` when the row has no name.
fn row_to_client(
    row: &[String],
    mapping: &ColumnMapping,
    store: &RecordStore,
) -> ServiceResult<Option<NewClient>> {
    let Some(name) = mapping.cell(row, ImportField::Name) else {
        return Ok(None);
    };
    let client_name = ClientName::new(name)?;

    let priority = match mapping.cell(row, ImportField::Priority) {
        Some(value) => value.parse::<Priority>()?,
        None => Priority::default(),
    };

    let mut new_client = NewClient::new(
        client_name,
        mapping.cell(row, ImportField::Company).map(str::to_string),
        store.first_stage().map(|stage| stage.id),
        priority,
        mapping.cell(row, ImportField::Notes).map(str::to_string),
    );

    if mapping.has_contact_columns() {
        let email = mapping
            .cell(row, ImportField::Email)
            .map(ContactEmail::new)
            .transpose()?;
        let phone = mapping.cell(row, ImportField::Phone).map(str::to_string);
        new_client = new_client.with_contact(Contact::new(name.to_string(), email, phone, true));
    }

    Ok(Some(new_client))
}

/// Creates one client per data row, strictly in row order. Row failures are
/// counted and reported; they never abort the remaining rows. Created clients
/// are added to the record store.
pub fn commit_rows<R>(
    repo: &R,
    store: &mut RecordStore,
    table: &CsvTable,
    mapping: &ColumnMapping,
) -> ServiceResult<ImportSummary>
where
    R: ClientWriter + ?Sized,
{
    mapping.validate(table)?;

    let mut summary = ImportSummary::default();
    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 1;
        let created = row_to_client(row, mapping, store).and_then(|new_client| match new_client {
            Some(new_client) => Ok(Some(repo.create_client(&new_client)?)),
            None => Ok(None),
        });

        match created {
            Ok(Some(client)) => {
                summary.success_count += 1;
                store.apply_confirmed(client);
            }
            Ok(None) => summary.skipped_count += 1,
            Err(err) => {
                log::warn!("Import row {row_number} failed: {err}");
                summary.error_count += 1;
                summary.errors.push(RowError {
                    row: row_number,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "CSV import finished: {} created, {} failed, {} skipped",
        summary.success_count,
        summary.error_count,
        summary.skipped_count
    );
    Ok(summary)
}

/// Parses `text` and commits it with `mapping`, or with the auto-detected
/// mapping when none is given.
pub fn import_csv<R>(
    repo: &R,
    store: &mut RecordStore,
    text: &str,
    mapping: Option<ColumnMapping>,
) -> ServiceResult<ImportSummary>
where
    R: ClientWriter + ?Sized,
{
    let table = parse_csv(text)?;
    let mapping = mapping.unwrap_or_else(|| ColumnMapping::auto_map(&table.headers));
    commit_rows(repo, store, &table, &mapping)
}
