//! CSV export of the visible client list.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::domain::client::Client;
use crate::services::store::RecordStore;
use crate::services::{ServiceError, ServiceResult};

const BOM: &str = "\u{feff}";

const HEADERS: [&str; 9] = [
    "Name", "Company", "Email", "Phone", "Priority", "Stage", "Tags", "Notes", "Created",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub filename: String,
    /// UTF-8 text starting with a byte-order mark.
    pub content: String,
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("clients_export_{}.csv", date.format("%Y-%m-%d"))
}

fn flatten_lines(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_record(store: &RecordStore, client: &Client) -> [String; 9] {
    let contact = client.primary_contact();
    [
        client.name.to_string(),
        client.company_name.clone().unwrap_or_default(),
        contact
            .and_then(|c| c.email.as_ref())
            .map(|email| email.to_string())
            .unwrap_or_default(),
        contact.and_then(|c| c.phone.clone()).unwrap_or_default(),
        client.priority.to_string(),
        store
            .stage(client.stage_id)
            .map(|stage| stage.name.to_string())
            .unwrap_or_default(),
        store.tag_names(client).join("; "),
        client.notes.as_deref().map(flatten_lines).unwrap_or_default(),
        client.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

fn write_error(err: impl std::fmt::Display) -> ServiceError {
    log::error!("Failed to write CSV export: {err}");
    ServiceError::Internal(format!("failed to write CSV: {err}"))
}

/// Serializes `clients` in the given order. Every field is quoted; line breaks
/// in notes are flattened to spaces.
pub fn export_clients(
    store: &RecordStore,
    clients: &[&Client],
    today: NaiveDate,
) -> ServiceResult<CsvExport> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(BOM.as_bytes());

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(buffer);
    writer.write_record(HEADERS).map_err(write_error)?;
    for client in clients {
        writer
            .write_record(to_record(store, client))
            .map_err(write_error)?;
    }

    let bytes = writer.into_inner().map_err(write_error)?;
    let content = String::from_utf8(bytes).map_err(write_error)?;

    Ok(CsvExport {
        filename: export_filename(today),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{ClientListQuery, Contact};
    use crate::domain::types::{ContactEmail, Priority, TagId};
    use crate::services::import::{ColumnMapping, parse_csv};
    use crate::services::store::fixtures::{client, stage, tag};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn store_with(clients: Vec<Client>) -> RecordStore {
        RecordStore::with_records(
            vec![stage(1, "Lead", 0)],
            vec![tag(1, "vip"), tag(2, "cold")],
            clients,
            ClientListQuery::active(),
        )
    }

    #[test]
    fn filename_is_stamped_with_date() {
        assert_eq!(export_filename(today()), "clients_export_2026-10-19.csv");
    }

    #[test]
    fn write_failures_are_internal_errors() {
        assert!(matches!(
            write_error("buffer full"),
            ServiceError::Internal(message) if message.contains("buffer full")
        ));
    }

    #[test]
    fn output_has_bom_quoted_header_and_resolved_names() {
        let mut acme = client(1, "Acme", 1);
        acme.company_name = Some("Acme \"Big\" Corp".to_string());
        acme.tags = [TagId::new(1).unwrap(), TagId::new(2).unwrap()].into();
        acme.contacts = vec![Contact::new(
            "Ann".into(),
            Some(ContactEmail::new("ann@acme.test").unwrap()),
            Some("555".into()),
            true,
        )];
        acme.notes = Some("line one\r\nline two".to_string());
        let store = store_with(vec![acme]);
        let visible: Vec<&Client> = store.clients().iter().collect();

        let export = export_clients(&store, &visible, today()).unwrap();

        assert!(export.content.starts_with(BOM));
        let mut lines = export.content.trim_start_matches(BOM).split("\r\n");
        assert_eq!(
            lines.next().unwrap(),
            r#""Name","Company","Email","Phone","Priority","Stage","Tags","Notes","Created""#
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(
            r#""Acme","Acme ""Big"" Corp","ann@acme.test","555","medium","Lead","cold; vip","line one line two","#
        ));
    }

    #[test]
    fn reimport_keeps_name_company_and_priority() {
        let mut acme = client(1, "Acme", 1);
        acme.company_name = Some("Acme, Inc".to_string());
        acme.priority = Priority::Vip;
        let store = store_with(vec![acme, client(2, "Globex", 1)]);
        let visible: Vec<&Client> = store.clients().iter().collect();

        let export = export_clients(&store, &visible, today()).unwrap();
        let table = parse_csv(&export.content).unwrap();
        let mapping = ColumnMapping::auto_map(&table.headers);

        assert_eq!(table.rows.len(), 2);
        let name = mapping.name.unwrap();
        let company = mapping.company.unwrap();
        let priority = mapping.priority.unwrap();
        assert_eq!(table.rows[0][name], "Acme");
        assert_eq!(table.rows[0][company], "Acme, Inc");
        assert_eq!(table.rows[0][priority], "vip");
        assert_eq!(table.rows[1][company], "");
        assert_eq!(table.rows[1][priority], "medium");
    }
}
