use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, post, web};
use serde::Serialize;

use crate::forms::import::ImportClientsForm;
use crate::repository::DieselRepository;
use crate::routes::{SharedSession, lock_session};
use crate::services::ServiceError;
use crate::services::import::{ColumnMapping, import_csv, parse_csv};

#[derive(Serialize)]
struct ImportPreview {
    headers: Vec<String>,
    mapping: ColumnMapping,
    rows: usize,
}

/// Parses an upload without committing it and proposes a column mapping the
/// caller may adjust before importing.
#[post("/import/preview")]
pub async fn preview_import(
    MultipartForm(form): MultipartForm<ImportClientsForm>,
) -> Result<HttpResponse, ServiceError> {
    let table = parse_csv(&form.read_csv()?)?;
    let mapping = match form.mapping()? {
        Some(mapping) => mapping,
        None => ColumnMapping::auto_map(&table.headers),
    };

    Ok(HttpResponse::Ok().json(ImportPreview {
        rows: table.rows.len(),
        headers: table.headers,
        mapping,
    }))
}

#[post("/import")]
pub async fn import_clients(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    MultipartForm(form): MultipartForm<ImportClientsForm>,
) -> Result<HttpResponse, ServiceError> {
    let text = form.read_csv()?;
    let mapping = form.mapping()?;

    let mut guard = lock_session(&session)?;
    if guard.store.stages().is_empty() {
        guard.store.load_stages(repo.get_ref())?;
    }
    let summary = import_csv(repo.get_ref(), &mut guard.store, &text, mapping)?;

    Ok(HttpResponse::Ok().json(summary))
}
