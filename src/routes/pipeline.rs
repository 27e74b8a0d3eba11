use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use chrono::Local;

use crate::dto::board::board_view;
use crate::dto::client::client_views;
use crate::forms::filter::FilterQuery;
use crate::repository::DieselRepository;
use crate::routes::{SharedSession, lock_session};
use crate::services::{ServiceError, ServiceResult};
use crate::services::export::export_clients;
use crate::services::session::PipelineSession;

/// Points the view at `query` and reloads the cache for it. Tag names are
/// resolved after the reload so freshly created tags are known.
fn apply_query(
    repo: &DieselRepository,
    session: &mut PipelineSession,
    query: &FilterQuery,
) -> ServiceResult<()> {
    session.view.set_show_trash(query.trash);
    session.view.filter.priority = query.priority()?;
    session.reload(repo)?;
    session.view.filter = query.to_filter(&session.store)?;
    Ok(())
}

#[get("/board")]
pub async fn show_board(
    query: web::Query<FilterQuery>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
) -> Result<HttpResponse, ServiceError> {
    let mut guard = lock_session(&session)?;
    apply_query(&repo, &mut guard, &query)?;

    let columns = guard.board(&Local::now());
    Ok(HttpResponse::Ok().json(board_view(&guard.store, columns)))
}

#[get("/clients")]
pub async fn list_clients(
    query: web::Query<FilterQuery>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
) -> Result<HttpResponse, ServiceError> {
    let mut guard = lock_session(&session)?;
    apply_query(&repo, &mut guard, &query)?;

    let visible = guard.visible(&Local::now());
    Ok(HttpResponse::Ok().json(client_views(&guard.store, &visible)))
}

#[get("/export")]
pub async fn export_csv(
    query: web::Query<FilterQuery>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
) -> Result<HttpResponse, ServiceError> {
    let mut guard = lock_session(&session)?;
    apply_query(&repo, &mut guard, &query)?;

    let now = Local::now();
    let visible = guard.visible(&now);
    let export = export_clients(&guard.store, &visible, now.date_naive())?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.content))
}
