use actix_web::{HttpResponse, post, web};

use crate::domain::client::Client;
use crate::dto::client::ClientView;
use crate::forms::client::{ChangeStageForm, ConfirmForm};
use crate::repository::DieselRepository;
use crate::routes::{SharedSession, lock_session, parse_client_id};
use crate::services::ServiceError;
use crate::services::confirm::{ConfirmAction, Confirmed};
use crate::services::stage::{DragDrop, handle_drop};
use crate::services::store::RecordStore;
use crate::services::trash::{permanent_delete, restore, soft_delete};

fn confirmed_client(store: &RecordStore, result: &Confirmed<Client>) -> HttpResponse {
    HttpResponse::Ok().json(result.as_ref().map(|client| ClientView::new(store, client)))
}

#[post("/clients/{client_id}/stage")]
pub async fn change_client_stage(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    web::Json(form): web::Json<ChangeStageForm>,
) -> Result<HttpResponse, ServiceError> {
    let drop = DragDrop {
        client_id: parse_client_id(client_id.into_inner())?,
        target_stage_id: form.stage_id()?,
    };

    let mut guard = lock_session(&session)?;
    let change = handle_drop(repo.get_ref(), &mut guard.store, drop)?;

    Ok(HttpResponse::Ok().json(change))
}

#[post("/clients/{client_id}/trash")]
pub async fn trash_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    form: Option<web::Json<ConfirmForm>>,
) -> Result<HttpResponse, ServiceError> {
    let client_id = parse_client_id(client_id.into_inner())?;
    let confirmed = form.is_some_and(|form| form.confirm);

    let mut guard = lock_session(&session)?;
    let result = soft_delete(
        repo.get_ref(),
        &mut guard.store,
        &|_: &ConfirmAction| confirmed,
        client_id,
    )?;
    guard.view.deselect(client_id);

    Ok(confirmed_client(&guard.store, &result))
}

#[post("/clients/{client_id}/restore")]
pub async fn restore_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
) -> Result<HttpResponse, ServiceError> {
    let client_id = parse_client_id(client_id.into_inner())?;

    let mut guard = lock_session(&session)?;
    let client = restore(repo.get_ref(), &mut guard.store, client_id)?;
    guard.view.deselect(client_id);

    Ok(HttpResponse::Ok().json(ClientView::new(&guard.store, &client)))
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    form: Option<web::Json<ConfirmForm>>,
) -> Result<HttpResponse, ServiceError> {
    let client_id = parse_client_id(client_id.into_inner())?;
    let confirmed = form.is_some_and(|form| form.confirm);

    let mut guard = lock_session(&session)?;
    let result = permanent_delete(
        repo.get_ref(),
        &mut guard.store,
        &|_: &ConfirmAction| confirmed,
        client_id,
    )?;
    guard.view.deselect(client_id);

    Ok(HttpResponse::Ok().json(result))
}
