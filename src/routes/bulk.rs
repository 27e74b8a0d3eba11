use actix_web::{HttpResponse, post, web};

use crate::forms::bulk::{BulkStageForm, BulkTagForm, BulkTrashForm};
use crate::repository::DieselRepository;
use crate::routes::{SharedSession, lock_session};
use crate::services::ServiceError;
use crate::services::bulk::{
    add_tag_to_selection, change_stage_for_selection, soft_delete_selection,
};
use crate::services::confirm::ConfirmAction;

#[post("/bulk/stage")]
pub async fn bulk_stage(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    web::Json(form): web::Json<BulkStageForm>,
) -> Result<HttpResponse, ServiceError> {
    let (ids, stage_id) = form.parse()?;

    let mut guard = lock_session(&session)?;
    let session = &mut *guard;
    session.view.replace_selection(ids);
    let report = change_stage_for_selection(
        repo.get_ref(),
        &mut session.store,
        &mut session.view,
        stage_id,
    )?;

    Ok(HttpResponse::Ok().json(report))
}

#[post("/bulk/tag")]
pub async fn bulk_tag(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    web::Json(form): web::Json<BulkTagForm>,
) -> Result<HttpResponse, ServiceError> {
    let ids = form.parse()?;

    let mut guard = lock_session(&session)?;
    let session = &mut *guard;
    if session.store.tags().is_empty() {
        session.store.load_tags(repo.get_ref())?;
    }
    session.view.replace_selection(ids);
    let report = add_tag_to_selection(
        repo.get_ref(),
        &mut session.store,
        &mut session.view,
        &form.tag,
    )?;

    Ok(HttpResponse::Ok().json(report))
}

#[post("/bulk/trash")]
pub async fn bulk_trash(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    web::Json(form): web::Json<BulkTrashForm>,
) -> Result<HttpResponse, ServiceError> {
    let ids = form.parse()?;
    let confirmed = form.confirm;

    let mut guard = lock_session(&session)?;
    let session = &mut *guard;
    session.view.replace_selection(ids);
    let result = soft_delete_selection(
        repo.get_ref(),
        &mut session.store,
        &mut session.view,
        &|_: &ConfirmAction| confirmed,
    )?;

    Ok(HttpResponse::Ok().json(result))
}
