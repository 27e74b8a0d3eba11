use actix_web::{HttpResponse, get, post, web};

use crate::forms::tag::CreateTagForm;
use crate::repository::DieselRepository;
use crate::routes::{SharedSession, lock_session};
use crate::services::ServiceError;
use crate::services::tag as tag_service;

#[get("/tags")]
pub async fn list_tags(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
) -> Result<HttpResponse, ServiceError> {
    let mut guard = lock_session(&session)?;
    let tags = tag_service::list_tags(repo.get_ref(), &mut guard.store)?;

    Ok(HttpResponse::Ok().json(tags))
}

#[post("/tags")]
pub async fn create_tag(
    repo: web::Data<DieselRepository>,
    session: web::Data<SharedSession>,
    web::Json(form): web::Json<CreateTagForm>,
) -> Result<HttpResponse, ServiceError> {
    let new_tag = form.to_new_tag()?;

    let mut guard = lock_session(&session)?;
    let session = &mut *guard;
    // The cached table must stay complete before a single tag is added to it.
    if session.store.tags().is_empty() {
        session.store.load_tags(repo.get_ref())?;
    }
    let tag = tag_service::create_tag(repo.get_ref(), &mut session.store, &new_tag)?;

    Ok(HttpResponse::Created().json(tag))
}
