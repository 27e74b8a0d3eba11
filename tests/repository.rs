use pushkind_pipeline::domain::client::{ClientListQuery, Contact, NewClient, UpdateClient};
use pushkind_pipeline::domain::stage::NewStage;
use pushkind_pipeline::domain::tag::NewTag;
use pushkind_pipeline::domain::types::{
    ClientId, ClientName, ContactEmail, Priority, StageName, TagName,
};
use pushkind_pipeline::repository::errors::RepositoryError;
use pushkind_pipeline::repository::{
    ClientReader, ClientWriter, StageReader, StageWriter, TagReader, TagWriter,
};

mod common;

use common::{CONTACTED, LEAD, TestDb, WON, create_client, stage};

#[test]
fn test_client_repository_crud() {
    let test_db = TestDb::new("test_client_repository_crud.db");
    let repo = test_db.repo();
    let vip = repo
        .create_tag(&NewTag::new(TagName::new("vip").unwrap(), "#f00".into()))
        .unwrap();

    let new_client = NewClient::new(
        ClientName::new("Acme").unwrap(),
        Some("Acme Corp".into()),
        Some(stage(LEAD)),
        Priority::High,
        Some("first call".into()),
    )
    .with_tags([vip.id])
    .with_contact(Contact::new(
        "Ann".into(),
        Some(ContactEmail::new("ann@acme.test").unwrap()),
        Some("555".into()),
        true,
    ))
    .with_contact(Contact::new("Bob".into(), None, None, false));

    let created = repo.create_client(&new_client).unwrap();
    assert_eq!(created.name.as_str(), "Acme");
    assert_eq!(created.company_name.as_deref(), Some("Acme Corp"));
    assert!(created.has_tag(vip.id));
    assert_eq!(created.contacts.len(), 2);
    assert_eq!(created.contacts[0].name, "Ann");
    assert_eq!(created.primary_contact().unwrap().name, "Ann");
    assert!(!created.is_deleted);

    let fetched = repo.get_client_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = repo
        .update_client(
            created.id,
            &UpdateClient::default()
                .company_name(None)
                .priority(Priority::Vip)
                .tags(Default::default()),
        )
        .unwrap();
    assert_eq!(updated.company_name, None);
    assert_eq!(updated.priority, Priority::Vip);
    assert!(updated.tags.is_empty());
    assert_eq!(updated.contacts.len(), 2);
    assert_eq!(updated.notes.as_deref(), Some("first call"));

    let moved = repo.change_stage(created.id, stage(WON)).unwrap();
    assert_eq!(moved.stage_id, stage(WON));

    let listed = repo.list_clients(ClientListQuery::active()).unwrap();
    assert_eq!(listed.len(), 1);
    let by_priority = repo
        .list_clients(ClientListQuery::active().priority(Priority::Low))
        .unwrap();
    assert!(by_priority.is_empty());
}

#[test]
fn test_unknown_stage_is_rejected() {
    let test_db = TestDb::new("test_unknown_stage_is_rejected.db");
    let repo = test_db.repo();
    let client = create_client(&repo, "Acme", LEAD);

    let result = repo.change_stage(client.id, stage(99));
    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));

    let unchanged = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(unchanged.stage_id, stage(LEAD));

    let without_stage = NewClient::new(
        ClientName::new("Nowhere").unwrap(),
        None,
        None,
        Priority::default(),
        None,
    );
    assert!(matches!(
        repo.create_client(&without_stage),
        Err(RepositoryError::ValidationError(_))
    ));
}

#[test]
fn test_missing_client_is_not_found() {
    let test_db = TestDb::new("test_missing_client_is_not_found.db");
    let repo = test_db.repo();
    let missing = ClientId::new(404).unwrap();

    assert!(repo.get_client_by_id(missing).unwrap().is_none());
    assert!(matches!(
        repo.change_stage(missing, stage(LEAD)),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        repo.soft_delete_client(missing),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        repo.permanent_delete_client(missing),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_trash_lifecycle() {
    let test_db = TestDb::new("test_trash_lifecycle.db");
    let repo = test_db.repo();
    let client = create_client(&repo, "Acme", CONTACTED);

    assert!(matches!(
        repo.permanent_delete_client(client.id),
        Err(RepositoryError::ValidationError(_))
    ));

    let trashed = repo.soft_delete_client(client.id).unwrap();
    assert!(trashed.is_deleted);
    assert!(trashed.deleted_at.is_some());
    assert!(repo.list_clients(ClientListQuery::active()).unwrap().is_empty());
    assert_eq!(repo.list_clients(ClientListQuery::trashed()).unwrap().len(), 1);

    let restored = repo.restore_client(client.id).unwrap();
    assert!(!restored.is_deleted);
    assert_eq!(restored.deleted_at, None);
    assert_eq!(restored.stage_id, stage(CONTACTED));

    repo.soft_delete_client(client.id).unwrap();
    repo.permanent_delete_client(client.id).unwrap();
    assert!(repo.get_client_by_id(client.id).unwrap().is_none());
}

#[test]
fn test_tags_and_stages_writers() {
    let test_db = TestDb::new("test_tags_and_stages_writers.db");
    let repo = test_db.repo();

    repo.create_tag(&NewTag::new(TagName::new("vip").unwrap(), "#f00".into()))
        .unwrap();
    let duplicate = repo.create_tag(&NewTag::new(TagName::new("vip").unwrap(), "#0f0".into()));
    assert!(matches!(duplicate, Err(RepositoryError::ValidationError(_))));
    assert_eq!(repo.list_tags().unwrap().len(), 1);

    let lost = repo
        .create_stage(&NewStage::new(
            StageName::new("Lost").unwrap(),
            "x".into(),
            "#000".into(),
            -1,
        ))
        .unwrap();
    let stages = repo.list_stages().unwrap();
    assert_eq!(stages.first().map(|s| s.id), Some(lost.id));
    assert_eq!(stages.len(), 6);
}
