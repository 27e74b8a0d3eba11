use std::collections::BTreeSet;

use chrono::{NaiveDateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::client::{Client, ClientListQuery, Contact, NewClient, UpdateClient};
use crate::domain::types::{ClientId, StageId, TagId};
use crate::models::client::{
    Client as DbClient, ClientContact as DbClientContact, ClientTag as DbClientTag,
    NewClient as DbNewClient, NewClientContact as DbNewClientContact,
    UpdateClient as DbUpdateClient,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter, DieselRepository};

/// Attaches tag links and contacts to the loaded client rows.
fn hydrate(conn: &mut SqliteConnection, rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    let tags = DbClientTag::belonging_to(&rows)
        .select(DbClientTag::as_select())
        .load(conn)?
        .grouped_by(&rows);
    let contacts = DbClientContact::belonging_to(&rows)
        .select(DbClientContact::as_select())
        .load(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(tags)
        .zip(contacts)
        .map(|((row, tags), contacts)| {
            row.into_domain(tags, contacts)
                .map_err(RepositoryError::from)
        })
        .collect()
}

fn load_client(conn: &mut SqliteConnection, client_id: ClientId) -> RepositoryResult<Client> {
    use crate::schema::clients;

    let row = clients::table
        .find(client_id.get())
        .select(DbClient::as_select())
        .first(conn)?;

    hydrate(conn, vec![row])?
        .into_iter()
        .next()
        .ok_or(RepositoryError::NotFound)
}

fn ensure_stage_exists(conn: &mut SqliteConnection, stage_id: StageId) -> RepositoryResult<()> {
    use crate::schema::stages;

    let found: bool =
        diesel::select(exists(stages::table.find(stage_id.get()))).get_result(conn)?;
    if found {
        Ok(())
    } else {
        Err(RepositoryError::ValidationError(format!(
            "unknown stage {stage_id}"
        )))
    }
}

fn replace_tags(
    conn: &mut SqliteConnection,
    client_id: ClientId,
    tags: &BTreeSet<TagId>,
) -> RepositoryResult<()> {
    use crate::schema::{client_tags, tags as tags_table};

    diesel::delete(client_tags::table.filter(client_tags::client_id.eq(client_id.get())))
        .execute(conn)?;

    let tag_ids: Vec<i32> = tags.iter().map(|t| t.get()).collect();
    if tag_ids.is_empty() {
        return Ok(());
    }

    let known: i64 = tags_table::table
        .filter(tags_table::id.eq_any(&tag_ids))
        .count()
        .get_result(conn)?;
    if usize::try_from(known).unwrap_or_default() != tag_ids.len() {
        return Err(RepositoryError::ValidationError(
            "client references an unknown tag".to_string(),
        ));
    }

    let links: Vec<DbClientTag> = tag_ids
        .into_iter()
        .map(|tag_id| DbClientTag {
            client_id: client_id.get(),
            tag_id,
        })
        .collect();
    diesel::insert_into(client_tags::table)
        .values(&links)
        .execute(conn)?;

    Ok(())
}

fn replace_contacts(
    conn: &mut SqliteConnection,
    client_id: ClientId,
    contacts: &[Contact],
) -> RepositoryResult<()> {
    use crate::schema::client_contacts;

    diesel::delete(
        client_contacts::table.filter(client_contacts::client_id.eq(client_id.get())),
    )
    .execute(conn)?;

    if contacts.is_empty() {
        return Ok(());
    }

    let rows: Vec<DbNewClientContact> = contacts
        .iter()
        .enumerate()
        .map(|(position, contact)| DbNewClientContact::from_domain(client_id, position, contact))
        .collect();
    diesel::insert_into(client_contacts::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

/// Sets the trash flag of a client, failing with `NotFound` for unknown ids.
fn set_deleted(
    conn: &mut SqliteConnection,
    client_id: ClientId,
    deleted_at: Option<NaiveDateTime>,
) -> RepositoryResult<Client> {
    use crate::schema::clients;

    let now = Utc::now().naive_utc();
    let affected = diesel::update(clients::table.find(client_id.get()))
        .set((
            clients::is_deleted.eq(deleted_at.is_some()),
            clients::deleted_at.eq(deleted_at),
            clients::updated_at.eq(now),
        ))
        .execute(conn)?;
    if affected == 0 {
        return Err(RepositoryError::NotFound);
    }

    load_client(conn, client_id)
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        match load_client(&mut conn, id) {
            Ok(client) => Ok(Some(client)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let mut rows = clients::table
            .filter(clients::is_deleted.eq(query.is_deleted))
            .into_boxed();
        if let Some(priority) = query.priority {
            rows = rows.filter(clients::priority.eq(priority.as_str()));
        }

        let rows = rows
            .order((clients::created_at.asc(), clients::id.asc()))
            .select(DbClient::as_select())
            .load(&mut conn)?;

        hydrate(&mut conn, rows)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let stage_id = new_client.stage_id.ok_or_else(|| {
            RepositoryError::ValidationError("client stage is required".to_string())
        })?;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            ensure_stage_exists(conn, stage_id)?;

            let now = Utc::now().naive_utc();
            let row = diesel::insert_into(clients::table)
                .values(DbNewClient::from_domain(new_client, stage_id, now))
                .returning(DbClient::as_returning())
                .get_result(conn)?;
            let client_id = ClientId::try_from(row.id)?;

            replace_tags(conn, client_id, &new_client.tags)?;
            replace_contacts(conn, client_id, &new_client.contacts)?;

            load_client(conn, client_id)
        })
    }

    fn change_stage(&self, client_id: ClientId, stage_id: StageId) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            ensure_stage_exists(conn, stage_id)?;

            let affected = diesel::update(clients::table.find(client_id.get()))
                .set((
                    clients::stage_id.eq(stage_id.get()),
                    clients::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            load_client(conn, client_id)
        })
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let changes = DbUpdateClient::from_domain(updates, Utc::now().naive_utc());
            let affected = diesel::update(clients::table.find(client_id.get()))
                .set(&changes)
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            if let Some(tags) = &updates.tags {
                replace_tags(conn, client_id, tags)?;
            }
            if let Some(contacts) = &updates.contacts {
                replace_contacts(conn, client_id, contacts)?;
            }

            load_client(conn, client_id)
        })
    }

    fn soft_delete_client(&self, client_id: ClientId) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            set_deleted(conn, client_id, Some(Utc::now().naive_utc()))
        })
    }

    fn restore_client(&self, client_id: ClientId) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            set_deleted(conn, client_id, None)
        })
    }

    fn permanent_delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        use crate::schema::{client_contacts, client_tags, clients};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let is_deleted: bool = clients::table
                .find(client_id.get())
                .select(clients::is_deleted)
                .first(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            if !is_deleted {
                return Err(RepositoryError::ValidationError(
                    "only trashed clients can be permanently deleted".to_string(),
                ));
            }

            diesel::delete(
                client_contacts::table.filter(client_contacts::client_id.eq(client_id.get())),
            )
            .execute(conn)?;
            diesel::delete(client_tags::table.filter(client_tags::client_id.eq(client_id.get())))
                .execute(conn)?;
            diesel::delete(clients::table.find(client_id.get())).execute(conn)?;

            Ok(())
        })
    }
}
