use diesel::prelude::*;

use crate::domain::stage::{NewStage, Stage};
use crate::models::stage::{NewStage as DbNewStage, Stage as DbStage};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, StageReader, StageWriter};

impl StageReader for DieselRepository {
    fn list_stages(&self) -> RepositoryResult<Vec<Stage>> {
        use crate::schema::stages;

        let mut conn = self.conn()?;

        stages::table
            .order((stages::position.asc(), stages::id.asc()))
            .select(DbStage::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(|stage| Stage::try_from(stage).map_err(RepositoryError::from))
            .collect()
    }
}

impl StageWriter for DieselRepository {
    fn create_stage(&self, new_stage: &NewStage) -> RepositoryResult<Stage> {
        use crate::schema::stages;

        let mut conn = self.conn()?;

        let db_stage = diesel::insert_into(stages::table)
            .values(DbNewStage::from(new_stage))
            .returning(DbStage::as_returning())
            .get_result(&mut conn)?;

        Ok(Stage::try_from(db_stage)?)
    }
}
