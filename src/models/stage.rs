//! Diesel models for pipeline stages.

use diesel::prelude::*;

use crate::domain::stage::{NewStage as DomainNewStage, Stage as DomainStage};
use crate::domain::types::{StageId, StageName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Stage {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stages)]
pub struct NewStage<'a> {
    pub name: &'a str,
    pub icon: &'a str,
    pub color: &'a str,
    pub position: i32,
}

impl TryFrom<Stage> for DomainStage {
    type Error = TypeConstraintError;

    fn try_from(stage: Stage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: StageId::try_from(stage.id)?,
            name: StageName::new(stage.name)?,
            icon: stage.icon,
            color: stage.color,
            position: stage.position,
        })
    }
}

impl<'a> From<&'a DomainNewStage> for NewStage<'a> {
    fn from(stage: &'a DomainNewStage) -> Self {
        Self {
            name: stage.name.as_str(),
            icon: stage.icon.as_str(),
            color: stage.color.as_str(),
            position: stage.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_db_to_domain() {
        let db = Stage {
            id: 3,
            name: " Proposal ".to_string(),
            icon: "📄".to_string(),
            color: "#6f42c1".to_string(),
            position: 2,
        };

        let domain = DomainStage::try_from(db).unwrap();

        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.name.as_str(), "Proposal");
        assert_eq!(domain.position, 2);
    }

    #[test]
    fn rejects_invalid_identifier() {
        let db = Stage {
            id: 0,
            name: "Lead".to_string(),
            icon: String::new(),
            color: String::new(),
            position: 0,
        };

        assert_eq!(
            DomainStage::try_from(db),
            Err(TypeConstraintError::NonPositiveId)
        );
    }
}
