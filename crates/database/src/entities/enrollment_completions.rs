use models::completion::{CompletionEntry, LectureNotes};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One entry of an enrollment's completion history
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment_completions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub lecture_id: Uuid,
    pub completed_at: DateTimeUtc,
    #[sea_orm(column_type = "Json")]
    pub notes: LectureNotes,
}

impl From<Model> for CompletionEntry {
    fn from(model: Model) -> Self {
        CompletionEntry {
            lecture_id: model.lecture_id,
            completed_at: model.completed_at,
            notes: model.notes.0,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
