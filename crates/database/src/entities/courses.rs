use models::{course_content::Sections, publication};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::users;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub instructor_id: Uuid,
    pub price_cents: i64, // 0 for free courses
    pub status: i16,      // see models::publication::CourseStatus
    #[sea_orm(column_type = "Json")]
    pub sections: Sections,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_published(&self) -> bool {
        publication::is_published(self.status)
    }

    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// The owning instructor and admins manage a course
    pub fn is_managed_by(&self, user: &users::Model) -> bool {
        user.is_admin() || self.instructor_id == user.id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InstructorId",
        to = "super::users::Column::Id"
    )]
    Instructor,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
