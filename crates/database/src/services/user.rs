use super::{ServiceError, is_unique_violation};
use crate::entities::users::{self, Role};
use chrono::Utc;
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

pub struct UserService;

impl UserService {
    /// Looks up the user behind a token subject, creating it on first sight.
    ///
    /// Subjects listed in `admin_subjects` are provisioned as admins, everyone
    /// else starts as a student.
    pub async fn find_or_create_by_subject(
        db: &DatabaseConnection,
        subject: &str,
        admin_subjects: &[String],
    ) -> Result<users::Model, ServiceError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ServiceError::Validation(
                "Token subject must not be empty".to_string(),
            ));
        }

        if let Some(user) = Self::find_by_subject(db, subject).await? {
            return Ok(user);
        }

        let role = if admin_subjects.iter().any(|admin| admin == subject) {
            Role::Admin
        } else {
            Role::Student
        };

        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            subject: Set(subject.to_string()),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match user.insert(db).await {
            Ok(user) => {
                info!("Provisioned user {} as {:?}", user.id, user.role);
                Ok(user)
            }
            // Another request provisioned the same subject first
            Err(err) if is_unique_violation(&err) => Self::find_by_subject(db, subject)
                .await?
                .ok_or(ServiceError::NotFound("User")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<users::Model, ServiceError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    /// Changes a user's role, admins only
    pub async fn set_role(
        db: &DatabaseConnection,
        actor: &users::Model,
        user_id: Uuid,
        role: Role,
    ) -> Result<users::Model, ServiceError> {
        if !actor.is_admin() {
            warn!("User {} tried to change the role of {user_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        let user = Self::find_by_id(db, user_id).await?;
        if user.role == role {
            return Ok(user);
        }

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now());

        let user = active.update(db).await?;
        info!("User {} is now {:?}", user.id, user.role);

        Ok(user)
    }

    async fn find_by_subject(
        db: &DatabaseConnection,
        subject: &str,
    ) -> Result<Option<users::Model>, ServiceError> {
        Ok(users::Entity::find()
            .filter(users::Column::Subject.eq(subject))
            .one(db)
            .await?)
    }
}
