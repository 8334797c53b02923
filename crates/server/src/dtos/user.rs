use chrono::{DateTime, Utc};
use database::entities::users::{self, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub subject: String,
    #[schema(value_type = String, example = "student")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        UserResponse {
            id: user.id,
            subject: user.subject,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoleRequest {
    /// One of `student`, `instructor` or `admin`
    #[schema(value_type = String, example = "instructor")]
    pub role: Role,
}
