use crate::error::AppError;
use chrono::{DateTime, Utc};
use database::{entities::courses, services::course::NewCourse};
use models::{
    course_content::{Item, ItemType, Section, Sections},
    publication::CourseStatus,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Uuid,
    pub price_cents: i64,
    /// Raw lifecycle status, 2 and 3 count as published
    pub status: i16,
    pub status_label: String,
    pub is_published: bool,
    pub lecture_count: usize,
    pub sections: Vec<SectionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: Uuid,
    pub title: String,
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub title: String,
    #[schema(example = "lecture")]
    pub item_type: String,
}

impl From<courses::Model> for CourseResponse {
    fn from(course: courses::Model) -> Self {
        let status_label = CourseStatus::try_from(course.status)
            .map(|status| status.as_str().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        CourseResponse {
            id: course.id,
            is_published: course.is_published(),
            lecture_count: course.sections.lecture_count(),
            title: course.title,
            description: course.description,
            instructor_id: course.instructor_id,
            price_cents: course.price_cents,
            status: course.status,
            status_label,
            sections: course
                .sections
                .0
                .into_iter()
                .map(|section| SectionResponse {
                    id: section.id,
                    title: section.title,
                    items: section
                        .items
                        .into_iter()
                        .map(|item| ItemResponse {
                            id: item.id,
                            title: item.title,
                            item_type: item.item_type.as_str().to_string(),
                        })
                        .collect(),
                })
                .collect(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseData {
    pub course: CourseResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(per_page);

        PaginationMeta {
            page,
            per_page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    /// Case-insensitive match on the title
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub sections: Vec<SectionRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    /// Generated when omitted
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Generated when omitted
    pub id: Option<Uuid>,
    pub title: String,
    /// One of `lecture`, `quiz` or `resource`
    #[schema(example = "lecture")]
    pub item_type: String,
}

impl TryFrom<CreateCourseRequest> for NewCourse {
    type Error = AppError;

    fn try_from(request: CreateCourseRequest) -> Result<Self, Self::Error> {
        let sections = request
            .sections
            .into_iter()
            .map(|section| {
                let items = section
                    .items
                    .into_iter()
                    .map(|item| {
                        let item_type = item.item_type.parse::<ItemType>().map_err(|_| {
                            AppError::Validation(format!("Unknown item type: {}", item.item_type))
                        })?;

                        Ok(Item {
                            id: item.id.unwrap_or_else(Uuid::new_v4),
                            title: item.title,
                            item_type,
                        })
                    })
                    .collect::<Result<Vec<_>, AppError>>()?;

                Ok(Section {
                    id: section.id.unwrap_or_else(Uuid::new_v4),
                    title: section.title,
                    items,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(NewCourse {
            title: request.title,
            description: request.description,
            price_cents: request.price_cents,
            sections: Sections(sections),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// 0 draft, 1 pending review, 2 published, 3 restricted
    #[schema(example = 2)]
    pub status: i16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 20, 41);

        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let empty = PaginationMeta::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn test_create_request_parses_item_types() {
        let request: CreateCourseRequest = serde_json::from_value(json!({
            "title": "Rust",
            "priceCents": 0,
            "sections": [{
                "title": "Basics",
                "items": [
                    { "title": "Ownership", "itemType": "Lecture" },
                    { "title": "Check", "itemType": "quiz" }
                ]
            }]
        }))
        .unwrap();

        let new_course = NewCourse::try_from(request).unwrap();
        assert_eq!(new_course.sections.lecture_count(), 1);
        assert_eq!(new_course.sections[0].items[1].item_type, ItemType::Quiz);
    }

    #[test]
    fn test_create_request_rejects_unknown_item_type() {
        let request: CreateCourseRequest = serde_json::from_value(json!({
            "title": "Rust",
            "sections": [{ "title": "Basics", "items": [{ "title": "X", "itemType": "video" }] }]
        }))
        .unwrap();

        assert!(matches!(
            NewCourse::try_from(request),
            Err(AppError::Validation(_))
        ));
    }
}
