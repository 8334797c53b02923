use super::ServiceError;
use crate::entities::{courses, users};
use chrono::Utc;
use log::{info, warn};
use models::{
    course_content::Sections,
    publication::{CourseStatus, PUBLISHED_STATUSES},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func, LikeExpr},
};
use uuid::Uuid;

/// Typed filter for the public course listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFilter {
    pub page: u64,
    pub per_page: u64,
    pub search: Option<String>,
}

impl CourseFilter {
    pub const DEFAULT_PER_PAGE: u64 = 20;
    pub const MAX_PER_PAGE: u64 = 100;

    pub fn new(page: u64, per_page: u64, search: Option<String>) -> Result<Self, ServiceError> {
        if page == 0 {
            return Err(ServiceError::Validation(
                "page must be at least 1".to_string(),
            ));
        }
        if per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(ServiceError::Validation(format!(
                "per_page must be between 1 and {}",
                Self::MAX_PER_PAGE
            )));
        }

        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(Self {
            page,
            per_page,
            search,
        })
    }

    /// Published courses only, optionally matching the title.
    ///
    /// The search text is matched literally, `%` and `_` are not wildcards.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all().add(courses::Column::Status.is_in(PUBLISHED_STATUSES));

        if let Some(search) = &self.search {
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((
                    courses::Entity,
                    courses::Column::Title,
                ))))
                .like(
                    LikeExpr::new(format!("%{}%", escape_like(search)))
                        .escape(LIKE_ESCAPE),
                ),
            );
        }

        condition
    }
}

const LIKE_ESCAPE: char = '!';

/// Escapes LIKE metacharacters so user input only matches itself
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '!' | '%' | '_') {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Fields an instructor provides when authoring a course
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub sections: Sections,
}

pub struct CourseService;

impl CourseService {
    /// Query published courses with pagination
    pub async fn list_courses(
        db: &DatabaseConnection,
        filter: &CourseFilter,
    ) -> Result<(Vec<courses::Model>, u64), ServiceError> {
        let query = courses::Entity::find()
            .filter(filter.condition())
            .order_by_desc(courses::Column::CreatedAt)
            .order_by_asc(courses::Column::Id);

        let total_items = query.clone().count(db).await?;
        let paginator = query.paginate(db, filter.per_page);
        let courses = paginator.fetch_page(filter.page - 1).await?; // SeaORM uses 0-based pages

        Ok((courses, total_items))
    }

    /// Get a course regardless of its status
    pub async fn find_course(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> Result<courses::Model, ServiceError> {
        courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Course"))
    }

    /// Get a course only if it passes the publication gate
    pub async fn get_published_course(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> Result<courses::Model, ServiceError> {
        let course = Self::find_course(db, course_id).await?;

        if course.is_published() {
            Ok(course)
        } else {
            Err(ServiceError::NotFound("Course"))
        }
    }

    /// Create a draft course owned by `instructor`
    pub async fn create_course(
        db: &DatabaseConnection,
        instructor: &users::Model,
        new_course: NewCourse,
    ) -> Result<courses::Model, ServiceError> {
        if !instructor.can_author() {
            warn!("User {} tried to create a course", instructor.id);
            return Err(ServiceError::Forbidden);
        }

        let title = new_course.title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation(
                "Course title must not be empty".to_string(),
            ));
        }
        if new_course.price_cents < 0 {
            return Err(ServiceError::Validation(
                "Course price must not be negative".to_string(),
            ));
        }
        new_course
            .sections
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let now = Utc::now();
        let course = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(new_course
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())),
            instructor_id: Set(instructor.id),
            price_cents: Set(new_course.price_cents),
            status: Set(CourseStatus::Draft.code()),
            sections: Set(new_course.sections),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let course = course.insert(db).await?;
        info!(
            "Created course {} with {} lectures",
            course.id,
            course.sections.lecture_count()
        );

        Ok(course)
    }

    /// Move a course to another lifecycle state
    pub async fn set_status(
        db: &DatabaseConnection,
        actor: &users::Model,
        course_id: Uuid,
        status: i16,
    ) -> Result<courses::Model, ServiceError> {
        let status =
            CourseStatus::try_from(status).map_err(|e| ServiceError::Validation(e.to_string()))?;

        let course = Self::find_course(db, course_id).await?;
        if !course.is_managed_by(actor) {
            warn!("User {} tried to change status of course {course_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        if course.status == status.code() {
            return Ok(course);
        }

        let mut active: courses::ActiveModel = course.into();
        active.status = Set(status.code());
        active.updated_at = Set(Utc::now());

        let course = active.update(db).await?;
        info!("Course {} is now {}", course.id, status.as_str());

        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn test_filter_rejects_bad_pages() {
        assert!(matches!(
            CourseFilter::new(0, 20, None),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            CourseFilter::new(1, 0, None),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            CourseFilter::new(1, CourseFilter::MAX_PER_PAGE + 1, None),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_filter_normalizes_search() {
        let filter = CourseFilter::new(1, 20, Some("  Rust Basics ".to_string())).unwrap();
        assert_eq!(filter.search.as_deref(), Some("rust basics"));

        let filter = CourseFilter::new(1, 20, Some("   ".to_string())).unwrap();
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_listing_query_uses_publication_gate() {
        let filter = CourseFilter::new(1, 20, Some("rust".to_string())).unwrap();
        let sql = courses::Entity::find()
            .filter(filter.condition())
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""status" IN (2, 3)"#), "{sql}");
        assert!(sql.contains("LOWER"), "{sql}");
        assert!(sql.contains("%rust%"), "{sql}");
        assert!(sql.contains("ESCAPE '!'"), "{sql}");
    }

    #[test]
    fn test_search_metacharacters_are_literal() {
        assert_eq!(escape_like("100%"), "100!%");
        assert_eq!(escape_like("snake_case"), "snake!_case");
        assert_eq!(escape_like("wow!"), "wow!!");
        assert_eq!(escape_like("rust"), "rust");

        let filter = CourseFilter::new(1, 20, Some("%".to_string())).unwrap();
        let sql = courses::Entity::find()
            .filter(filter.condition())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains("'%!%%'"), "{sql}");
    }
}
