use super::{ServiceError, course::CourseService, is_unique_violation};
use crate::entities::{courses, enrollment_completions, enrollments, users};
use chrono::Utc;
use futures::try_join;
use log::{debug, info, warn};
use models::{
    completion::{self, CompletionEntry, LectureNotes},
    progress::CourseProgress,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Typed filter for enrollment lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentFilter {
    pub course_id: Option<Uuid>,
    pub learner_id: Option<Uuid>,
    pub include_deleted: bool,
}

impl EnrollmentFilter {
    pub fn for_learner(learner_id: Uuid) -> Self {
        Self {
            learner_id: Some(learner_id),
            ..Self::default()
        }
    }

    pub fn for_course(course_id: Uuid) -> Self {
        Self {
            course_id: Some(course_id),
            ..Self::default()
        }
    }

    /// The active enrollment of one learner in one course
    pub fn active_pair(course_id: Uuid, learner_id: Uuid) -> Self {
        Self {
            course_id: Some(course_id),
            learner_id: Some(learner_id),
            include_deleted: false,
        }
    }

    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(course_id) = self.course_id {
            condition = condition.add(enrollments::Column::CourseId.eq(course_id));
        }
        if let Some(learner_id) = self.learner_id {
            condition = condition.add(enrollments::Column::UpdatedBy.eq(learner_id));
        }
        if !self.include_deleted {
            condition = condition.add(enrollments::Column::IsDelete.eq(false));
        }

        condition
    }
}

/// An enrollment together with its ordered completion history
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub enrollment: enrollments::Model,
    pub complete: Vec<CompletionEntry>,
}

impl EnrollmentRecord {
    /// Lecture ids derived from the completion history
    pub fn completed_lectures(&self) -> Vec<Uuid> {
        completion::completed_lectures(&self.complete)
    }
}

/// An enrollment merged with the live structure of its course
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentDetail {
    pub record: EnrollmentRecord,
    pub course: courses::Model,
    pub progress: CourseProgress,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enroll a learner in a published course.
    ///
    /// `payment_id` is the confirmed payment handed over by the payment flow,
    /// paid courses are rejected without it.
    pub async fn enroll(
        db: &DatabaseConnection,
        course_id: Uuid,
        learner_id: Uuid,
        payment_id: Option<Uuid>,
    ) -> Result<EnrollmentRecord, ServiceError> {
        let course = CourseService::get_published_course(db, course_id).await?;

        if !course.is_free() && payment_id.is_none() {
            return Err(ServiceError::PaymentRequired);
        }

        let existing = enrollments::Entity::find()
            .filter(EnrollmentFilter::active_pair(course_id, learner_id).condition())
            .one(db)
            .await?;
        if existing.is_some() {
            warn!("Learner {learner_id} is already enrolled in course {course_id}");
            return Err(ServiceError::AlreadyEnrolled);
        }

        let now = Utc::now();
        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            payment_id: Set(payment_id),
            last_lecture_completed: Set(None),
            updated_by: Set(learner_id),
            is_delete: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The partial unique index catches a concurrent enroll that passed the check above
        let enrollment = enrollment.insert(db).await.map_err(|err| {
            if is_unique_violation(&err) {
                ServiceError::AlreadyEnrolled
            } else {
                ServiceError::Database(err)
            }
        })?;

        info!(
            "Learner {learner_id} enrolled in course {course_id} as {}",
            enrollment.id
        );

        Ok(EnrollmentRecord {
            enrollment,
            complete: Vec::new(),
        })
    }

    /// All active enrollments owned by a learner
    pub async fn list_for_learner(
        db: &DatabaseConnection,
        learner_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, ServiceError> {
        Self::list(db, EnrollmentFilter::for_learner(learner_id)).await
    }

    /// All active enrollments of a course, for its instructor or an admin
    pub async fn list_for_course(
        db: &DatabaseConnection,
        actor: &users::Model,
        course_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, ServiceError> {
        let course = CourseService::find_course(db, course_id).await?;
        if !course.is_managed_by(actor) {
            warn!("User {} tried to list enrollments of course {course_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        Self::list(db, EnrollmentFilter::for_course(course_id)).await
    }

    /// An enrollment with its course and computed progress.
    ///
    /// Visible to the owning learner, the course instructor and admins.
    pub async fn detail(
        db: &DatabaseConnection,
        actor: &users::Model,
        enrollment_id: Uuid,
    ) -> Result<EnrollmentDetail, ServiceError> {
        let enrollment = Self::find_active(db, enrollment_id).await?;

        let (course, mut completions) = try_join!(
            CourseService::find_course(db, enrollment.course_id),
            Self::load_completions(db, vec![enrollment.id]),
        )?;

        if !enrollment.is_owned_by(actor.id) && !course.is_managed_by(actor) {
            warn!("User {} tried to read enrollment {enrollment_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        let record = EnrollmentRecord {
            complete: completions.remove(&enrollment.id).unwrap_or_default(),
            enrollment,
        };
        let progress = CourseProgress::compute(&course.sections, &record.completed_lectures());

        if !progress.orphaned_lectures.is_empty() {
            debug!(
                "Enrollment {enrollment_id} has {} completions for removed lectures",
                progress.orphaned_lectures.len()
            );
        }

        Ok(EnrollmentDetail {
            record,
            course,
            progress,
        })
    }

    /// Record that the owning learner completed a lecture.
    ///
    /// Completing a lecture twice leaves the history unchanged.
    pub async fn complete_lecture(
        db: &DatabaseConnection,
        actor: &users::Model,
        enrollment_id: Uuid,
        lecture_id: Uuid,
        notes: Vec<String>,
    ) -> Result<EnrollmentRecord, ServiceError> {
        let enrollment = Self::find_active(db, enrollment_id).await?;
        if !enrollment.is_owned_by(actor.id) {
            warn!("User {} tried to complete a lecture for {enrollment_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        let course = CourseService::find_course(db, enrollment.course_id).await?;
        if !course.sections.contains_lecture(lecture_id) {
            return Err(ServiceError::Validation(format!(
                "{lecture_id} is not a lecture of this course"
            )));
        }

        let already_completed = enrollment_completions::Entity::find()
            .filter(enrollment_completions::Column::EnrollmentId.eq(enrollment_id))
            .filter(enrollment_completions::Column::LectureId.eq(lecture_id))
            .one(db)
            .await?
            .is_some();

        if already_completed {
            debug!("Lecture {lecture_id} already completed in {enrollment_id}");
        } else {
            let now = Utc::now();
            let txn = db.begin().await?;

            let completion = enrollment_completions::ActiveModel {
                id: Set(Uuid::new_v4()),
                enrollment_id: Set(enrollment_id),
                lecture_id: Set(lecture_id),
                completed_at: Set(now),
                notes: Set(LectureNotes::from_raw(notes)),
            };

            match completion.insert(&txn).await {
                Ok(_) => {
                    let mut active: enrollments::ActiveModel = enrollment.into();
                    active.last_lecture_completed = Set(Some(lecture_id));
                    active.updated_at = Set(now);
                    active.update(&txn).await?;

                    txn.commit().await?;
                    info!("Lecture {lecture_id} completed in {enrollment_id}");
                }
                // A concurrent request recorded the same lecture
                Err(err) if is_unique_violation(&err) => txn.rollback().await?,
                Err(err) => return Err(err.into()),
            }
        }

        Self::find_record(db, enrollment_id, false)
            .await?
            .ok_or(ServiceError::NotFound("Enrollment"))
    }

    /// Soft delete an enrollment, by its owner or an admin
    pub async fn remove(
        db: &DatabaseConnection,
        actor: &users::Model,
        enrollment_id: Uuid,
    ) -> Result<EnrollmentRecord, ServiceError> {
        let enrollment = Self::find_active(db, enrollment_id).await?;
        if !enrollment.is_owned_by(actor.id) && !actor.is_admin() {
            warn!("User {} tried to remove enrollment {enrollment_id}", actor.id);
            return Err(ServiceError::Forbidden);
        }

        let now = Utc::now();
        let mut active: enrollments::ActiveModel = enrollment.into();
        active.is_delete = Set(true);
        active.deleted_by = Set(Some(actor.id));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(db).await?;

        info!("Enrollment {enrollment_id} removed by {}", actor.id);

        Self::find_record(db, enrollment_id, true)
            .await?
            .ok_or(ServiceError::NotFound("Enrollment"))
    }

    /// Lookup for internal tooling that also returns removed enrollments
    pub async fn find_including_deleted(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
    ) -> Result<Option<EnrollmentRecord>, ServiceError> {
        Self::find_record(db, enrollment_id, true).await
    }

    async fn list(
        db: &DatabaseConnection,
        filter: EnrollmentFilter,
    ) -> Result<Vec<EnrollmentRecord>, ServiceError> {
        let enrollments = enrollments::Entity::find()
            .filter(filter.condition())
            .order_by_desc(enrollments::Column::CreatedAt)
            .all(db)
            .await?;

        let enrollment_ids = enrollments.iter().map(|e| e.id).collect();
        let mut completions = Self::load_completions(db, enrollment_ids).await?;

        Ok(enrollments
            .into_iter()
            .map(|enrollment| EnrollmentRecord {
                complete: completions.remove(&enrollment.id).unwrap_or_default(),
                enrollment,
            })
            .collect())
    }

    async fn find_active(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, ServiceError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .filter(enrollments::Column::IsDelete.eq(false))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Enrollment"))
    }

    async fn find_record(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<EnrollmentRecord>, ServiceError> {
        let mut query = enrollments::Entity::find_by_id(enrollment_id);
        if !include_deleted {
            query = query.filter(enrollments::Column::IsDelete.eq(false));
        }

        let Some(enrollment) = query.one(db).await? else {
            return Ok(None);
        };

        let mut completions = Self::load_completions(db, vec![enrollment.id]).await?;

        Ok(Some(EnrollmentRecord {
            complete: completions.remove(&enrollment.id).unwrap_or_default(),
            enrollment,
        }))
    }

    /// Batch fetch completion histories, keyed by enrollment id
    async fn load_completions(
        db: &DatabaseConnection,
        enrollment_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<CompletionEntry>>, ServiceError> {
        if enrollment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let completions = enrollment_completions::Entity::find()
            .filter(enrollment_completions::Column::EnrollmentId.is_in(enrollment_ids))
            .order_by_asc(enrollment_completions::Column::CompletedAt)
            .order_by_asc(enrollment_completions::Column::Id)
            .all(db)
            .await?;

        let mut completions_by_enrollment: HashMap<Uuid, Vec<CompletionEntry>> = HashMap::new();
        for completion in completions {
            completions_by_enrollment
                .entry(completion.enrollment_id)
                .or_default()
                .push(completion.into());
        }

        Ok(completions_by_enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    fn sql(filter: EnrollmentFilter) -> String {
        enrollments::Entity::find()
            .filter(filter.condition())
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_learner_filter_skips_deleted() {
        let learner = Uuid::new_v4();
        let sql = sql(EnrollmentFilter::for_learner(learner));

        assert!(sql.contains(r#""updated_by" ="#), "{sql}");
        assert!(sql.contains(&learner.to_string()), "{sql}");
        assert!(sql.contains(r#""is_delete" ="#), "{sql}");
        assert!(!sql.contains(r#""course_id" ="#), "{sql}");
    }

    #[test]
    fn test_course_filter() {
        let course = Uuid::new_v4();
        let sql = sql(EnrollmentFilter::for_course(course));

        assert!(sql.contains(r#""course_id" ="#), "{sql}");
        assert!(!sql.contains(r#""updated_by" ="#), "{sql}");
    }

    #[test]
    fn test_including_deleted_has_no_flag_condition() {
        let filter = EnrollmentFilter {
            include_deleted: true,
            ..EnrollmentFilter::for_course(Uuid::new_v4())
        };

        let sql = sql(filter);
        assert!(!sql.contains(r#""is_delete" ="#), "{sql}");
        assert!(sql.contains(r#""course_id" ="#), "{sql}");
    }
}
