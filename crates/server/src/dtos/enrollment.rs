use super::course::CourseResponse;
use chrono::{DateTime, Utc};
use database::services::enrollment::{EnrollmentDetail, EnrollmentRecord};
use models::{
    completion::CompletionEntry,
    progress::{CourseProgress, SectionProgress},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub lecture_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub notes: Vec<String>,
}

impl From<CompletionEntry> for CompletionResponse {
    fn from(entry: CompletionEntry) -> Self {
        CompletionResponse {
            lecture_id: entry.lecture_id,
            completed_at: entry.completed_at,
            notes: entry.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub last_lecture_completed: Option<Uuid>,
    /// Learner who owns the enrollment
    pub updated_by: Uuid,
    pub is_delete: bool,
    pub complete: Vec<CompletionResponse>,
    /// Derived from `complete`, in completion order
    pub completed_lectures: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(record: EnrollmentRecord) -> Self {
        let completed_lectures = record.completed_lectures();
        let enrollment = record.enrollment;

        EnrollmentResponse {
            id: enrollment.id,
            course_id: enrollment.course_id,
            payment_id: enrollment.payment_id,
            last_lecture_completed: enrollment.last_lecture_completed,
            updated_by: enrollment.updated_by,
            is_delete: enrollment.is_delete,
            complete: record.complete.into_iter().map(Into::into).collect(),
            completed_lectures,
            created_at: enrollment.created_at,
            updated_at: enrollment.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgressResponse {
    pub section_id: Uuid,
    pub completed_items: Vec<Uuid>,
    pub completed_lectures: u64,
    pub total_lectures: u64,
    pub percentage: u8,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub completed_lectures: u64,
    pub total_lectures: u64,
    /// Rounded half up, 0 for a course without lectures
    #[schema(minimum = 0, maximum = 100)]
    pub percentage: u8,
    /// Completed ids no longer present in the course
    pub orphaned_lectures: Vec<Uuid>,
    pub sections: Vec<SectionProgressResponse>,
}

impl From<SectionProgress> for SectionProgressResponse {
    fn from(progress: SectionProgress) -> Self {
        SectionProgressResponse {
            section_id: progress.section_id,
            completed_items: progress.completed_items,
            completed_lectures: progress.completed_lectures,
            total_lectures: progress.total_lectures,
            percentage: progress.percentage,
        }
    }
}

impl From<CourseProgress> for ProgressResponse {
    fn from(progress: CourseProgress) -> Self {
        ProgressResponse {
            completed_lectures: progress.completed_lectures,
            total_lectures: progress.total_lectures,
            percentage: progress.percentage,
            orphaned_lectures: progress.orphaned_lectures,
            sections: progress.sections.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentData {
    pub enrollment: EnrollmentResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentsData {
    pub enrollments: Vec<EnrollmentResponse>,
}

impl From<Vec<EnrollmentRecord>> for EnrollmentsData {
    fn from(records: Vec<EnrollmentRecord>) -> Self {
        EnrollmentsData {
            enrollments: records.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentDetailData {
    pub enrollment: EnrollmentResponse,
    pub course: CourseResponse,
    pub complete: Vec<CompletionResponse>,
    pub progress: ProgressResponse,
}

impl From<EnrollmentDetail> for EnrollmentDetailData {
    fn from(detail: EnrollmentDetail) -> Self {
        let complete = detail
            .record
            .complete
            .iter()
            .cloned()
            .map(Into::into)
            .collect();

        EnrollmentDetailData {
            enrollment: detail.record.into(),
            course: detail.course.into(),
            complete,
            progress: detail.progress.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLectureRequest {
    pub lecture_id: Uuid,
    #[serde(default)]
    pub notes: Vec<String>,
}
