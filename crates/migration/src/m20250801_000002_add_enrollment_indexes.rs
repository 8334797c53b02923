use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public listing filters on status
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_status")
                    .table(Courses::Table)
                    .col(Courses::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_instructor_id")
                    .table(Courses::Table)
                    .col(Courses::InstructorId)
                    .to_owned(),
            )
            .await?;

        // Learner and course listings
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_updated_by")
                    .table(Enrollments::Table)
                    .col(Enrollments::UpdatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        // A lecture is completed at most once per enrollment
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_completions_enrollment_lecture")
                    .table(EnrollmentCompletions::Table)
                    .col(EnrollmentCompletions::EnrollmentId)
                    .col(EnrollmentCompletions::LectureId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // At most one active enrollment per learner and course.
        // Partial indexes are written by hand, both Postgres and SQLite accept this form.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_enrollments_active_learner_course
                 ON enrollments (course_id, updated_by) WHERE is_delete = false;",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_enrollments_active_learner_course;")
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollment_completions_enrollment_lecture")
                    .table(EnrollmentCompletions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_updated_by")
                    .table(Enrollments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_instructor_id")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_status")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Status,
    InstructorId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    CourseId,
    UpdatedBy,
}

#[derive(Iden)]
enum EnrollmentCompletions {
    Table,
    EnrollmentId,
    LectureId,
}
