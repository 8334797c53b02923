#![allow(dead_code)]

use chrono::Utc;
use database::{
    entities::{
        courses,
        users::{self, Role},
    },
    services::user::UserService,
};
use migration::{Migrator, MigratorTrait};
use models::{
    course_content::{Item, ItemType, Section, Sections},
    publication::CourseStatus,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory database with every migration applied
pub async fn setup() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn user(db: &DatabaseConnection, subject: &str, role: Role) -> users::Model {
    let user = UserService::find_or_create_by_subject(db, subject, &[])
        .await
        .unwrap();
    if user.role == role {
        return user;
    }

    let mut active: users::ActiveModel = user.into();
    active.role = Set(role);
    active.update(db).await.unwrap()
}

/// One section of lectures followed by a section holding a single quiz
pub fn sections(lecture_count: usize) -> Sections {
    let lectures = (0..lecture_count)
        .map(|i| Item {
            id: Uuid::new_v4(),
            title: format!("Lecture {}", i + 1),
            item_type: ItemType::Lecture,
        })
        .collect();

    Sections(vec![
        Section {
            id: Uuid::new_v4(),
            title: "Lectures".to_string(),
            items: lectures,
        },
        Section {
            id: Uuid::new_v4(),
            title: "Assessment".to_string(),
            items: vec![Item {
                id: Uuid::new_v4(),
                title: "Final quiz".to_string(),
                item_type: ItemType::Quiz,
            }],
        },
    ])
}

pub async fn course(
    db: &DatabaseConnection,
    instructor: &users::Model,
    status: CourseStatus,
    price_cents: i64,
    lecture_count: usize,
) -> courses::Model {
    let now = Utc::now();
    courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(format!("Course {}", Uuid::new_v4())),
        description: Set(None),
        instructor_id: Set(instructor.id),
        price_cents: Set(price_cents),
        status: Set(status.code()),
        sections: Set(sections(lecture_count)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn lecture_ids(course: &courses::Model) -> Vec<Uuid> {
    course.sections.lecture_ids().collect()
}

pub fn quiz_id(course: &courses::Model) -> Uuid {
    course
        .sections
        .iter()
        .flat_map(|section| section.items.iter())
        .find(|item| item.item_type == ItemType::Quiz)
        .map(|item| item.id)
        .unwrap()
}
