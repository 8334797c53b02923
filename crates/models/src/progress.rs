use crate::course_content::Sections;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Completion percentage in `[0, 100]`, rounded half up.
///
/// A course without lectures is 0% complete. Counts above `total` are
/// clamped instead of rejected.
pub fn percentage(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let completed = u128::from(completed.min(total));
    let total = u128::from(total);

    // round(completed / total * 100) without floating point
    ((completed * 200 + total) / (total * 2)) as u8
}

/// Progress through one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section_id: Uuid,
    pub completed_items: Vec<Uuid>,
    pub completed_lectures: u64,
    pub total_lectures: u64,
    pub percentage: u8,
}

/// Progress through a whole course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub completed_lectures: u64,
    pub total_lectures: u64,
    pub percentage: u8,
    /// Completed ids that are no longer lectures of the course
    pub orphaned_lectures: Vec<Uuid>,
    pub sections: Vec<SectionProgress>,
}

impl CourseProgress {
    /// Merges a completion history with the current course structure.
    ///
    /// Only lectures that still exist count, on both sides of the ratio.
    /// Repeated ids count once.
    pub fn compute(sections: &Sections, completed: &[Uuid]) -> Self {
        let completed_set: HashSet<Uuid> = completed.iter().copied().collect();

        let section_progress: Vec<SectionProgress> = sections
            .iter()
            .map(|section| {
                let lecture_ids: Vec<Uuid> = section.lecture_ids().collect();
                let completed_items: Vec<Uuid> = lecture_ids
                    .iter()
                    .copied()
                    .filter(|id| completed_set.contains(id))
                    .collect();

                let completed_lectures = completed_items.len() as u64;
                let total_lectures = lecture_ids.len() as u64;

                SectionProgress {
                    section_id: section.id,
                    completed_items,
                    completed_lectures,
                    total_lectures,
                    percentage: percentage(completed_lectures, total_lectures),
                }
            })
            .collect();

        let current: HashSet<Uuid> = sections.lecture_ids().collect();
        let mut seen = HashSet::new();
        let orphaned_lectures = completed
            .iter()
            .copied()
            .filter(|id| !current.contains(id) && seen.insert(*id))
            .collect();

        let completed_lectures = section_progress.iter().map(|s| s.completed_lectures).sum();
        let total_lectures = section_progress.iter().map(|s| s.total_lectures).sum();

        CourseProgress {
            completed_lectures,
            total_lectures,
            percentage: percentage(completed_lectures, total_lectures),
            orphaned_lectures,
            sections: section_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course_content::{Item, ItemType, Section};

    fn lecture() -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Lecture".to_string(),
            item_type: ItemType::Lecture,
        }
    }

    fn section(items: Vec<Item>) -> Section {
        Section {
            id: Uuid::new_v4(),
            title: "Section".to_string(),
            items,
        }
    }

    #[test]
    fn test_zero_total_is_zero() {
        for completed in [0, 1, 5, u64::MAX] {
            assert_eq!(percentage(completed, 0), 0);
        }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(1, 201), 0);
        assert_eq!(percentage(4, 4), 100);
    }

    #[test]
    fn test_clamped_to_hundred() {
        assert_eq!(percentage(12, 10), 100);
        assert_eq!(percentage(u64::MAX, 1), 100);
        assert_eq!(percentage(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn test_monotonic_in_completed() {
        for total in 1..=60 {
            let mut previous = 0;
            for completed in 0..=total {
                let current = percentage(completed, total);
                assert!(current >= previous, "{completed}/{total} went down");
                assert!(current <= 100);
                previous = current;
            }
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(percentage(7, 9), percentage(7, 9));
    }

    #[test]
    fn test_course_progress_per_section() {
        let (a, b, c) = (lecture(), lecture(), lecture());
        let quiz = Item {
            id: Uuid::new_v4(),
            title: "Quiz".to_string(),
            item_type: ItemType::Quiz,
        };
        let sections = Sections(vec![
            section(vec![a.clone(), quiz.clone()]),
            section(vec![b.clone(), c.clone()]),
        ]);

        let progress = CourseProgress::compute(&sections, &[a.id, c.id]);

        assert_eq!(progress.total_lectures, 3);
        assert_eq!(progress.completed_lectures, 2);
        assert_eq!(progress.percentage, 67);
        assert_eq!(progress.sections[0].percentage, 100);
        assert_eq!(progress.sections[0].completed_items, vec![a.id]);
        assert_eq!(progress.sections[1].completed_lectures, 1);
        assert!(progress.orphaned_lectures.is_empty());
    }

    #[test]
    fn test_orphans_are_excluded() {
        let kept = lecture();
        let removed = Uuid::new_v4();
        let sections = Sections(vec![section(vec![kept.clone(), lecture()])]);

        let progress = CourseProgress::compute(&sections, &[removed, kept.id, removed]);

        assert_eq!(progress.completed_lectures, 1);
        assert_eq!(progress.total_lectures, 2);
        assert_eq!(progress.percentage, 50);
        assert_eq!(progress.orphaned_lectures, vec![removed]);
    }

    #[test]
    fn test_duplicates_count_once() {
        let only = lecture();
        let sections = Sections(vec![section(vec![only.clone(), lecture()])]);

        let progress = CourseProgress::compute(&sections, &[only.id, only.id, only.id]);

        assert_eq!(progress.completed_lectures, 1);
        assert_eq!(progress.percentage, 50);
    }

    #[test]
    fn test_empty_course() {
        let progress = CourseProgress::compute(&Sections::default(), &[Uuid::new_v4()]);

        assert_eq!(progress.total_lectures, 0);
        assert_eq!(progress.percentage, 0);
        assert_eq!(progress.orphaned_lectures.len(), 1);
        assert!(progress.sections.is_empty());
    }
}
