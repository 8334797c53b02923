use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One lecture completion event in an enrollment's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub lecture_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub notes: Vec<String>,
}

/// Learner notes attached to a completion, stored as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::FromJsonQueryResult))]
#[serde(transparent)]
pub struct LectureNotes(pub Vec<String>);

impl LectureNotes {
    /// Trims each note and drops the blank ones
    pub fn from_raw(notes: Vec<String>) -> Self {
        LectureNotes(
            notes
                .into_iter()
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty())
                .collect(),
        )
    }
}

/// Lecture ids in completion order, as derived from the completion history
pub fn completed_lectures(entries: &[CompletionEntry]) -> Vec<Uuid> {
    entries.iter().map(|entry| entry.lecture_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_lectures_keeps_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let entries = vec![
            CompletionEntry {
                lecture_id: first,
                completed_at: Utc::now(),
                notes: vec![],
            },
            CompletionEntry {
                lecture_id: second,
                completed_at: Utc::now(),
                notes: vec!["good".to_string()],
            },
        ];

        assert_eq!(completed_lectures(&entries), vec![first, second]);
        assert!(completed_lectures(&[]).is_empty());
    }

    #[test]
    fn test_notes_are_normalized() {
        let notes = LectureNotes::from_raw(vec![
            "  revisit slide 4 ".to_string(),
            "".to_string(),
            "   ".to_string(),
        ]);

        assert_eq!(notes, LectureNotes(vec!["revisit slide 4".to_string()]));
    }
}
