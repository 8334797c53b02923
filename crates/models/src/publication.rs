use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// Raw status values that count as published.
///
/// Listing queries filter on this set and clients receive the result of
/// [`is_published`], so both always agree.
pub const PUBLISHED_STATUSES: [i16; 2] = [
    CourseStatus::Published as i16,
    CourseStatus::Restricted as i16,
];

/// Returns whether a raw course status counts as published
pub fn is_published(status: i16) -> bool {
    PUBLISHED_STATUSES.contains(&status)
}

/// Lifecycle state of a course, stored as a small integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, AsRefStr)]
#[repr(i16)]
#[strum(serialize_all = "snake_case")]
pub enum CourseStatus {
    /// Being authored, only visible to its instructor
    Draft = 0,
    /// Submitted and waiting for an admin
    PendingReview = 1,
    /// Publicly listed
    Published = 2,
    /// Published but not promoted
    Restricted = 3,
}

impl CourseStatus {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn is_published(self) -> bool {
        is_published(self.code())
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<CourseStatus> {
        CourseStatus::iter().collect()
    }
}

/// Error returned when a raw status does not name a known lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus(pub i16);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown course status {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl TryFrom<i16> for CourseStatus {
    type Error = UnknownStatus;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        CourseStatus::iter()
            .find(|status| status.code() == code)
            .ok_or(UnknownStatus(code))
    }
}
