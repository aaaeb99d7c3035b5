use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "SCHEDULED",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<SessionStatus> {
        match s {
            "SCHEDULED" => Some(SessionStatus::Scheduled),
            "COMPLETED" => Some(SessionStatus::Completed),
            "CANCELLED" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionView {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub course_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub attended: Option<bool>,
    pub location: String,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub teacher_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub course_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub student_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub course_id: Option<Option<Uuid>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub attended: Option<bool>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl SessionPatch {
    pub fn touches_interval(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub subject_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub status: Option<SessionStatus>,
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Strict inequality on both ends, so a session ending exactly when another
/// begins does not conflict.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn partial_overlap_conflicts() {
        // 10:00-11:00 vs 10:30-11:30
        assert!(overlaps(at(10, 30), at(11, 30), at(10, 0), at(11, 0)));
    }

    #[test]
    fn containment_conflicts() {
        assert!(overlaps(at(10, 15), at(10, 45), at(10, 0), at(11, 0)));
        assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn identical_intervals_conflict() {
        assert!(overlaps(at(10, 0), at(11, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn adjacent_intervals_do_not_conflict() {
        // Touching endpoints are allowed in both directions.
        assert!(!overlaps(at(11, 0), at(12, 0), at(10, 0), at(11, 0)));
        assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert!(!overlaps(at(13, 0), at(14, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (at(10, 30), at(11, 30), at(10, 0), at(11, 0)),
            (at(11, 0), at(12, 0), at(10, 0), at(11, 0)),
            (at(9, 0), at(10, 0), at(10, 0), at(11, 0)),
        ];
        for (a1, a2, b1, b2) in cases {
            assert_eq!(overlaps(a1, a2, b1, b2), overlaps(b1, b2, a1, a2));
        }
    }

    #[test]
    fn status_round_trips() {
        for s in [
            SessionStatus::Scheduled,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(SessionStatus::parse("PENDING"), None);
    }
}
