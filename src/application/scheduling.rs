use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::{can_modify, Actor};
use crate::domain::errors::DomainError;
use crate::domain::ports::SessionRepository;
use crate::domain::session::{NewSession, SessionFilter, SessionPatch, SessionView};

/// Booking service for teacher learning sessions. Input-shape validation
/// happens here, before any transaction; the overlap check itself runs inside
/// the repository under a per-teacher lock.
pub struct SchedulingService<R> {
    repo: R,
}

impl<R: SessionRepository> SchedulingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Filtered read of a teacher's sessions, ordered by start time.
    pub fn list_sessions(
        &self,
        teacher_id: Uuid,
        filter: SessionFilter,
    ) -> Result<Vec<SessionView>, DomainError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if to <= from {
                return Err(DomainError::Validation(
                    "date range end must be after start".into(),
                ));
            }
        }
        self.repo.list(teacher_id, filter)
    }

    pub fn create_session(
        &self,
        actor: &Actor,
        session: NewSession,
    ) -> Result<SessionView, DomainError> {
        if !can_modify(actor, session.teacher_id) {
            return Err(DomainError::Authorization);
        }
        if session.end_time <= session.start_time {
            return Err(DomainError::Validation(
                "end time must be after start time".into(),
            ));
        }
        if session.start_time < Utc::now() {
            return Err(DomainError::Validation(
                "cannot book a session in the past".into(),
            ));
        }
        let created = self.repo.insert(session)?;
        log::info!("session {} booked for teacher {}", created.id, created.teacher_id);
        Ok(created)
    }

    pub fn update_session(
        &self,
        session_id: Uuid,
        actor: &Actor,
        patch: SessionPatch,
    ) -> Result<SessionView, DomainError> {
        // When both bounds are patched the interval can be rejected up
        // front; a half-patched interval is validated against the stored
        // bound inside the repository.
        if let (Some(start), Some(end)) = (patch.start_time, patch.end_time) {
            if end <= start {
                return Err(DomainError::Validation(
                    "end time must be after start time".into(),
                ));
            }
        }
        self.repo.update(session_id, actor.id, patch)
    }

    pub fn cancel_session(
        &self,
        session_id: Uuid,
        actor: &Actor,
        reason: String,
    ) -> Result<(), DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::Validation(
                "cancellation reason is required".into(),
            ));
        }
        self.repo.cancel(session_id, actor.id, reason, Utc::now())?;
        log::info!("session {} cancelled", session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::auth::Role;
    use crate::domain::session::{overlaps, SessionStatus};

    /// In-memory stand-in for the Diesel repository, applying the same
    /// overlap rule the real one does.
    struct InMemorySessions {
        rows: Mutex<Vec<SessionView>>,
    }

    impl InMemorySessions {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    impl SessionRepository for InMemorySessions {
        fn list(
            &self,
            teacher_id: Uuid,
            _filter: SessionFilter,
        ) -> Result<Vec<SessionView>, DomainError> {
            let mut rows: Vec<SessionView> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.teacher_id == teacher_id)
                .cloned()
                .collect();
            rows.sort_by_key(|s| s.start_time);
            Ok(rows)
        }

        fn insert(&self, session: NewSession) -> Result<SessionView, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let colliding: Vec<Uuid> = rows
                .iter()
                .filter(|s| {
                    s.teacher_id == session.teacher_id
                        && s.status != SessionStatus::Cancelled
                        && overlaps(session.start_time, session.end_time, s.start_time, s.end_time)
                })
                .map(|s| s.id)
                .collect();
            if !colliding.is_empty() {
                return Err(DomainError::Conflict { colliding });
            }
            let view = SessionView {
                id: Uuid::new_v4(),
                teacher_id: session.teacher_id,
                student_id: session.student_id,
                subject_id: session.subject_id,
                course_id: session.course_id,
                start_time: session.start_time,
                end_time: session.end_time,
                status: SessionStatus::Scheduled,
                attended: None,
                location: session.location.unwrap_or_else(|| "Online".to_string()),
                notes: session.notes,
                cancel_reason: None,
            };
            rows.push(view.clone());
            Ok(view)
        }

        fn update(
            &self,
            session_id: Uuid,
            actor_teacher_id: Uuid,
            patch: SessionPatch,
        ) -> Result<SessionView, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let idx = rows
                .iter()
                .position(|s| s.id == session_id)
                .ok_or(DomainError::NotFound)?;
            if rows[idx].teacher_id != actor_teacher_id {
                return Err(DomainError::Authorization);
            }
            let start = patch.start_time.unwrap_or(rows[idx].start_time);
            let end = patch.end_time.unwrap_or(rows[idx].end_time);
            if patch.touches_interval() {
                let colliding: Vec<Uuid> = rows
                    .iter()
                    .filter(|s| {
                        s.id != session_id
                            && s.teacher_id == actor_teacher_id
                            && s.status != SessionStatus::Cancelled
                            && overlaps(start, end, s.start_time, s.end_time)
                    })
                    .map(|s| s.id)
                    .collect();
                if !colliding.is_empty() {
                    return Err(DomainError::Conflict { colliding });
                }
            }
            let row = &mut rows[idx];
            row.start_time = start;
            row.end_time = end;
            if let Some(v) = patch.student_id {
                row.student_id = v;
            }
            if let Some(v) = patch.location {
                row.location = v;
            }
            Ok(row.clone())
        }

        fn cancel(
            &self,
            session_id: Uuid,
            actor_teacher_id: Uuid,
            reason: String,
            now: DateTime<Utc>,
        ) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|s| s.id == session_id)
                .ok_or(DomainError::NotFound)?;
            if row.teacher_id != actor_teacher_id {
                return Err(DomainError::Authorization);
            }
            if row.start_time <= now {
                return Err(DomainError::InvalidState(
                    "cannot cancel a past session".into(),
                ));
            }
            row.status = SessionStatus::Cancelled;
            row.cancel_reason = Some(reason);
            Ok(())
        }
    }

    fn teacher() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::Teacher,
        }
    }

    fn booking(teacher_id: Uuid, start_h: i64, end_h: i64) -> NewSession {
        // Fixed future date, so adjacency cases stay exact.
        let base = Utc.with_ymd_and_hms(2030, 3, 10, 0, 0, 0).unwrap();
        NewSession {
            teacher_id,
            student_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            course_id: None,
            start_time: base + Duration::hours(start_h),
            end_time: base + Duration::hours(end_h),
            location: None,
            notes: None,
        }
    }

    #[test]
    fn create_rejects_inverted_interval() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let result = svc.create_session(&actor, booking(actor.id, 2, 1));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_rejects_past_start() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let mut session = booking(actor.id, 0, 1);
        session.start_time = Utc::now() - Duration::hours(1);
        session.end_time = Utc::now() + Duration::hours(1);
        let result = svc.create_session(&actor, session);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_rejects_foreign_teacher() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let result = svc.create_session(&actor, booking(Uuid::new_v4(), 0, 1));
        assert!(matches!(result, Err(DomainError::Authorization)));
    }

    #[test]
    fn overlapping_booking_is_rejected_adjacent_accepted() {
        // Existing 10:00-11:00 slot: 10:30-11:30 conflicts, 11:00-12:00 and
        // 09:00-10:00 are fine.
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let base = svc
            .create_session(&actor, booking(actor.id, 10, 11))
            .expect("first booking");

        let conflict = svc.create_session(&actor, booking(actor.id, 10, 12));
        match conflict {
            Err(DomainError::Conflict { colliding }) => assert_eq!(colliding, vec![base.id]),
            other => panic!("expected conflict, got {other:?}"),
        }

        svc.create_session(&actor, booking(actor.id, 11, 12))
            .expect("adjacent-after booking");
        svc.create_session(&actor, booking(actor.id, 9, 10))
            .expect("adjacent-before booking");
    }

    #[test]
    fn cancelled_slot_can_be_rebooked() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let first = svc
            .create_session(&actor, booking(actor.id, 10, 11))
            .expect("first booking");
        svc.cancel_session(first.id, &actor, "student ill".into())
            .expect("cancel");
        svc.create_session(&actor, booking(actor.id, 10, 11))
            .expect("rebooking the freed slot");
    }

    #[test]
    fn update_recheck_excludes_self() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let session = svc
            .create_session(&actor, booking(actor.id, 10, 11))
            .expect("booking");
        // Shifting within its own slot must not collide with itself.
        let patch = SessionPatch {
            end_time: Some(session.end_time - Duration::minutes(30)),
            ..Default::default()
        };
        svc.update_session(session.id, &actor, patch)
            .expect("shrink in place");
    }

    #[test]
    fn update_by_other_teacher_is_denied() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let session = svc
            .create_session(&actor, booking(actor.id, 10, 11))
            .expect("booking");
        let stranger = teacher();
        let result = svc.update_session(session.id, &stranger, SessionPatch::default());
        assert!(matches!(result, Err(DomainError::Authorization)));
    }

    #[test]
    fn cancel_requires_reason() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let actor = teacher();
        let session = svc
            .create_session(&actor, booking(actor.id, 10, 11))
            .expect("booking");
        let result = svc.cancel_session(session.id, &actor, "  ".into());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn list_rejects_inverted_range() {
        let svc = SchedulingService::new(InMemorySessions::new());
        let filter = SessionFilter {
            from: Some(Utc::now()),
            to: Some(Utc::now() - Duration::hours(1)),
            ..Default::default()
        };
        let result = svc.list_sessions(Uuid::new_v4(), filter);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
