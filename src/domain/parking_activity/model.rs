//! Parking session domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

/// One user's parking session
#[derive(Debug, Clone)]
pub struct ParkingActivity {
    pub id: i32,
    pub user_id: i32,
    pub slot_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    /// `None` while the session is still running
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingActivity {
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Close the session at `at`.
    pub fn finish(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::Conflict(format!(
                "Parking activity {} has already ended",
                self.id
            )));
        }
        validate_window(self.start_time, Some(at))?;
        self.end_time = Some(at);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn apply(&mut self, patch: ParkingActivityPatch) -> DomainResult<()> {
        let start = patch.start_time.unwrap_or(self.start_time);
        let end = patch.end_time.unwrap_or(self.end_time);
        validate_window(start, end)?;

        self.start_time = start;
        self.end_time = end;
        if let Some(slot_id) = patch.slot_id {
            self.slot_id = slot_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time.map(|end| (end - self.start_time).num_minutes())
    }
}

#[derive(Debug, Clone)]
pub struct NewParkingActivity {
    pub user_id: i32,
    pub slot_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl NewParkingActivity {
    /// A session starting now with no end time.
    pub fn start_now(user_id: i32, slot_id: Option<i32>) -> Self {
        Self {
            user_id,
            slot_id,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_window(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParkingActivityPatch {
    pub slot_id: Option<Option<i32>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default)]
pub struct ParkingActivityFilter {
    pub user_id: Option<i32>,
    /// `Some(true)` → running sessions, `Some(false)` → completed ones
    pub active: Option<bool>,
    /// Bounds on `start_time`
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ParkingActivityFilter {
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(DomainError::Validation("from must not be after to".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityStats {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
}

impl ActivityStats {
    pub fn from_activities(activities: &[ParkingActivity]) -> Self {
        let active = activities.iter().filter(|a| a.is_active()).count() as u64;
        let total = activities.len() as u64;
        Self {
            total,
            active,
            completed: total - active,
        }
    }
}

fn validate_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> DomainResult<()> {
    match end {
        Some(end) if end < start => Err(DomainError::Validation(
            "end_time must not be before start_time".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn running() -> ParkingActivity {
        ParkingActivity {
            id: 3,
            user_id: 1,
            slot_id: Some(2),
            start_time: Utc::now() - Duration::hours(2),
            end_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn finish_closes_the_session() {
        let mut a = running();
        a.finish(Utc::now()).unwrap();
        assert!(!a.is_active());
        assert!(a.duration_minutes().unwrap() >= 119);
    }

    #[test]
    fn finishing_twice_is_a_conflict() {
        let mut a = running();
        a.finish(Utc::now()).unwrap();
        assert!(matches!(a.finish(Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut a = running();
        let err = a.finish(a.start_time - Duration::minutes(1));
        assert!(matches!(err, Err(DomainError::Validation(_))));
        assert!(a.is_active());
    }

    #[test]
    fn patch_can_reopen_a_session() {
        let mut a = running();
        a.finish(Utc::now()).unwrap();
        a.apply(ParkingActivityPatch {
            end_time: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert!(a.is_active());
    }

    #[test]
    fn stats_split_active_and_completed() {
        let mut done = running();
        done.finish(Utc::now()).unwrap();
        let stats = ActivityStats::from_activities(&[running(), running(), done]);
        assert_eq!(
            stats,
            ActivityStats {
                total: 3,
                active: 2,
                completed: 1
            }
        );
    }
}
