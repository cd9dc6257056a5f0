use std::time::{Duration, Instant};

use crate::task::TaskId;

/// Rows that are fading out before being deleted
#[derive(Debug, Clone)]
pub struct PendingRemovals {
    transition: Duration,
    pending: Vec<(TaskId, Instant)>,
}

impl PendingRemovals {
    pub fn new(transition: Duration) -> Self {
        Self {
            transition,
            pending: Vec::new(),
        }
    }

    /// Start fading `id`; returns `false` if it is already pending, which
    /// leaves the original start time in place
    pub fn begin(&mut self, id: TaskId, now: Instant) -> bool {
        if self.contains(id) {
            return false;
        }
        self.pending.push((id, now));
        true
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fade progress of `id` in `0.0..=1.0`
    pub fn progress(&self, id: TaskId, now: Instant) -> Option<f32> {
        let (_, started) = self.pending.iter().find(|(pending, _)| *pending == id)?;
        if self.transition.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(*started);
        Some((elapsed.as_secs_f32() / self.transition.as_secs_f32()).min(1.0))
    }

    /// Remove and return every id whose transition has finished
    pub fn take_expired(&mut self, now: Instant) -> Vec<TaskId> {
        let transition = self.transition;
        let mut expired = Vec::new();
        self.pending.retain(|(id, started)| {
            if now.saturating_duration_since(*started) >= transition {
                expired.push(*id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove and return every pending id, finished or not
    pub fn drain(&mut self) -> Vec<TaskId> {
        self.pending.drain(..).map(|(id, _)| id).collect()
    }
}
