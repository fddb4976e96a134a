use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues ids for tasks created while offline.
///
/// Ids are the current Unix time in milliseconds, bumped past the last issued
/// value so that creations within the same millisecond stay distinct.
///
/// Uniqueness only holds within one process. Two devices creating tasks
/// offline can produce the same id; revisit if sync ever spans devices.
#[derive(Debug, Default)]
pub struct OfflineIdGenerator {
    last: AtomicI64,
}

impl OfflineIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
