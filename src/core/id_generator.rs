use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of candidate record ids, injected into the pipeline.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Millisecond timestamp scaled by 1000. Ids are strictly increasing: a
/// burst inside one millisecond keeps counting past the timestamp floor.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicU64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> u64 {
        let floor = (Utc::now().timestamp_millis().max(0) as u64).saturating_mul(1000);
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(floor.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        floor.max(previous.saturating_add(1))
    }
}

/// Plain counter for deterministic ids.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    start: u64,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(start: u64) -> Self {
        Self {
            start,
            next: AtomicU64::new(start),
        }
    }

    pub fn reset(&self) {
        self.next.store(self.start, Ordering::SeqCst);
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn timestamp_ids_are_distinct_within_a_burst() {
        let generator = TimestampIdGenerator::new();
        let ids: Vec<u64> = (0..5000).map(|_| generator.next_id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 5000);
    }

    #[test]
    fn timestamp_ids_stay_unique_across_threads() {
        let generator = std::sync::Arc::new(TimestampIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (0..2000).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 8000);
    }

    #[test]
    fn sequential_ids_count_up_and_reset() {
        let generator = SequentialIdGenerator::new(100);
        assert_eq!(generator.next_id(), 100);
        assert_eq!(generator.next_id(), 101);
        generator.reset();
        assert_eq!(generator.next_id(), 100);
    }
}
