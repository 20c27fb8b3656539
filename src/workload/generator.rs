use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

use super::{Batch, Fields, WriteSpec};

pub const FILTER_FIELD: &str = "name";
pub const UPDATE_FIELD: &str = "foo";
pub const DEFAULT_PAYLOAD: &str = "bar";

/// Builds the batches a benchmark submits. Generation runs outside the timed
/// window, so implementations may be arbitrarily slow.
pub trait BatchGenerator: Send + Sync {
    /// Build exactly `size` writes.
    fn generate(&self, size: usize) -> Batch;
}

/// Generates `{name: name<unix-nanos>-<seq>}` filters with a `$set foo`
/// update.
///
/// The nanosecond clock keeps values distinct across processes; the
/// sequence number keeps them distinct within one batch even when the clock
/// does not advance between calls.
pub struct TimestampGenerator {
    seq: AtomicU64,
    payload_bytes: Option<usize>,
}

impl TimestampGenerator {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
            payload_bytes: None,
        }
    }

    /// Use a random alphanumeric payload of `payload_bytes` characters
    /// instead of the literal `"bar"`.
    pub fn with_payload_bytes(payload_bytes: Option<usize>) -> Self {
        Self {
            seq: AtomicU64::new(0),
            payload_bytes,
        }
    }

    fn filter_value(&self) -> String {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{FILTER_FIELD}{nanos}-{seq}")
    }

    fn payload(&self) -> String {
        match self.payload_bytes {
            None => DEFAULT_PAYLOAD.to_string(),
            Some(len) => rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect(),
        }
    }
}

impl Default for TimestampGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchGenerator for TimestampGenerator {
    fn generate(&self, size: usize) -> Batch {
        (0..size)
            .map(|_| {
                let filter = Fields::from([(FILTER_FIELD.to_string(), self.filter_value())]);
                let update = Fields::from([(UPDATE_FIELD.to_string(), self.payload())]);
                WriteSpec::new(filter, update)
            })
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(10)]
    #[case(1000)]
    fn test_generate_exact_size(#[case] size: usize) {
        let batch = TimestampGenerator::new().generate(size);
        assert_eq!(batch.len(), size);
    }

    #[test]
    fn test_filters_are_unique() {
        let generator = TimestampGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..10 {
            for spec in &generator.generate(100) {
                assert!(seen.insert(spec.filter_key()));
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_default_update_payload() {
        let batch = TimestampGenerator::new().generate(1);
        let spec = &batch.specs()[0];
        assert_eq!(spec.update().get(UPDATE_FIELD).unwrap(), DEFAULT_PAYLOAD);
        assert!(spec.filter().get(FILTER_FIELD).unwrap().starts_with("name"));
    }

    #[test]
    fn test_random_payload_length() {
        let batch = TimestampGenerator::with_payload_bytes(Some(64)).generate(3);
        for spec in &batch {
            let payload = spec.update().get(UPDATE_FIELD).unwrap();
            assert_eq!(payload.len(), 64);
            assert!(payload.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
