use std::time::Duration;

/// Latency distribution of a set of timed submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencyStats {
    pub total: Duration,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p99: Duration,
}

impl LatencyStats {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let total: Duration = sorted.iter().sum();
        Self {
            total,
            mean: total / sorted.len() as u32,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p50: percentile(&sorted, 50.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

/// Nearest-rank percentile of an ascending, non-empty slice.
fn percentile(sorted: &[Duration], pct: f64) -> Duration {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(LatencyStats::from_samples(&[]), LatencyStats::default());
    }

    #[test]
    fn test_single_sample() {
        let stats = LatencyStats::from_samples(&[ms(7)]);
        assert_eq!(stats.total, ms(7));
        assert_eq!(stats.mean, ms(7));
        assert_eq!(stats.p50, ms(7));
        assert_eq!(stats.p99, ms(7));
    }

    #[test]
    fn test_percentiles() {
        let samples: Vec<Duration> = (1..=100).rev().map(ms).collect();
        let stats = LatencyStats::from_samples(&samples);
        assert_eq!(stats.total, ms(5050));
        assert_eq!(stats.mean, Duration::from_micros(50_500));
        assert_eq!(stats.min, ms(1));
        assert_eq!(stats.max, ms(100));
        assert_eq!(stats.p50, ms(50));
        assert_eq!(stats.p99, ms(99));
    }
}
