use crate::models::HeatStressAlert;

/// Predictive heat-stress detection over a daily GDD series
///
/// Conditions:
/// - `consecutive_days` days in a row each with GDD ≥ `threshold`
///
/// A gap (day without temperatures) breaks a run without counting for or
/// against it. The whole series is always scanned; the alert remembers the
/// first day that completed a qualifying run.
#[derive(Debug, Clone, Copy)]
pub struct HeatStressDetector {
    threshold: f64,
    consecutive_days: usize,
}

impl HeatStressDetector {
    pub fn new(threshold: f64, consecutive_days: usize) -> Self {
        Self {
            threshold,
            consecutive_days: consecutive_days.max(1),
        }
    }

    pub fn scan(&self, series: &[Option<f64>]) -> HeatStressAlert {
        let mut run = 0usize;
        let mut longest_run = 0usize;
        let mut trigger_index = None;

        for (i, gdd) in series.iter().enumerate() {
            match gdd {
                Some(value) if *value >= self.threshold => {
                    run += 1;
                    longest_run = longest_run.max(run);
                    if run >= self.consecutive_days && trigger_index.is_none() {
                        trigger_index = Some(i);
                    }
                }
                _ => run = 0,
            }
        }

        if let Some(i) = trigger_index {
            tracing::debug!(
                trigger_index = i,
                longest_run,
                "Predictive heat-stress alert triggered"
            );
        }

        HeatStressAlert {
            triggered: trigger_index.is_some(),
            trigger_index,
            longest_run,
            series: series.to_vec(),
        }
    }
}

impl Default for HeatStressDetector {
    fn default() -> Self {
        Self::new(18.0, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn run_after_break_triggers() {
        let alert = HeatStressDetector::default().scan(&some(&[20.0, 19.0, 5.0, 20.0, 20.0, 20.0]));
        assert!(alert.triggered);
        // Run starts at index 3 and completes at index 5
        assert_eq!(alert.trigger_index, Some(5));
        assert_eq!(alert.longest_run, 3);
    }

    #[test]
    fn alternating_series_below_raised_threshold_never_triggers() {
        let detector = HeatStressDetector::new(20.0, 3);
        let alert = detector.scan(&some(&[20.0, 19.0, 20.0, 19.0, 20.0]));
        assert!(!alert.triggered);
        assert_eq!(alert.trigger_index, None);
        assert_eq!(alert.longest_run, 1);
    }

    #[test]
    fn values_at_threshold_count() {
        let alert = HeatStressDetector::default().scan(&some(&[18.0, 18.0, 18.0]));
        assert!(alert.triggered);
        assert_eq!(alert.trigger_index, Some(2));
    }

    #[test]
    fn two_day_run_is_not_enough() {
        let alert = HeatStressDetector::default().scan(&some(&[25.0, 25.0, 10.0, 25.0, 25.0]));
        assert!(!alert.triggered);
        assert_eq!(alert.longest_run, 2);
    }

    #[test]
    fn gap_resets_run() {
        let series = vec![Some(20.0), Some(20.0), None, Some(20.0), Some(20.0)];
        let alert = HeatStressDetector::default().scan(&series);
        assert!(!alert.triggered);
        assert_eq!(alert.series, series);
    }

    #[test]
    fn series_kept_past_trigger() {
        let series = vec![Some(20.0), Some(21.0), Some(22.0), None, Some(3.0), Some(1.0)];
        let alert = HeatStressDetector::default().scan(&series);
        assert!(alert.triggered);
        assert_eq!(alert.trigger_index, Some(2));
        assert_eq!(alert.series.len(), 6);
        assert_eq!(alert.series[3], None);
    }

    #[test]
    fn empty_series_not_triggered() {
        let alert = HeatStressDetector::default().scan(&[]);
        assert!(!alert.triggered);
        assert_eq!(alert.longest_run, 0);
        assert!(alert.series.is_empty());
    }
}
