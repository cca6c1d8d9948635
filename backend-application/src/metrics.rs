use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    scoring_requests: AtomicU64,
    scored_rows: AtomicU64,
    anomalies: AtomicU64,
    rejected_requests: AtomicU64,
    processing_errors: AtomicU64,
}

impl Metrics {
    pub fn record_scoring(&self, rows: usize, anomalies: usize) {
        self.scoring_requests.fetch_add(1, Ordering::Relaxed);
        self.scored_rows.fetch_add(rows as u64, Ordering::Relaxed);
        self.anomalies.fetch_add(anomalies as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processing_error(&self) {
        self.processing_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.scoring_requests.load(Ordering::Relaxed);
        let rows = self.scored_rows.load(Ordering::Relaxed);
        let anomalies = self.anomalies.load(Ordering::Relaxed);
        let rejected = self.rejected_requests.load(Ordering::Relaxed);
        let errors = self.processing_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE fraudscore_scoring_requests_total counter\n\
fraudscore_scoring_requests_total {}\n\
# TYPE fraudscore_scored_rows_total counter\n\
fraudscore_scored_rows_total {}\n\
# TYPE fraudscore_anomalies_total counter\n\
fraudscore_anomalies_total {}\n\
# TYPE fraudscore_rejected_requests_total counter\n\
fraudscore_rejected_requests_total {}\n\
# TYPE fraudscore_processing_errors_total counter\n\
fraudscore_processing_errors_total {}\n",
            requests, rows, anomalies, rejected, errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_exposition() {
        let metrics = Metrics::default();
        metrics.record_scoring(5, 2);
        metrics.record_scoring(1, 0);
        metrics.record_rejected();
        let text = metrics.render_prometheus();
        assert!(text.contains("fraudscore_scoring_requests_total 2\n"));
        assert!(text.contains("fraudscore_scored_rows_total 6\n"));
        assert!(text.contains("fraudscore_anomalies_total 2\n"));
        assert!(text.contains("fraudscore_rejected_requests_total 1\n"));
        assert!(text.contains("fraudscore_processing_errors_total 0\n"));
    }
}
