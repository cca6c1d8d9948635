use std::collections::HashMap;

use tracing::{error, info};

use backend_domain::{
    CategoryCount, FilterOptions, ScoredRow, TransactionQuery, TransactionSummary,
};

use crate::execution::run_scoring;
use crate::{AppError, AppState};

/// Filters the historical dataset, caps it, then scores the surviving rows.
pub async fn list_transactions(
    state: &AppState,
    query: TransactionQuery,
) -> Result<Vec<ScoredRow>, AppError> {
    let limit = state.config.effective_limit(query.limit);
    let rows = state
        .transactions
        .fetch_filtered(&query.filter, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch transactions: {}", err);
            AppError::Internal(err)
        })?;

    let columns = state.transactions.columns();
    let pipeline = state.pipeline.clone();
    let scored = run_scoring(state, move || pipeline.score_rows(columns, rows)).await?;

    let anomalies = scored.iter().filter(|row| row.is_anomaly()).count();
    state.metrics.record_scoring(scored.len(), anomalies);
    info!(rows = scored.len(), anomalies, limit, "listed transactions");
    Ok(scored)
}

pub async fn summarize_transactions(
    state: &AppState,
    query: TransactionQuery,
) -> Result<TransactionSummary, AppError> {
    let rows = list_transactions(state, query).await?;
    Ok(summarize(&rows))
}

pub async fn transaction_filter_options(state: &AppState) -> Result<FilterOptions, AppError> {
    state.transactions.filter_options().await.map_err(|err| {
        error!("failed to collect filter options: {}", err);
        AppError::Internal(err)
    })
}

/// CSV of the flagged rows in the filtered slice.
pub async fn export_anomalies_csv(
    state: &AppState,
    query: TransactionQuery,
) -> Result<Vec<u8>, AppError> {
    let rows = list_transactions(state, query).await?;
    let columns = state.transactions.columns();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(ScoredRow::csv_header(&columns))
        .map_err(|err| AppError::Internal(err.into()))?;
    for row in rows.iter().filter(|row| row.is_anomaly()) {
        writer
            .write_record(row.csv_record())
            .map_err(|err| AppError::Internal(err.into()))?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Internal(anyhow::anyhow!("failed to flush csv: {}", err)))
}

pub fn summarize(rows: &[ScoredRow]) -> TransactionSummary {
    let flagged: Vec<&ScoredRow> = rows.iter().filter(|row| row.is_anomaly()).collect();
    let anomaly_rate_percent = if rows.is_empty() {
        0.0
    } else {
        let rate = flagged.len() as f64 / rows.len() as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    };
    TransactionSummary {
        total_transactions: rows.len(),
        flagged_anomalies: flagged.len(),
        anomaly_rate_percent,
        anomalies_by_transaction_type: count_by(&flagged, |row| {
            &row.row.transaction.transaction_type
        }),
        anomalies_by_location: count_by(&flagged, |row| &row.row.transaction.location),
    }
}

fn count_by<F>(rows: &[&ScoredRow], key: F) -> Vec<CategoryCount>
where
    F: Fn(&ScoredRow) -> &String,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(key(row).as_str()).or_default() += 1;
    }
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_state;
    use backend_domain::{RuntimeConfig, TransactionFilter};

    fn query(filter: TransactionFilter, limit: Option<usize>) -> TransactionQuery {
        TransactionQuery { filter, limit }
    }

    #[tokio::test]
    async fn listing_returns_filtered_scored_rows() {
        let state = fixture_state(RuntimeConfig::default());
        let filter = TransactionFilter {
            location: vec!["Mombasa".to_string()],
            user_type: vec!["individual".to_string()],
            ..TransactionFilter::default()
        };
        let rows = list_transactions(&state, query(filter.clone(), None))
            .await
            .expect("list");
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| filter.matches(&row.row.transaction)));
        let flags: Vec<u8> = rows.iter().map(|row| row.scored.result.is_anomaly).collect();
        assert_eq!(flags, vec![0, 1, 0, 1]);
    }

    #[tokio::test]
    async fn limit_is_applied_after_filtering_and_clamped() {
        let state = fixture_state(RuntimeConfig {
            max_list_limit: 3,
            ..RuntimeConfig::default()
        });
        let filter = TransactionFilter {
            transaction_type: vec!["transfer".to_string()],
            ..TransactionFilter::default()
        };
        let rows = list_transactions(&state, query(filter.clone(), Some(50)))
            .await
            .expect("list");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.row.transaction.transaction_type == "transfer"));

        let none = list_transactions(&state, query(filter, Some(0)))
            .await
            .expect("list");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn summary_counts_flagged_rows() {
        let state = fixture_state(RuntimeConfig::default());
        let summary = summarize_transactions(&state, TransactionQuery::default())
            .await
            .expect("summary");
        assert_eq!(summary.total_transactions, 12);
        assert_eq!(summary.flagged_anomalies, 7);
        assert_eq!(summary.anomaly_rate_percent, 58.33);
        assert_eq!(
            summary.anomalies_by_transaction_type,
            vec![
                CategoryCount { value: "transfer".to_string(), count: 5 },
                CategoryCount { value: "deposit".to_string(), count: 1 },
                CategoryCount { value: "withdrawal".to_string(), count: 1 },
            ]
        );
        assert_eq!(summary.anomalies_by_location[0].value, "Nairobi");
        assert_eq!(summary.anomalies_by_location[0].count, 4);
    }

    #[test]
    fn empty_slice_has_zero_rate() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.anomaly_rate_percent, 0.0);
        assert!(summary.anomalies_by_location.is_empty());
    }

    #[tokio::test]
    async fn export_contains_only_flagged_rows() {
        let state = fixture_state(RuntimeConfig::default());
        let bytes = export_anomalies_csv(&state, TransactionQuery::default())
            .await
            .expect("export");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("transaction_id,timestamp,user_id,"));
        assert!(lines[0].ends_with(",log_amount,is_anomaly,anomaly_score"));
        assert!(lines[1].starts_with("TX0001,"));
        assert!(lines[1..].iter().all(|line| line.contains(",1,-0.")));
    }

    #[tokio::test]
    async fn filter_options_come_from_dataset() {
        let state = fixture_state(RuntimeConfig::default());
        let options = transaction_filter_options(&state).await.expect("options");
        assert_eq!(options.device_type, vec!["mobile", "web"]);
        assert_eq!(options.network_provider, vec!["Safaricom", "Airtel"]);
    }
}
