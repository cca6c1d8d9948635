use csv::StringRecord;
use tracing::info;

use backend_domain::{
    BatchScoringResponse, RecordLayout, ScoringError, ScoringResult, Transaction,
};

use crate::execution::{report, run_scoring};
use crate::{AppError, AppState};

/// Columns appended to an uploaded CSV. Uploaded columns with these names
/// are dropped so the output has one of each.
const RESULT_COLUMNS: [&str; 2] = ["is_anomaly", "anomaly_score"];

pub async fn score_transaction(
    state: &AppState,
    transaction: Transaction,
) -> Result<ScoringResult, AppError> {
    let pipeline = state.pipeline.clone();
    let result = run_scoring(state, move || pipeline.score_one(&transaction)).await?;
    state
        .metrics
        .record_scoring(1, usize::from(result.is_anomaly == 1));
    Ok(result)
}

pub async fn score_batch(
    state: &AppState,
    transactions: Vec<Transaction>,
) -> Result<BatchScoringResponse, AppError> {
    check_batch_size(state, transactions.len())?;
    let pipeline = state.pipeline.clone();
    let results = run_scoring(state, move || pipeline.score_batch(&transactions)).await?;
    let anomalies = count_anomalies(&results);
    state.metrics.record_scoring(results.len(), anomalies);
    info!(rows = results.len(), anomalies, "scored batch");
    Ok(BatchScoringResponse { results })
}

/// Scores an uploaded CSV and returns it with the result columns appended.
pub async fn score_batch_csv(state: &AppState, body: Vec<u8>) -> Result<Vec<u8>, AppError> {
    let batch = CsvBatch::parse(&body).map_err(|err| report(state, err))?;
    check_batch_size(state, batch.transactions.len())?;

    let pipeline = state.pipeline.clone();
    let transactions = batch.transactions;
    let results = run_scoring(state, move || pipeline.score_batch(&transactions)).await?;
    let anomalies = count_anomalies(&results);
    state.metrics.record_scoring(results.len(), anomalies);
    info!(rows = results.len(), anomalies, "scored csv batch");

    write_scored_csv(&batch.header, &batch.records, &results)
}

fn check_batch_size(state: &AppState, size: usize) -> Result<(), AppError> {
    if size == 0 {
        return Err(report(state, ScoringError::EmptyBatch));
    }
    let max = state.config.max_batch_size;
    if size > max {
        return Err(report(state, ScoringError::BatchTooLarge { size, max }));
    }
    Ok(())
}

fn count_anomalies(results: &[ScoringResult]) -> usize {
    results.iter().filter(|result| result.is_anomaly == 1).count()
}

struct CsvBatch {
    header: Vec<String>,
    records: Vec<StringRecord>,
    transactions: Vec<Transaction>,
}

impl CsvBatch {
    fn parse(body: &[u8]) -> Result<Self, ScoringError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(body);
        let header: Vec<String> = reader
            .headers()
            .map_err(|err| ScoringError::Schema(format!("unreadable csv header: {}", err)))?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let layout = RecordLayout::from_header(&header)?;

        let mut records = Vec::new();
        let mut transactions = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record
                .map_err(|err| ScoringError::Schema(format!("row {}: unreadable csv: {}", row, err)))?;
            transactions.push(layout.transaction(row, |i| record.get(i))?);
            records.push(record);
        }
        Ok(Self {
            header,
            records,
            transactions,
        })
    }
}

fn write_scored_csv(
    header: &[String],
    records: &[StringRecord],
    results: &[ScoringResult],
) -> Result<Vec<u8>, AppError> {
    let kept: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !RESULT_COLUMNS.contains(&name.as_str()))
        .map(|(index, _)| index)
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    let out_header = kept
        .iter()
        .map(|index| header[*index].as_str())
        .chain(RESULT_COLUMNS);
    writer
        .write_record(out_header)
        .map_err(|err| AppError::Internal(err.into()))?;

    for (record, result) in records.iter().zip(results) {
        let is_anomaly = result.is_anomaly.to_string();
        let score = result.anomaly_score.to_string();
        let fields = kept
            .iter()
            .map(|index| record.get(*index).unwrap_or(""))
            .chain([is_anomaly.as_str(), score.as_str()]);
        writer
            .write_record(fields)
            .map_err(|err| AppError::Internal(err.into()))?;
    }

    writer
        .into_inner()
        .map_err(|err| AppError::Internal(anyhow::anyhow!("failed to flush csv: {}", err)))
}
