use std::io::Read;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use backend_domain::{
    CellValue, FeaturePreparer, FilterOptions, HistoricalRow, RecordLayout, TransactionFilter,
    TransactionRepository,
};

/// The historical transaction file, parsed and validated once at startup
/// and kept in memory for the life of the process.
pub struct CsvTransactionRepository {
    columns: Arc<[String]>,
    rows: Vec<HistoricalRow>,
    filter_options: FilterOptions,
}

impl CsvTransactionRepository {
    pub async fn load(path: &str) -> Result<Self> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("failed to read dataset {}", path))?;
        let repository = Self::from_reader(bytes.as_slice())
            .with_context(|| format!("failed to load dataset {}", path))?;
        info!(
            path,
            rows = repository.rows.len(),
            columns = repository.columns.len(),
            "historical dataset loaded"
        );
        Ok(repository)
    }

    /// Parses CSV with a header row. Every row must carry a valid
    /// transaction; the first bad row fails the load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let header: Vec<String> = reader
            .headers()
            .context("failed to read dataset header")?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let layout = RecordLayout::from_header(&header)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("failed to read dataset row {}", index))?;
            if record.len() != header.len() {
                return Err(anyhow!(
                    "dataset row {} has {} fields, header has {}",
                    index,
                    record.len(),
                    header.len()
                ));
            }
            let transaction = layout.transaction(index, |i| record.get(i))?;
            FeaturePreparer::validate(index, &transaction)?;
            let cells = record.iter().map(CellValue::parse).collect();
            rows.push(HistoricalRow { transaction, cells });
        }

        let filter_options = FilterOptions::collect(rows.iter().map(|row| &row.transaction));
        Ok(Self {
            columns: header.into(),
            rows,
            filter_options,
        })
    }
}

#[async_trait]
impl TransactionRepository for CsvTransactionRepository {
    fn columns(&self) -> Arc<[String]> {
        self.columns.clone()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    async fn fetch_filtered(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> Result<Vec<HistoricalRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| filter.matches(&row.transaction))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        Ok(self.filter_options.clone())
    }
}
