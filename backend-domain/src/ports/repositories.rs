use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{FilterOptions, HistoricalRow, TransactionFilter};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Dataset column names in source order.
    fn columns(&self) -> Arc<[String]>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Rows matching `filter`, in dataset order, truncated to `limit`.
    async fn fetch_filtered(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<HistoricalRow>>;
    async fn filter_options(&self) -> anyhow::Result<FilterOptions>;
}
