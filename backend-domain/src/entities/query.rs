// Listing query and report entities

use serde::{Deserialize, Serialize};

use crate::entities::Transaction;

/// Set-membership filters over the historical dataset. An empty selector
/// matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub transaction_type: Vec<String>,
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub user_type: Vec<String>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        selector_matches(&self.transaction_type, &transaction.transaction_type)
            && selector_matches(&self.location, &transaction.location)
            && selector_matches(&self.user_type, &transaction.user_type)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.transaction_type.is_empty() && self.location.is_empty() && self.user_type.is_empty()
    }
}

fn selector_matches(selector: &[String], value: &str) -> bool {
    selector.is_empty() || selector.iter().any(|candidate| candidate == value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_transactions: usize,
    pub flagged_anomalies: usize,
    pub anomaly_rate_percent: f64,
    pub anomalies_by_transaction_type: Vec<CategoryCount>,
    pub anomalies_by_location: Vec<CategoryCount>,
}

/// Distinct selector values, in order of first appearance in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub transaction_type: Vec<String>,
    pub location: Vec<String>,
    pub user_type: Vec<String>,
    pub device_type: Vec<String>,
    pub network_provider: Vec<String>,
}

impl FilterOptions {
    pub fn collect<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut options = FilterOptions::default();
        for tx in transactions {
            push_distinct(&mut options.transaction_type, &tx.transaction_type);
            push_distinct(&mut options.location, &tx.location);
            push_distinct(&mut options.user_type, &tx.user_type);
            push_distinct(&mut options.device_type, &tx.device_type);
            push_distinct(&mut options.network_provider, &tx.network_provider);
        }
        options
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(transaction_type: &str, location: &str, user_type: &str) -> Transaction {
        Transaction {
            transaction_type: transaction_type.to_string(),
            amount: 10.0,
            location: location.to_string(),
            device_type: "mobile".to_string(),
            network_provider: "Safaricom".to_string(),
            user_type: user_type.to_string(),
            is_foreign_number: 0,
            is_sim_recently_swapped: 0,
            has_multiple_accounts: 0,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TransactionFilter::default();
        assert!(filter.is_unrestricted());
        assert!(filter.matches(&tx("transfer", "Nairobi", "individual")));
    }

    #[test]
    fn selectors_are_conjunctive_set_membership() {
        let filter = TransactionFilter {
            transaction_type: vec!["transfer".to_string(), "withdrawal".to_string()],
            location: vec!["Nairobi".to_string()],
            user_type: Vec::new(),
        };
        assert!(filter.matches(&tx("transfer", "Nairobi", "agent")));
        assert!(filter.matches(&tx("withdrawal", "Nairobi", "individual")));
        assert!(!filter.matches(&tx("deposit", "Nairobi", "individual")));
        assert!(!filter.matches(&tx("transfer", "Mombasa", "individual")));
    }

    #[test]
    fn filter_options_keep_first_appearance_order() {
        let rows = vec![
            tx("withdrawal", "Mombasa", "agent"),
            tx("transfer", "Nairobi", "individual"),
            tx("withdrawal", "Nairobi", "agent"),
        ];
        let options = FilterOptions::collect(rows.iter());
        assert_eq!(options.transaction_type, vec!["withdrawal", "transfer"]);
        assert_eq!(options.location, vec!["Mombasa", "Nairobi"]);
        assert_eq!(options.user_type, vec!["agent", "individual"]);
        assert_eq!(options.device_type, vec!["mobile"]);
    }
}
