// Transaction entity
// The nine raw attributes a caller submits for scoring

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub transaction_type: String,
    pub amount: f64,
    pub location: String,
    pub device_type: String,
    pub network_provider: String,
    pub user_type: String,
    pub is_foreign_number: i64,
    pub is_sim_recently_swapped: i64,
    pub has_multiple_accounts: i64,
}

impl Transaction {
    pub fn value(&self, column: FeatureColumn) -> ColumnValue<'_> {
        match column {
            FeatureColumn::TransactionType => ColumnValue::Text(&self.transaction_type),
            FeatureColumn::Amount => ColumnValue::Number(self.amount),
            FeatureColumn::Location => ColumnValue::Text(&self.location),
            FeatureColumn::DeviceType => ColumnValue::Text(&self.device_type),
            FeatureColumn::NetworkProvider => ColumnValue::Text(&self.network_provider),
            FeatureColumn::UserType => ColumnValue::Text(&self.user_type),
            FeatureColumn::IsForeignNumber => ColumnValue::Number(self.is_foreign_number as f64),
            FeatureColumn::IsSimRecentlySwapped => {
                ColumnValue::Number(self.is_sim_recently_swapped as f64)
            }
            FeatureColumn::HasMultipleAccounts => {
                ColumnValue::Number(self.has_multiple_accounts as f64)
            }
            // Prepared rows carry the validated value instead.
            FeatureColumn::LogAmount => ColumnValue::Number(self.amount.ln_1p()),
        }
    }

    pub fn flags(&self) -> [(FeatureColumn, i64); 3] {
        [
            (FeatureColumn::IsForeignNumber, self.is_foreign_number),
            (FeatureColumn::IsSimRecentlySwapped, self.is_sim_recently_swapped),
            (FeatureColumn::HasMultipleAccounts, self.has_multiple_accounts),
        ]
    }
}

/// Columns a fitted transformer may reference: the nine raw attributes plus
/// the derived `log_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    TransactionType,
    Amount,
    Location,
    DeviceType,
    NetworkProvider,
    UserType,
    IsForeignNumber,
    IsSimRecentlySwapped,
    HasMultipleAccounts,
    LogAmount,
}

impl FeatureColumn {
    /// Raw attributes in their canonical order.
    pub const ATTRIBUTES: [FeatureColumn; 9] = [
        FeatureColumn::TransactionType,
        FeatureColumn::Amount,
        FeatureColumn::Location,
        FeatureColumn::DeviceType,
        FeatureColumn::NetworkProvider,
        FeatureColumn::UserType,
        FeatureColumn::IsForeignNumber,
        FeatureColumn::IsSimRecentlySwapped,
        FeatureColumn::HasMultipleAccounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureColumn::TransactionType => "transaction_type",
            FeatureColumn::Amount => "amount",
            FeatureColumn::Location => "location",
            FeatureColumn::DeviceType => "device_type",
            FeatureColumn::NetworkProvider => "network_provider",
            FeatureColumn::UserType => "user_type",
            FeatureColumn::IsForeignNumber => "is_foreign_number",
            FeatureColumn::IsSimRecentlySwapped => "is_sim_recently_swapped",
            FeatureColumn::HasMultipleAccounts => "has_multiple_accounts",
            FeatureColumn::LogAmount => "log_amount",
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            FeatureColumn::TransactionType
                | FeatureColumn::Location
                | FeatureColumn::DeviceType
                | FeatureColumn::NetworkProvider
                | FeatureColumn::UserType
        )
    }

    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            FeatureColumn::IsForeignNumber
                | FeatureColumn::IsSimRecentlySwapped
                | FeatureColumn::HasMultipleAccounts
        )
    }
}

impl std::fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// A validated row with its derived `log_amount`, borrowed from the caller's
/// input for the duration of one pipeline call.
#[derive(Debug, Clone, Copy)]
pub struct PreparedTransaction<'a> {
    pub transaction: &'a Transaction,
    pub log_amount: f64,
}

impl<'a> PreparedTransaction<'a> {
    pub fn value(&self, column: FeatureColumn) -> ColumnValue<'a> {
        match column {
            FeatureColumn::LogAmount => ColumnValue::Number(self.log_amount),
            other => self.transaction.value(other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchTransactionRequest {
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nairobi_transfer() -> serde_json::Value {
        json!({
            "transaction_type": "transfer",
            "amount": 1000.0,
            "location": "Nairobi",
            "device_type": "mobile",
            "network_provider": "Safaricom",
            "user_type": "individual",
            "is_foreign_number": 0,
            "is_sim_recently_swapped": 1,
            "has_multiple_accounts": 0
        })
    }

    #[test]
    fn transaction_rejects_extra_fields() {
        let mut payload = nairobi_transfer();
        payload["merchant"] = json!("kiosk");
        let err = serde_json::from_value::<Transaction>(payload).expect_err("extra field");
        assert!(err.to_string().contains("merchant"));
    }

    #[test]
    fn transaction_rejects_missing_fields() {
        let mut payload = nairobi_transfer();
        payload.as_object_mut().expect("object").remove("user_type");
        let err = serde_json::from_value::<Transaction>(payload).expect_err("missing field");
        assert!(err.to_string().contains("user_type"));
    }

    #[test]
    fn transaction_rejects_mistyped_amount() {
        let mut payload = nairobi_transfer();
        payload["amount"] = json!("a lot");
        serde_json::from_value::<Transaction>(payload).expect_err("mistyped amount");
    }

    #[test]
    fn prepared_row_exposes_derived_column() {
        let tx: Transaction = serde_json::from_value(nairobi_transfer()).expect("transaction");
        let prepared = PreparedTransaction {
            transaction: &tx,
            log_amount: 6.9,
        };
        assert_eq!(prepared.value(FeatureColumn::LogAmount), ColumnValue::Number(6.9));
        assert_eq!(prepared.value(FeatureColumn::Location), ColumnValue::Text("Nairobi"));
        assert_eq!(
            prepared.value(FeatureColumn::IsSimRecentlySwapped),
            ColumnValue::Number(1.0)
        );
    }
}
