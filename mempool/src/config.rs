use serde::{Deserialize, Serialize};

/// Local admission policy. Different nodes may run different values; none of
/// these affect whether an included transaction is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolConfig {
    /// Transactions declaring a lower fee are refused.
    #[serde(default = "default_minimum_fee")]
    pub minimum_fee: u64,

    /// Pending transactions held across both queues.
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,
}

fn default_minimum_fee() -> u64 {
    10
}

fn default_max_transactions() -> usize {
    4096
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            minimum_fee: default_minimum_fee(),
            max_transactions: default_max_transactions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: MempoolConfig = toml::from_str("minimum_fee = 25").unwrap();
        assert_eq!(config.minimum_fee, 25);
        assert_eq!(config.max_transactions, 4096);
    }
}
