//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};

use tessera_mempool::MempoolConfig;
use tessera_types::NetworkId;
use tessera_vm::VmConfig;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a Tessera node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Network whose transactions this node accepts.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Timestamp of the genesis head, in Unix seconds.
    #[serde(default)]
    pub genesis_timestamp: u64,

    /// Upper bound on transactions per produced block.
    #[serde(default = "default_max_block_transactions")]
    pub max_block_transactions: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Local admission policy.
    #[serde(default)]
    pub mempool: MempoolConfig,

    /// Script VM limits. Must match across nodes.
    #[serde(default)]
    pub vm: VmConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Dev
}

fn default_max_block_transactions() -> usize {
    512
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Install the global subscriber described by `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<(), NodeError> {
        crate::logging::init_logging(self.log_format()?, &self.log_level)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            genesis_timestamp: 0,
            max_block_transactions: default_max_block_transactions(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            mempool: MempoolConfig::default(),
            vm: VmConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.network, NetworkId::Dev);
        assert_eq!(config.max_block_transactions, 512);
        assert_eq!(config.mempool.minimum_fee, 10);
        assert_eq!(config.vm.max_script_bytes, 1024);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            network = "test"
            max_block_transactions = 64

            [mempool]
            minimum_fee = 50
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.network, NetworkId::Test);
        assert_eq!(config.max_block_transactions, 64);
        assert_eq!(config.mempool.minimum_fee, 50);
        assert_eq!(config.mempool.max_transactions, 4096); // default
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_network_rejected() {
        assert!(matches!(
            NodeConfig::from_toml_str(r#"network = "mainnet""#),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn unknown_log_format_fails_before_installing_a_subscriber() {
        let config = NodeConfig {
            log_format: "xml".to_string(),
            ..NodeConfig::default()
        };
        assert!(matches!(config.init_logging(), Err(NodeError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/tessera.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
