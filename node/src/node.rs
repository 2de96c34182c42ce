//! The Tessera node: admission in front, block assembly behind.

use std::sync::Arc;
use tracing::{debug, info};

use tessera_ledger::{BlockOutcome, Ledger};
use tessera_mempool::{Queue, TransactionPool};
use tessera_store::{Verdict, VerdictLookup};
use tessera_transactions::Transaction;
use tessera_types::{ChainHead, Timestamp, Tracker};

use crate::config::NodeConfig;
use crate::NodeError;

/// A single-process node.
///
/// Submitted transactions go through the [`TransactionPool`]; each produced
/// block takes the best current transactions, applies them to the
/// [`Ledger`] and then moves the pool to the new head.
pub struct Node {
    config: NodeConfig,
    ledger: Ledger,
    pool: TransactionPool,
}

impl Node {
    pub fn new(config: NodeConfig) -> Self {
        let genesis = ChainHead::new(0, Timestamp::new(config.genesis_timestamp));
        let ledger = Ledger::new(
            config.network,
            config.vm.clone(),
            config.max_block_transactions,
            genesis,
        );
        let pool = TransactionPool::new(config.mempool.clone(), config.network);
        info!(network = config.network.as_str(), %genesis, "node initialised");
        Self {
            config,
            ledger,
            pool,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn head(&self) -> ChainHead {
        self.ledger.head()
    }

    /// Admit a transaction into the pool.
    ///
    /// A transaction that already has a verdict, successful or not, is
    /// refused; resubmitting a failed transfer needs a different `seq`.
    pub fn submit(&self, tx: Transaction) -> Result<Queue, NodeError> {
        let tracker = tx.tracker();
        if self.ledger.get_verdict(&tracker).is_some() {
            return Err(NodeError::AlreadyIncluded(tracker));
        }
        let snapshot = self.ledger.snapshot();
        Ok(self.pool.add(tx, &snapshot, &snapshot.head)?)
    }

    pub fn submit_encoded(&self, bytes: &[u8]) -> Result<Queue, NodeError> {
        self.submit(Transaction::decode(bytes)?)
    }

    /// Produce the next block at `timestamp` from the current queue.
    pub fn produce_block(&self, timestamp: Timestamp) -> Result<BlockOutcome, NodeError> {
        let transactions = self
            .pool
            .pending(self.config.max_block_transactions, timestamp);
        let outcome = self.ledger.apply_block(timestamp, &transactions)?;

        let included: Vec<Tracker> = outcome.receipts.iter().map(|r| r.tracker).collect();
        self.pool.remove(&included);

        let snapshot = self.ledger.snapshot();
        let update = self.pool.on_new_head(Arc::clone(&snapshot.utxos), &snapshot.head);
        debug!(
            head = %snapshot.head,
            promoted = update.promoted.len(),
            expired = update.expired.len(),
            stale = update.stale.len(),
            "pool moved to new head"
        );
        Ok(outcome)
    }

    /// Verdict for `tracker`, or [`Verdict::not_included`] if none exists.
    pub fn verdict(&self, tracker: &Tracker) -> Verdict {
        self.ledger
            .get_verdict(tracker)
            .unwrap_or_else(Verdict::not_included)
    }
}
