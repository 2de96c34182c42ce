//! Block application over versioned UTXO snapshots.
//!
//! Readers take an [`Arc`] to the current [`UtxoSet`] and never block block
//! application. A block is validated in parallel against the snapshot taken
//! at its start, then applied sequentially; the new set replaces the old one
//! in a single swap.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::utxo_set::UtxoSet;
use tessera_store::{AssetScheme, AssetSchemeLookup, OutPointKey, StoreError, UtxoLookup, UtxoRecord, Verdict, VerdictLookup};
use tessera_transactions::{validate, Transaction, TransferError, UtxoDelta};
use tessera_types::{AssetType, ChainHead, NetworkId, Timestamp, Tracker};
use tessera_vm::VmConfig;

/// One consistent version of the ledger.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub head: ChainHead,
    pub utxos: Arc<UtxoSet>,
}

impl UtxoLookup for Snapshot {
    fn get_utxo(&self, key: &OutPointKey) -> Result<UtxoRecord, StoreError> {
        self.utxos.get_utxo(key)
    }

    fn contains_utxo(&self, key: &OutPointKey) -> bool {
        self.utxos.contains_utxo(key)
    }
}

impl AssetSchemeLookup for Snapshot {
    fn get_asset_scheme(&self, asset_type: &AssetType) -> Result<AssetScheme, StoreError> {
        self.utxos.get_asset_scheme(asset_type)
    }
}

/// Outcome of one transaction in an applied block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tracker: Tracker,
    pub error: Option<TransferError>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct BlockOutcome {
    pub head: ChainHead,
    pub receipts: Vec<Receipt>,
    pub state_digest: [u8; 32],
}

impl BlockOutcome {
    pub fn succeeded(&self) -> usize {
        self.receipts.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.receipts.len() - self.succeeded()
    }
}

pub struct Ledger {
    network_id: NetworkId,
    vm_config: VmConfig,
    max_block_transactions: usize,
    current: RwLock<Snapshot>,
    verdicts: RwLock<HashMap<Tracker, Verdict>>,
    /// Serializes block application; readers never take it.
    apply_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(network_id: NetworkId, vm_config: VmConfig, max_block_transactions: usize, genesis: ChainHead) -> Self {
        Self {
            network_id,
            vm_config,
            max_block_transactions,
            current: RwLock::new(Snapshot {
                head: genesis,
                utxos: Arc::new(UtxoSet::new()),
            }),
            verdicts: RwLock::new(HashMap::new()),
            apply_lock: Mutex::new(()),
        }
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn head(&self) -> ChainHead {
        self.snapshot().head
    }

    /// Validate one transaction against `snapshot` as if it were included in
    /// the block at `head`.
    pub fn check(&self, tx: &Transaction, snapshot: &UtxoSet, head: &ChainHead) -> Result<UtxoDelta, TransferError> {
        tx.check_network(self.network_id)?;
        validate(tx, snapshot, head, &self.vm_config)
    }

    /// Append a block holding `transactions` at `timestamp`.
    ///
    /// Every transaction is included and receives a verdict. Invalid ones are
    /// recorded as failed and leave the UTXO set untouched; the block itself
    /// fails only for block-level problems.
    pub fn apply_block(&self, timestamp: Timestamp, transactions: &[Transaction]) -> Result<BlockOutcome, LedgerError> {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();

        if timestamp < snapshot.head.timestamp {
            return Err(LedgerError::TimestampRegression {
                head: snapshot.head.timestamp,
                block: timestamp,
            });
        }
        if transactions.len() > self.max_block_transactions {
            return Err(LedgerError::TooManyTransactions {
                count: transactions.len(),
                max: self.max_block_transactions,
            });
        }
        let head = snapshot.head.next(timestamp);

        let checked: Vec<(Tracker, Result<UtxoDelta, TransferError>)> = transactions
            .par_iter()
            .map(|tx| (tx.tracker(), self.check(tx, &snapshot.utxos, &head)))
            .collect();

        let mut next = UtxoSet::clone(&snapshot.utxos);
        let mut seen = HashSet::new();
        let mut receipts = Vec::with_capacity(checked.len());
        {
            let verdicts = self.verdicts.read().unwrap_or_else(PoisonError::into_inner);
            for (tracker, result) in checked {
                let result = if verdicts.contains_key(&tracker) || !seen.insert(tracker) {
                    Err(TransferError::AlreadyIncluded)
                } else {
                    result.and_then(|delta| next.apply(&delta))
                };
                if let Err(e) = &result {
                    debug!(%tracker, kind = e.kind(), error = %e, "transaction failed");
                }
                receipts.push(Receipt {
                    tracker,
                    error: result.err(),
                });
            }
        }

        let state_digest = next.digest();
        {
            let mut verdicts = self.verdicts.write().unwrap_or_else(PoisonError::into_inner);
            for receipt in &receipts {
                let verdict = match &receipt.error {
                    None => Verdict::succeeded(head.height),
                    Some(TransferError::AlreadyIncluded) => continue,
                    Some(e) => Verdict::failed(head.height, e.kind()),
                };
                verdicts.insert(receipt.tracker, verdict);
            }
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Snapshot {
            head,
            utxos: Arc::new(next),
        };

        let outcome = BlockOutcome {
            head,
            receipts,
            state_digest,
        };
        info!(
            head = %head,
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "block applied"
        );
        Ok(outcome)
    }
}

impl VerdictLookup for Ledger {
    fn get_verdict(&self, tracker: &Tracker) -> Option<Verdict> {
        self.verdicts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tracker)
            .cloned()
    }
}
