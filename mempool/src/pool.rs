//! Future and current queues of pending transactions.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use crate::config::MempoolConfig;
use crate::error::MempoolError;
use crate::readiness::{readiness, Readiness};
use tessera_store::{OutPointKey, UtxoLookup};
use tessera_transactions::Transaction;
use tessera_types::{ChainHead, NetworkId, Timestamp, Tracker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Queue {
    /// Waiting for timelocks.
    Future,
    /// Eligible for the next block.
    Current,
}

/// Ordering key of the current queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Priority {
    fee: u64,
    /// Insertion order counter for FIFO tiebreaking among equal fees.
    sequence: u64,
    tracker: Tracker,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher fee first; on tie, earlier arrival first.
        other
            .fee
            .cmp(&self.fee)
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.tracker.cmp(&other.tracker))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// UTXO set the pool last rescanned against.
type UtxoView = Arc<dyn UtxoLookup + Send + Sync>;

struct Entry {
    tx: Transaction,
    priority: Priority,
    queue: Queue,
}

#[derive(Default)]
struct PoolState {
    entries: HashMap<Tracker, Entry>,
    current: BTreeSet<Priority>,
    /// Which pending transaction spends each output.
    spent_by: HashMap<OutPointKey, Tracker>,
    next_sequence: u64,
    /// Newest head seen by a rescan, with the UTXO set at that head.
    tip: Option<(ChainHead, UtxoView)>,
}

impl PoolState {
    fn insert(&mut self, tracker: Tracker, tx: Transaction, queue: Queue) {
        self.next_sequence += 1;
        let priority = Priority {
            fee: tx.fee(),
            sequence: self.next_sequence,
            tracker,
        };
        for key in tx.prev_out_keys() {
            self.spent_by.insert(key, tracker);
        }
        if queue == Queue::Current {
            self.current.insert(priority);
        }
        self.entries.insert(tracker, Entry { tx, priority, queue });
    }

    fn remove(&mut self, tracker: &Tracker) -> Option<Entry> {
        let entry = self.entries.remove(tracker)?;
        self.current.remove(&entry.priority);
        for key in entry.tx.prev_out_keys() {
            if self.spent_by.get(&key) == Some(tracker) {
                self.spent_by.remove(&key);
            }
        }
        Some(entry)
    }

    fn promote(&mut self, tracker: &Tracker) {
        if let Some(entry) = self.entries.get_mut(tracker) {
            entry.queue = Queue::Current;
            self.current.insert(entry.priority);
        }
    }
}

/// Queue for `tx` at `head`, or why it cannot be admitted there.
fn classify<L>(tx: &Transaction, utxos: &L, head: &ChainHead) -> Result<Queue, MempoolError>
where
    L: UtxoLookup + ?Sized,
{
    if let Some(key) = tx.prev_out_keys().into_iter().find(|k| !utxos.contains_utxo(k)) {
        return Err(MempoolError::UnknownInput(key));
    }
    match readiness(tx, utxos, head)? {
        Readiness::Ready => Ok(Queue::Current),
        Readiness::Future { .. } => Ok(Queue::Future),
        Readiness::Expired { expiration } => Err(MempoolError::Expired {
            expiration,
            now: head.timestamp,
        }),
    }
}

/// What a head advance did to the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadUpdate {
    pub promoted: Vec<Tracker>,
    pub expired: Vec<Tracker>,
    /// Pending transactions whose inputs left the UTXO set.
    pub stale: Vec<Tracker>,
}

/// Pending transactions of one node.
///
/// All queue mutations, including the promotions of a head advance, happen
/// under one lock. The pool remembers the newest head it rescanned at, and an
/// insertion that arrives with an older head is evaluated against that one
/// instead, so it is either seen by the rescan or judged by the new head.
pub struct TransactionPool {
    config: MempoolConfig,
    network_id: NetworkId,
    state: Mutex<PoolState>,
}

impl TransactionPool {
    pub fn new(config: MempoolConfig, network_id: NetworkId) -> Self {
        Self {
            config,
            network_id,
            state: Mutex::new(PoolState::default()),
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Admit `tx`, evaluated against `head` and the UTXO set at that head, or
    /// against the last rescanned head if that one is newer.
    pub fn add<L>(&self, tx: Transaction, utxos: &L, head: &ChainHead) -> Result<Queue, MempoolError>
    where
        L: UtxoLookup + ?Sized,
    {
        if tx.fee() < self.config.minimum_fee {
            return Err(MempoolError::FeeTooLow {
                fee: tx.fee(),
                minimum: self.config.minimum_fee,
            });
        }
        tx.verify_basic(self.network_id)?;
        let tracker = tx.tracker();

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.entries.contains_key(&tracker) {
            return Err(MempoolError::AlreadyPending(tracker));
        }
        if let Some(key) = tx.prev_out_keys().into_iter().find(|k| state.spent_by.contains_key(k)) {
            return Err(MempoolError::ConflictingInput(key));
        }
        let queue = match state.tip.as_ref().filter(|(tip, _)| tip.height > head.height) {
            Some((tip, view)) => classify(&tx, &**view, tip)?,
            None => classify(&tx, utxos, head)?,
        };
        if state.entries.len() >= self.config.max_transactions {
            return Err(MempoolError::PoolFull {
                max: self.config.max_transactions,
            });
        }

        debug!(%tracker, fee = tx.fee(), ?queue, "transaction admitted");
        state.insert(tracker, tx, queue);
        Ok(queue)
    }

    /// Re-evaluate every pending transaction against a new head.
    ///
    /// Expired transactions and transactions spending outputs that are no
    /// longer unspent are dropped; future transactions whose locks now hold
    /// are promoted.
    pub fn on_new_head<L>(&self, utxos: Arc<L>, head: &ChainHead) -> HeadUpdate
    where
        L: UtxoLookup + Send + Sync + 'static,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut update = HeadUpdate::default();
        if state.tip.as_ref().map_or(true, |(tip, _)| head.height >= tip.height) {
            let view: UtxoView = utxos.clone();
            state.tip = Some((*head, view));
        }

        let mut trackers: Vec<Tracker> = state.entries.keys().copied().collect();
        trackers.sort_by_key(|t| state.entries[t].priority.sequence);
        for tracker in trackers {
            let entry = &state.entries[&tracker];
            if entry.tx.prev_out_keys().iter().any(|k| !utxos.contains_utxo(k)) {
                state.remove(&tracker);
                update.stale.push(tracker);
                continue;
            }
            match readiness(&entry.tx, &*utxos, head) {
                Ok(Readiness::Expired { .. }) => {
                    state.remove(&tracker);
                    update.expired.push(tracker);
                }
                Ok(Readiness::Ready) if entry.queue == Queue::Future => {
                    state.promote(&tracker);
                    update.promoted.push(tracker);
                }
                Ok(_) => {}
                Err(_) => {
                    state.remove(&tracker);
                    update.stale.push(tracker);
                }
            }
        }

        if !update.promoted.is_empty() || !update.expired.is_empty() || !update.stale.is_empty() {
            info!(
                head = %head,
                promoted = update.promoted.len(),
                expired = update.expired.len(),
                stale = update.stale.len(),
                "mempool rescanned"
            );
        }
        update
    }

    /// Up to `limit` current transactions for a block at `block_time`,
    /// highest fee first. Transactions that would be expired at
    /// `block_time` are skipped.
    pub fn pending(&self, limit: usize, block_time: Timestamp) -> Vec<Transaction> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .current
            .iter()
            .map(|p| &state.entries[&p.tracker].tx)
            .filter(|tx| tx.expiration().map_or(true, |e| block_time <= e))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Forget transactions, typically because a block included them.
    pub fn remove(&self, trackers: &[Tracker]) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        for tracker in trackers {
            state.remove(tracker);
        }
    }

    pub fn queue_of(&self, tracker: &Tracker) -> Option<Queue> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(tracker).map(|e| e.queue)
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).current.len()
    }

    pub fn future_len(&self) -> usize {
        self.len() - self.current_len()
    }
}
