//! Timelock readiness and expiry of a pending transaction.

use crate::error::MempoolError;
use tessera_store::UtxoLookup;
use tessera_transactions::Transaction;
use tessera_types::{ChainHead, Requirement, Timestamp};

/// Where a transaction stands relative to a chain head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Every input timelock is satisfied.
    Ready,
    /// Waiting until the head reaches both `height` and `time`.
    Future { height: u64, time: Timestamp },
    /// The head passed the transaction's expiration.
    Expired { expiration: Timestamp },
}

/// Evaluate `tx` against `head`.
///
/// Relative locks resolve against the creation point of the spent output as
/// recorded in `utxos`. A transaction is ready only when the locks on all of
/// its inputs and burns are, so the latest requirement on each axis decides.
pub fn readiness<L>(tx: &Transaction, utxos: &L, head: &ChainHead) -> Result<Readiness, MempoolError>
where
    L: UtxoLookup + ?Sized,
{
    if let Some(expiration) = tx.expiration() {
        if head.timestamp > expiration {
            return Ok(Readiness::Expired { expiration });
        }
    }

    let mut height = 0;
    let mut time = Timestamp::EPOCH;
    for input in tx.spent_inputs() {
        let Some(timelock) = input.timelock else {
            continue;
        };
        let key = input.prev_out.key();
        let record = utxos
            .get_utxo(&key)
            .map_err(|_| MempoolError::UnknownInput(key))?;
        match timelock.requirement(record.creation_height, record.creation_time) {
            Requirement::Height(h) => height = height.max(h),
            Requirement::Time(t) => time = time.max(t),
        }
    }

    if head.height >= height && head.timestamp >= time {
        Ok(Readiness::Ready)
    } else {
        Ok(Readiness::Future { height, time })
    }
}
