//! Append-only, per-account transaction ledger.
//!
//! Each account owns one sequence behind its own reader-writer lock.
//! Writers hold the write lock for the whole append, so a reader sees
//! either none or all of a batch.

use crate::record::TransactionRecord;
use dashmap::DashMap;
use gasopt_primitives::Address;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::sync::Arc;

type Sequence = Arc<RwLock<Vec<TransactionRecord>>>;

/// Account-keyed store of transaction sequences.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    accounts: DashMap<Address, Sequence>,
}

impl TransactionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    // Clones the handle out so the map shard is released before locking.
    fn sequence(&self, account: &Address) -> Option<Sequence> {
        self.accounts.get(account).map(|entry| Arc::clone(entry.value()))
    }

    fn sequence_or_create(&self, account: Address) -> Sequence {
        Arc::clone(self.accounts.entry(account).or_default().value())
    }

    /// Appends `records` to `account` in one critical section.
    ///
    /// `on_commit` runs before other readers are admitted and receives the
    /// full sequence plus the index of the first new record.
    pub fn commit<R>(
        &self,
        account: Address,
        records: Vec<TransactionRecord>,
        on_commit: impl FnOnce(&[TransactionRecord], usize) -> R,
    ) -> R {
        let sequence = self.sequence_or_create(account);
        let mut guard = sequence.write();
        let first = guard.len();
        guard.extend(records);
        let guard = RwLockWriteGuard::downgrade(guard);
        on_commit(&guard, first)
    }

    /// Runs `f` over a consistent view of `account`'s records.
    ///
    /// Unknown accounts read as an empty slice.
    pub fn read<R>(&self, account: &Address, f: impl FnOnce(&[TransactionRecord]) -> R) -> R {
        match self.sequence(account) {
            Some(sequence) => f(&sequence.read()),
            None => f(&[]),
        }
    }

    /// Number of records stored for `account`.
    pub fn count(&self, account: &Address) -> usize {
        self.sequence(account)
            .map(|sequence| sequence.read().len())
            .unwrap_or(0)
    }

    /// Record at `index` in `account`'s sequence.
    pub fn get(&self, account: &Address, index: usize) -> Option<TransactionRecord> {
        self.read(account, |records| records.get(index).cloned())
    }

    /// Copy of `account`'s whole sequence.
    pub fn records(&self, account: &Address) -> Vec<TransactionRecord> {
        self.read(account, <[TransactionRecord]>::to_vec)
    }

    /// Number of accounts with at least one committed write.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
