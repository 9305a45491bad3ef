//! Transaction records stored in the ledger.

use gasopt_primitives::Address;
use serde::{Deserialize, Serialize};

pub use gasopt_primitives::{CATEGORY_CONTRACT_CALL, CATEGORY_DEPLOYMENT, CATEGORY_TRANSFER};

/// One observed transaction. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Account that submitted the record.
    pub from: Address,
    /// Destination account. Never zero.
    pub to: Address,
    /// Transferred amount.
    pub value: u128,
    /// Computational units consumed.
    pub gas_used: u64,
    /// Price per computational unit.
    pub gas_price: u64,
    /// Unix seconds at append time.
    pub timestamp: u64,
    /// Free-form tag used for baseline lookup.
    pub category: String,
}

impl TransactionRecord {
    /// Gas cost of this record, `gas_used * gas_price`.
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u128 {
        u128::from(self.gas_used) * u128::from(self.gas_price)
    }
}

/// Caller-supplied fields of a record; `from` and `timestamp` are filled in on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Destination account.
    pub to: Address,
    /// Transferred amount.
    #[serde(default)]
    pub value: u128,
    /// Computational units consumed.
    pub gas_used: u64,
    /// Price per computational unit.
    pub gas_price: u64,
    /// Category tag.
    pub category: String,
}

impl TransactionDraft {
    /// Creates a draft.
    pub fn new(
        to: Address,
        value: u128,
        gas_used: u64,
        gas_price: u64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            to,
            value,
            gas_used,
            gas_price,
            category: category.into(),
        }
    }

    /// Stamps the draft into a record.
    pub(crate) fn into_record(self, from: Address, timestamp: u64) -> TransactionRecord {
        TransactionRecord {
            from,
            to: self.to,
            value: self.value,
            gas_used: self.gas_used,
            gas_price: self.gas_price,
            timestamp,
            category: self.category,
        }
    }
}
