//! Notifications produced on state changes.
//!
//! The engine hands each [`Notification`] to a [`NotificationSink`] as it
//! happens. Delivery beyond the sink is up to the embedding layer.

use gasopt_primitives::Address;
use parking_lot::Mutex;
use serde::Serialize;

/// A state change observers may care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A record was committed to an account's ledger.
    TransactionAnalyzed {
        /// Ledger owner.
        account: Address,
        /// Position of the record in the account's sequence.
        index: usize,
        /// Recipient of the transaction.
        to: Address,
        /// Gas consumed.
        gas_used: u64,
        /// Price per unit of gas.
        gas_price: u64,
        /// `gas_used * gas_price`.
        cost: u128,
        /// Category tag as recorded.
        category: String,
    },
    /// The administrator changed a category baseline.
    BaselineUpdated {
        /// Category whose baseline changed.
        category: String,
        /// Baseline before the change, 0 if none was registered.
        previous: u64,
        /// New baseline.
        value: u64,
    },
    /// An account's cumulative gas cost passed its budget.
    BudgetExceeded {
        /// Account over budget.
        account: Address,
        /// Cumulative gas cost after the append.
        spent: u128,
        /// Configured ceiling.
        budget: u128,
    },
    /// An account reported realized savings.
    GasOptimized {
        /// Reporting account.
        account: Address,
        /// Amount reported in this call.
        amount: u128,
        /// Account's running total after this report.
        total_saved: u128,
    },
    /// The administrator changed the analysis fee.
    FeeUpdated {
        /// Fee before the change.
        previous: u128,
        /// New fee.
        fee: u128,
    },
    /// Collected fees were withdrawn through the settlement collaborator.
    FeesWithdrawn {
        /// Destination of the funds.
        to: Address,
        /// Amount the settlement reported as moved.
        amount: u128,
    },
}

/// A notification with its position in the emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    /// Zero-based, gap-free position.
    pub sequence: u64,
    /// The notification itself.
    pub notification: Notification,
}

/// Receives notifications from the engine.
pub trait NotificationSink: Send + Sync {
    /// Accepts one notification. Must not call back into the engine.
    fn publish(&self, notification: Notification);
}

#[derive(Debug, Default)]
struct LogState {
    next_sequence: u64,
    pending: Vec<NotificationRecord>,
}

/// In-memory sink that keeps notifications in emission order.
#[derive(Debug, Default)]
pub struct NotificationLog {
    state: Mutex<LogState>,
}

impl NotificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the pending notifications.
    pub fn snapshot(&self) -> Vec<NotificationRecord> {
        self.state.lock().pending.clone()
    }

    /// Removes and returns the pending notifications. Sequence numbers keep counting.
    pub fn drain(&self) -> Vec<NotificationRecord> {
        std::mem::take(&mut self.state.lock().pending)
    }

    /// Number of pending notifications.
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Checks if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }
}

impl NotificationSink for NotificationLog {
    fn publish(&self, notification: Notification) {
        let mut state = self.state.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.push(NotificationRecord {
            sequence,
            notification,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimized(amount: u128) -> Notification {
        Notification::GasOptimized {
            account: Address::from_low_u64(1),
            amount,
            total_saved: amount,
        }
    }

    #[test]
    fn test_sequence_is_gap_free_across_drains() {
        let log = NotificationLog::new();
        log.publish(optimized(1));
        log.publish(optimized(2));

        let first = log.drain();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].sequence, 0);
        assert_eq!(first[1].sequence, 1);
        assert!(log.is_empty());

        log.publish(optimized(3));
        let second = log.snapshot();
        assert_eq!(second[0].sequence, 2);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_notification_json_is_tagged() {
        let json = serde_json::to_value(Notification::FeeUpdated {
            previous: 0,
            fee: 10,
        })
        .unwrap();
        assert_eq!(json["kind"], "fee_updated");
        assert_eq!(json["fee"], 10);
    }
}
