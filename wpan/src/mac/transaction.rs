//! Outgoing transactions awaiting their confirm.

use crate::time::{Duration, Instant};
use crate::Error;

/// What an outgoing transaction carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionKind {
    /// An MSDU handed down through the data service.
    Data,
    /// A MAC command frame.
    Command,
}

/// A transaction handed to the radio and not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingTransaction {
    /// Handle chosen by the caller.
    pub handle: u8,
    /// Kind of the transaction.
    pub kind: TransactionKind,
    /// `true` when the frame requests an acknowledgment.
    pub ack_required: bool,
    /// When the transaction was queued.
    pub queued_at: Instant,
}

/// A bounded table of [`PendingTransaction`]s, kept in insertion order.
///
/// Entries are never evicted here; [`PendingTransactions::expired`] reports
/// which entries outlived their persistence time and the caller decides what
/// to do with them.
#[derive(Debug, Default)]
pub struct PendingTransactions<const N: usize> {
    entries: heapless::Vec<PendingTransaction, N>,
}

impl<const N: usize> PendingTransactions<N> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    /// Append a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionOverflow`] when the table is full. The
    /// table is left unchanged.
    pub fn add(
        &mut self,
        handle: u8,
        kind: TransactionKind,
        ack_required: bool,
        now: Instant,
    ) -> Result<(), Error> {
        let transaction = PendingTransaction {
            handle,
            kind,
            ack_required,
            queued_at: now,
        };

        self.entries.push(transaction).map_err(|_| {
            warn!("pending transaction table full, dropping handle {}", handle);
            Error::TransactionOverflow
        })
    }

    /// Remove the first transaction with `handle`.
    ///
    /// Entries after the removed one move one slot up, keeping their order.
    pub fn remove(&mut self, handle: u8) -> Option<PendingTransaction> {
        let index = self.entries.iter().position(|t| t.handle == handle)?;
        Some(self.entries.remove(index))
    }

    /// Return the first transaction with `handle`.
    pub fn get(&self, handle: u8) -> Option<&PendingTransaction> {
        self.entries.iter().find(|t| t.handle == handle)
    }

    /// Iterate over the transactions queued for longer than `persistence`.
    pub fn expired(
        &self,
        now: Instant,
        persistence: Duration,
    ) -> impl Iterator<Item = &PendingTransaction> + '_ {
        self.entries
            .iter()
            .filter(move |t| now.saturating_duration_since(t.queued_at) > persistence)
    }

    /// Iterate over the transactions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingTransaction> + '_ {
        self.entries.iter()
    }

    /// Return the number of transactions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no transaction is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return `true` when another transaction cannot be added.
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }
}
