//! Reference ledgers.
//!
//! Production deployments read Genesis and bridge state through a
//! [`LedgerReader`](crate::chain::LedgerReader) backed by a node. The
//! in-memory ledger here enforces the same rules locally and backs tests and
//! dev tooling.

pub mod memory;

pub use memory::MemoryLedger;
