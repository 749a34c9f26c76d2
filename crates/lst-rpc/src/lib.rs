//! Incremental tree synchronization between two processes.
//!
//! One side owns an authoritative tree and a [`Sender`] walks it against the
//! version the peer already has, writing a flat stream of [`Record`]s that
//! describe only what changed. The peer's [`Receiver`] consumes that stream
//! in lockstep and rebuilds the new tree, sharing every unchanged subtree with
//! its baseline by reference.
//!
//! Both directions walk the same per-kind field order, written once in
//! [`contract`] against the [`Side`] trait.

pub mod codec;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod field;
pub mod queue;
pub mod receiver;
pub mod record;
pub mod sender;
pub mod session;
pub mod type_codec;

// ── Re-exports ─────────────────────────────────────────────────────────────

pub use config::SyncOptions;
pub use context::{Pending, PendingStack};
pub use error::{CodecError, SyncError};
pub use field::{Field, Side, Value};
pub use queue::{
    ReceiveQueue, RecordSink, RecordSource, SendQueue, SendStats, SinkFn, SourceFn,
};
pub use receiver::{decode, Receiver};
pub use record::{Payload, Record};
pub use sender::{encode, Sender};
pub use session::SyncSession;
