//! Baseline bookkeeping across repeated exchanges.
//!
//! A session remembers, per root node id, the last version of a tree that
//! both peers are known to hold, and uses it as the baseline of the next
//! exchange of that tree. Each peer keeps its own session; the two caches stay
//! in step as long as every exchange that succeeds on one side also succeeds
//! on the other.

use indexmap::IndexMap;
use lst_tree::{NodeId, TypeArena, J};
use tracing::debug;

use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::queue::{ReceiveQueue, RecordSink, RecordSource, SendQueue, SendStats};
use crate::receiver::Receiver;
use crate::sender::Sender;

#[derive(Debug, Default)]
pub struct SyncSession {
    arena: TypeArena,
    options: SyncOptions,
    baselines: IndexMap<NodeId, J>,
}

impl SyncSession {
    pub fn new(options: SyncOptions) -> Self {
        Self::with_arena(TypeArena::new(), options)
    }

    pub fn with_arena(arena: TypeArena, options: SyncOptions) -> Self {
        Self {
            arena,
            options,
            baselines: IndexMap::new(),
        }
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut TypeArena {
        &mut self.arena
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sends `tree` against the cached baseline for its id and caches it as
    /// the new baseline.
    pub fn send_tree<K: RecordSink>(&mut self, tree: &J, sink: K) -> Result<SendStats, SyncError> {
        let id = *tree.id();
        let before = self.baselines.get(&id);
        let mut sender = Sender::new(SendQueue::with_options(sink, &self.options), &self.arena);
        sender.send(Some(tree), before)?;
        let stats = sender.finish()?.stats();
        self.baselines.insert(id, tree.clone());
        debug!(%id, values = stats.values, no_changes = stats.no_changes, "session send");
        Ok(stats)
    }

    /// Receives the tree with root `id` against its cached baseline. The
    /// result replaces the `id` entry and is cached under its own root id,
    /// which differs from `id` when the peer replaced the root. A received
    /// `None` clears the entry. On error the cache is left as it was.
    pub fn receive_tree<R: RecordSource>(
        &mut self,
        id: NodeId,
        source: R,
    ) -> Result<Option<J>, SyncError> {
        let before = self.baselines.get(&id);
        let queue = ReceiveQueue::with_options(source, &self.options);
        let tree = Receiver::new(queue, &mut self.arena).receive(before)?;
        self.baselines.shift_remove(&id);
        if let Some(t) = &tree {
            // A replaced root is filed under its own id, as the sender did.
            self.baselines.insert(*t.id(), t.clone());
        }
        debug!(%id, present = tree.is_some(), "session receive");
        Ok(tree)
    }

    pub fn baseline(&self, id: &NodeId) -> Option<&J> {
        self.baselines.get(id)
    }

    pub fn forget(&mut self, id: &NodeId) -> Option<J> {
        self.baselines.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}
