//! The sending side of an exchange.

use indexmap::IndexSet;
use lst_tree::{TypeArena, TypeError, TypeHandle, J};
use tracing::{debug, trace};

use crate::context::PendingStack;
use crate::error::SyncError;
use crate::field::{Field, Side, Value};
use crate::queue::{RecordSink, SendQueue};
use crate::record::{Payload, Record};
use crate::type_codec::walk_type;

/// Walks trees against their baselines and writes the difference to a
/// [`SendQueue`].
///
/// The type seen-table lives as long as the sender: a peer must decode
/// everything one sender wrote with a single [`Receiver`](crate::Receiver).
pub struct Sender<'a, K> {
    queue: SendQueue<K>,
    arena: &'a TypeArena,
    /// Handles whose content was already written; the index is the slot.
    seen: IndexSet<TypeHandle>,
    pending: PendingStack,
}

impl<'a, K: RecordSink> Sender<'a, K> {
    pub fn new(queue: SendQueue<K>, arena: &'a TypeArena) -> Self {
        Self {
            queue,
            arena,
            seen: IndexSet::new(),
            pending: PendingStack::new(),
        }
    }

    /// Writes `after` as a change against `before`, the version the peer
    /// already holds. `None` for `after` writes a single `ABSENT`.
    pub fn send(&mut self, after: Option<&J>, before: Option<&J>) -> Result<(), SyncError> {
        let start = self.queue.stats().total();
        self.value(after, before)?;
        debug!(
            kind = ?after.map(J::kind),
            incremental = before.is_some(),
            records = self.queue.stats().total() - start,
            "tree sent"
        );
        Ok(())
    }

    /// Flushes buffered records and hands back the queue.
    pub fn finish(mut self) -> Result<SendQueue<K>, SyncError> {
        self.queue.flush()?;
        Ok(self.queue)
    }
}

impl<K: RecordSink> Side for Sender<'_, K> {
    fn value<T: Value>(
        &mut self,
        after: Option<&T>,
        before: Option<&T>,
    ) -> Result<Option<T>, SyncError> {
        let Some(after) = after else {
            self.queue.put(Record::Absent)?;
            return Ok(None);
        };
        if before.is_some_and(|b| after.same(b)) {
            self.queue.put(Record::NoChange)?;
            return Ok(Some(after.clone()));
        }
        let payload = after.payload(before)?;
        self.queue.put(Record::Value(payload.clone()))?;
        T::walk(self, payload, Some(after), before).map(Some)
    }

    fn type_ref(
        &mut self,
        after: Option<TypeHandle>,
        before: Option<TypeHandle>,
    ) -> Result<Option<TypeHandle>, SyncError> {
        let Some(handle) = after else {
            self.queue.put(Record::Absent)?;
            return Ok(None);
        };
        if before == Some(handle) {
            self.queue.put(Record::NoChange)?;
            return Ok(Some(handle));
        }
        let (slot, fresh) = self.seen.insert_full(handle);
        let slot = slot as u32;
        if !fresh {
            self.queue.put(Record::Value(Payload::Type { slot, kind: None }))?;
            return Ok(Some(handle));
        }
        let arena = self.arena;
        let ty = arena.get(handle).ok_or(TypeError::UnknownHandle(handle))?;
        self.queue.put(Record::Value(Payload::Type {
            slot,
            kind: Some(ty.kind()),
        }))?;
        walk_type(self, ty.kind(), Some(ty))?;
        Ok(Some(handle))
    }

    fn discard<T: Field>(&mut self, what: &'static str) -> Result<(), SyncError> {
        trace!(field = what, "no value to send for compatibility field");
        self.queue.put(Record::Absent)
    }

    fn pending(&mut self) -> &mut PendingStack {
        &mut self.pending
    }
}

/// Encodes one tree into a record list.
pub fn encode(
    after: Option<&J>,
    before: Option<&J>,
    arena: &TypeArena,
) -> Result<Vec<Record>, SyncError> {
    let mut sender = Sender::new(SendQueue::new(Vec::new(), usize::MAX), arena);
    sender.send(after, before)?;
    Ok(sender.finish()?.into_sink())
}
