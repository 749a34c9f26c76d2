//! The receiving side of an exchange.

use lst_tree::{TypeArena, TypeHandle, TypeKind, J};
use tracing::{debug, trace};

use crate::context::PendingStack;
use crate::error::SyncError;
use crate::field::{Field, Side, Value};
use crate::queue::{ReceiveQueue, RecordSource};
use crate::record::{unexpected, Payload, Record};
use crate::type_codec::walk_type;

/// Rebuilds trees from the records a [`Sender`](crate::Sender) wrote.
///
/// Decoded type descriptors are added to the borrowed arena. Unchanged
/// subtrees are taken from the baseline by reference.
pub struct Receiver<'a, R> {
    queue: ReceiveQueue<R>,
    arena: &'a mut TypeArena,
    /// Arena handle of every slot the peer has transmitted, in slot order.
    slots: Vec<TypeHandle>,
    /// Descriptors being decoded inside one another.
    type_depth: usize,
    pending: PendingStack,
}

impl<'a, R: RecordSource> Receiver<'a, R> {
    pub fn new(queue: ReceiveQueue<R>, arena: &'a mut TypeArena) -> Self {
        Self {
            queue,
            arena,
            slots: Vec::new(),
            type_depth: 0,
            pending: PendingStack::new(),
        }
    }

    /// Reads one tree, using `before` as the baseline for `NO_CHANGE`
    /// records. On error the exchange is abandoned and nothing is returned.
    pub fn receive(&mut self, before: Option<&J>) -> Result<Option<J>, SyncError> {
        let start = self.queue.received();
        match self.value(None, before) {
            Ok(tree) => {
                debug!(
                    kind = ?tree.as_ref().map(J::kind),
                    records = self.queue.received() - start,
                    "tree received"
                );
                Ok(tree)
            }
            Err(err) => {
                debug!(error = %err, depth = self.pending.depth(), "abandoning exchange");
                self.abandon();
                Err(err)
            }
        }
    }

    /// Discards every half-built node.
    pub fn abandon(&mut self) {
        self.pending.clear();
        self.type_depth = 0;
    }

    pub fn queue_mut(&mut self) -> &mut ReceiveQueue<R> {
        &mut self.queue
    }
}

impl<R: RecordSource> Side for Receiver<'_, R> {
    fn value<T: Value>(
        &mut self,
        _after: Option<&T>,
        before: Option<&T>,
    ) -> Result<Option<T>, SyncError> {
        match self.queue.take()? {
            Record::Absent => Ok(None),
            Record::NoChange => before.cloned().map(Some).ok_or(SyncError::MissingBaseline),
            Record::Value(payload) => T::walk(self, payload, None, before).map(Some),
        }
    }

    fn type_ref(
        &mut self,
        _after: Option<TypeHandle>,
        before: Option<TypeHandle>,
    ) -> Result<Option<TypeHandle>, SyncError> {
        let (slot, kind) = match self.queue.take()? {
            Record::Absent => return Ok(None),
            Record::NoChange => return before.map(Some).ok_or(SyncError::MissingBaseline),
            Record::Value(Payload::Type { slot, kind }) => (slot, kind),
            Record::Value(other) => return Err(unexpected("type", &other)),
        };
        let Some(kind) = kind else {
            return self
                .slots
                .get(slot as usize)
                .copied()
                .map(Some)
                .ok_or(SyncError::UnknownTypeSlot(slot));
        };
        if slot as usize != self.slots.len() {
            return Err(SyncError::UnknownTypeSlot(slot));
        }
        if kind == TypeKind::Primitive {
            // Primitives have fixed handles and reference nothing.
            let ty = walk_type(self, kind, None)?;
            let handle = self.arena.add(ty);
            self.slots.push(handle);
            return Ok(Some(handle));
        }
        // Register the slot before the content so back-references to this
        // descriptor resolve to the placeholder.
        let start = self.arena.len();
        let handle = self.arena.reserve();
        self.slots.push(handle);
        self.type_depth += 1;
        let ty = walk_type(self, kind, None);
        self.type_depth -= 1;
        self.arena.fill(handle, ty?)?;
        if self.type_depth > 0 {
            return Ok(Some(handle));
        }
        // The whole descriptor graph is known now; fold it into what the
        // arena already holds.
        let moved = self.arena.settle(start);
        let relocate = |h: TypeHandle| match (h.0 as usize).checked_sub(start) {
            Some(i) => moved[i],
            None => h,
        };
        for slot in &mut self.slots {
            *slot = relocate(*slot);
        }
        let handle = relocate(handle);
        trace!(kind = kind.name(), %handle, added = self.arena.len() - start, "type settled");
        Ok(Some(handle))
    }

    fn discard<T: Field>(&mut self, what: &'static str) -> Result<(), SyncError> {
        if !matches!(self.queue.peek()?, Record::Value(_)) {
            self.queue.take()?;
            return Ok(());
        }
        if T::sync(self, None, None)?.is_some() {
            trace!(field = what, "dropped compatibility field");
        }
        Ok(())
    }

    fn pending(&mut self) -> &mut PendingStack {
        &mut self.pending
    }
}

/// Decodes one tree from a complete record list.
pub fn decode(
    records: Vec<Record>,
    before: Option<&J>,
    arena: &mut TypeArena,
) -> Result<Option<J>, SyncError> {
    let mut receiver = Receiver::new(ReceiveQueue::new(records.into_iter()), arena);
    let tree = receiver.receive(before)?;
    let queue = receiver.queue_mut();
    if !queue.is_drained()? {
        return Err(SyncError::TrailingRecords(queue.buffered()));
    }
    Ok(tree)
}
