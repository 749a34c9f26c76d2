//! Pending-node frames.
//!
//! A node's id, prefix and markers are read on entry, but the node value can
//! only be built once all of its children have been synchronized. The frame
//! waits on a [`PendingStack`] in between; children push and pop their own
//! frames above it, so the handler that finishes a node always pops its own.

use lst_tree::{Markers, NodeId, Space};

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
}

#[derive(Debug, Default)]
pub struct PendingStack {
    frames: Vec<Pending>,
}

impl PendingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Pending) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Result<Pending, SyncError> {
        self.frames.pop().ok_or(SyncError::PendingUnderflow)
    }

    pub fn top(&self) -> Option<&Pending> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drops every frame of an abandoned exchange.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ws: &str) -> Pending {
        Pending {
            id: NodeId::random(),
            prefix: Space::format(ws),
            markers: Markers::empty(),
        }
    }

    #[test]
    fn child_frames_do_not_clobber_parent() {
        let mut stack = PendingStack::new();
        let parent = frame("\n");
        stack.push(parent.clone());
        stack.push(frame(" "));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().unwrap().prefix, Space::format(" "));
        assert_eq!(stack.top(), Some(&parent));
        assert_eq!(stack.pop().unwrap(), parent);
    }

    #[test]
    fn pop_on_empty_is_an_error() {
        let mut stack = PendingStack::new();
        assert!(matches!(stack.pop(), Err(SyncError::PendingUnderflow)));
    }

    #[test]
    fn clear_drops_all_frames() {
        let mut stack = PendingStack::new();
        stack.push(frame(""));
        stack.push(frame(""));
        stack.clear();
        assert_eq!(stack.depth(), 0);
    }
}
