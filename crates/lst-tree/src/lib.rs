//! Lossless semantic tree model.
//!
//! Pure data shared by both ends of a tree exchange:
//! - [`tree`]: the closed set of syntax kinds ([`J`]) and their value records
//! - [`Space`], [`Markers`] and the padding wrappers that keep every byte of
//!   formatting attached to the tree
//! - [`types`]: the semantic type graph, stored in a [`TypeArena`] and
//!   addressed by [`TypeHandle`] so that cycles are plain integers

pub mod id;
pub mod markers;
pub mod padding;
pub mod space;
pub mod tree;
pub mod types;

// ── Re-exports ─────────────────────────────────────────────────────────────

pub use id::NodeId;
pub use markers::{Marker, Markers, MarkupLevel};
pub use padding::{Container, LeftPadded, RightPadded};
pub use space::{Comment, Space};
pub use tree::{Kind, Tree, TreeNode, UnknownKind, J};
pub use types::{JavaType, PrimitiveKind, TypeArena, TypeError, TypeHandle, TypeKind};
