//! Bookmark organization engine: drag-to-reorder, dense sort orders, icon
//! resolution, accent gradients, and the binding of all of them into one
//! presentation descriptor per bookmark.

pub mod board;
pub mod color;
pub mod drag;
pub mod icon;
pub mod presentation;
pub mod sort_order;
pub mod store;
pub mod sync;

pub use board::{BoardError, BookmarkBoard};
pub use drag::{DragEvent, DragKey, DragReorderController, PointerGesture};
pub use icon::{IconRef, SymbolCatalog, SymbolLookup};
pub use presentation::{PresentationBinder, PresentationDescriptor};
pub use store::BookmarkStore;
pub use sync::{MutationSync, ReorderQueue};
