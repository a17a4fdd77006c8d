//! Drag-to-reorder state machine for one category view.
//!
//! A drag is well-formed as exactly one `start`, zero or more `over`/`step`
//! events, then either `drop` or `cancel`. Transitions are pure functions on a
//! [`DragSession`] value returning the next session plus an optional
//! [`ReorderIntent`]. [`DragReorderController`] owns the session for a
//! category and applies them.
//!
//! | Event         | From       | To                   | Intent             |
//! |---------------|------------|----------------------|--------------------|
//! | `start(id)`   | `Idle`     | `Dragging`           | none               |
//! | `over(id?)`   | `Dragging` | `Dragging`           | none               |
//! | `step(dir)`   | `Dragging` | `Dragging`           | none               |
//! | `drop`        | `Dragging` | `Dropping` -> `Idle` | when a move exists |
//! | `cancel`      | any        | `Idle`               | none               |
//!
//! Anything else is rejected with [`DragError`] and leaves the session as it
//! was.

use shared::{
    domain::{BookmarkId, CategoryId},
    protocol::ReorderIntent,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sort_order::assign_sort_orders;

pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Dropping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardStep {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Start(BookmarkId),
    Over(Option<BookmarkId>),
    Step(KeyboardStep),
    Drop,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKey {
    Space,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("a drag of bookmark {active} is already in progress")]
    AlreadyDragging { active: i64 },
    #[error("no drag in progress")]
    NotDragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragSession {
    active_id: Option<BookmarkId>,
    over_id: Option<BookmarkId>,
    phase: DragPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: DragSession,
    pub intent: Option<ReorderIntent>,
}

impl Transition {
    fn quiet(session: DragSession) -> Self {
        Self {
            session,
            intent: None,
        }
    }
}

impl DragSession {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn active_id(&self) -> Option<BookmarkId> {
        self.active_id
    }

    pub fn over_id(&self) -> Option<BookmarkId> {
        self.over_id
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn start(self, bookmark_id: BookmarkId) -> Result<Transition, DragError> {
        if let Some(active) = self.active_id.filter(|_| self.phase != DragPhase::Idle) {
            return Err(DragError::AlreadyDragging { active: active.0 });
        }

        Ok(Transition::quiet(Self {
            active_id: Some(bookmark_id),
            over_id: None,
            phase: DragPhase::Dragging,
        }))
    }

    pub fn over(self, bookmark_id: Option<BookmarkId>) -> Result<Transition, DragError> {
        self.ensure_dragging()?;
        Ok(Transition::quiet(Self {
            over_id: bookmark_id,
            ..self
        }))
    }

    /// Moves the hover target one slot from the current target, or from the
    /// dragged item when nothing is hovered yet. Clamped at both ends.
    pub fn step(self, step: KeyboardStep, order: &[BookmarkId]) -> Result<Transition, DragError> {
        self.ensure_dragging()?;

        let over_id = self
            .over_id
            .or(self.active_id)
            .and_then(|anchor| index_of(order, anchor))
            .map(|index| match step {
                KeyboardStep::Previous => index.saturating_sub(1),
                KeyboardStep::Next => (index + 1).min(order.len().saturating_sub(1)),
            })
            .and_then(|index| order.get(index).copied());

        Ok(Transition::quiet(Self { over_id, ..self }))
    }

    /// Ends the drag. A reorder intent is produced only when the hover target
    /// differs from the dragged item and both are present in `order`.
    pub fn drop(
        self,
        category_id: CategoryId,
        order: &[BookmarkId],
    ) -> Result<Transition, DragError> {
        self.ensure_dragging()?;

        let dropping = Self {
            phase: DragPhase::Dropping,
            ..self
        };
        debug!(
            category_id = category_id.0,
            active_id = ?dropping.active_id,
            over_id = ?dropping.over_id,
            phase = ?dropping.phase,
            "drag released"
        );

        let intent = dropping.compute_move(order).map(|ordered_ids| ReorderIntent {
            category_id,
            assignments: assign_sort_orders(&ordered_ids),
            ordered_ids,
        });

        Ok(Transition {
            session: Self::default(),
            intent,
        })
    }

    pub fn cancel(self) -> Transition {
        if self.phase != DragPhase::Idle {
            debug!(active_id = ?self.active_id, "drag cancelled");
        }
        Transition::quiet(Self::default())
    }

    /// Insertion marker for `bookmark_id`. Only the hovered item gets one,
    /// and never the dragged item itself.
    pub fn drop_position(
        &self,
        bookmark_id: BookmarkId,
        order: &[BookmarkId],
    ) -> Option<DropPosition> {
        if !self.is_dragging() {
            return None;
        }
        let active = self.active_id?;
        if active == bookmark_id || self.over_id != Some(bookmark_id) {
            return None;
        }

        let active_index = index_of(order, active)?;
        let over_index = index_of(order, bookmark_id)?;
        if active_index < over_index {
            Some(DropPosition::After)
        } else {
            Some(DropPosition::Before)
        }
    }

    fn ensure_dragging(&self) -> Result<(), DragError> {
        if self.is_dragging() {
            Ok(())
        } else {
            Err(DragError::NotDragging)
        }
    }

    fn compute_move(&self, order: &[BookmarkId]) -> Option<Vec<BookmarkId>> {
        let (active, over) = (self.active_id?, self.over_id?);
        if active == over {
            return None;
        }

        let (Some(old_index), Some(new_index)) = (index_of(order, active), index_of(order, over))
        else {
            debug!(
                active_id = active.0,
                over_id = over.0,
                "drop references bookmarks missing from current order"
            );
            return None;
        };

        Some(move_item(order, old_index, new_index))
    }
}

/// Removes the element at `from` and reinserts it at `to`.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    let to = to.min(moved.len());
    moved.insert(to, item);
    moved
}

fn index_of(order: &[BookmarkId], bookmark_id: BookmarkId) -> Option<usize> {
    order.iter().position(|id| *id == bookmark_id)
}

/// One drag session per category view.
#[derive(Debug, Clone)]
pub struct DragReorderController {
    category_id: CategoryId,
    session: DragSession,
}

impl DragReorderController {
    pub fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            session: DragSession::default(),
        }
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn phase(&self) -> DragPhase {
        self.session.phase()
    }

    /// Applies `event` against the category's current `order`. On error the
    /// session is left untouched.
    pub fn handle(
        &mut self,
        event: DragEvent,
        order: &[BookmarkId],
    ) -> Result<Option<ReorderIntent>, DragError> {
        let transition = match event {
            DragEvent::Start(bookmark_id) => self.session.start(bookmark_id),
            DragEvent::Over(bookmark_id) => self.session.over(bookmark_id),
            DragEvent::Step(step) => self.session.step(step, order),
            DragEvent::Drop => self.session.drop(self.category_id, order),
            DragEvent::Cancel => Ok(self.session.cancel()),
        };

        let transition = transition.inspect_err(|err| {
            warn!(
                category_id = self.category_id.0,
                event = ?event,
                "rejected drag event: {err}"
            );
        })?;

        self.session = transition.session;
        Ok(transition.intent)
    }

    /// Keyboard sensor: space or enter picks up the focused bookmark and drops
    /// it again, arrows move the target, escape cancels.
    pub fn handle_key(
        &mut self,
        key: DragKey,
        focused: BookmarkId,
        order: &[BookmarkId],
    ) -> Result<Option<ReorderIntent>, DragError> {
        let event = match (key, self.session.is_dragging()) {
            (DragKey::Space | DragKey::Enter, false) => DragEvent::Start(focused),
            (DragKey::Space | DragKey::Enter, true) => DragEvent::Drop,
            (DragKey::Escape, _) => DragEvent::Cancel,
            (DragKey::ArrowUp | DragKey::ArrowLeft, _) => DragEvent::Step(KeyboardStep::Previous),
            (DragKey::ArrowDown | DragKey::ArrowRight, _) => DragEvent::Step(KeyboardStep::Next),
        };
        self.handle(event, order)
    }

    pub fn drop_position(
        &self,
        bookmark_id: BookmarkId,
        order: &[BookmarkId],
    ) -> Option<DropPosition> {
        self.session.drop_position(bookmark_id, order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pointer sensor. A press turns into a drag only once the pointer has
/// travelled `activation_distance` from where it went down, so plain clicks on
/// a bookmark still open it.
#[derive(Debug, Clone)]
pub struct PointerGesture {
    activation_distance: f64,
    pressed: Option<(BookmarkId, Point)>,
    dragging: bool,
}

impl Default for PointerGesture {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl PointerGesture {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            pressed: None,
            dragging: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self, bookmark_id: BookmarkId, at: Point) {
        self.pressed = Some((bookmark_id, at));
        self.dragging = false;
    }

    pub fn motion(&mut self, at: Point, hovered: Option<BookmarkId>) -> Vec<DragEvent> {
        let Some((bookmark_id, origin)) = self.pressed else {
            return Vec::new();
        };

        if self.dragging {
            return vec![DragEvent::Over(hovered)];
        }
        if origin.distance_to(at) < self.activation_distance {
            return Vec::new();
        }

        self.dragging = true;
        vec![DragEvent::Start(bookmark_id), DragEvent::Over(hovered)]
    }

    /// Releasing over a bookmark drops onto it; releasing anywhere else
    /// cancels the drag.
    pub fn release(&mut self, hovered: Option<BookmarkId>) -> Vec<DragEvent> {
        let was_dragging = self.dragging;
        self.pressed = None;
        self.dragging = false;

        match (was_dragging, hovered) {
            (false, _) => Vec::new(),
            (true, Some(target)) => vec![DragEvent::Over(Some(target)), DragEvent::Drop],
            (true, None) => vec![DragEvent::Cancel],
        }
    }
}

#[cfg(test)]
#[path = "tests/drag_tests.rs"]
mod tests;
