//! Undo/redo functionality
//!
//! The ledger is a linear list of actions with a cursor. Recording after an
//! undo discards the undone tail. Actions only carry object ids; objects that
//! leave the live list are parked in the scene's retained arena for as long as
//! some action still refers to them.

use shared::{ObjectId, Snapshot};

use super::SceneState;
use crate::events::EditorEvent;
use crate::snapshot;

/// One reversible history entry
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add {
        object_id: ObjectId,
    },
    Remove {
        object_id: ObjectId,
    },
    Modify {
        object_id: ObjectId,
        old_state: Snapshot,
        new_state: Snapshot,
    },
}

impl Action {
    pub fn object_id(&self) -> ObjectId {
        match self {
            Action::Add { object_id }
            | Action::Remove { object_id }
            | Action::Modify { object_id, .. } => *object_id,
        }
    }
}

/// Linear action list with an undo cursor
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    actions: Vec<Action>,
    /// Number of applied actions; `history_index` is one less
    cursor: usize,
    capacity: Option<usize>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger keeping at most `capacity` actions (oldest evicted first)
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.filter(|&c| c > 0),
            ..Self::default()
        }
    }

    /// Index of the last applied action; -1 when everything is undone
    pub fn history_index(&self) -> isize {
        self.cursor as isize - 1
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.actions.len()
    }

    /// Whether any action still refers to `id`
    pub fn references(&self, id: ObjectId) -> bool {
        self.actions.iter().any(|a| a.object_id() == id)
    }

    /// Append `action` after the cursor.
    ///
    /// Undone actions past the cursor are discarded, and the oldest actions
    /// are evicted past capacity. Returns everything dropped.
    pub fn record(&mut self, action: Action) -> Vec<Action> {
        let mut dropped = self.actions.split_off(self.cursor);
        self.actions.push(action);

        if let Some(capacity) = self.capacity {
            if self.actions.len() > capacity {
                let excess = self.actions.len() - capacity;
                dropped.extend(self.actions.drain(..excess));
            }
        }
        self.cursor = self.actions.len();
        dropped
    }

    /// Move the cursor back, returning the action to revert
    pub fn step_back(&mut self) -> Option<Action> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.actions[self.cursor].clone())
    }

    /// Move the cursor forward, returning the action to reapply
    pub fn step_forward(&mut self) -> Option<Action> {
        let action = self.actions.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(action)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = 0;
    }
}

impl SceneState {
    /// Read access to the ledger
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Record an action and notify history observers
    pub(crate) fn record(&mut self, action: Action) {
        let dropped = self.history.record(action);
        for action in dropped {
            let id = action.object_id();
            if !self.history.references(id) && self.retained.remove(&id).is_some() {
                tracing::trace!("Released retained object {id}");
            }
        }
        self.bus.publish(EditorEvent::HistoryChanged);
    }

    /// Undo the last applied action. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.step_back() else {
            return false;
        };
        tracing::debug!("Undo {action:?}");
        match action {
            Action::Add { object_id } => self.detach(object_id, "undo add"),
            Action::Remove { object_id } => self.reattach(object_id, "undo remove"),
            Action::Modify {
                object_id,
                old_state,
                ..
            } => self.apply_state(object_id, &old_state, "undo modify"),
        }
        self.bus.publish(EditorEvent::HistoryChanged);
        true
    }

    /// Redo the next undone action. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.step_forward() else {
            return false;
        };
        tracing::debug!("Redo {action:?}");
        match action {
            Action::Add { object_id } => self.reattach(object_id, "redo add"),
            Action::Remove { object_id } => self.detach(object_id, "redo remove"),
            Action::Modify {
                object_id,
                new_state,
                ..
            } => self.apply_state(object_id, &new_state, "redo modify"),
        }
        self.bus.publish(EditorEvent::HistoryChanged);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Forget all history; live objects stay
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.retained.clear();
        self.bus.publish(EditorEvent::HistoryChanged);
    }

    /// Move a live object into the retained arena
    fn detach(&mut self, id: ObjectId, operation: &'static str) {
        match self.objects.iter().position(|o| o.id == id) {
            Some(index) => {
                let object = self.objects.remove(index);
                self.retained.insert(id, object);
                self.bus.publish(EditorEvent::ObjectRemoved(id));
            }
            None => self.lookup_missed(id, operation),
        }
    }

    /// Bring a retained object back at the end of the live list
    fn reattach(&mut self, id: ObjectId, operation: &'static str) {
        if self.contains(id) {
            self.lookup_missed(id, operation);
            return;
        }
        match self.retained.remove(&id) {
            Some(object) => {
                self.objects.push(object);
                self.bus.publish(EditorEvent::ObjectAdded(id));
            }
            None => self.lookup_missed(id, operation),
        }
    }

    fn apply_state(&mut self, id: ObjectId, state: &Snapshot, operation: &'static str) {
        let object = self.objects.iter_mut().find(|o| o.id == id);
        let found = object.is_some();
        if snapshot::apply(object, Some(state), &self.bus) {
            self.autosave();
        } else if !found {
            self.lookup_missed(id, operation);
        }
    }
}
