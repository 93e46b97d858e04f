//! Linear undo/redo history.
//!
//! `past` holds applied commands (most recent last), `future` holds undone
//! commands (next to redo first). Pushing a new command discards `future`;
//! there is no branching.

use crate::command::{Command, CommandId, Direction};
use crate::document::DocumentId;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, warn};

/// Maximum number of undo entries to keep
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Something commands can be applied to.
///
/// Implementations must only use data captured in the command. They must not
/// push new entries onto the history while applying.
pub trait CommandTarget {
    fn apply(&mut self, command: &Command, direction: Direction);
}

type Observer = Box<dyn FnMut(&Command, Direction)>;

/// Bounded undo log with a redo stack.
pub struct History {
    past: VecDeque<Command>,
    future: VecDeque<Command>,
    limit: usize,
    observers: Vec<Observer>,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// History keeping at most `limit` undo entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        History {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
            observers: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a freshly applied command. Clears the redo stack.
    pub fn push_entry(&mut self, command: Command) {
        debug!(
            command = %command.id,
            kind = command.kind.name(),
            document = %command.document_id,
            description = %command.description,
            "history push"
        );
        self.future.clear();
        self.past.push_back(command);
        while self.past.len() > self.limit {
            if let Some(evicted) = self.past.pop_front() {
                warn!(
                    command = %evicted.id,
                    description = %evicted.description,
                    "history full, oldest entry can no longer be undone"
                );
            }
        }
    }

    /// Undo the most recent command. Returns its id, or `None` if there is nothing to undo.
    pub fn undo(&mut self, target: &mut impl CommandTarget) -> Option<CommandId> {
        let command = self.past.pop_back()?;
        debug!(command = %command.id, description = %command.description, "undo");
        target.apply(&command, Direction::Undo);
        self.notify(&command, Direction::Undo);
        let id = command.id;
        self.future.push_front(command);
        Some(id)
    }

    /// Redo the most recently undone command. Returns its id, or `None` if there is nothing to redo.
    pub fn redo(&mut self, target: &mut impl CommandTarget) -> Option<CommandId> {
        let command = self.future.pop_front()?;
        debug!(command = %command.id, description = %command.description, "redo");
        target.apply(&command, Direction::Redo);
        self.notify(&command, Direction::Redo);
        let id = command.id;
        self.past.push_back(command);
        Some(id)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Drop every command recorded against `id`, from both stacks.
    pub fn purge_document(&mut self, id: &DocumentId) {
        let before = self.past.len() + self.future.len();
        self.past.retain(|command| &command.document_id != id);
        self.future.retain(|command| &command.document_id != id);
        let purged = before - self.past.len() - self.future.len();
        if purged > 0 {
            debug!(document = %id, purged, "dropped history of closed document");
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Applied commands, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &Command> {
        self.past.iter()
    }

    /// Undone commands, next to redo first.
    pub fn future(&self) -> impl Iterator<Item = &Command> {
        self.future.iter()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Register an observer called after every undo/redo has been applied.
    pub fn subscribe(&mut self, observer: impl FnMut(&Command, Direction) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, command: &Command, direction: Direction) {
        for observer in &mut self.observers {
            observer(command, direction);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("past", &self.past.len())
            .field("future", &self.future.len())
            .field("limit", &self.limit)
            .field("observers", &self.observers.len())
            .finish()
    }
}
