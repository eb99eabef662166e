//! Inline card editor.

use crate::types::{Id, Task};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter { shift: bool },
    Escape,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Keep editing; the key was text input.
    Continue,
    /// Editor closed with a content change to send.
    Save { id: Id, content: String },
    /// Editor closed with nothing to send.
    Close,
}

/// Edit state of one card.
#[derive(Debug, Clone, Default)]
pub struct CardEditor {
    editing: Option<Editing>,
}

#[derive(Debug, Clone)]
struct Editing {
    id: Id,
    original: String,
    text: String,
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the editor on `task` (a double click on the card).
    pub fn open(&mut self, task: &Task) {
        self.editing = Some(Editing {
            id: task.id.clone(),
            original: task.content.clone(),
            text: task.content.clone(),
        });
    }

    /// A card being edited cannot be dragged.
    pub fn is_editing(&self, id: &Id) -> bool {
        self.editing.as_ref().is_some_and(|e| &e.id == id)
    }

    pub fn text(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.text.as_str())
    }

    pub fn input(&mut self, text: impl Into<String>) {
        if let Some(editing) = self.editing.as_mut() {
            editing.text = text.into();
        }
    }

    pub fn key(&mut self, key: EditorKey) -> EditorAction {
        if self.editing.is_none() {
            return EditorAction::Close;
        }
        match key {
            EditorKey::Enter { shift: true } => {
                if let Some(editing) = self.editing.as_mut() {
                    editing.text.push('\n');
                }
                EditorAction::Continue
            }
            EditorKey::Enter { shift: false } => self.commit(),
            EditorKey::Escape => {
                self.cancel();
                EditorAction::Close
            }
        }
    }

    /// Close, returning the trimmed text when it differs from the stored
    /// content. Blank text never replaces existing content.
    pub fn commit(&mut self) -> EditorAction {
        let Some(editing) = self.editing.take() else {
            return EditorAction::Close;
        };
        let trimmed = editing.text.trim();
        if trimmed.is_empty() || trimmed == editing.original {
            return EditorAction::Close;
        }
        EditorAction::Save {
            id: editing.id,
            content: trimmed.to_string(),
        }
    }

    /// Close and discard the typed text.
    pub fn cancel(&mut self) {
        self.editing = None;
    }
}
