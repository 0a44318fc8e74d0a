//! Local list state for the dashboard.
//!
//! [`PromptBoard`] mirrors the caller's prompts and folds in the results of
//! the caller's own writes right away, before any change notice arrives.
//! It also tracks which prompt is open in the edit dialog and which one is
//! awaiting delete confirmation.

use promptcubic_core::types::DbId;
use promptcubic_db::models::prompt::Prompt;

#[derive(Debug, Clone, Default)]
pub struct PromptBoard {
    prompts: Vec<Prompt>,
    editing: Option<DbId>,
    pending_delete: Option<DbId>,
    last_error: Option<String>,
}

impl PromptBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompts in display order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn get(&self, id: DbId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    // ---- list reconciliation ----

    /// Swap in a freshly fetched list.
    pub fn replace_all(&mut self, prompts: Vec<Prompt>) {
        self.prompts = prompts;
    }

    /// Append a newly created prompt. A re-fetch that already brought it in
    /// wins the race; the entry is replaced instead of duplicated.
    pub fn apply_created(&mut self, prompt: Prompt) {
        match self.prompts.iter_mut().find(|p| p.id == prompt.id) {
            Some(existing) => *existing = prompt,
            None => self.prompts.push(prompt),
        }
    }

    /// Replace the entry with the same id. Returns `false` if it is not
    /// on the board.
    pub fn apply_updated(&mut self, prompt: Prompt) -> bool {
        match self.prompts.iter_mut().find(|p| p.id == prompt.id) {
            Some(existing) => {
                *existing = prompt;
                true
            }
            None => false,
        }
    }

    /// Drop the entry with `id`. Returns `false` if it was not there.
    pub fn apply_deleted(&mut self, id: DbId) -> bool {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id != id);
        self.prompts.len() != before
    }

    // ---- edit dialog ----

    /// Open the edit dialog for `id`. Returns the prompt to load into the
    /// form, or `None` (dialog stays closed) if it is not on the board.
    pub fn begin_edit(&mut self, id: DbId) -> Option<&Prompt> {
        let index = self.prompts.iter().position(|p| p.id == id)?;
        self.editing = Some(id);
        Some(&self.prompts[index])
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<DbId> {
        self.editing
    }

    // ---- delete confirmation ----

    pub fn request_delete(&mut self, id: DbId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<DbId> {
        self.pending_delete
    }

    /// Take the pending id, closing the confirmation.
    pub fn take_pending_delete(&mut self) -> Option<DbId> {
        self.pending_delete.take()
    }

    // ---- errors ----

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
