//! Draft state behind the prompt form.
//!
//! The same form type serves the inline "new prompt" form and the edit
//! dialog; [`FormMode`] decides what happens to the fields after a submit.

use promptcubic_core::error::CoreError;
use promptcubic_core::prompt::validate_prompt_fields;
use promptcubic_core::types::DbId;
use promptcubic_db::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};

/// Whether the form creates a new prompt or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(DbId),
}

/// Validated field values taken from a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDraft {
    pub title: String,
    pub content: String,
}

impl PromptDraft {
    pub fn to_create(&self) -> CreatePrompt {
        CreatePrompt {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }

    pub fn to_update(&self) -> UpdatePrompt {
        UpdatePrompt {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptForm {
    pub title: String,
    /// Markdown source as typed.
    pub content: String,
    mode: FormMode,
}

impl PromptForm {
    /// An empty form in create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to edit mode, pre-filled with `prompt`'s fields.
    pub fn load(&mut self, prompt: &Prompt) {
        self.title = prompt.title.clone();
        self.content = prompt.content.clone();
        self.mode = FormMode::Edit(prompt.id);
    }

    /// Back to an empty create form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Check the required fields and take a draft.
    ///
    /// A create form is cleared once the draft is taken; an edit form keeps
    /// its values. A rejected submit leaves the fields untouched.
    pub fn submit(&mut self) -> Result<PromptDraft, CoreError> {
        validate_prompt_fields(&self.title, &self.content)?;

        let draft = PromptDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        };
        if self.mode == FormMode::Create {
            self.title.clear();
            self.content.clear();
        }
        Ok(draft)
    }
}
