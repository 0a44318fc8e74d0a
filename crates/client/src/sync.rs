//! The dashboard's synchronization loop.
//!
//! [`PromptSync`] applies the caller's own writes to the board as soon as
//! the server confirms them, and re-fetches the whole list whenever the
//! realtime feed reports a change.

use promptcubic_db::models::prompt::Prompt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::PromptApi;
use crate::board::PromptBoard;
use crate::error::ClientError;
use crate::form::{FormMode, PromptForm};
use crate::subscription::ChangeNotice;

/// Messages shown to the user; details go to the log.
pub const FETCH_FAILED: &str = "Error fetching prompts";
pub const CREATE_FAILED: &str = "Error creating prompt";
pub const UPDATE_FAILED: &str = "Error updating prompt";
pub const DELETE_FAILED: &str = "Error deleting prompt";

pub struct PromptSync {
    api: PromptApi,
    board: PromptBoard,
}

impl PromptSync {
    pub fn new(api: PromptApi) -> Self {
        Self {
            api,
            board: PromptBoard::new(),
        }
    }

    pub fn api(&self) -> &PromptApi {
        &self.api
    }

    pub fn board(&self) -> &PromptBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut PromptBoard {
        &mut self.board
    }

    /// Replace the board with the server's list.
    ///
    /// On failure the board keeps its previous contents.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list_prompts().await {
            Ok(prompts) => {
                tracing::debug!(count = prompts.len(), "Prompts fetched");
                self.board.replace_all(prompts);
                self.board.clear_error();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching prompts");
                self.board.set_error(FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// Save the form: an `Edit(id)` form updates prompt `id`, a `Create`
    /// form adds a new prompt.
    ///
    /// A form that fails local validation makes no request. After an update
    /// attempt the form is reset and, if the board's edit dialog was open on
    /// that prompt, the dialog is closed, whether or not the save succeeded.
    pub async fn submit(&mut self, form: &mut PromptForm) -> Result<Prompt, ClientError> {
        let mode = form.mode();
        let draft = form.submit()?;

        match mode {
            FormMode::Edit(id) => {
                let result = self.api.update_prompt(id, &draft.to_update()).await;
                if self.board.editing() == Some(id) {
                    self.board.end_edit();
                }
                form.reset();
                match result {
                    Ok(prompt) => {
                        tracing::info!(prompt_id = %prompt.id, "Prompt updated");
                        self.board.apply_updated(prompt.clone());
                        Ok(prompt)
                    }
                    Err(e) => {
                        tracing::error!(prompt_id = %id, error = %e, "Error updating prompt");
                        self.board.set_error(UPDATE_FAILED);
                        Err(e)
                    }
                }
            }
            FormMode::Create => match self.api.create_prompt(&draft.to_create()).await {
                Ok(prompt) => {
                    tracing::info!(prompt_id = %prompt.id, "Prompt created");
                    self.board.apply_created(prompt.clone());
                    Ok(prompt)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error creating prompt");
                    self.board.set_error(CREATE_FAILED);
                    Err(e)
                }
            },
        }
    }

    /// Delete the prompt awaiting confirmation, if any.
    ///
    /// The confirmation is closed whatever the outcome.
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        let Some(id) = self.board.take_pending_delete() else {
            return Ok(());
        };

        match self.api.delete_prompt(id).await {
            Ok(_) => {
                tracing::info!(prompt_id = %id, "Prompt deleted");
                self.board.apply_deleted(id);
                Ok(())
            }
            Err(e) => {
                tracing::error!(prompt_id = %id, error = %e, "Error deleting prompt");
                self.board.set_error(DELETE_FAILED);
                Err(e)
            }
        }
    }

    /// Re-fetch the list for every notice until `cancel` fires or the
    /// notice channel closes.
    pub async fn run_live(
        &mut self,
        mut notices: mpsc::Receiver<ChangeNotice>,
        cancel: CancellationToken,
    ) {
        loop {
            let notice = tokio::select! {
                _ = cancel.cancelled() => break,
                notice = notices.recv() => notice,
            };
            let Some(notice) = notice else {
                break;
            };

            tracing::debug!(event = %notice.event, id = %notice.id, "Change received, re-fetching");
            // Failures are logged and recorded on the board by refresh().
            let _ = self.refresh().await;
        }
    }
}
