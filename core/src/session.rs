//! The surface a presentation layer binds to.
//!
//! `TodoSession` owns one controller, the current list filter, and the
//! background poller. Form-backed intents (`add_todo`, `update_todo`)
//! validate their drafts here, so a rejected draft never produces a request
//! and never changes status.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::config::SyncConfig;
use crate::controller::SyncController;
use crate::error::SyncError;
use crate::poller::Poller;
use crate::projection::{self, Counts, Filter};
use crate::store::{Status, TodoStore};
use crate::types::{Todo, TodoId};
use crate::validate::{TodoDraft, TodoPatch};

pub struct TodoSession {
    controller: SyncController,
    filter: Filter,
    poller: Poller,
}

impl TodoSession {
    /// Load the list (showing the loading state) and start polling.
    pub async fn start(controller: SyncController, poll_interval: Duration) -> Self {
        controller.refresh(false).await;
        let poller = Poller::spawn(controller.clone(), poll_interval);
        Self {
            controller,
            filter: Filter::All,
            poller,
        }
    }

    pub async fn connect(config: &SyncConfig) -> Self {
        debug!(base_url = %config.base_url, "opening todo session");
        Self::start(SyncController::from_config(config), config.poll_interval).await
    }

    /// Todos visible under the current filter.
    pub fn todos(&self) -> Vec<Todo> {
        projection::filter_by(self.controller.snapshot().todos.as_slice(), self.filter)
    }

    /// Every todo, ignoring the filter.
    pub fn all_todos(&self) -> Vec<Todo> {
        self.controller.snapshot().todos
    }

    pub fn status(&self) -> Status {
        self.controller.snapshot().status
    }

    pub fn counts(&self) -> Counts {
        projection::counts(&self.controller.snapshot().todos)
    }

    pub fn progress_percent(&self) -> u8 {
        projection::progress_percent(&self.controller.snapshot().todos)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoStore> {
        self.controller.subscribe()
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub async fn add_todo(&self, draft: TodoDraft) -> Result<Todo, SyncError> {
        let input = draft.validate()?;
        Ok(self.controller.create(&input).await?)
    }

    pub async fn toggle_todo(&self, id: &TodoId, completed: bool) {
        self.controller.toggle_completion(id, completed).await;
    }

    pub async fn update_todo(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, SyncError> {
        let input = patch.validate()?;
        Ok(self.controller.update(id, &input).await?)
    }

    pub async fn delete_todo(&self, id: &TodoId) {
        self.controller.delete(id).await;
    }

    /// Manual refresh; shows the loading state.
    pub async fn refresh(&self) {
        self.controller.refresh(false).await;
    }

    /// End the session and stop background polling.
    pub async fn shutdown(self) {
        self.poller.shutdown().await;
    }
}
