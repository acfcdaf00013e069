//! List state manager with its persistence lifecycle.
//!
//! Typical lifetime:
//! 1. `ListController::new(persistence)`: empty list, not ready.
//! 2. `load().await` once at startup: restores the stored list and marks
//!    the controller ready, even when the load fails.
//! 3. `add` / `remove` / `update`: each mutation is applied in memory and
//!    then the whole list is saved.
//!
//! Storage failures never escape: they are logged and the in-memory list
//! stays authoritative. The next successful save writes the then-current
//! list.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::list::ShoppingList;
use crate::models::{Item, ItemId, ItemPatch};
use crate::persistence::ListPersistence;
use crate::report::{Report, ReportError, ReportLabels, generate_report_with};

pub struct ListController {
    list: ShoppingList,
    persistence: ListPersistence,
    labels: ReportLabels,
    ready: bool,
}

impl ListController {
    pub fn new(persistence: ListPersistence) -> Self {
        Self {
            list: ShoppingList::new(),
            persistence,
            labels: ReportLabels::default(),
            ready: false,
        }
    }

    /// Labels used by [`ListController::report`].
    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Startup load. On failure the list stays as it is (empty) and the
    /// error is logged; the controller becomes ready either way.
    pub async fn load(&mut self) {
        match self.persistence.load().await {
            Ok(items) => self.list = ShoppingList::from_items(items),
            Err(error) => {
                tracing::error!(key = %self.persistence.key(), %error, "failed to load list");
            }
        }
        self.ready = true;
    }

    /// `false` until the startup load has finished.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn items(&self) -> Arc<[Item]> {
        self.list.snapshot()
    }

    pub fn list(&self) -> &ShoppingList {
        &self.list
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.list.find(id)
    }

    pub fn total(&self) -> Decimal {
        self.list.total()
    }

    /// Report over the current snapshot.
    pub fn report(&self) -> Result<Report, ReportError> {
        generate_report_with(self.list.items(), &self.labels)
    }

    pub async fn add(
        &mut self,
        name: impl Into<String>,
        quantity: &str,
        unit_price: &str,
    ) -> ItemId {
        let id = self.list.add(name, quantity, unit_price);
        tracing::info!(%id, "item added");
        self.persist().await;
        id
    }

    /// Missing ids are a silent no-op; nothing is saved in that case.
    pub async fn remove(&mut self, id: &ItemId) {
        if self.list.remove(id) {
            tracing::info!(%id, "item removed");
            self.persist().await;
        } else {
            tracing::debug!(%id, "remove: no such item");
        }
    }

    /// Missing ids are a silent no-op; nothing is saved in that case.
    pub async fn update(&mut self, id: &ItemId, patch: &ItemPatch) {
        if self.list.update(id, patch) {
            tracing::info!(%id, "item updated");
            self.persist().await;
        } else {
            tracing::debug!(%id, "update: no such item");
        }
    }

    async fn persist(&self) {
        if !self.ready {
            tracing::debug!("list not loaded yet, skipping save");
            return;
        }
        if let Err(error) = self.persistence.save(self.list.items()).await {
            tracing::error!(key = %self.persistence.key(), %error, "failed to save list");
        }
    }
}
