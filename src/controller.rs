use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::CarApi;
use crate::error::{ClientError, ErrorClass};
use crate::model::{duplicate_locators, CarCollection, CarFields, Locator};
use crate::notify::{NoticeKind, Notifications};
use crate::prompt::{Prompter, CONFIRM_DELETE, MUTATION_FAILED};
use crate::session::CredentialStore;
use crate::types::Operation;

/// Result of a `fetch_all`
#[derive(Debug)]
pub enum SyncOutcome {
    /// Local collection now mirrors the server
    Synced { count: usize },
    /// Logged; local collection untouched
    Failed(ClientError),
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Result of create/update/delete
#[derive(Debug)]
pub enum MutationOutcome {
    /// Server accepted; `refresh` is the resync that followed
    Applied { refresh: SyncOutcome },
    /// Server refused; a blocking alert was shown
    Rejected(ClientError),
    /// Transport or decode failure; logged only
    Failed(ClientError),
    /// User declined the confirmation; nothing was sent
    Declined,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// Owns the car list and keeps it in step with the server.
///
/// Mutations never touch the local records. A successful one marks the
/// collection pending and re-fetches everything; the view only ever sees a
/// full server response. Concurrent operations each run their own refresh,
/// so whichever fetch resolves last is what stays on screen.
pub struct CarListController {
    api: Arc<dyn CarApi>,
    credentials: CredentialStore,
    prompter: Arc<dyn Prompter>,
    notifications: Notifications,
    collection: watch::Sender<CarCollection>,
}

impl CarListController {
    pub fn new(
        api: Arc<dyn CarApi>,
        credentials: CredentialStore,
        prompter: Arc<dyn Prompter>,
        notifications: Notifications,
    ) -> Self {
        let (collection, _) = watch::channel(CarCollection::default());
        Self {
            api,
            credentials,
            prompter,
            notifications,
            collection,
        }
    }

    /// Receive every collection change, for re-rendering
    pub fn subscribe(&self) -> watch::Receiver<CarCollection> {
        self.collection.subscribe()
    }

    pub fn snapshot(&self) -> CarCollection {
        self.collection.borrow().clone()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub async fn fetch_all(&self) -> SyncOutcome {
        match self.api.list_cars(self.credentials.credential()).await {
            Ok(cars) => {
                let dupes = duplicate_locators(&cars);
                if !dupes.is_empty() {
                    tracing::warn!(
                        "Fetch returned {} duplicate locator(s), rows will collide: {:?}",
                        dupes.len(),
                        dupes
                    );
                }

                let count = cars.len();
                self.collection.send_replace(CarCollection::mirror(cars, Utc::now()));
                tracing::info!("Car list synced ({} records)", count);
                SyncOutcome::Synced { count }
            }
            Err(e) => {
                tracing::error!("Failed to fetch cars: {}", e);
                SyncOutcome::Failed(e)
            }
        }
    }

    /// Send a new car. It shows up only after the refresh.
    pub async fn create(&self, draft: &CarFields) -> MutationOutcome {
        let result = self.api.create_car(self.credentials.credential(), draft).await;
        self.settle(Operation::Create, result).await
    }

    pub async fn update(&self, draft: &CarFields, target: &Locator) -> MutationOutcome {
        let result = self
            .api
            .update_car(self.credentials.credential(), target, draft)
            .await;
        self.settle(Operation::Update, result).await
    }

    /// Asks for confirmation first; declining sends nothing
    pub async fn delete(&self, locator: &Locator) -> MutationOutcome {
        if !self.prompter.confirm(CONFIRM_DELETE).await {
            tracing::debug!("Delete of {} declined", locator);
            return MutationOutcome::Declined;
        }

        let result = self.api.delete_car(self.credentials.credential(), locator).await;
        let outcome = self.settle(Operation::Delete, result).await;
        if outcome.is_applied() {
            self.notifications.raise(NoticeKind::CarDeleted);
        }
        outcome
    }

    async fn settle(&self, operation: Operation, result: Result<(), ClientError>) -> MutationOutcome {
        match result {
            Ok(()) => {
                tracing::info!("{} accepted, refreshing", operation);
                self.collection.send_modify(CarCollection::mark_pending);
                let refresh = self.fetch_all().await;
                MutationOutcome::Applied { refresh }
            }
            Err(e) if e.class() == ErrorClass::MutationFailure => {
                tracing::warn!("{}", e);
                self.prompter.alert(MUTATION_FAILED).await;
                MutationOutcome::Rejected(e)
            }
            Err(e) => {
                tracing::error!("{} failed: {}", operation, e);
                MutationOutcome::Failed(e)
            }
        }
    }
}
