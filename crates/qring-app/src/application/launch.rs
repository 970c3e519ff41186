//! LaunchUseCase: load the configuration once and pick the landing screen.
//!
//! This is the only place the startup state machine is driven.  A failed load
//! leaves the flow in `Loading` so the caller may retry; a successful one
//! resolves it for good.

use std::sync::Arc;

use qring_core::{InitialRoute, LaunchState, StartupError, StartupFlow};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use super::config_store::{ConfigStore, StorageError};

/// Error type for the launch use case.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("could not read configuration: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Startup(#[from] StartupError),
}

pub struct LaunchUseCase {
    store: Arc<ConfigStore>,
    flow: Mutex<StartupFlow>,
}

impl LaunchUseCase {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            flow: Mutex::new(StartupFlow::new()),
        }
    }

    /// Current state of the startup flow.
    pub async fn state(&self) -> LaunchState {
        self.flow.lock().await.state()
    }

    /// Loads the store and resolves the landing route.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::Storage`] if the read fails (the flow stays `Loading`).
    /// - [`LaunchError::Startup`] if startup was already resolved.
    pub async fn run(&self) -> Result<InitialRoute, LaunchError> {
        let mut flow = self.flow.lock().await;
        if let Some(route) = flow.route() {
            return Err(StartupError::AlreadyResolved(route).into());
        }

        let loaded = self.store.load().await?;
        let route = flow.resolve(loaded.as_ref())?;
        info!(route = route.as_str(), "landing route decided");
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config_store::{encode_record, BlobStorage};
    use async_trait::async_trait;
    use qring_core::{Address, ConfigRecord};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedStorage {
        blob: Option<String>,
        fail_next_read: AtomicBool,
    }

    impl FixedStorage {
        fn new(blob: Option<String>) -> Self {
            Self {
                blob,
                fail_next_read: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl BlobStorage for FixedStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_next_read.swap(false, Ordering::SeqCst) {
                return Err(StorageError::Unavailable("flaky".into()));
            }
            Ok(self.blob.clone())
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn ready_blob() -> String {
        encode_record(&ConfigRecord {
            contact_number: Some("5491112345678".to_string()),
            address: Some(Address {
                street: "Main".to_string(),
                number: "10".to_string(),
                unit: None,
            }),
            ..ConfigRecord::default()
        })
        .unwrap()
    }

    fn make_use_case(storage: FixedStorage) -> LaunchUseCase {
        LaunchUseCase::new(Arc::new(ConfigStore::new(Arc::new(storage))))
    }

    #[tokio::test]
    async fn test_unconfigured_install_lands_on_config() {
        let use_case = make_use_case(FixedStorage::new(None));
        assert_eq!(use_case.run().await.unwrap(), InitialRoute::NeedsConfig);
    }

    #[tokio::test]
    async fn test_configured_install_lands_on_home() {
        let use_case = make_use_case(FixedStorage::new(Some(ready_blob())));
        assert_eq!(use_case.run().await.unwrap(), InitialRoute::Ready);
        assert_eq!(use_case.state().await, LaunchState::Resolved(InitialRoute::Ready));
    }

    #[tokio::test]
    async fn test_corrupt_blob_lands_on_config() {
        let use_case = make_use_case(FixedStorage::new(Some("{{{".to_string())));
        assert_eq!(use_case.run().await.unwrap(), InitialRoute::NeedsConfig);
    }

    #[tokio::test]
    async fn test_second_run_is_rejected() {
        let use_case = make_use_case(FixedStorage::new(None));
        use_case.run().await.unwrap();

        let second = use_case.run().await;

        assert!(matches!(
            second,
            Err(LaunchError::Startup(StartupError::AlreadyResolved(
                InitialRoute::NeedsConfig
            )))
        ));
    }

    #[tokio::test]
    async fn test_failed_load_stays_loading_and_can_retry() {
        // Arrange
        let storage = FixedStorage::new(Some(ready_blob()));
        storage.fail_next_read.store(true, Ordering::SeqCst);
        let use_case = make_use_case(storage);

        // Act
        let first = use_case.run().await;

        // Assert
        assert!(matches!(first, Err(LaunchError::Storage(_))));
        assert_eq!(use_case.state().await, LaunchState::Loading);
        assert_eq!(use_case.run().await.unwrap(), InitialRoute::Ready);
    }
}
