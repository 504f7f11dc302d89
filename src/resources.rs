// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Built once at startup so expensive objects are not recreated per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::{Database, GoalsManager, MeasurementsManager};
use crate::services::auth::AuthService;
use crate::services::goal_progress::{Clock, GoalProgressEngine, SystemClock};
use crate::services::photo_storage::{PhotoStorage, PlaceholderPhotoStorage};
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Connection pool handle
    pub database: Database,
    /// Token issuance and validation
    pub auth_manager: Arc<AuthManager>,
    /// Progress photo backend
    pub photo_storage: Arc<dyn PhotoStorage>,
    /// Source of "today" for goal completion dates
    pub clock: Arc<dyn Clock>,
}

impl ServerResources {
    /// Assemble resources with the system clock and placeholder photo storage
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let auth_manager = Arc::new(AuthManager::from_config(&config.auth));
        let photo_storage = Arc::new(PlaceholderPhotoStorage::new(
            config.storage.photo_base_url.clone(),
        ));
        Self {
            config,
            database,
            auth_manager,
            photo_storage,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock, used by tests that pin completion dates
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the photo storage backend
    #[must_use]
    pub fn with_photo_storage(mut self, photo_storage: Arc<dyn PhotoStorage>) -> Self {
        self.photo_storage = photo_storage;
        self
    }

    /// Authentication service over the shared database
    #[must_use]
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.database.clone(), Arc::clone(&self.auth_manager))
    }

    /// Goal progress engine over the `SQLite` stores
    #[must_use]
    pub fn goal_progress_engine(&self) -> GoalProgressEngine<MeasurementsManager, GoalsManager> {
        GoalProgressEngine::with_clock(
            self.database.measurements(),
            self.database.goals(),
            Arc::clone(&self.clock),
        )
    }
}
