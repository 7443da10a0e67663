//! Top-level assistant service
//!
//! Wires the API client, in-memory workspace store, auth manager,
//! workspace handler, and chat controller into a single engine handle
//! for an embedding UI.
//!
//! Session teardown happens in two layers: the client's unauthorized
//! hooks (registered here and by the auth manager) clear the workspace
//! store, the user, and the stored token the moment any endpoint sees
//! a 401, and the service's own paths additionally reset the chat
//! controller.

use std::sync::Arc;

use log::{info, warn};

use crate::actions::{LoadStats, WorkspaceHandler};
use crate::api::ApiClient;
use crate::auth::AuthManager;
use crate::chat::ChatController;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::query::{NavigationTree, navigation_tree};
use crate::storage::{InMemoryWorkspaceStore, WorkspaceStore};

/// The assistant engine: one instance per running app
pub struct AssistantService {
    api: Arc<ApiClient>,
    store: Arc<InMemoryWorkspaceStore>,
    auth: AuthManager,
    workspace: WorkspaceHandler,
    chat: ChatController,
}

impl AssistantService {
    /// Create a service using the resolved server configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(ServerConfig::load())
    }

    /// Create a service against a specific backend
    pub fn with_config(config: ServerConfig) -> anyhow::Result<Self> {
        let api = Arc::new(ApiClient::new(&config.base_url)?);
        let store = Arc::new(InMemoryWorkspaceStore::new());
        let auth = AuthManager::new(api.clone())?;

        info!("assistant service targeting {}", config.base_url);
        Ok(Self::assemble(api, store, auth))
    }

    fn assemble(api: Arc<ApiClient>, store: Arc<InMemoryWorkspaceStore>, auth: AuthManager) -> Self {
        let workspace = WorkspaceHandler::new(api.clone(), store.clone());
        let chat = ChatController::new(api.clone(), store.clone());

        // A 401 anywhere drops the previous user's workspace data;
        // the auth manager's own hook handles user and token.
        let hook_store = store.clone();
        api.on_unauthorized(move || {
            if let Err(err) = hook_store.clear() {
                warn!("failed to clear workspace store: {}", err);
            }
        });

        Self {
            api,
            store,
            auth,
            workspace,
            chat,
        }
    }

    // === Component access ===

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn workspace(&self) -> &WorkspaceHandler {
        &self.workspace
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatController {
        &mut self.chat
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // === Lifecycle ===

    /// Resolve the startup auth state and, when a session is restored,
    /// load the workspace.
    pub fn start(&mut self) -> Result<Option<LoadStats>> {
        if !self.auth.resume() {
            return Ok(None);
        }
        match self.workspace.load_all() {
            Ok(stats) => Ok(Some(stats)),
            Err(err) => Err(self.intercept(err)),
        }
    }

    /// Log in and load the workspace
    pub fn login(&mut self, email: &str, password: &str) -> Result<LoadStats> {
        self.auth.login(email, password)?;
        self.refresh()
    }

    /// Log out and drop all local workspace and chat state.
    ///
    /// In-memory state is cleared even when removing the token file
    /// fails, so nothing of the previous user survives in the engine.
    pub fn logout(&mut self) -> Result<()> {
        self.chat.reset();
        if let Err(err) = self.store.clear() {
            warn!("failed to clear workspace store: {}", err);
        }
        self.auth.logout()
    }

    /// Re-fetch the whole workspace from the backend
    pub fn refresh(&mut self) -> Result<LoadStats> {
        match self.workspace.load_all() {
            Ok(stats) => Ok(stats),
            Err(err) => Err(self.intercept(err)),
        }
    }

    /// The current sidebar view
    pub fn tree(&self) -> Result<NavigationTree> {
        navigation_tree(self.store.as_ref())
    }

    /// Route an authorization failure through the global logout.
    ///
    /// The unauthorized hooks already dropped the user, token, and
    /// store contents; this completes the teardown for state the
    /// hooks cannot reach and stays idempotent for direct callers.
    fn intercept(&mut self, err: Error) -> Error {
        if err.is_unauthorized() {
            self.auth.force_logout();
            if let Err(store_err) = self.store.clear() {
                warn!("failed to clear workspace store: {}", store_err);
            }
            self.chat.reset();
        }
        err
    }
}
