//! Session store: the authentication token and basic identity, mirrored to
//! local storage under independent keys.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::clients::SessionClient;
use crate::domain::{Session, UserType};
use crate::error::SessionError;
use crate::messages::{ServiceResponse, SessionRequest};
use crate::storage::{LocalStorage, StorageError, TOKEN_KEY, USERNAME_KEY, USER_TYPE_KEY};

pub struct SessionService {
    receiver: mpsc::Receiver<SessionRequest>,
    session: Option<Session>,
    storage: Arc<dyn LocalStorage>,
}

impl SessionService {
    pub fn new(buffer_size: usize, storage: Arc<dyn LocalStorage>) -> (Self, SessionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            session: None,
            storage,
        };
        let client = SessionClient::new(sender);
        (service, client)
    }

    #[instrument(name = "session_service", skip(self))]
    pub async fn run(mut self) {
        info!("SessionService starting");

        match self.load().await {
            Ok(Some(session)) => {
                info!(username = %session.username, user_type = session.user_type.as_str(), "Restored session");
                self.session = Some(session);
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!(error = %e, "Failed to read persisted session"),
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionRequest::Current { respond_to } => {
                    let _ = respond_to.send(Ok(self.session.clone()));
                }
                SessionRequest::Start {
                    session,
                    respond_to,
                } => {
                    self.handle_start(session, respond_to).await;
                }
                SessionRequest::Clear { respond_to } => {
                    self.handle_clear(respond_to).await;
                }
                SessionRequest::Shutdown => {
                    info!("SessionService shutting down");
                    break;
                }
            }
        }

        info!("SessionService stopped");
    }

    /// A session is only restored when all three keys are present.
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        let token = self.storage.get_item(TOKEN_KEY).await?;
        let username = self.storage.get_item(USERNAME_KEY).await?;
        let user_type = self.storage.get_item(USER_TYPE_KEY).await?;

        Ok(match (token, username, user_type) {
            (Some(token), Some(username), Some(user_type)) if !token.is_empty() => {
                Some(Session::new(token, username, UserType::parse(&user_type)))
            }
            _ => None,
        })
    }

    #[instrument(fields(username = %session.username), skip(self, session, respond_to))]
    async fn handle_start(&mut self, session: Session, respond_to: ServiceResponse<(), SessionError>) {
        debug!("Processing start request");

        // A failed write only costs the restore on next start.
        if let Err(e) = self.persist(&session).await {
            warn!(error = %e, "Failed to persist session");
        }
        info!(user_type = session.user_type.as_str(), "Session started");
        self.session = Some(session);

        let _ = respond_to.send(Ok(()));
    }

    async fn persist(&self, session: &Session) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, session.token.clone()).await?;
        self.storage
            .set_item(USERNAME_KEY, session.username.clone())
            .await?;
        self.storage
            .set_item(USER_TYPE_KEY, session.user_type.as_str().to_string())
            .await
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_clear(&mut self, respond_to: ServiceResponse<(), SessionError>) {
        debug!("Processing clear request");

        self.session = None;
        for key in [TOKEN_KEY, USERNAME_KEY, USER_TYPE_KEY] {
            if let Err(e) = self.storage.remove_item(key).await {
                warn!(key, error = %e, "Failed to remove session key");
            }
        }
        info!("Session cleared");

        let _ = respond_to.send(Ok(()));
    }
}
