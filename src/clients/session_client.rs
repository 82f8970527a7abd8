use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::Session;
use crate::error::SessionError;
use crate::messages::SessionRequest;

/// Handle to the [`SessionService`](crate::session_actor::SessionService) mailbox.
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<SessionRequest>,
}

impl SessionClient {
    pub fn new(sender: mpsc::Sender<SessionRequest>) -> Self {
        Self { sender }
    }

    /// The current session, or [`SessionError::NotLoggedIn`].
    pub async fn require(&self) -> Result<Session, SessionError> {
        self.current().await?.ok_or(SessionError::NotLoggedIn)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        debug!("Sending shutdown request");
        self.sender
            .send(SessionRequest::Shutdown)
            .await
            .map_err(|e| SessionError::ActorCommunicationError(e.to_string()))?;
        Ok(())
    }
}

client_method!(SessionClient => fn current() -> Option<Session> as SessionRequest::Current, Error = SessionError);
client_method!(SessionClient => fn start(session: Session) -> () as SessionRequest::Start, Error = SessionError);
client_method!(SessionClient => fn clear() -> () as SessionRequest::Clear, Error = SessionError);
