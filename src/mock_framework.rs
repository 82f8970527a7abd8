//! # Mock Framework
//!
//! Utilities for testing orchestrating clients without running the services.
//!
//! [`create_mock_cart_client`] and [`create_mock_session_client`] return a
//! client plus the receiving end of its mailbox. Helpers such as
//! [`expect_lines`] or [`expect_update_stock`] pull the next request off that
//! mailbox, assert its kind, and hand back the payload and responder so the
//! test decides what the "service" answers.

use tokio::sync::mpsc;

use crate::clients::{CartClient, SessionClient};
use crate::domain::{CartLine, ProductId, Session};
use crate::error::{CartError, SessionError};
use crate::messages::{CartRequest, ServiceResponse, SessionRequest};

pub fn create_mock_cart_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

pub fn create_mock_session_client(
    buffer_size: usize,
) -> (SessionClient, mpsc::Receiver<SessionRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (SessionClient::new(sender), receiver)
}

/// A session client whose service answers every `Current` with `session`.
pub fn logged_in_session(session: Session) -> SessionClient {
    let (client, mut receiver) = create_mock_session_client(10);
    tokio::spawn(async move {
        while let Some(request) = receiver.recv().await {
            match request {
                SessionRequest::Current { respond_to } => {
                    let _ = respond_to.send(Ok(Some(session.clone())));
                }
                SessionRequest::Start { respond_to, .. } | SessionRequest::Clear { respond_to } => {
                    let _ = respond_to.send(Ok(()));
                }
                SessionRequest::Shutdown => break,
            }
        }
    });
    client
}

/// Helper to verify that the next message is a Lines request
pub async fn expect_lines(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<ServiceResponse<Vec<CartLine>, CartError>> {
    match receiver.recv().await {
        Some(CartRequest::Lines { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a RemoveItem request
pub async fn expect_remove_item(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(ProductId, ServiceResponse<(), CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::RemoveItem {
            product_id,
            respond_to,
        }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateStock request.
/// Yields `(product_id, quantity, snapshot, responder)`.
pub async fn expect_update_stock(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(ProductId, u32, CartLine, ServiceResponse<(), CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::UpdateStock {
            product_id,
            quantity,
            snapshot,
            respond_to,
            ..
        }) => Some((product_id, quantity, snapshot, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Current request
pub async fn expect_current(
    receiver: &mut mpsc::Receiver<SessionRequest>,
) -> Option<ServiceResponse<Option<Session>, SessionError>> {
    match receiver.recv().await {
        Some(SessionRequest::Current { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[tokio::test]
    async fn test_mock_cart_client() {
        let (client, mut receiver) = create_mock_cart_client(10);

        let lines_task = tokio::spawn(async move { client.lines().await });

        let responder = expect_lines(&mut receiver).await.expect("Expected Lines request");
        let line = CartLine::from_product(&Product::new(1, "Pen", "2.50".parse().unwrap(), 4), 2)
            .expect("product has an id");
        responder.send(Ok(vec![line.clone()])).unwrap();

        let result = lines_task.await.unwrap().unwrap();
        assert_eq!(result, vec![line]);
    }

    #[tokio::test]
    async fn dropped_responder_surfaces_as_communication_error() {
        let (client, mut receiver) = create_mock_session_client(10);

        let task = tokio::spawn(async move { client.current().await });

        let responder = expect_current(&mut receiver).await.expect("Expected Current request");
        drop(responder);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(SessionError::ActorCommunicationError(_))));
    }
}
