//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_list`] or [`expect_action_many`] to assert behavior.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, Predicate, ResourceClient, ResourceRequest};

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it reads requests off `receiver` and answers
/// through their responders, so success, failure and ordering are scripted.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Responder<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<Predicate<T>>, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an ActionMany request
pub async fn expect_action_many<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Vec<T::Id>, T::Action, Responder<Vec<T::ActionResult>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::ActionMany { ids, action, respond_to }) => Some((ids, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, Order, OrderCreate};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Order>(10);

        let create_task = tokio::spawn(async move {
            let order = OrderCreate {
                customer_name: "Test".to_string(),
                phone: "0500000000".to_string(),
                city: "Riyadh".to_string(),
                items: vec![LineItem::new("x", 1, 2.0)],
            };
            client.create(order).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.customer_name, "Test");
        let id = Uuid::new_v4();
        responder.send(Ok(id)).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(id));
    }

    #[tokio::test]
    async fn test_expect_helpers_reject_other_requests() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let task = tokio::spawn(async move { client.get(Uuid::new_v4()).await });

        assert!(expect_list(&mut receiver).await.is_none());
        assert_eq!(task.await.unwrap(), Err(FrameworkError::ActorDropped));
    }
}
