use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks and actions)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;

    // Actions are cloned when one request targets several entities.
    type Action: Clone + Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID, its creation sequence and the payload.
    ///
    /// `sequence` starts at 1 and grows by one for every successful create.
    fn from_create(id: Self::Id, sequence: u64, payload: Self::CreatePayload) -> Result<Self, String>;

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Row filter evaluated inside the actor.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Option<Predicate<T>>,
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    /// Applies one action to every listed entity, or to none of them.
    ActionMany {
        ids: Vec<T::Id>,
        action: T::Action,
        respond_to: Response<Vec<T::ActionResult>>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    sequence: u64,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
            sequence: 0,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self))]
    pub async fn run(mut self) {
        info!(entity = std::any::type_name::<T>(), "ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self
                        .store
                        .values()
                        .filter(|item| filter.as_ref().map_or(true, |keep| keep(*item)))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::ActionMany { ids, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action_many(ids, action));
                }
            }
        }

        info!("ResourceActor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item =
            T::from_create(id.clone(), self.sequence + 1, payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;

        self.sequence += 1;
        self.store.insert(id.clone(), item);
        debug!(%id, sequence = self.sequence, "Entity created");
        Ok(id)
    }

    /// Stages the action on clones so a failure part-way leaves the store untouched.
    fn handle_action_many(
        &mut self,
        ids: Vec<T::Id>,
        action: T::Action,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        let mut staged = Vec::with_capacity(ids.len());
        for id in &ids {
            let Some(current) = self.store.get(id) else {
                warn!(%id, "Batch rejected: unknown id");
                return Err(FrameworkError::NotFound(id.to_string()));
            };
            let mut item = current.clone();
            let result = item
                .handle_action(action.clone())
                .map_err(FrameworkError::Rejected)?;
            staged.push((item, result));
        }

        let mut results = Vec::with_capacity(staged.len());
        for (item, result) in staged {
            self.store.insert(item.id().clone(), item);
            results.push(result);
        }
        Ok(results)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` on the message type too.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self, filter: Option<Predicate<T>>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn perform_action_many(
        &self,
        ids: Vec<T::Id>,
        action: T::Action,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::ActionMany { ids, action, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
