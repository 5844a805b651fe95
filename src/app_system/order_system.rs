use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use super::config::DeskConfig;
use crate::actor_framework::ResourceActor;
use crate::clients::OrderClient;
use crate::desk::{DeskError, OrdersDesk};
use crate::domain::Order;

/// The main application system that owns the order store actor.
///
/// Responsible for starting the actor, handing out clients, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    config: DeskConfig,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new(config: DeskConfig) -> Self {
        info!(buffer = config.actor_buffer, "Starting order system");

        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(config.actor_buffer, Uuid::new_v4);
        let order_client = OrderClient::new(order_resource_client);
        let order_handle = tokio::spawn(order_actor.run());

        Self {
            order_client,
            config,
            handles: vec![order_handle],
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Opens an admin orders screen over this system's store.
    pub async fn open_desk(&self) -> Result<OrdersDesk<OrderClient>, DeskError> {
        OrdersDesk::load(Arc::new(self.order_client.clone()), self.config.page_size).await
    }

    /// Closes the store channel and waits for the actor to drain.
    ///
    /// Every `OrderClient` clone (including those held by open desks) must be
    /// dropped first, otherwise the actor keeps running.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
