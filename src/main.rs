mod actor_framework;
mod app_system;
mod clients;
mod desk;
mod domain;
mod order_actor;

#[cfg(test)]
mod mock_framework;

use tracing::{error, info, warn, Instrument};

use crate::app_system::{setup_tracing, DeskConfig, OrderSystem};
use crate::desk::notify::{LogOpener, WhatsAppLinkSender};
use crate::desk::pipeline::SortKey;
use crate::domain::{LineItem, OrderCreate, OrderStatus, StatusFilter};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = DeskConfig::from_env().map_err(|e| e.to_string())?;
    info!(page_size = config.page_size, "Starting order desk");

    let system = OrderSystem::new(config);

    // Storefront side: a few checkouts land in the store
    let checkouts = [
        ("أحمد علي", "0501112233", "الرياض", vec![LineItem::new("عطر عود", 1, 250.0)]),
        ("منى سالم", "0559998877", "جدة", vec![LineItem::new("بخور", 3, 40.0)]),
        ("سارة خالد", "0501110000", "الدمام", vec![LineItem::new("مسك", 2, 75.0), LineItem::new("علبة هدية", 1, 15.0)]),
    ];
    let span = tracing::info_span!("checkout");
    async {
        for (name, phone, city, items) in checkouts {
            let order = OrderCreate {
                customer_name: name.to_string(),
                phone: phone.to_string(),
                city: city.to_string(),
                items,
            };
            system.order_client.create_order(order).await.map_err(|e| e.to_string())?;
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Admin side
    let mut desk = system.open_desk().await.map_err(|e| e.user_message())?;
    desk.toggle_sort(SortKey::Total);
    for order in desk.view().rows {
        info!(number = %order.order_number, customer = %order.customer_name, total = order.total, status = order.status.label(), badge = order.status.color(), "Order");
    }

    desk.toggle_all_visible();
    let confirmed = desk.change_status_selected(OrderStatus::Confirmed).await;
    match confirmed {
        Ok(updated) if desk.is_stale() => warn!(updated, "Confirmed visible orders; list not reloaded"),
        Ok(updated) => info!(updated, "Confirmed visible orders"),
        Err(e) => {
            error!(error = %e, alert = %e.user_message(), "Bulk confirm failed");
            desk.clear_selection();
        }
    }

    desk.set_search("جدة");
    let target = desk.view().rows.first().map(|order| order.id);
    if let Some(id) = target {
        if let Err(e) = desk.change_status(id, OrderStatus::Delivered).await {
            error!(error = %e, alert = %e.user_message(), "Delivery update failed");
        }
        if let Ok(Some(order)) = system.order_client.get_order(id).await {
            info!(number = %order.order_number, completed_at = ?order.completed_at, "Delivery recorded");
        }
        desk.queue_notification(id).map_err(|e| e.user_message())?;
    }

    desk.set_search("");
    desk.set_status_filter(StatusFilter::Only(OrderStatus::Confirmed))
        .await
        .map_err(|e| e.user_message())?;
    for (status, count) in desk.counts().iter() {
        info!(status = status.label(), count, "Status count");
    }
    info!(filter = desk.status_filter().label(), rows = desk.view().total_matches, "Filtered view");

    let mut sender = WhatsAppLinkSender::new(system.config().whatsapp_base.clone(), LogOpener);
    while desk.notifications().pending() > 0 {
        if let Err(e) = desk.send_next_notification(&mut sender) {
            error!(error = %e, "Notification failed");
            break;
        }
    }

    // Shutdown system gracefully
    drop(desk);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
