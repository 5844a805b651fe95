use thiserror::Error;

use crate::domain::OrderId;
use crate::order_actor::OrderError;

/// Shown when the store gives no usable reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "حدث خطأ غير متوقع، يرجى المحاولة مرة أخرى";

/// Errors surfaced by the admin order desk.
///
/// None of these are fatal: the caller alerts the admin and local state is
/// left as it was before the attempt.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeskError {
    #[error("no orders selected")]
    NoOrdersSelected,
    #[error("no pending messages")]
    NoPendingMessages,
    #[error("order {0} is not in the current list")]
    UnknownOrder(OrderId),
    #[error("another status change is still in flight")]
    Busy,
    #[error(transparent)]
    Store(#[from] OrderError),
    #[error("notification failed: {0}")]
    Notify(String),
}

impl DeskError {
    /// Arabic text for the blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            DeskError::NoOrdersSelected => "لم يتم تحديد أي طلبات".to_string(),
            DeskError::NoPendingMessages => "لا توجد رسائل معلقة".to_string(),
            DeskError::UnknownOrder(_) => "الطلب غير موجود في القائمة الحالية".to_string(),
            DeskError::Busy => "يرجى الانتظار حتى اكتمال العملية الحالية".to_string(),
            DeskError::Store(err) => store_reason(err)
                .filter(|reason| !reason.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            DeskError::Notify(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

fn store_reason(err: &OrderError) -> Option<&str> {
    match err {
        OrderError::NotFound(_) | OrderError::ActorCommunicationError(_) => None,
        OrderError::ValidationError(reason) | OrderError::Rejected(reason) => Some(reason.as_str()),
    }
}
