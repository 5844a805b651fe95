use crate::domain::StatusUpdate;

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Writes a new status together with its completion stamp.
    ///
    /// The resulting order is returned so callers never have to re-read it.
    SetStatus(StatusUpdate),
}
