use crate::services::PermissionOutcome;
use nimbus_core::PermissionError;

impl PermissionOutcome {
    /// The error to report for this outcome, if any.
    pub fn into_error(self) -> Option<PermissionError> {
        match self {
            PermissionOutcome::DeniedPivotal => Some(PermissionError::LocationDenied),
            PermissionOutcome::Granted | PermissionOutcome::DeniedNonPivotal => None,
        }
    }
}
