//! Runtime permission port and the classification of a request's answer.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    FineLocation,
    CoarseLocation,
    BackgroundLocation,
    Other(String),
}

impl Permission {
    /// Location access whose denial blocks GPS-backed fetching.
    pub fn is_pivotal(&self) -> bool {
        matches!(self, Permission::FineLocation | Permission::CoarseLocation)
    }
}

/// Answer for one requested permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub granted: bool,
}

impl PermissionGrant {
    pub fn new(permission: Permission, granted: bool) -> Self {
        Self {
            permission,
            granted,
        }
    }
}

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    /// Fine or coarse location refused
    DeniedPivotal,
    /// Only non-location permissions refused
    DeniedNonPivotal,
}

impl PermissionOutcome {
    /// A refused pivotal permission wins over everything else.
    /// An empty answer (dismissed prompt) counts as granted.
    pub fn classify(grants: &[PermissionGrant]) -> Self {
        if grants.iter().any(|g| !g.granted && g.permission.is_pivotal()) {
            PermissionOutcome::DeniedPivotal
        } else if grants.iter().any(|g| !g.granted) {
            PermissionOutcome::DeniedNonPivotal
        } else {
            PermissionOutcome::Granted
        }
    }
}

/// Platform permission API.
#[async_trait]
pub trait PermissionPlatform: Send + Sync {
    /// Whether permissions must be granted at runtime on this platform.
    fn requires_runtime_grant(&self) -> bool;

    fn check_permission_granted(&self, permission: &Permission) -> bool;

    /// Prompt for the given permissions and wait for the answers.
    async fn request_permissions(&self, permissions: &[Permission]) -> Vec<PermissionGrant>;

    /// The subset of `required` not granted yet.
    fn missing_permissions(&self, required: Vec<Permission>) -> Vec<Permission> {
        required
            .into_iter()
            .filter(|p| !self.check_permission_granted(p))
            .collect()
    }
}
