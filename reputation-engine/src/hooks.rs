//! Interfaces the engine consumes from the surrounding application.
use async_trait::async_trait;
use reputation_shared::types::UserId;
use tracing::debug;

/// Resolves the account on whose behalf the current request runs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the request carries no authenticated caller.
    async fn current_caller(&self) -> Option<UserId>;
}

/// Identity provider that always answers with the same caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    pub fn new(user: UserId) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_caller(&self) -> Option<UserId> {
        self.0
    }
}

/// Invalidates a rendered page after a committed change.
///
/// Advisory only: implementations must not fail and the engine never waits on
/// the page being rebuilt.
pub trait RevalidateHook: Send + Sync {
    fn revalidate(&self, path: &str);
}

/// Logs every revalidation request.
pub struct TracingRevalidator;

impl RevalidateHook for TracingRevalidator {
    fn revalidate(&self, path: &str) {
        debug!(path, "Revalidating page");
    }
}
