//! Role predicates that run before the resource access layer.
//!
//! Each policy only reads the account from the context. A missing account is
//! always `NotAuthenticated`; a present account of the wrong type is
//! `NotAuthorized`.

use std::future::Future;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::services::auth::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Authenticated,
    Provider,
    Patient,
}

impl Policy {
    #[track_caller]
    pub fn check(&self, ctx: &RequestContext) -> Result<Arc<Account>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        match self {
            Policy::Authenticated => Ok(account),
            Policy::Provider if account.is_provider() => Ok(account),
            Policy::Provider => Err(Error::not_authorized(ctx, "provider-only")),
            Policy::Patient if account.is_patient() => Ok(account),
            Policy::Patient => Err(Error::not_authorized(ctx, "patient-only")),
        }
    }

    /// Run `f` with the account once the policy passes
    pub async fn run<T, F, Fut>(&self, ctx: &RequestContext, f: F) -> Result<T>
    where
        F: FnOnce(Arc<Account>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let account = self.check(ctx)?;
        f(account).await
    }
}

pub async fn authenticated<T, F, Fut>(ctx: &RequestContext, f: F) -> Result<T>
where
    F: FnOnce(Arc<Account>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    Policy::Authenticated.run(ctx, f).await
}

pub async fn provider<T, F, Fut>(ctx: &RequestContext, f: F) -> Result<T>
where
    F: FnOnce(Arc<Account>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    Policy::Provider.run(ctx, f).await
}

pub async fn patient<T, F, Fut>(ctx: &RequestContext, f: F) -> Result<T>
where
    F: FnOnce(Arc<Account>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    Policy::Patient.run(ctx, f).await
}
