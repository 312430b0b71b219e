//! Host capability bridge.
//!
//! The bridge is resolved once at startup from the global scope. Every call
//! through it supplies a typed fallback, so callers never see host failures.

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;

use crate::environment::{is_embedded_host, GlobalScope, HostEnvironment};
use crate::profile::{mock_profile, UserProfile};

/// Host call errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Host capability unavailable")]
    Unavailable,

    #[error("Host call failed: {0}")]
    CallFailed(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Whether host-specific capabilities can be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBridge {
    Present,
    Absent,
}

impl HostBridge {
    /// Resolve the capability from the global scope.
    pub fn resolve(scope: Option<&GlobalScope>) -> Self {
        if is_embedded_host(scope) {
            HostBridge::Present
        } else {
            HostBridge::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HostBridge::Present)
    }

    pub fn environment(&self) -> HostEnvironment {
        match self {
            HostBridge::Present => HostEnvironment::Embedded,
            HostBridge::Absent => HostEnvironment::Web,
        }
    }

    /// Invoke a host function, substituting `fallback` when the host is
    /// absent or the call fails.
    pub async fn guarded_call<T, E, F, Fut>(&self, host_fn: F, fallback: T) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.is_present() {
            tracing::debug!(reason = %HostError::Unavailable, "Using fallback");
            return fallback;
        }

        match host_fn().await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Host call failed, using fallback");
                fallback
            }
        }
    }

    /// Fetch the user profile from the host, or the mock profile.
    pub async fn user_profile<F, Fut>(&self, fetch: F) -> UserProfile
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HostResult<UserProfile>>,
    {
        self.guarded_call(fetch, mock_profile()).await
    }
}

/// Resolve the bridge from `scope` and make a single guarded call.
pub async fn guarded_call<T, E, F, Fut>(scope: Option<&GlobalScope>, host_fn: F, fallback: T) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    HostBridge::resolve(scope).guarded_call(host_fn, fallback).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::HOST_MARKER;
    use crate::profile::AvatarKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn embedded_scope() -> GlobalScope {
        GlobalScope::from_vars([(HOST_MARKER, json!("app-1"))])
    }

    #[tokio::test]
    async fn test_absent_host_skips_call() {
        let flag = AtomicBool::new(false);
        let called = &flag;
        let scope = GlobalScope::new();

        let result = guarded_call(
            Some(&scope),
            move || async move {
                called.store(true, Ordering::SeqCst);
                Ok::<_, HostError>(42)
            },
            7,
        )
        .await;

        assert_eq!(result, 7);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_present_host_returns_result() {
        let scope = embedded_scope();
        let result = guarded_call(Some(&scope), || async { Ok::<_, HostError>(42) }, 7).await;
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_failed_call_returns_fallback() {
        let bridge = HostBridge::resolve(Some(&embedded_scope()));
        let result = bridge
            .guarded_call(
                || async { Err::<i32, _>(HostError::CallFailed("sdk timeout".into())) },
                7,
            )
            .await;
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn test_user_profile_falls_back_to_mock() {
        let bridge = HostBridge::resolve(None);
        let profile = bridge
            .user_profile(|| async {
                Ok(UserProfile {
                    id: "host-user".into(),
                    name: "Host".into(),
                    avatar: String::new(),
                    avatar_type: AvatarKind::Normal,
                })
            })
            .await;
        assert_eq!(profile, mock_profile());
    }

    #[test]
    fn test_unavailable_message() {
        assert_eq!(HostError::Unavailable.to_string(), "Host capability unavailable");
    }

    #[test]
    fn test_resolve() {
        assert!(HostBridge::resolve(Some(&embedded_scope())).is_present());
        assert_eq!(HostBridge::resolve(None), HostBridge::Absent);
        assert_eq!(HostBridge::Absent.environment(), HostEnvironment::Web);
    }
}
