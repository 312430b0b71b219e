//! Admin page access control.
//!
//! Authentication happens outside this crate; the admin page only asks a
//! policy whether the current caller may enter.

use std::collections::HashSet;

use melinh_host::UserProfile;

/// Capability check consumed at page entry.
pub trait AccessPolicy: Send + Sync {
    fn is_permitted(&self, caller: &UserProfile) -> bool;
}

/// Permit callers whose profile id is on the list.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessPolicy for AllowList {
    fn is_permitted(&self, caller: &UserProfile) -> bool {
        self.ids.contains(&caller.id)
    }
}

/// Permit nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn is_permitted(&self, _caller: &UserProfile) -> bool {
        false
    }
}
