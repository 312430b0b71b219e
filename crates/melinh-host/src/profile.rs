//! User profile as provided by the host.

use serde::{Deserialize, Serialize};

/// Avatar rendering kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarKind {
    Normal,
    Placeholder,
}

/// Identity of the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar image reference
    pub avatar: String,
    pub avatar_type: AvatarKind,
}

/// Fixed profile used when no host identity is available.
pub fn mock_profile() -> UserProfile {
    UserProfile {
        id: "web-user-123".to_string(),
        name: "Web User".to_string(),
        avatar: "https://via.placeholder.com/100x100/4F46E5/FFFFFF?text=U".to_string(),
        avatar_type: AvatarKind::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_profile_is_fixed() {
        assert_eq!(mock_profile(), mock_profile());
        assert_eq!(mock_profile().id, "web-user-123");
    }

    #[test]
    fn test_profile_json_shape() {
        let json = serde_json::to_string(&mock_profile()).unwrap();
        assert!(json.contains("\"avatarType\":\"normal\""));
    }
}
