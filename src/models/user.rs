use serde::{Deserialize, Serialize};

use super::amount_from_json;

/// Account profile as returned by `/auth/me`. The server is authoritative;
/// this is the client's cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[serde(deserialize_with = "amount_from_json")]
    pub budget: f64,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Merge the present fields of a patch into this profile
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(firstname) = patch.firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = patch.lastname {
            self.lastname = lastname;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
    }
}

/// Request body for `PUT /auth/me`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
}

/// Partial profile change merged into the cached user
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub budget: Option<f64>,
}

impl UserPatch {
    pub fn budget(budget: f64) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_with_string_budget() {
        let json = r#"{"id":3,"firstname":"Ada","lastname":"Lovelace","username":"ada_l","email":"ada@example.com","budget":"1500.00"}"#;
        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse profile");
        assert_eq!(user.budget, 1500.0);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_parse_profile_with_numeric_budget() {
        let json = r#"{"id":3,"firstname":"Ada","lastname":"Lovelace","username":"ada_l","email":"ada@example.com","budget":250.5}"#;
        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse profile");
        assert_eq!(user.budget, 250.5);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut user = UserProfile {
            id: 3,
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            email: "ada@example.com".to_string(),
            budget: 1500.0,
        };

        user.apply(UserPatch::budget(900.0));
        assert_eq!(user.budget, 900.0);
        assert_eq!(user.username, "ada_l");

        user.apply(UserPatch {
            firstname: Some("Augusta".to_string()),
            ..UserPatch::default()
        });
        assert_eq!(user.firstname, "Augusta");
        assert_eq!(user.budget, 900.0);
    }
}
