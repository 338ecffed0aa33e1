use serde::{Deserialize, Serialize};

use crate::auth::repo_types::Credential;

/// The identity claims carried by every access token: exactly the username,
/// the role name and the user id rendered as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(rename = "unique_name")]
    pub name: String,
    pub role: String,
    #[serde(rename = "Id")]
    pub id: String,
}

impl ClaimSet {
    /// Derives the claim set from a credential row. The row type always
    /// carries the role name (every store query joins it), so the eager-load
    /// precondition holds by construction.
    pub fn for_credential(credential: &Credential) -> Self {
        Self {
            name: credential.username.clone(),
            role: credential.role_name.clone(),
            id: credential.id.to_string(),
        }
    }
}

/// Full JWT payload: registered claims plus the flattened identity claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    pub nbf: usize,
    pub exp: usize,
    #[serde(flatten)]
    pub identity: ClaimSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_set_carries_name_role_and_stringified_id() {
        let credential = Credential {
            id: 7,
            username: "alice".into(),
            password: "secret12".into(),
            role_name: "Admin".into(),
            is_active: true,
            refresh_token: None,
            refresh_token_expiration: None,
        };
        let claims = ClaimSet::for_credential(&credential);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.id, "7");
    }

    #[test]
    fn wire_names_match_the_token_payload() {
        let claims = ClaimSet {
            name: "bob".into(),
            role: "User".into(),
            id: "12".into(),
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["unique_name"], "bob");
        assert_eq!(json["role"], "User");
        assert_eq!(json["Id"], "12");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
