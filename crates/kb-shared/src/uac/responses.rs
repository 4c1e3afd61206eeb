use secrecy::SecretString;

use super::UserIdentity;

/// Body returned by a successful login. Everything besides the tokens is
/// the identity.
#[derive(Debug, serde::Deserialize)]
pub struct LoginResponse {
    pub token: SecretString,
    #[serde(default)]
    pub refresh: Option<SecretString>,
    #[serde(flatten)]
    pub identity: UserIdentity,
}

impl LoginResponse {
    /// Splits the response into the identity to keep and the bearer token
    pub fn into_parts(self) -> (UserIdentity, SecretString) {
        (self.identity, self.token)
    }
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct VerifyTokenResponse {
    pub status: String,
}

impl VerifyTokenResponse {
    pub fn is_valid(&self) -> bool {
        self.status == "valid"
    }
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret as _;

    #[test]
    fn login_response_splits_token_from_identity() {
        let body = r#"{"id": 4, "account": "farmer1", "role": "user", "token": "abc", "refresh": "def"}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();

        let (identity, token) = response.into_parts();

        assert_eq!(token.expose_secret(), "abc");
        assert_eq!(identity.account(), Some("farmer1"));
        assert_eq!(identity.role(), Some("user"));
        assert_eq!(identity.get("id").unwrap(), 4);
        let serialized = serde_json::to_string(&identity).unwrap();
        assert!(!serialized.contains("abc"), "{serialized}");
        assert!(!serialized.contains("def"), "{serialized}");
    }
}
