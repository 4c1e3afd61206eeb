use std::fmt::Display;

use crate::{errors::ConversionError, id::UserId};

use super::Role;

/// Login name of an account, constrained to what the server accepts
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Account(String);

impl Account {
    pub const MAX_LENGTH: usize = 9;
}

impl TryFrom<String> for Account {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        let actual = value.chars().count();
        if actual > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual,
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Account {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Account> for String {
    fn from(value: Account) -> Self {
        value.0
    }
}

impl AsRef<str> for Account {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the logged in user as handed out by the server.
///
/// The server owns the shape of this record. Only `role` is interpreted on
/// the client, every attribute is kept as raw JSON so anything that was
/// stored can be read back.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct UserIdentity(serde_json::Map<String, serde_json::Value>);

impl UserIdentity {
    pub fn with_role<S: Into<String>>(role: S) -> Self {
        let mut result = Self::default();
        result.insert("role", role.into());
        result
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<serde_json::Value>
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.0.insert(key.into(), value.into())
    }

    /// `None` if absent or not a string
    pub fn role(&self) -> Option<&str> {
        self.get_str("role")
    }

    /// `None` if absent or not a string
    pub fn account(&self) -> Option<&str> {
        self.get_str("account")
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|role| Role::Admin.matches(role))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Account as listed on the user management screens
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub account: String,
    pub role: String,
    /// Kept as the server formatted it
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserIdentity::with_role("admin"), true)]
    #[case(UserIdentity::with_role("user"), false)]
    #[case(UserIdentity::with_role("ADMIN"), false)]
    #[case(UserIdentity::default(), false)]
    #[case(serde_json::from_str(r#"{"role": 1}"#).unwrap(), false)]
    fn is_admin(#[case] identity: UserIdentity, #[case] expected: bool) {
        assert_eq!(identity.is_admin(), expected);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = r#"{"id":"u-1","account":"a1","role":"admin","nickname":"boss","prefs":{"dark":true}}"#;
        let identity: UserIdentity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.get("nickname").unwrap(), "boss");
        assert_eq!(identity.get("id").unwrap(), "u-1");
        assert_eq!(identity.account(), Some("a1"));
        assert!(identity.is_admin());

        let again: UserIdentity =
            serde_json::from_str(&serde_json::to_string(&identity).unwrap()).unwrap();
        assert_eq!(again, identity);
    }

    #[test]
    fn account_length_limit() {
        assert_eq!(Account::try_from(""), Err(ConversionError::Empty));
        assert_eq!(
            Account::try_from("1234567890"),
            Err(ConversionError::MaxExceeded { max: 9, actual: 10 })
        );
        assert!(Account::try_from("123456789").is_ok());
    }

    #[test]
    fn user_record_defaults_when_fields_missing() {
        let record: UserRecord =
            serde_json::from_str(r#"{"id": 2, "account": "bob", "role": "user"}"#).unwrap();
        assert!(record.is_active);
        assert_eq!(record.created_time, None);
    }
}
