/// Roles known to the server. The stored identity keeps the role as the raw
/// string the server sent so unknown roles survive a round trip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Exact match only, no case folding or trimming
    pub fn matches(&self, raw: &str) -> bool {
        self.as_ref() == raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[rstest]
    #[case("admin", true)]
    #[case("Admin", false)]
    #[case(" admin", false)]
    #[case("user", false)]
    #[case("", false)]
    fn admin_match_is_exact(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(Role::Admin.matches(raw), expected);
    }

    #[test]
    fn string_forms_agree_with_serde() {
        for role in Role::iter() {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
            assert_eq!(Role::from_str(role.as_ref()).unwrap(), role);
        }
    }
}
