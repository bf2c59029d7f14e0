//! Shared-password check for the two roles
//!
//! There are no user accounts: each role has one configured password and a
//! login succeeds when the submitted string is exactly equal to it.

use crate::config::AuthConfig;
use crate::models::Role;

#[derive(Clone)]
pub struct CredentialChecker {
    student_password: String,
    admin_password: String,
}

impl CredentialChecker {
    pub fn new(student_password: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            student_password: student_password.into(),
            admin_password: admin_password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.student_password.clone(), config.admin_password.clone())
    }

    /// True iff `candidate` equals the configured password for `role`.
    ///
    /// An unconfigured (empty) password never matches, not even "".
    pub fn check_password(&self, candidate: &str, role: Role) -> bool {
        let expected = match role {
            Role::Student => &self.student_password,
            Role::Admin => &self.admin_password,
        };
        !expected.is_empty() && candidate == expected
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn matches_iff_equal_to_role_secret(
            student in "[a-zA-Z0-9]{1,16}",
            admin in "[a-zA-Z0-9]{1,16}",
            candidate in ".{0,16}",
        ) {
            let checker = CredentialChecker::new(student.clone(), admin.clone());
            prop_assert_eq!(checker.check_password(&candidate, Role::Student), candidate == student);
            prop_assert_eq!(checker.check_password(&candidate, Role::Admin), candidate == admin);
        }

        #[test]
        fn own_secret_always_accepted(secret in "[ -~]{1,32}") {
            let checker = CredentialChecker::new(secret.clone(), secret.clone());
            prop_assert!(checker.check_password(&secret, Role::Student));
            prop_assert!(checker.check_password(&secret, Role::Admin));
            prop_assert!(!checker.check_password("", Role::Student));
        }
    }
}
