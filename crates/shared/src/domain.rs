use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest IMEI the form accepts, in digits.
pub const IMEI_MAX_DIGITS: usize = 16;
/// Longest user id the backend stores.
pub const USER_ID_MAX_CHARS: usize = 50;
/// Longest tagging label the backend stores.
pub const TAGGING_MAX_CHARS: usize = 25;

/// Binary activation flag carried on every record, serialized as "Y"/"N".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Y,
    N,
}

impl UserStatus {
    pub fn as_flag(&self) -> &'static str {
        match self {
            UserStatus::Y => "Y",
            UserStatus::N => "N",
        }
    }

    /// Parses the wire flag; anything other than "Y"/"N" is rejected.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "Y" => Some(UserStatus::Y),
            "N" => Some(UserStatus::N),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// IMEIs are digits only, 1 to 16 of them.
pub fn is_valid_imei(input: &str) -> bool {
    !input.is_empty()
        && input.chars().count() <= IMEI_MAX_DIGITS
        && input.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_user_id(input: &str) -> bool {
    !input.trim().is_empty() && input.chars().count() <= USER_ID_MAX_CHARS
}

pub fn is_valid_tagging(input: &str) -> bool {
    !input.trim().is_empty() && input.chars().count() <= TAGGING_MAX_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imei_accepts_digits_up_to_the_limit() {
        assert!(is_valid_imei("1"));
        assert!(is_valid_imei("1234567890123456"));
        assert!(!is_valid_imei("12345678901234567"));
        assert!(!is_valid_imei(""));
        assert!(!is_valid_imei("12a4"));
        assert!(!is_valid_imei("١٢٣"));
    }

    #[test]
    fn user_id_rejects_blank_and_overlong_values() {
        assert!(is_valid_user_id("alice"));
        assert!(is_valid_user_id(&"x".repeat(50)));
        assert!(!is_valid_user_id(&"x".repeat(51)));
        assert!(!is_valid_user_id("   "));
        assert!(!is_valid_user_id(""));
    }

    #[test]
    fn tagging_rejects_blank_and_overlong_values() {
        assert!(is_valid_tagging("fleet-7"));
        assert!(is_valid_tagging(&"t".repeat(25)));
        assert!(!is_valid_tagging(&"t".repeat(26)));
        assert!(!is_valid_tagging(" "));
    }

    #[test]
    fn status_flag_round_trips() {
        assert_eq!(UserStatus::from_flag("Y"), Some(UserStatus::Y));
        assert_eq!(UserStatus::from_flag("N"), Some(UserStatus::N));
        assert_eq!(UserStatus::from_flag("A"), None);
        assert_eq!(UserStatus::from_flag("y"), None);
        assert_eq!(UserStatus::default().as_flag(), "Y");
        assert_eq!(UserStatus::N.to_string(), "N");
    }
}
