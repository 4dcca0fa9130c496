//! Customer profile
//!
//! Contact details entered once and reused to prefill later checkouts. A
//! missing profile is a valid state (guest checkout).

use serde::{Deserialize, Serialize};

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomerProfile {
    /// The first required field that is empty, if any.
    ///
    /// Name, phone and address are required for a persisted order; email
    /// and notes are always optional.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("name");
        }
        if self.phone.trim().is_empty() {
            return Some("phone");
        }
        if self.address.trim().is_empty() {
            return Some("address");
        }

        None
    }
}

/// A named address saved on the device for quick reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAddress {
    pub label: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            name: "Ana".to_string(),
            phone: "119999".to_string(),
            address: "Rua A, 10".to_string(),
            email: None,
            notes: None,
        }
    }

    #[test]
    fn complete_profile_has_no_missing_field() {
        assert_eq!(profile().missing_required(), None);
    }

    #[test]
    fn blank_address_is_reported() {
        let mut p = profile();
        p.address = "   ".to_string();

        assert_eq!(p.missing_required(), Some("address"));
    }

    #[test]
    fn fields_checked_in_form_order() {
        let mut p = profile();
        p.name = String::new();
        p.phone = String::new();

        assert_eq!(p.missing_required(), Some("name"));
    }

    #[test]
    fn optional_fields_skipped_when_absent() {
        let value = serde_json::to_value(profile()).unwrap();

        assert!(value.get("email").is_none());
        assert!(value.get("notes").is_none());
    }
}
