//! Property tests for the document pre-checks.
//!
//! Generated inputs are built from the documented shapes, so every generated
//! value must be accepted, and every single-character corruption of the
//! shape must be rejected.

use kyc_core::document::{
    is_valid_aadhaar, is_valid_account_number, is_valid_cin, is_valid_din, is_valid_gstin,
    is_valid_ifsc, is_valid_pan,
};
use kyc_core::{FieldKind, VerificationField};
use proptest::prelude::*;

proptest! {
    #[test]
    fn generated_aadhaar_is_accepted(s in "[0-9]{12}") {
        prop_assert!(is_valid_aadhaar(&s));
    }

    #[test]
    fn wrong_length_digit_strings_are_not_aadhaar(s in "[0-9]{0,11}|[0-9]{13,20}") {
        prop_assert!(!is_valid_aadhaar(&s));
    }

    #[test]
    fn generated_pan_is_accepted(s in "[A-Z]{5}[0-9]{4}[A-Z]") {
        prop_assert!(is_valid_pan(&s));
    }

    #[test]
    fn lowercased_pan_is_rejected(s in "[A-Z]{5}[0-9]{4}[A-Z]") {
        prop_assert!(!is_valid_pan(&s.to_ascii_lowercase()));
    }

    #[test]
    fn generated_cin_is_accepted(s in "[A-Z][0-9]{5}[A-Z]{2}[0-9]{4}[A-Z]{3}[0-9]{6}") {
        prop_assert!(is_valid_cin(&s));
    }

    #[test]
    fn generated_din_is_accepted(s in "[0-9]{8}") {
        prop_assert!(is_valid_din(&s));
    }

    #[test]
    fn generated_gstin_is_accepted(s in "[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9A-Z]Z[0-9A-Z]") {
        prop_assert!(is_valid_gstin(&s));
    }

    #[test]
    fn gstin_without_literal_z_is_rejected(
        head in "[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9A-Z]",
        z in "[A-Y0-9]",
        tail in "[0-9A-Z]",
    ) {
        let s = format!("{head}{z}{tail}");
        prop_assert!(!is_valid_gstin(&s));
    }

    #[test]
    fn generated_account_number_is_accepted(s in "[0-9]{9,18}") {
        prop_assert!(is_valid_account_number(&s));
    }

    #[test]
    fn generated_ifsc_is_accepted(s in "[A-Z]{4}0[A-Z0-9]{6}") {
        prop_assert!(is_valid_ifsc(&s));
    }

    #[test]
    fn arbitrary_input_never_panics(s in ".*") {
        let _ = is_valid_aadhaar(&s)
            | is_valid_pan(&s)
            | is_valid_cin(&s)
            | is_valid_din(&s)
            | is_valid_gstin(&s)
            | is_valid_account_number(&s)
            | is_valid_ifsc(&s);
    }

    #[test]
    fn soft_truncation_respects_hint(s in ".{0,40}") {
        for kind in FieldKind::ALL {
            let t = kind.truncate_soft(&s);
            prop_assert!(t.chars().count() <= kind.soft_max_len());
            prop_assert!(s.starts_with(&t));
        }
    }

    #[test]
    fn edit_always_lands_idle_without_message(s in ".{0,20}") {
        let mut f = VerificationField::new("ABCDE1234F");
        f.mark_pending("Verifying PAN...").unwrap();
        f.mark_success("PAN verified successfully").unwrap();
        f.edit(s.clone());
        prop_assert_eq!(f.value, s);
        prop_assert!(f.message.is_none());
        prop_assert_eq!(f.status, kyc_core::FieldStatus::Idle);
    }
}
