//! # Document-Number Newtypes
//!
//! Validated identifiers for every document the KYC flow verifies. Each
//! newtype checks its format at construction, so holding an [`Pan`] means the
//! local pre-check already passed and the value may be sent to the provider.
//!
//! The pre-checks are deliberately shallow: they test shape only, never
//! checksums or registry existence. Letters must be ASCII upper case.
//!
//! | Document | Shape | Length |
//! |----------|-------|--------|
//! | Aadhaar  | 12 digits | 12 |
//! | PAN      | 5 letters, 4 digits, 1 letter | 10 |
//! | CIN      | 1 letter, 5 digits, 2 letters, 4 digits, 3 letters, 6 digits | 21 |
//! | DIN      | 8 digits | 8 |
//! | GSTIN    | 2 digits, 5 letters, 4 digits, 1 letter, 1 alnum, `Z`, 1 alnum | 15 |
//! | Account  | 9-18 digits | 9-18 |
//! | IFSC     | 4 letters, `0`, 6 alnum | 11 |

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Shape matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Class {
    Upper,
    Digit,
    UpperOrDigit,
    Exact(u8),
}

impl Class {
    fn admits(self, b: u8) -> bool {
        match self {
            Self::Upper => b.is_ascii_uppercase(),
            Self::Digit => b.is_ascii_digit(),
            Self::UpperOrDigit => b.is_ascii_uppercase() || b.is_ascii_digit(),
            Self::Exact(c) => b == c,
        }
    }
}

/// Match `s` against a run-length shape, e.g. `[(Upper, 5), (Digit, 4)]`.
fn matches_shape(s: &str, shape: &[(Class, usize)]) -> bool {
    let expected: usize = shape.iter().map(|(_, n)| n).sum();
    let bytes = s.as_bytes();
    if bytes.len() != expected {
        return false;
    }
    let mut pos = 0;
    for &(class, n) in shape {
        if !bytes[pos..pos + n].iter().all(|&b| class.admits(b)) {
            return false;
        }
        pos += n;
    }
    true
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Pure predicates
// ---------------------------------------------------------------------------

/// Exactly 12 decimal digits.
pub fn is_valid_aadhaar(s: &str) -> bool {
    s.len() == 12 && all_digits(s)
}

/// 5 letters + 4 digits + 1 letter.
pub fn is_valid_pan(s: &str) -> bool {
    matches_shape(s, &[(Class::Upper, 5), (Class::Digit, 4), (Class::Upper, 1)])
}

/// 1 letter, 5 digits, 2 letters, 4 digits, 3 letters, 6 digits.
pub fn is_valid_cin(s: &str) -> bool {
    matches_shape(
        s,
        &[
            (Class::Upper, 1),
            (Class::Digit, 5),
            (Class::Upper, 2),
            (Class::Digit, 4),
            (Class::Upper, 3),
            (Class::Digit, 6),
        ],
    )
}

/// Exactly 8 decimal digits.
pub fn is_valid_din(s: &str) -> bool {
    s.len() == 8 && all_digits(s)
}

/// 2 digits, 5 letters, 4 digits, 1 letter, 1 alphanumeric, `Z`, 1 alphanumeric.
pub fn is_valid_gstin(s: &str) -> bool {
    matches_shape(
        s,
        &[
            (Class::Digit, 2),
            (Class::Upper, 5),
            (Class::Digit, 4),
            (Class::Upper, 1),
            (Class::UpperOrDigit, 1),
            (Class::Exact(b'Z'), 1),
            (Class::UpperOrDigit, 1),
        ],
    )
}

/// 9 to 18 decimal digits.
pub fn is_valid_account_number(s: &str) -> bool {
    (9..=18).contains(&s.len()) && all_digits(s)
}

/// 4 letters, literal `0`, 6 alphanumerics.
pub fn is_valid_ifsc(s: &str) -> bool {
    matches_shape(
        s,
        &[
            (Class::Upper, 4),
            (Class::Exact(b'0'), 1),
            (Class::UpperOrDigit, 6),
        ],
    )
}

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! document_newtype {
    (
        $(#[$meta:meta])*
        $name:ident, $check:ident, $err:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(String);

        // Deserialization goes through `new`, so a decoded value is checked too.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }

        impl $name {
            /// Construct from a raw string, running the format pre-check.
            ///
            /// # Errors
            ///
            #[doc = concat!("Returns [`ValidationError::", stringify!($err), "`] if the shape does not match.")]
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !$check(&s) {
                    return Err(ValidationError::$err(s));
                }
                Ok(Self(s))
            }

            /// Access the validated string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

document_newtype!(
    /// Aadhaar number: 12 decimal digits.
    ///
    /// `Display` prints the full number; use [`AadhaarNumber::masked`] for logs.
    AadhaarNumber, is_valid_aadhaar, InvalidAadhaar
);

document_newtype!(
    /// Permanent Account Number (PAN), used for both owner and business PAN.
    Pan, is_valid_pan, InvalidPan
);

document_newtype!(
    /// Corporate Identification Number issued by the MCA.
    Cin, is_valid_cin, InvalidCin
);

document_newtype!(
    /// Director Identification Number.
    Din, is_valid_din, InvalidDin
);

document_newtype!(
    /// Goods and Services Tax Identification Number.
    Gstin, is_valid_gstin, InvalidGstin
);

document_newtype!(
    /// Bank account number (digits only).
    AccountNumber, is_valid_account_number, InvalidAccountNumber
);

document_newtype!(
    /// Indian Financial System Code of a bank branch.
    Ifsc, is_valid_ifsc, InvalidIfsc
);

impl AadhaarNumber {
    /// Aadhaar with all but the last four digits masked (`XXXXXXXX9012`).
    pub fn masked(&self) -> String {
        format!("XXXXXXXX{}", self.0.get(8..).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Document kinds
// ---------------------------------------------------------------------------

/// The document formats that have a local pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Aadhaar number.
    Aadhaar,
    /// PAN (owner or business).
    Pan,
    /// Company identification number.
    Cin,
    /// Director identification number.
    Din,
    /// GST identification number.
    Gstin,
    /// Bank account number.
    AccountNumber,
    /// Bank branch code.
    Ifsc,
}

impl DocumentKind {
    /// Every kind, in form order.
    pub const ALL: [DocumentKind; 7] = [
        Self::Aadhaar,
        Self::Pan,
        Self::Cin,
        Self::Din,
        Self::Gstin,
        Self::AccountNumber,
        Self::Ifsc,
    ];

    /// Run the pre-check for this kind.
    ///
    /// # Errors
    ///
    /// Returns the kind-specific [`ValidationError`] when the shape does not match.
    pub fn validate(self, value: &str) -> Result<(), ValidationError> {
        match self {
            Self::Aadhaar => AadhaarNumber::new(value).map(drop),
            Self::Pan => Pan::new(value).map(drop),
            Self::Cin => Cin::new(value).map(drop),
            Self::Din => Din::new(value).map(drop),
            Self::Gstin => Gstin::new(value).map(drop),
            Self::AccountNumber => AccountNumber::new(value).map(drop),
            Self::Ifsc => Ifsc::new(value).map(drop),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Aadhaar => "aadhaar",
            Self::Pan => "pan",
            Self::Cin => "cin",
            Self::Din => "din",
            Self::Gstin => "gstin",
            Self::AccountNumber => "account-number",
            Self::Ifsc => "ifsc",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.to_string() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown document kind: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Aadhaar --

    #[test]
    fn aadhaar_valid() {
        assert!(AadhaarNumber::new("123456789012").is_ok());
        assert!(AadhaarNumber::new("999999999999").is_ok());
    }

    #[test]
    fn aadhaar_rejects_invalid() {
        assert!(AadhaarNumber::new("12345").is_err());
        assert!(AadhaarNumber::new("").is_err());
        assert!(AadhaarNumber::new("1234567890123").is_err()); // 13 digits
        assert!(AadhaarNumber::new("12345678901a").is_err());
        assert!(AadhaarNumber::new("1234 5678 9012").is_err()); // spaces
    }

    #[test]
    fn aadhaar_masked_keeps_last_four() {
        let a = AadhaarNumber::new("123456789012").unwrap();
        assert_eq!(a.masked(), "XXXXXXXX9012");
    }

    // -- PAN --

    #[test]
    fn pan_valid() {
        let pan = Pan::new("ABCDE1234F").unwrap();
        assert_eq!(pan.as_str(), "ABCDE1234F");
    }

    #[test]
    fn pan_rejects_invalid() {
        assert!(Pan::new("ABCDE1234").is_err()); // 9 chars
        assert!(Pan::new("abcde1234f").is_err()); // lower case
        assert!(Pan::new("ABCD12345F").is_err()); // shifted digit run
        assert!(Pan::new("ABCDE1234FG").is_err());
    }

    // -- CIN --

    #[test]
    fn cin_valid() {
        assert!(Cin::new("U12345MH2020PTC123456").is_ok());
        assert!(Cin::new("L74899DL1995PLC065388").is_ok());
    }

    #[test]
    fn cin_rejects_invalid() {
        assert!(Cin::new("U12345MH2020PTC12345").is_err()); // 20 chars
        assert!(Cin::new("112345MH2020PTC123456").is_err()); // leading digit
        assert!(Cin::new("U12345MH2020PT1123456").is_err());
    }

    // -- DIN --

    #[test]
    fn din_valid() {
        assert!(Din::new("01234567").is_ok());
    }

    #[test]
    fn din_rejects_invalid() {
        assert!(Din::new("1234567").is_err());
        assert!(Din::new("123456789").is_err());
        assert!(Din::new("0123456A").is_err());
    }

    // -- GSTIN --

    #[test]
    fn gstin_valid() {
        assert!(Gstin::new("07ABCDE1234F1Z5").is_ok());
        assert!(Gstin::new("27AAPFU0939F1ZV").is_ok());
    }

    #[test]
    fn gstin_rejects_invalid() {
        assert!(Gstin::new("07ABCDE1234F1Y5").is_err()); // no literal Z
        assert!(Gstin::new("7ABCDE1234F1Z5").is_err()); // 14 chars
        assert!(Gstin::new("07abcde1234f1z5").is_err());
    }

    // -- Account number --

    #[test]
    fn account_number_bounds() {
        assert!(AccountNumber::new("123456789").is_ok()); // 9
        assert!(AccountNumber::new("123456789012345678").is_ok()); // 18
        assert!(AccountNumber::new("12345678").is_err()); // 8
        assert!(AccountNumber::new("1234567890123456789").is_err()); // 19
        assert!(AccountNumber::new("12345678901X").is_err());
    }

    // -- IFSC --

    #[test]
    fn ifsc_valid() {
        assert!(Ifsc::new("HDFC0001234").is_ok());
        assert!(Ifsc::new("SBIN0ABC123").is_ok());
    }

    #[test]
    fn ifsc_rejects_invalid() {
        assert!(Ifsc::new("1234HDFC001").is_err());
        assert!(Ifsc::new("HDFC1001234").is_err()); // fifth char not 0
        assert!(Ifsc::new("HDFC000123").is_err()); // 10 chars
    }

    // -- DocumentKind --

    #[test]
    fn document_kind_parse_roundtrip() {
        for kind in DocumentKind::ALL {
            let parsed: DocumentKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("passport".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn document_kind_validate_dispatches() {
        assert!(DocumentKind::Ifsc.validate("HDFC0001234").is_ok());
        assert_eq!(
            DocumentKind::Din.validate("12"),
            Err(ValidationError::InvalidDin("12".to_string()))
        );
    }

    #[test]
    fn deserialization_runs_the_format_check() {
        let ok: AadhaarNumber = serde_json::from_str("\"123456789012\"").unwrap();
        assert_eq!(ok.masked(), "XXXXXXXX9012");
        assert!(serde_json::from_str::<AadhaarNumber>("\"1234\"").is_err());
        assert!(serde_json::from_str::<Ifsc>("\"1234HDFC001\"").is_err());
        let pan: Pan = serde_json::from_str("\"ABCDE1234F\"").unwrap();
        assert_eq!(serde_json::to_string(&pan).unwrap(), "\"ABCDE1234F\"");
    }

    #[test]
    fn non_ascii_input_is_rejected_without_panicking() {
        assert!(!is_valid_pan("ÄBCDE1234F"));
        assert!(!is_valid_ifsc("HDFC0००1234"));
    }
}
