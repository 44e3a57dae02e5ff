//! Form input files for `kyc run`.
//!
//! YAML (`.yaml`, `.yml`) or JSON (anything else). Every field is optional;
//! absent fields stay empty and their submits are ignored.
//!
//! ```yaml
//! clientId: client-42
//! otpExpiry: require_regeneration
//! aadhaar: "999999999999"
//! otp: "123456"
//! ownerPan: ABCDE1234F
//! businessPan: AAACA1234C
//! cin: U12345MH2020PTC123456
//! din: "01234567"
//! gstin: 07ABCDE1234F1Z5
//! accountNumber: "123456789012"
//! ifsc: HDFC0001234
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use kyc_core::FieldKind;
use kyc_state::OtpExpiryPolicy;
use serde::Deserialize;

/// Field values for one verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KycInput {
    pub client_id: Option<String>,
    pub otp_expiry: Option<OtpExpiryPolicy>,
    pub aadhaar: Option<String>,
    pub otp: Option<String>,
    pub owner_pan: Option<String>,
    pub business_pan: Option<String>,
    pub cin: Option<String>,
    pub din: Option<String>,
    pub gstin: Option<String>,
    pub account_number: Option<String>,
    pub ifsc: Option<String>,
}

impl KycInput {
    /// Values to enter before any submit, in form order. The OTP is entered
    /// separately, after the OTP has been generated.
    pub fn form_values(&self) -> Vec<(FieldKind, &str)> {
        [
            (FieldKind::Aadhaar, &self.aadhaar),
            (FieldKind::OwnerPan, &self.owner_pan),
            (FieldKind::BusinessPan, &self.business_pan),
            (FieldKind::Cin, &self.cin),
            (FieldKind::Din, &self.din),
            (FieldKind::Gstin, &self.gstin),
            (FieldKind::AccountNumber, &self.account_number),
            (FieldKind::Ifsc, &self.ifsc),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_deref().map(|v| (kind, v)))
        .collect()
    }
}

/// Load a form input file.
pub fn load_input(path: &Path) -> Result<KycInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let input = if is_yaml {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML input {}", path.display()))?
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON input {}", path.display()))?
    };
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.yaml");
        std::fs::write(
            &path,
            "clientId: c-1\notpExpiry: require_regeneration\naadhaar: \"999999999999\"\nownerPan: ABCDE1234F\n",
        )
        .unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.client_id.as_deref(), Some("c-1"));
        assert_eq!(input.otp_expiry, Some(OtpExpiryPolicy::RequireRegeneration));
        assert_eq!(
            input.form_values(),
            vec![
                (FieldKind::Aadhaar, "999999999999"),
                (FieldKind::OwnerPan, "ABCDE1234F")
            ]
        );
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"gstin": "07ABCDE1234F1Z5", "otp": "123456"}"#).unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.otp.as_deref(), Some("123456"));
        assert_eq!(input.form_values(), vec![(FieldKind::Gstin, "07ABCDE1234F1Z5")]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"passport": "X1234567"}"#).unwrap();
        assert!(load_input(&path).is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_input(Path::new("/nonexistent/form.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read input file"));
    }
}
