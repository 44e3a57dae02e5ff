//! # Verification Provider HTTP Client
//!
//! Production implementation of [`VerificationApi`] against the provider's
//! REST API. One POST per category, JSON body, API-key header auth.
//!
//! ## Response envelope
//!
//! ```json
//! { "status": 200, "data": { "code": "1000", "message": "...", "pan_data": { ... } } }
//! ```
//!
//! A call succeeds only when the HTTP status is 2xx **and** `data.code`
//! equals the operation's success code. Bank verification additionally
//! requires `data.bank_account_data` to be present. Error bodies look like
//! `{ "error": { "code": "...", "message": "..." } }`; their message is
//! surfaced when present.
//!
//! ## Error Handling
//!
//! Nothing here returns `Err` across the [`VerificationApi`] boundary.
//! Non-2xx responses and missing success codes become
//! [`FailureKind::RemoteRejection`](crate::FailureKind) outcomes carrying the
//! provider message (or a generic fallback); transport and decoding failures
//! become [`FailureKind::Transport`](crate::FailureKind) outcomes with a
//! generic message, and the underlying error is logged.
//!
//! No retries are performed. Every retry is user-initiated.

use std::time::Duration;

use async_trait::async_trait;
use kyc_core::{AadhaarNumber, AccountNumber, Cin, Din, Gstin, Ifsc, Pan};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::VerificationApi;
use crate::config::{endpoint_url, ConfigError, ProviderConfig};
use crate::error::ClientError;
use crate::outcome::{Operation, VerificationOutcome, VerificationPayload};

/// Consent flag sent with every request.
const CONSENT: &str = "Y";

// -- Request bodies -----------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateOtpRequest<'a> {
    aadhaar_number: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct SubmitOtpRequest<'a> {
    aadhaar_number: &'a str,
    otp: &'a str,
    transaction_id: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct PanRequest<'a> {
    pan_id: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct CinRequest<'a> {
    company_id: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct DinRequest<'a> {
    din: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct GstinRequest<'a> {
    gstin: &'a str,
    consent: &'static str,
}

#[derive(Debug, Serialize)]
struct BankRequest<'a> {
    account_number: &'a str,
    ifsc: &'a str,
    consent: &'static str,
}

// -- Response bodies ----------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AadhaarData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    address: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PanData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyData {
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DirectorData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GstinData {
    #[serde(default)]
    trade_name: Option<String>,
    #[serde(default)]
    legal_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BankAccountData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bank_name: Option<String>,
}

/// A decoded 2xx reply.
#[derive(Debug)]
struct ProviderReply {
    code: Option<String>,
    message: Option<String>,
    data: Value,
}

/// What a payload extractor found in `data`.
enum Extracted {
    Payload(Option<VerificationPayload>),
    /// Data the operation cannot succeed without is absent.
    MissingRequired,
}

// -- Client -------------------------------------------------------------------

/// HTTP client for the verification provider.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl ProviderClient {
    /// Create a new provider client from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    "X-API-Key",
                    reqwest::header::HeaderValue::from_str(config.api_key.as_str())
                        .map_err(|_| ConfigError::InvalidHeader("X-API-Key".into()))?,
                );
                headers.insert(
                    "X-Auth-Type",
                    reqwest::header::HeaderValue::from_str(&config.auth_type)
                        .map_err(|_| ConfigError::InvalidHeader("X-Auth-Type".into()))?,
                );
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// POST `body` to the operation's endpoint and decode the envelope.
    async fn post<B: Serialize + ?Sized>(
        &self,
        op: Operation,
        body: &B,
    ) -> Result<ProviderReply, ClientError> {
        let endpoint = op.endpoint();
        let url = endpoint_url(&self.base_url, op.path());

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ClientError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !status.is_success() {
            let envelope: Envelope = serde_json::from_str(&text).unwrap_or_default();
            let message = envelope
                .error
                .and_then(|e| e.message)
                .or_else(|| envelope.data.as_ref().and_then(|d| text_field(d, "message")));
            return Err(ClientError::Api {
                endpoint,
                status: status.as_u16(),
                message,
                body: text,
            });
        }

        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        let data = envelope.data.unwrap_or(Value::Null);

        Ok(ProviderReply {
            code: data.get("code").map(code_text),
            message: text_field(&data, "message"),
            data,
        })
    }

    /// Reduce a reply to an outcome.
    fn evaluate(
        op: Operation,
        reply: Result<ProviderReply, ClientError>,
        extract: impl FnOnce(&Value) -> Extracted,
    ) -> VerificationOutcome {
        let reply = match reply {
            Ok(reply) => reply,
            Err(ClientError::Api {
                endpoint,
                status,
                message,
                ..
            }) => {
                tracing::warn!(%endpoint, status, "provider rejected {op} request");
                return VerificationOutcome::rejected(
                    message.unwrap_or_else(|| op.rejection_fallback().to_string()),
                );
            }
            Err(e) => {
                tracing::warn!(operation = %op, "provider call failed: {e}");
                return VerificationOutcome::transport(op.transport_fallback());
            }
        };

        if reply.code.as_deref() != Some(op.success_code()) {
            tracing::debug!(
                operation = %op,
                code = reply.code.as_deref().unwrap_or("<none>"),
                "provider did not return the success code"
            );
            return VerificationOutcome::rejected(
                reply
                    .message
                    .unwrap_or_else(|| op.rejection_fallback().to_string()),
            );
        }

        match extract(&reply.data) {
            Extracted::Payload(payload) => VerificationOutcome::success(reply.message, payload),
            Extracted::MissingRequired => {
                tracing::debug!(operation = %op, "success code without required data");
                VerificationOutcome::rejected(
                    reply
                        .message
                        .unwrap_or_else(|| op.rejection_fallback().to_string()),
                )
            }
        }
    }
}

#[async_trait]
impl VerificationApi for ProviderClient {
    async fn generate_aadhaar_otp(&self, aadhaar: &AadhaarNumber) -> VerificationOutcome {
        tracing::debug!(aadhaar = %aadhaar.masked(), "requesting Aadhaar OTP");
        let body = GenerateOtpRequest {
            aadhaar_number: aadhaar.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::GenerateOtp, &body).await;
        Self::evaluate(Operation::GenerateOtp, reply, |data| {
            match text_field(data, "transaction_id") {
                Some(transaction_id) if !transaction_id.is_empty() => {
                    Extracted::Payload(Some(VerificationPayload::OtpIssued { transaction_id }))
                }
                _ => Extracted::MissingRequired,
            }
        })
    }

    async fn submit_aadhaar_otp(
        &self,
        aadhaar: &AadhaarNumber,
        otp: &str,
        transaction_id: &str,
    ) -> VerificationOutcome {
        tracing::debug!(aadhaar = %aadhaar.masked(), "submitting Aadhaar OTP");
        let body = SubmitOtpRequest {
            aadhaar_number: aadhaar.as_str(),
            otp,
            transaction_id,
            consent: CONSENT,
        };
        let reply = self.post(Operation::SubmitOtp, &body).await;
        Self::evaluate(Operation::SubmitOtp, reply, |data| {
            let d: AadhaarData = optional_section(Operation::SubmitOtp, data, "aadhaar_data");
            Extracted::Payload(Some(VerificationPayload::Aadhaar {
                name: d.name,
                gender: d.gender,
                dob: d.date_of_birth,
                address: d.address.as_ref().and_then(address_text),
            }))
        })
    }

    async fn verify_pan(&self, pan: &Pan) -> VerificationOutcome {
        let body = PanRequest {
            pan_id: pan.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::Pan, &body).await;
        Self::evaluate(Operation::Pan, reply, |data| {
            let d: PanData = optional_section(Operation::Pan, data, "pan_data");
            Extracted::Payload(Some(VerificationPayload::Pan {
                name: d.name,
                pan_status: d.status,
            }))
        })
    }

    async fn verify_cin(&self, cin: &Cin) -> VerificationOutcome {
        let body = CinRequest {
            company_id: cin.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::Cin, &body).await;
        Self::evaluate(Operation::Cin, reply, |data| {
            let d: CompanyData = optional_section(Operation::Cin, data, "company_data");
            Extracted::Payload(Some(VerificationPayload::Company {
                company_name: d.company_name,
                status: d.status,
            }))
        })
    }

    async fn verify_din(&self, din: &Din) -> VerificationOutcome {
        let body = DinRequest {
            din: din.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::Din, &body).await;
        Self::evaluate(Operation::Din, reply, |data| {
            let d: DirectorData = optional_section(Operation::Din, data, "director_data");
            Extracted::Payload(Some(VerificationPayload::Director {
                director_name: d.name,
                status: d.status,
            }))
        })
    }

    async fn verify_gstin(&self, gstin: &Gstin) -> VerificationOutcome {
        let body = GstinRequest {
            gstin: gstin.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::Gstin, &body).await;
        Self::evaluate(Operation::Gstin, reply, |data| {
            let d: GstinData = optional_section(Operation::Gstin, data, "gstin_data");
            Extracted::Payload(Some(VerificationPayload::Gstin {
                trade_name: d.trade_name,
                legal_name: d.legal_name,
                status: d.status,
            }))
        })
    }

    async fn verify_bank_account(
        &self,
        account: &AccountNumber,
        ifsc: &Ifsc,
    ) -> VerificationOutcome {
        let body = BankRequest {
            account_number: account.as_str(),
            ifsc: ifsc.as_str(),
            consent: CONSENT,
        };
        let reply = self.post(Operation::Bank, &body).await;
        Self::evaluate(Operation::Bank, reply, |data| {
            match data.get("bank_account_data") {
                Some(section) if !section.is_null() => {
                    let d: BankAccountData = decode_or_default(Operation::Bank, section);
                    Extracted::Payload(Some(VerificationPayload::Bank {
                        holder_name: d.name,
                        bank_name: d.bank_name,
                    }))
                }
                _ => Extracted::MissingRequired,
            }
        })
    }

    fn api_name(&self) -> &str {
        "ProviderClient"
    }
}

// -- Helpers ------------------------------------------------------------------

fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn code_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode `data[key]`, falling back to an empty record when the section is
/// absent or malformed. Display-only payloads never fail a verification.
fn optional_section<T: DeserializeOwned + Default>(op: Operation, data: &Value, key: &str) -> T {
    match data.get(key) {
        Some(section) => decode_or_default(op, section),
        None => T::default(),
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(op: Operation, section: &Value) -> T {
    serde_json::from_value(section.clone()).unwrap_or_else(|e| {
        tracing::warn!(operation = %op, "ignoring malformed payload: {e}");
        T::default()
    })
}

/// Addresses arrive either as a single line or as a structured object.
fn address_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let parts: Vec<&str> = map
                .values()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(code: &str, data: Value) -> Result<ProviderReply, ClientError> {
        Ok(ProviderReply {
            code: Some(code.to_string()),
            message: text_field(&data, "message"),
            data,
        })
    }

    #[test]
    fn evaluate_requires_success_code() {
        let out = ProviderClient::evaluate(
            Operation::Pan,
            reply("1001", serde_json::json!({"message": "PAN does not exist"})),
            |_| Extracted::Payload(None),
        );
        assert!(!out.ok);
        assert_eq!(out.message.as_deref(), Some("PAN does not exist"));
    }

    #[test]
    fn evaluate_falls_back_to_generic_rejection() {
        let out = ProviderClient::evaluate(
            Operation::Gstin,
            reply("9999", serde_json::json!({})),
            |_| Extracted::Payload(None),
        );
        assert_eq!(out.message.as_deref(), Some("Failed to verify GSTIN"));
    }

    #[test]
    fn evaluate_maps_deserialization_to_transport() {
        let out = ProviderClient::evaluate(
            Operation::Din,
            Err(ClientError::Deserialization {
                endpoint: "POST /mca-api/fetch-din".into(),
                reason: "eof".into(),
            }),
            |_| Extracted::Payload(None),
        );
        assert!(!out.ok);
        assert_eq!(out.failure, Some(crate::FailureKind::Transport));
        assert_eq!(
            out.message.as_deref(),
            Some("An error occurred while verifying DIN")
        );
    }

    #[test]
    fn evaluate_missing_required_is_rejection() {
        let out = ProviderClient::evaluate(
            Operation::Bank,
            reply("1000", serde_json::json!({})),
            |_| Extracted::MissingRequired,
        );
        assert!(!out.ok);
        assert_eq!(out.failure, Some(crate::FailureKind::RemoteRejection));
    }

    #[test]
    fn code_text_accepts_numbers() {
        assert_eq!(code_text(&serde_json::json!(1000)), "1000");
        assert_eq!(code_text(&serde_json::json!("1000")), "1000");
    }

    #[test]
    fn address_text_joins_structured_addresses() {
        let v = serde_json::json!({"house": "123 Main St", "city": "Bangalore", "pin": ""});
        let text = address_text(&v).unwrap();
        assert!(text.contains("123 Main St"));
        assert!(text.contains("Bangalore"));
        assert_eq!(address_text(&serde_json::json!(null)), None);
    }
}
