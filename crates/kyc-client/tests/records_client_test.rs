//! Contract tests for RecordsClient: `PATCH /clients/{clientId}/kyc`.

use kyc_client::{ClientError, ClientKycUpdate, RecordsClient, RecordsConfig};
use kyc_core::{ClientId, Timestamp, VerificationChecks};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> RecordsClient {
    let config = RecordsConfig::local_mock(&server.uri(), "records-token").unwrap();
    RecordsClient::new(config).unwrap()
}

fn all_passed() -> VerificationChecks {
    VerificationChecks {
        aadhaar: true,
        owner_pan: true,
        business_pan: true,
        cin: true,
        din: true,
        gstin: true,
        bank: true,
    }
}

#[tokio::test]
async fn patch_sends_check_map_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/clients/client-42/kyc"))
        .and(header("Authorization", "Bearer records-token"))
        .and(body_partial_json(serde_json::json!({
            "kycVerified": true,
            "checks": {
                "aadhaar": true,
                "ownerPan": true,
                "businessPan": true,
                "cin": true,
                "din": true,
                "gstin": true,
                "bank": true
            }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let update = ClientKycUpdate::new(all_passed(), Timestamp::now());
    client
        .patch_client_kyc(&ClientId::new("client-42").unwrap(), &update)
        .await
        .unwrap();
}

#[tokio::test]
async fn patch_non_2xx_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/clients/missing/kyc"))
        .respond_with(ResponseTemplate::new(404).set_body_string("client not found"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let update = ClientKycUpdate::new(all_passed(), Timestamp::now());
    let err = client
        .patch_client_kyc(&ClientId::new("missing").unwrap(), &update)
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "client not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}
