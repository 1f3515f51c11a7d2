// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Tuya client using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use lightbridge_lib::command::{UnifiedCommand, VendorOperation};
use lightbridge_lib::protocol::{Clock, TuyaClient, TuyaConfig};
use lightbridge_lib::types::{PowerState, RgbColor};
use serde_json::json;
use wiremock::matchers::{any, body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START: i64 = 1_700_000_000_000;
const CLIENT_ID: &str = "client123";
const CLIENT_SECRET: &str = "secret456";
const TOKEN: &str = "token789";
const LEASE_SECS: i64 = 7200;

#[derive(Debug)]
struct ManualClock(AtomicI64);

impl ManualClock {
    fn at(ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(ms)))
    }

    fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn client(server: &MockServer, clock: &Arc<ManualClock>) -> TuyaClient {
    let config = TuyaConfig::new(CLIENT_ID, CLIENT_SECRET).with_base_url(server.uri());
    TuyaClient::builder(config)
        .clock(Arc::clone(clock) as Arc<dyn Clock>)
        .build()
        .unwrap()
}

fn token_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "result": {"access_token": TOKEN, "expire_time": LEASE_SECS, "uid": "u1"},
        "t": START
    }))
}

async fn mount_token(server: &MockServer, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/v1.0/token"))
        .and(query_param("grant_type", "1"))
        .respond_with(token_response())
        .expect(expected_fetches)
        .mount(server)
        .await;
}

fn ok_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "result": true, "t": START}))
}

fn commands_path(device_id: &str) -> String {
    format!("/v1.0/iot-03/devices/{device_id}/commands")
}

// ============================================================================
// Token lifecycle
// ============================================================================

mod token {
    use super::*;

    #[tokio::test]
    async fn token_request_is_signed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1.0/token"))
            .and(query_param("grant_type", "1"))
            .and(header("client_id", CLIENT_ID))
            .and(header(
                "sign",
                "20BA4FA399ED96DBCCA3AF74E74E9272ADD1019558915C55C5150B64F4351F11",
            ))
            .and(header("t", "1700000000000"))
            .and(header("sign_method", "HMAC-SHA256"))
            .respond_with(token_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let token = client(&server, &clock).access_token().await.unwrap();
        assert_eq!(token.token(), TOKEN);
        assert_eq!(token.expires_at_ms(), START + LEASE_SECS * 1000 - 60_000);
    }

    #[tokio::test]
    async fn token_reused_within_lease() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ok_response())
            .expect(2)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let client = client(&server, &clock);

        let cmd = UnifiedCommand::Turn(PowerState::On);
        assert!(client.translate_and_send("dev1", &cmd).await.success);
        clock.advance(60_000);
        assert!(client.translate_and_send("dev1", &cmd).await.success);
    }

    #[tokio::test]
    async fn token_refreshed_once_after_expiry() {
        let server = MockServer::start().await;
        mount_token(&server, 2).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ok_response())
            .expect(3)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let client = client(&server, &clock);
        let cmd = UnifiedCommand::Countdown(0);

        assert!(client.translate_and_send("dev1", &cmd).await.success);
        clock.advance(LEASE_SECS * 1000 - 60_000 + 1);
        assert!(client.translate_and_send("dev1", &cmd).await.success);
        assert!(client.translate_and_send("dev1", &cmd).await.success);
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1.0/token"))
            .respond_with(token_response().set_delay(Duration::from_millis(50)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ok_response())
            .expect(4)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let client = client(&server, &clock);
        let cmd = UnifiedCommand::Turn(PowerState::Off);

        let (a, b, c, d) = tokio::join!(
            client.translate_and_send("dev1", &cmd),
            client.translate_and_send("dev1", &cmd),
            client.translate_and_send("dev1", &cmd),
            client.translate_and_send("dev1", &cmd),
        );
        assert!(a.success && b.success && c.success && d.success);
    }

    #[tokio::test]
    async fn rejected_token_request_is_authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "code": 1004,
                "msg": "sign invalid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ok_response())
            .expect(0)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Turn(PowerState::On))
            .await;

        assert!(!result.success);
        assert_eq!(result.message, "authentication failed: sign invalid");
    }

    #[tokio::test]
    async fn failed_token_fetch_is_retried_on_next_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1.0/token"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let client = client(&server, &clock);
        let cmd = UnifiedCommand::Turn(PowerState::On);

        let first = client.translate_and_send("dev1", &cmd).await;
        assert!(!first.success);
        assert!(first.message.contains("503"));

        assert!(client.translate_and_send("dev1", &cmd).await.success);
    }

    #[tokio::test]
    async fn grant_without_access_token_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"expire_time": LEASE_SECS, "uid": "u1"},
                "t": START
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ok_response())
            .expect(0)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Turn(PowerState::On))
            .await;

        assert!(!result.success);
        assert_eq!(
            result.message,
            "malformed response: missing field in response: access_token"
        );
    }
}

// ============================================================================
// Control requests
// ============================================================================

mod control {
    use super::*;

    #[tokio::test]
    async fn business_request_is_signed() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .and(header("client_id", CLIENT_ID))
            .and(header("access_token", TOKEN))
            .and(header(
                "sign",
                "24741F48D8C9F593EDB771F39971840042439A97C3552F97A4F5B212B3DAB886",
            ))
            .and(header("t", "1700000000000"))
            .and(header("sign_method", "HMAC-SHA256"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "commands": [{"code": "switch_led", "value": true}]
            })))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Turn(PowerState::On))
            .await;
        assert!(result.success);
        assert_eq!(result.message, "success");
    }

    #[tokio::test]
    async fn color_command_end_to_end() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("lamp")))
            .and(body_json(json!({
                "commands": [
                    {"code": "work_mode", "value": "colour"},
                    {"code": "colour_data", "value": {"h": 240, "s": 1000, "v": 1000}}
                ]
            })))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("lamp", &UnifiedCommand::Color(RgbColor::new(0, 0, 255)))
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn countdown_zero_is_sent_unscaled() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("lamp")))
            .and(body_json(json!({"commands": [{"code": "countdown", "value": 0}]})))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("lamp", &UnifiedCommand::Countdown(0))
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn scene_sends_full_descriptor() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("lamp")))
            .and(body_json(json!({
                "commands": [{
                    "code": "scene_data",
                    "value": {
                        "scene_num": 6,
                        "scene_units": [{
                            "unit_change_mode": "static",
                            "unit_switch_duration": 0,
                            "unit_gradient_duration": 0,
                            "h": 330,
                            "s": 400,
                            "v": 1000,
                            "bright": 0,
                            "temperature": 0
                        }]
                    }
                }]
            })))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("lamp", &UnifiedCommand::Scene { id: 6 })
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn unsupported_command_posts_empty_list() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("lamp")))
            .and(body_json(json!({"commands": []})))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let command = UnifiedCommand::Unsupported {
            name: "music".to_string(),
        };
        let result = client(&server, &clock)
            .translate_and_send("lamp", &command)
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn device_id_is_percent_encoded() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/v1.0/iot-03/devices/dev%201/commands"))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock).control_device("dev 1", &[]).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn explicit_operations_are_sent_in_order() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("lamp")))
            .and(body_json(json!({
                "commands": [
                    {"code": "switch_led", "value": true},
                    {"code": "bright_value", "value": 500}
                ]
            })))
            .respond_with(ok_response())
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let operations = [
            VendorOperation::new("switch_led", true),
            VendorOperation::new("bright_value", 500),
        ];
        let result = client(&server, &clock)
            .control_device("lamp", &operations)
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn execute_returns_vendor_message() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1.0/iot-03/devices/lamp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "msg": "ok",
                "result": {"id": "lamp"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .execute(reqwest::Method::GET, "/v1.0/iot-03/devices/lamp", None)
            .await;
        assert!(result.success);
        assert_eq!(result.message, "ok");
    }
}

// ============================================================================
// Failure normalization
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_send_nothing() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ok_response())
            .expect(0)
            .mount(&server)
            .await;

        let config = TuyaConfig::new("", "").with_base_url(server.uri());
        let client = TuyaClient::new(config).unwrap();

        let result = client
            .translate_and_send("dev1", &UnifiedCommand::Turn(PowerState::On))
            .await;
        assert!(!result.success);
        assert_eq!(
            result.message,
            "configuration error: Tuya client id and secret are not configured"
        );
        assert!(client.list_devices().await.is_empty());
        assert!(client.device_status("dev1").await.is_err());
    }

    #[tokio::test]
    async fn vendor_rejection_keeps_vendor_message() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "code": 2008,
                "msg": "command or value not support"
            })))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Brightness(50.0))
            .await;
        assert!(!result.success);
        assert_eq!(result.message, "command or value not support");
    }

    #[tokio::test]
    async fn http_error_keeps_status() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Brightness(50.0))
            .await;
        assert!(!result.success);
        assert!(result.message.contains("HTTP 500"));
        assert!(result.message.contains("upstream down"));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("dev1")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let result = client(&server, &clock)
            .translate_and_send("dev1", &UnifiedCommand::Brightness(50.0))
            .await;
        assert!(!result.success);
        assert!(result.message.starts_with("malformed response"));
    }

    #[tokio::test]
    async fn failed_request_keeps_cached_token() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(commands_path("broken")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(commands_path("good")))
            .respond_with(ok_response())
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let client = client(&server, &clock);
        let cmd = UnifiedCommand::Turn(PowerState::On);

        assert!(!client.translate_and_send("broken", &cmd).await.success);
        assert!(client.cached_token().await.is_some());
        assert!(client.translate_and_send("good", &cmd).await.success);
    }
}

// ============================================================================
// Device directory and status
// ============================================================================

mod directory {
    use super::*;

    const PRIMARY: &str = "/v1.0/iot-03/devices";
    const FALLBACK: &str = "/v1.0/iot-01/associated-users/devices";

    #[tokio::test]
    async fn primary_listing_is_used() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(PRIMARY))
            .and(header_exists("access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"devices": [{"id": "a"}, {"id": "b"}], "has_more": false}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FALLBACK))
            .respond_with(ok_response())
            .expect(0)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let devices = client(&server, &clock).list_devices().await;
        assert_eq!(devices, vec![json!({"id": "a"}), json!({"id": "b"})]);
    }

    #[tokio::test]
    async fn empty_primary_falls_back_to_flat_listing() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(PRIMARY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"devices": []}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FALLBACK))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "c"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let devices = client(&server, &clock).list_devices().await;
        assert_eq!(devices, vec![json!({"id": "c"})]);
    }

    #[tokio::test]
    async fn rejected_primary_falls_back_to_paged_listing() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(PRIMARY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "code": 1106,
                "msg": "permission deny"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FALLBACK))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"devices": [{"id": "d"}], "last_row_key": "x"}
            })))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let devices = client(&server, &clock).list_devices().await;
        assert_eq!(devices, vec![json!({"id": "d"})]);
    }

    #[tokio::test]
    async fn both_listings_failing_yields_empty() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(PRIMARY))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FALLBACK))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        assert!(client(&server, &clock).list_devices().await.is_empty());
    }

    #[tokio::test]
    async fn custom_listing_paths() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v2.0/cloud/thing/device"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "e"}]
            })))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let config = TuyaConfig::new(CLIENT_ID, CLIENT_SECRET)
            .with_base_url(server.uri())
            .with_device_list_paths("/v2.0/cloud/thing/device", FALLBACK);
        let client = TuyaClient::builder(config)
            .clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build()
            .unwrap();

        assert_eq!(client.list_devices().await, vec![json!({"id": "e"})]);
    }

    #[tokio::test]
    async fn device_status_reads_data_points() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1.0/iot-03/devices/lamp/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [
                    {"code": "switch_led", "value": true},
                    {"code": "bright_value", "value": 500}
                ]
            })))
            .mount(&server)
            .await;

        let clock = ManualClock::at(START);
        let status = client(&server, &clock).device_status("lamp").await.unwrap();
        assert_eq!(
            status,
            vec![
                VendorOperation::new("switch_led", true),
                VendorOperation::new("bright_value", 500),
            ]
        );
    }
}
