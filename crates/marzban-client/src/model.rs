//! Domain records for the panel API
//!
//! Plain serde types decoded from server responses. Optional fields map
//! absent JSON keys to `None` (or a stated default); a missing required
//! field is a decode failure, surfaced by the client as a malformed
//! response. Timestamps decode into structured chrono values straight from
//! the wire formats the panel uses: unix seconds for `expire`, naive
//! ISO-8601 for `created_at`/`online_at`.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A panel administrator account.
///
/// `password` is write-only: sent on create, never returned by the server,
/// and skipped on serialization when absent. `telegram_id` and
/// `discord_webhook` are the panel's optional notification contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub username: String,
    pub is_sudo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_webhook: Option<String>,
}

/// Serialize-only body for the admin update operation.
///
/// The username travels in the URL path, not the body. A `None` password
/// leaves the stored password untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub is_sudo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_webhook: Option<String>,
}

/// Response from the authenticate operation.
///
/// Consumed immediately to populate the bearer token on the client handle;
/// also handed back to the caller for inspection or storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Account status as the panel reports it in subscription info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Disabled,
    Limited,
    Expired,
    OnHold,
}

/// Traffic counter reset cadence attached to a data limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStrategy {
    #[default]
    NoReset,
    Day,
    Week,
    Month,
    Year,
}

/// Target client application format for a subscription payload.
///
/// Doubles as the final path segment of the subscription fetch URL, so the
/// wire spelling and the `Display` form are the same kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    V2ray,
    V2rayJson,
    Clash,
    ClashMeta,
    SingBox,
    Outline,
    Links,
}

impl ClientType {
    /// Wire spelling, used as the URL path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientType::V2ray => "v2ray",
            ClientType::V2rayJson => "v2ray-json",
            ClientType::Clash => "clash",
            ClientType::ClashMeta => "clash-meta",
            ClientType::SingBox => "sing-box",
            ClientType::Outline => "outline",
            ClientType::Links => "links",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-protocol proxy credential settings inside a subscription.
///
/// Which fields are present depends on the protocol: vmess/vless carry
/// `id` (and vless optionally `flow`), trojan carries `password`,
/// shadowsocks carries `password` and `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proxy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// One inbound listener as the panel reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
    pub tag: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Panel host and usage statistics.
///
/// Memory sizes and bandwidth counters are bytes; speeds are bytes per
/// second. `total_user` is the panel's own (singular) field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub version: String,
    pub mem_total: u64,
    pub mem_used: u64,
    pub cpu_cores: u64,
    pub cpu_usage: f64,
    pub total_user: u64,
    pub users_active: u64,
    pub incoming_bandwidth: u64,
    pub outgoing_bandwidth: u64,
    pub incoming_bandwidth_speed: u64,
    pub outgoing_bandwidth_speed: u64,
}

/// A fetched subscription payload.
///
/// `payload` is the raw body in whatever format the target client type
/// expects (YAML for clash, base64 link lists for v2ray, and so on); this
/// library hands it over without parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub token: String,
    pub client_type: ClientType,
    /// URL path the payload was fetched from.
    pub path: String,
    pub payload: String,
}

/// Read-only account aggregate behind a subscription token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub username: String,
    pub status: Status,
    /// Bytes used in the current limit window.
    #[serde(default)]
    pub used_traffic: u64,
    /// Bytes used across all resets.
    #[serde(default)]
    pub lifetime_used_traffic: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<u64>,
    #[serde(default)]
    pub data_limit_reset_strategy: LimitStrategy,
    /// Expiry instant; the wire carries unix seconds or null.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expire: Option<DateTime<Utc>>,
    /// Naive ISO-8601 on the wire, no timezone.
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_at: Option<NaiveDateTime>,
    /// Protocol name → credential settings.
    #[serde(default)]
    pub proxies: HashMap<String, Proxy>,
    /// Protocol name → inbound tags the account is placed in.
    #[serde(default)]
    pub inbounds: HashMap<String, Vec<String>>,
    /// Derived per-client config URLs.
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn admin_deserializes_without_password() {
        let json = r#"{"username":"kozma","is_sudo":true}"#;
        let admin: Admin = serde_json::from_str(json).unwrap();
        assert_eq!(admin.username, "kozma");
        assert!(admin.is_sudo);
        assert!(admin.password.is_none());
        assert!(admin.telegram_id.is_none());
    }

    #[test]
    fn admin_skips_absent_password_on_serialize() {
        let admin = Admin {
            username: "kozma".into(),
            is_sudo: false,
            password: None,
            telegram_id: None,
            discord_webhook: None,
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("password"), "got: {json}");
        assert!(!json.contains("telegram_id"), "got: {json}");
    }

    #[test]
    fn admin_serializes_password_when_set() {
        let admin = Admin {
            username: "kozma".into(),
            is_sudo: false,
            password: Some("hunter2".into()),
            telegram_id: Some(42),
            discord_webhook: None,
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(json.contains("\"password\":\"hunter2\""), "got: {json}");
        assert!(json.contains("\"telegram_id\":42"), "got: {json}");
    }

    #[test]
    fn admin_missing_username_fails_to_decode() {
        let json = r#"{"is_sudo":true}"#;
        let result = serde_json::from_str::<Admin>(json);
        assert!(result.is_err(), "username is required");
    }

    #[test]
    fn admin_update_skips_unset_fields() {
        let update = AdminUpdate {
            is_sudo: true,
            ..AdminUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"is_sudo":true}"#);
    }

    #[test]
    fn access_token_round_trips() {
        let json = r#"{"access_token":"tok123","token_type":"bearer"}"#;
        let token: AccessToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "tok123");
        assert_eq!(token.token_type, "bearer");

        let back = serde_json::to_string(&token).unwrap();
        assert!(back.contains("\"access_token\":\"tok123\""));
    }

    #[test]
    fn status_uses_snake_case_wire_form() {
        let status: Status = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(status, Status::OnHold);
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), r#""active""#);
    }

    #[test]
    fn limit_strategy_defaults_to_no_reset() {
        assert_eq!(LimitStrategy::default(), LimitStrategy::NoReset);
        let strategy: LimitStrategy = serde_json::from_str(r#""no_reset""#).unwrap();
        assert_eq!(strategy, LimitStrategy::NoReset);
    }

    #[test]
    fn client_type_display_matches_path_segment() {
        assert_eq!(ClientType::V2rayJson.to_string(), "v2ray-json");
        assert_eq!(ClientType::SingBox.as_str(), "sing-box");
        assert_eq!(ClientType::ClashMeta.as_str(), "clash-meta");
    }

    #[test]
    fn client_type_serde_matches_path_segment() {
        // The serde rename and as_str() must agree, since both describe the
        // same wire spelling.
        for ct in [
            ClientType::V2ray,
            ClientType::V2rayJson,
            ClientType::Clash,
            ClientType::ClashMeta,
            ClientType::SingBox,
            ClientType::Outline,
            ClientType::Links,
        ] {
            let wire = serde_json::to_string(&ct).unwrap();
            assert_eq!(wire, format!("\"{}\"", ct.as_str()));
        }
    }

    #[test]
    fn inbound_tolerates_missing_optionals() {
        let json = r#"{"tag":"VLESS GRPC","protocol":"vless"}"#;
        let inbound: Inbound = serde_json::from_str(json).unwrap();
        assert_eq!(inbound.tag, "VLESS GRPC");
        assert!(inbound.port.is_none());
        assert!(inbound.tls.is_none());
    }

    #[test]
    fn system_stats_decodes_panel_shape() {
        let json = r#"{
            "version": "0.4.9",
            "mem_total": 8217427968,
            "mem_used": 2910195712,
            "cpu_cores": 4,
            "cpu_usage": 12.5,
            "total_user": 210,
            "users_active": 184,
            "incoming_bandwidth": 1350000000,
            "outgoing_bandwidth": 890000000,
            "incoming_bandwidth_speed": 12500,
            "outgoing_bandwidth_speed": 8100
        }"#;
        let stats: SystemStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.version, "0.4.9");
        assert_eq!(stats.cpu_cores, 4);
        assert_eq!(stats.total_user, 210);
        assert_eq!(stats.users_active, 184);
    }

    #[test]
    fn subscription_info_decodes_full_shape() {
        let json = r#"{
            "username": "kozma",
            "status": "active",
            "used_traffic": 5000000,
            "lifetime_used_traffic": 7000000,
            "data_limit": 10000000000,
            "data_limit_reset_strategy": "month",
            "expire": 1735689600,
            "created_at": "2023-11-10T22:23:09",
            "online_at": "2024-01-01T08:00:00",
            "proxies": {
                "vless": {"id": "8bfe9f1e-9e6b-4dcb-b7d5-7f2f6f1a1c0e", "flow": "xtls-rprx-vision"},
                "trojan": {"password": "p4ss"}
            },
            "inbounds": {"vless": ["VLESS TCP"]},
            "links": ["vless://..."],
            "subscription_url": "/sub/abc123"
        }"#;
        let info: SubscriptionInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.username, "kozma");
        assert_eq!(info.status, Status::Active);
        assert_eq!(info.data_limit, Some(10_000_000_000));
        assert_eq!(info.data_limit_reset_strategy, LimitStrategy::Month);
        assert_eq!(
            info.expire,
            Some(DateTime::from_timestamp(1_735_689_600, 0).unwrap())
        );
        assert_eq!(
            info.created_at,
            NaiveDate::from_ymd_opt(2023, 11, 10)
                .unwrap()
                .and_hms_opt(22, 23, 9)
                .unwrap()
        );
        let vless = &info.proxies["vless"];
        assert_eq!(
            vless.id,
            Some("8bfe9f1e-9e6b-4dcb-b7d5-7f2f6f1a1c0e".parse().unwrap())
        );
        assert_eq!(vless.flow.as_deref(), Some("xtls-rprx-vision"));
        assert_eq!(info.inbounds["vless"], vec!["VLESS TCP"]);
        assert_eq!(info.links.len(), 1);
    }

    #[test]
    fn subscription_info_tolerates_minimal_shape() {
        // Absent optionals and null expire must decode with defaults, not fail.
        let json = r#"{
            "username": "bare",
            "status": "expired",
            "expire": null,
            "created_at": "2024-02-29T00:00:00"
        }"#;
        let info: SubscriptionInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.username, "bare");
        assert_eq!(info.status, Status::Expired);
        assert_eq!(info.used_traffic, 0);
        assert!(info.expire.is_none());
        assert!(info.online_at.is_none());
        assert!(info.proxies.is_empty());
        assert!(info.links.is_empty());
        assert_eq!(info.data_limit_reset_strategy, LimitStrategy::NoReset);
    }

    #[test]
    fn subscription_info_requires_username() {
        let json = r#"{"status":"active","created_at":"2024-01-01T00:00:00"}"#;
        let result = serde_json::from_str::<SubscriptionInfo>(json);
        assert!(result.is_err(), "username is required");
    }
}
