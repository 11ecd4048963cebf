//! Shared fixtures for the orchestration integration tests: a client wired
//! to a mockito server with a short retry delay, and wire-shaped JSON
//! builders for the backend's record types.
#![allow(dead_code)] // each test binary uses its own subset

use std::time::Duration;

use chrono::Utc;
use ekos_api_client::{ApiClient, Session};
use ekos_core::models::{Role, User};
use ekos_core::ClientConfig;
use serde_json::{json, Value};

pub fn test_user(role: Role) -> User {
    User {
        id: "u-1".to_string(),
        username: "denetci".to_string(),
        email: "denetci@example.com".to_string(),
        role,
        email_verified: true,
        created_at: Utc::now(),
    }
}

/// Client against the given mock server. `role: None` leaves the session
/// unauthenticated.
pub fn client_for(server_url: &str, role: Option<Role>) -> ApiClient {
    let config = ClientConfig {
        retry_delay: Duration::from_millis(5),
        ..ClientConfig::default().with_api_url(server_url)
    };
    let client = ApiClient::new(config, Session::new()).expect("client");
    if let Some(role) = role {
        client
            .session()
            .establish("test-token".to_string(), test_user(role));
    }
    client
}

/// Minimal wire-shaped report record.
pub fn report_value(id: &str) -> Value {
    json!({
        "id": id,
        "rapor_no": format!("PK2025-ANK-{id}"),
        "proje_id": "p-1",
        "proje_adi": "Ankara Konut Projesi",
        "sehir": "Ankara",
        "sehir_kodu": "ANK",
        "ekipman_adi": "Kule Vinç",
        "kategori": "Vinç",
        "firma": "ABC İnşaat",
        "durum": "Aktif",
        "created_by": "u-1",
        "created_by_username": "denetci",
        "created_at": "2025-06-01T10:00:00Z",
        "updated_at": "2025-06-01T10:00:00Z"
    })
}

pub fn report_list(ids: &[&str]) -> Value {
    Value::Array(ids.iter().map(|id| report_value(id)).collect())
}

pub fn attachment_value(id: &str, file_name: &str) -> Value {
    json!({
        "id": id,
        "rapor_id": "r-1",
        "dosya_adi": file_name,
        "dosya_tipi": "application/octet-stream",
        "dosya_boyutu": 2048,
        "created_at": "2025-06-01T10:00:00Z"
    })
}
