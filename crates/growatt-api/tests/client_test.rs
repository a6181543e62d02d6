#![allow(clippy::unwrap_used)]
// Integration tests for `GrowattClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use growatt_api::{DeviceQuery, Error, FaultLogQuery, GrowattClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GrowattClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GrowattClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "user": { "id": 7001, "accountName": "demo" } }
        })))
        .mount(server)
        .await;
}

async fn logged_in() -> (MockServer, GrowattClient) {
    let (server, client) = setup().await;
    mount_login(&server).await;
    let secret: secrecy::SecretString = "pw".to_string().into();
    client.login("demo", &secret).await.unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_user_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .and(body_string_contains("userName=demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "user": { "id": 7001 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.is_logged_in());
    let secret: secrecy::SecretString = "pw".to_string().into();
    client.login("demo", &secret).await.unwrap();

    assert!(client.is_logged_in());
    assert_eq!(client.user_id().as_deref(), Some("7001"));
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": false, "msg": "501", "error": "User Does Not Exist" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("demo", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "User Does Not Exist"),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_parameter_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": false, "msg": "param_error" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    let result = client.login("demo", &secret).await;

    assert!(matches!(result, Err(Error::InvalidParameters { .. })));
}

#[tokio::test]
async fn test_logout_clears_user_id() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/logout.do"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.is_logged_in());
}

// ── Plant tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_plants() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/PlantListAPI.do"))
        .and(query_param("userId", "7001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": {
                "success": true,
                "data": [
                    { "plantId": 42, "plantName": "Home", "currentPower": "1.5 kW", "todayEnergy": "7.2" },
                    { "plantId": "43", "plantName": "Barn" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let plants = client.list_plants().await.unwrap();

    assert_eq!(plants.len(), 2);
    assert_eq!(plants[0].plant_id, "42");
    assert_eq!(plants[0].plant_name.as_deref(), Some("Home"));
    assert_eq!(plants[0].current_power, Some(1.5));
    assert_eq!(plants[0].today_energy, Some(7.2));
    assert_eq!(plants[1].plant_id, "43");
}

#[tokio::test]
async fn test_list_plants_requires_login() {
    let (_server, client) = setup().await;
    let result = client.list_plants().await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}

#[tokio::test]
async fn test_get_plant_null_data_is_none() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newTwoPlantAPI.do"))
        .and(query_param("op", "getPlant"))
        .and(query_param("plantId", "999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "data": null }
        })))
        .mount(&server)
        .await;

    let plant = client.get_plant("999").await.unwrap();
    assert!(plant.is_none());
}

#[tokio::test]
async fn test_list_plants_wrong_shape() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/PlantListAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "data": { "plantId": 42 } }
        })))
        .mount(&server)
        .await;

    let result = client.list_plants().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_weather() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newPlantAPI.do"))
        .and(query_param("op", "getWeather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": {
                "success": true,
                "data": { "city": "Shenzhen", "tmp": "29", "cond_txt": "Sunny", "hum": 70 }
            }
        })))
        .mount(&server)
        .await;

    let weather = client.get_weather("42").await.unwrap().unwrap();
    assert_eq!(weather.city.as_deref(), Some("Shenzhen"));
    assert_eq!(weather.temperature, Some(29.0));
    assert_eq!(weather.condition.as_deref(), Some("Sunny"));
    assert_eq!(weather.humidity, Some(70.0));
}

// ── Device / fault tests ────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_with_paging() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newTwoPlantAPI.do"))
        .and(query_param("op", "getAllDeviceList"))
        .and(query_param("plantId", "42"))
        .and(query_param("pageNum", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": {
                "success": true,
                "data": [{ "deviceSn": "INV001", "deviceType": "inverter", "power": 1200 }]
            }
        })))
        .mount(&server)
        .await;

    let query = DeviceQuery {
        page: Some(2),
        ..DeviceQuery::new("42")
    };
    let devices = client.list_devices(&query).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_sn, "INV001");
    assert_eq!(devices[0].power, Some(1200.0));
}

#[tokio::test]
async fn test_fault_logs_bad_request_is_parameter_error() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newFaultLogAPI.do"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad type"))
        .mount(&server)
        .await;

    let query = FaultLogQuery {
        kind: Some(9),
        ..FaultLogQuery::new("42")
    };
    let result = client.list_fault_logs(&query).await;
    assert!(result.as_ref().is_err_and(Error::is_parameter_error), "{result:?}");
}

#[tokio::test]
async fn test_not_login_message_is_session_expired() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newFaultLogAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": false, "msg": "not_login" }
        })))
        .mount(&server)
        .await;

    let result = client.list_fault_logs(&FaultLogQuery::new("42")).await;
    assert!(result.as_ref().is_err_and(Error::is_auth_expired), "{result:?}");
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/newPlantAPI.do"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.get_weather("42").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: Some(503), .. }), "{err:?}");
    assert!(!err.is_parameter_error() && !err.is_auth_expired());
}
