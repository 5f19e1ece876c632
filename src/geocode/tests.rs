use std::sync::Arc;
use std::time::Duration;

use ctor::ctor;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::geocode::{
    parse_geocode_response, AddressCoordinateCache, Coordinates, GeocodeError, GeocodeResolver,
    GoogleGeocoder, DEFAULT_OPTION_KEY,
};
use crate::settings::{InMemSettings, SettingsStore};
use crate::utils::setup_logging;

#[ctor]
fn setup_logging_() {
    setup_logging(true);
}

fn ok_body(lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "status": "OK",
        "results": [
            {"geometry": {"location": {"lat": lat, "lng": lng}}},
            {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
        ]
    })
}

fn resolver_for(mock_server: &MockServer, settings: Arc<dyn SettingsStore>) -> GeocodeResolver {
    let endpoint = format!("{}/maps/api/geocode/json", mock_server.uri());
    let client = GoogleGeocoder::new().with_endpoint(&endpoint);
    GeocodeResolver::new(settings, Arc::new(client))
}

async fn request_count(mock_server: &MockServer) -> usize {
    mock_server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_miss_fetches_once_and_stores() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "1600 Amphitheatre Pkwy, Mountain View, CA"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(37.4224, -122.0842)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let resolver = resolver_for(&mock_server, settings.clone());

    let coords = resolver
        .resolve("1600 Amphitheatre Pkwy, Mountain View, CA", "test-key")
        .await
        .unwrap();
    assert_eq!(coords, Coordinates::new(37.4224, -122.0842));

    let stored = settings.get(DEFAULT_OPTION_KEY).await.unwrap().unwrap();
    assert_eq!(
        stored,
        json!({
            "1600 Amphitheatre Pkwy, Mountain View, CA": {
                "latitude": 37.4224,
                "longitude": -122.0842
            }
        })
    );
}

#[tokio::test]
async fn test_hit_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(51.5074, -0.1278)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server, Arc::new(InMemSettings::new()));

    let first = resolver.resolve("London", "k").await.unwrap();
    let second = resolver.resolve("London", "k").await.unwrap();
    let third = resolver.resolve("London", "k").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_seeded_entry_is_returned_without_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(0.0, 0.0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    settings
        .set(
            DEFAULT_OPTION_KEY,
            &json!({"New York, NY": {"latitude": 40.7128, "longitude": -74.006}}),
        )
        .await
        .unwrap();

    let resolver = resolver_for(&mock_server, settings);
    let coords = resolver.resolve("New York, NY", "k").await.unwrap();

    assert_eq!(coords.latitude, 40.7128);
    assert_eq!(coords.longitude, -74.006);
}

#[tokio::test]
async fn test_keys_are_not_normalized() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(40.7128, -74.006)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    settings
        .set(
            DEFAULT_OPTION_KEY,
            &json!({"New York, NY": {"latitude": 40.7128, "longitude": -74.006}}),
        )
        .await
        .unwrap();

    let resolver = resolver_for(&mock_server, settings);
    resolver.resolve("new york, ny", "k").await.unwrap();

    let cache = resolver.load_cache().await.unwrap();
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_service_error_leaves_cache_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let seeded = json!({"Paris": {"latitude": 48.8566, "longitude": 2.3522}});
    settings.set(DEFAULT_OPTION_KEY, &seeded).await.unwrap();

    let resolver = resolver_for(&mock_server, settings.clone());
    let ret = resolver.resolve("Berlin", "").await;

    match ret {
        Err(GeocodeError::Service { status, message }) => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message, "The provided API key is invalid.");
        }
        other => panic!("expected service error, got {:?}", other),
    }
    assert_eq!(
        settings.get(DEFAULT_OPTION_KEY).await.unwrap(),
        Some(seeded)
    );
}

#[tokio::test]
async fn test_service_error_without_message_and_empty_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let resolver = resolver_for(&mock_server, settings.clone());
    let err = resolver.resolve("Nowhere", "k").await.unwrap_err();

    assert_eq!(err.error_code(), "SERVICE_ERROR");
    assert!(err.to_string().contains("\"Nowhere\""));
    assert_eq!(settings.get(DEFAULT_OPTION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_json_is_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let resolver = resolver_for(&mock_server, settings.clone());
    let err = resolver.resolve("Madrid", "k").await.unwrap_err();

    assert!(matches!(err, GeocodeError::Transport { .. }));
    assert_eq!(settings.get(DEFAULT_OPTION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // nothing listens on port 1
    let endpoint = "http://127.0.0.1:1/maps/api/geocode/json";

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let client = GoogleGeocoder::new().with_endpoint(endpoint);
    let resolver = GeocodeResolver::new(settings.clone(), Arc::new(client));

    let err = resolver.resolve("Rome", "k").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Transport { .. }));
    assert_eq!(err.http_status(), 502);
    assert_eq!(settings.get(DEFAULT_OPTION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_option_is_not_overwritten() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(1.0, 2.0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    settings
        .set(DEFAULT_OPTION_KEY, &json!("not a map"))
        .await
        .unwrap();

    let resolver = resolver_for(&mock_server, settings.clone());
    let err = resolver.resolve("Lisbon", "k").await.unwrap_err();

    assert_eq!(err.error_code(), "SETTINGS_CORRUPT");
    assert_eq!(
        settings.get(DEFAULT_OPTION_KEY).await.unwrap(),
        Some(json!("not a map"))
    );
}

#[tokio::test]
async fn test_custom_option_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(59.3293, 18.0686)))
        .mount(&mock_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let resolver = resolver_for(&mock_server, settings.clone()).with_option_key("theme_coords");
    resolver.resolve("Stockholm", "k").await.unwrap();

    assert!(settings.get("theme_coords").await.unwrap().is_some());
    assert!(settings.get(DEFAULT_OPTION_KEY).await.unwrap().is_none());

    assert!(resolver.forget_all().await.unwrap());
    assert!(settings.get("theme_coords").await.unwrap().is_none());
}

// Concurrent misses for one address are not deduplicated: both reach the
// service and whichever write lands last is kept.
#[tokio::test]
async fn test_concurrent_misses_last_writer_wins() {
    let first_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(10.0, 20.0))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&first_server)
        .await;
    let second_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(30.0, 40.0))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&second_server)
        .await;

    let settings: Arc<dyn SettingsStore> = Arc::new(InMemSettings::new());
    let first = resolver_for(&first_server, settings.clone());
    let second = resolver_for(&second_server, settings.clone());

    let (a, b) = tokio::join!(
        first.resolve("Same Street 1", "k"),
        second.resolve("Same Street 1", "k")
    );
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a, Coordinates::new(10.0, 20.0));
    assert_eq!(b, Coordinates::new(30.0, 40.0));

    let cache: AddressCoordinateCache = first.load_cache().await.unwrap();
    assert_eq!(cache.len(), 1);
    let stored = cache["Same Street 1"];
    assert!(stored == a || stored == b);
}

#[test]
fn test_parse_uses_first_result() {
    let body = serde_json::to_vec(&ok_body(48.2082, 16.3738)).unwrap();
    let coords = parse_geocode_response("Vienna", &body).unwrap();
    assert_eq!(coords, Coordinates::new(48.2082, 16.3738));
}

#[test]
fn test_parse_ok_without_results_is_transport_error() {
    let body = br#"{"status": "OK", "results": []}"#;
    let err = parse_geocode_response("Oslo", body).unwrap_err();
    assert!(matches!(err, GeocodeError::Transport { .. }));
}

#[test]
fn test_parse_empty_error_message_falls_back() {
    let body = br#"{"status": "OVER_QUERY_LIMIT", "error_message": ""}"#;
    let err = parse_geocode_response("Oslo", body).unwrap_err();
    assert!(err.to_string().starts_with("Something went wrong"));
}
