//! Integration tests for the HTTP point store.
//!
//! A wiremock server stands in for the REST database, so these tests cover
//! the exact requests sent and how responses map to `StoreError`.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pointmap::core::types::{PointFields, RecordId};
use pointmap::store::http::HttpStore;
use pointmap::store::mock::MockStore;
use pointmap::store::{PointStore, StoreError};

fn rid(s: &str) -> RecordId {
    RecordId::new(s).unwrap()
}

fn store(server: &MockServer) -> HttpStore {
    HttpStore::new(&server.uri(), "points", None).unwrap()
}

mod list {
    use super::*;

    #[tokio::test]
    async fn parses_records_and_passes_malformed_entries_on() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "-Na": {"name": "Tugu", "coordinates": "-7.782900000,110.367100000"},
                "-Nb": {"name": "Kraton", "coordinates": "not,coords"},
                "-Nc": "just a string",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let listing = store(&server).list().await.unwrap();

        assert_eq!(listing.len(), 3);
        assert_eq!(listing[&rid("-Na")].name, "Tugu");
        // Coordinate text is passed through; reconciliation decides.
        assert_eq!(listing[&rid("-Nb")].coordinates, "not,coords");
        assert_eq!(listing[&rid("-Nc")], PointFields::new("", ""));
    }

    #[tokio::test]
    async fn sequential_keys_come_back_as_an_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                null,
                {"name": "Tugu", "coordinates": "-7.7829,110.3671"},
                null,
                {"name": "Kraton", "coordinates": "-7.8053,110.3642"}
            ])))
            .mount(&server)
            .await;

        let listing = store(&server).list().await.unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[&rid("1")].name, "Tugu");
        assert_eq!(listing[&rid("3")].name, "Kraton");
    }

    #[tokio::test]
    async fn null_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&server)
            .await;

        assert!(store(&server).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_auth_token_and_nested_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1/points.json"))
            .and(query_param("auth", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), "users/u1/points", Some("tok".into())).unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}

mod get {
    use super::*;

    #[tokio::test]
    async fn returns_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/-Na.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Tugu",
                "coordinates": "-7.7829,110.3671"
            })))
            .mount(&server)
            .await;

        let fields = store(&server).get(&rid("-Na")).await.unwrap();
        assert_eq!(fields, PointFields::new("Tugu", "-7.7829,110.3671"));
    }

    #[tokio::test]
    async fn null_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/gone.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&server)
            .await;

        let err = store(&server).get(&rid("gone")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

mod mutations {
    use super::*;

    #[tokio::test]
    async fn create_posts_fields_and_returns_generated_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points.json"))
            .and(body_json(json!({
                "name": "Tugu",
                "coordinates": "-7.782900000,110.367100000"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "-NewId"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = store(&server)
            .create(PointFields::new("Tugu", "-7.782900000,110.367100000"))
            .await
            .unwrap();
        assert_eq!(id, rid("-NewId"));
    }

    #[tokio::test]
    async fn create_with_unusable_id_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "a/b"})))
            .mount(&server)
            .await;

        let err = store(&server)
            .create(PointFields::new("x", "1,1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidResponse(_)));
    }

    async fn mount_current(server: &MockServer, id: &str, etag: Option<&str>) {
        let mut response = ResponseTemplate::new(200)
            .set_body_json(json!({"name": "Tugu", "coordinates": "-7.7829,110.3671"}));
        if let Some(etag) = etag {
            response = response.insert_header("ETag", etag);
        }
        Mock::given(method("GET"))
            .and(path(format!("/points/{}.json", id)))
            .and(header("X-Firebase-ETag", "true"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn update_puts_record_conditioned_on_etag() {
        let server = MockServer::start().await;
        mount_current(&server, "-Na", Some("etag-1")).await;
        Mock::given(method("PUT"))
            .and(path("/points/-Na.json"))
            .and(header("if-match", "etag-1"))
            .and(body_json(json!({"name": "Tugu Jogja", "coordinates": "1.000000000,2.000000000"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "Tugu Jogja", "coordinates": "1.000000000,2.000000000"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .update(
                &rid("-Na"),
                PointFields::new("Tugu Jogja", "1.000000000,2.000000000"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_without_etag_patches_after_existence_check() {
        let server = MockServer::start().await;
        mount_current(&server, "-Na", None).await;
        Mock::given(method("PATCH"))
            .and(path("/points/-Na.json"))
            .and(body_json(json!({"name": "Tugu Jogja", "coordinates": "1.000000000,2.000000000"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .update(
                &rid("-Na"),
                PointFields::new("Tugu Jogja", "1.000000000,2.000000000"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_of_deleted_record_is_not_found_and_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/gone.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&server)
            .await;
        for verb in ["PUT", "PATCH"] {
            Mock::given(method(verb))
                .and(path("/points/gone.json"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(0)
                .mount(&server)
                .await;
        }

        let fields = PointFields::new("X", "0.000000000,0.000000000");
        let http = store(&server).update(&rid("gone"), fields.clone()).await;
        let memory = MockStore::new().update(&rid("gone"), fields).await;

        assert!(matches!(http, Err(StoreError::NotFound(_))));
        assert!(matches!(memory, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_racing_a_delete_is_not_found() {
        let server = MockServer::start().await;
        mount_current(&server, "-Na", Some("etag-1")).await;
        Mock::given(method("PUT"))
            .and(path("/points/-Na.json"))
            .respond_with(ResponseTemplate::new(412))
            .expect(1)
            .mount(&server)
            .await;

        let err = store(&server)
            .update(&rid("-Na"), PointFields::new("X", "0,0"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_sends_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/points/-Na.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).delete(&rid("-Na")).await.unwrap();
    }
}

mod errors {
    use super::*;

    async fn failing(status: u16, body: Option<serde_json::Value>) -> StoreError {
        let server = MockServer::start().await;
        let mut response = ResponseTemplate::new(status);
        if let Some(body) = body {
            response = response.set_body_json(body);
        }
        Mock::given(method("GET"))
            .and(path("/points.json"))
            .respond_with(response)
            .mount(&server)
            .await;

        store(&server).list().await.unwrap_err()
    }

    #[tokio::test]
    async fn permission_denied_is_auth_failed_with_server_message() {
        let err = failing(401, Some(json!({"error": "Permission denied"}))).await;
        assert_eq!(err, StoreError::AuthFailed("Permission denied".into()));
        assert_eq!(err.to_string(), "authentication failed: Permission denied");
    }

    #[tokio::test]
    async fn rate_limited() {
        assert_eq!(failing(429, None).await, StoreError::RateLimited);
    }

    #[tokio::test]
    async fn server_error_without_body_uses_reason() {
        let err = failing(503, None).await;
        assert_eq!(
            err,
            StoreError::ApiError {
                status: 503,
                message: "server error: Service Unavailable".into(),
            }
        );
    }

    #[tokio::test]
    async fn other_client_errors_are_api_errors() {
        let err = failing(400, Some(json!({"error": "Invalid data"}))).await;
        assert_eq!(
            err,
            StoreError::ApiError {
                status: 400,
                message: "Invalid data".into(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let store = HttpStore::new(&uri, "points", None).unwrap();
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::NetworkError(_)));
    }
}
