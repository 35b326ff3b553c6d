use foodvision_core::{Category, JobId, JobStatus, NutrientUnit, UploadOutcome};
use foodvision_engine::{
    encode_artifact, enrich, ClientSettings, EnrichError, Enricher, HttpStatusStore, HttpUploader,
    StatusStore, StoreQueryError, Uploader, UsdaEnricher,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        upload_url: format!("{}/image-upload", server.uri()),
        status_url: format!("{}/status", server.uri()),
        enrichment_url: format!("{}/fdc/v1/foods/search", server.uri()),
        enrichment_api_key: Some("test-key".to_string()),
        ..ClientSettings::default()
    }
}

#[tokio::test]
async fn upload_posts_id_and_base64_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/image-upload"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "image_id": "1700000000000",
            "image_data": "/9j/4A==",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(&settings_for(&server)).unwrap();
    let payload = encode_artifact(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    let outcome = uploader
        .upload(&JobId::new("1700000000000"), &payload)
        .await
        .expect("upload ok");
    assert_eq!(outcome, UploadOutcome::Accepted);
}

#[tokio::test]
async fn upload_non_2xx_is_rejected_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/image-upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(&settings_for(&server)).unwrap();
    let payload = encode_artifact(b"img").unwrap();
    let outcome = uploader.upload(&JobId::new("1"), &payload).await.unwrap();
    assert_eq!(outcome, UploadOutcome::Rejected { status: Some(500) });
}

#[tokio::test]
async fn status_query_sends_image_id_and_decodes_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("image_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "result": "5",
            "error": null,
        })))
        .mount(&server)
        .await;

    let store = HttpStatusStore::new(&settings_for(&server)).unwrap();
    let status = store.query(&JobId::new("42")).await.unwrap();
    assert_eq!(status, JobStatus::Success(5));
}

#[tokio::test]
async fn status_query_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Internal Server Error"})),
        )
        .mount(&server)
        .await;

    let store = HttpStatusStore::new(&settings_for(&server)).unwrap();
    let err = store.query(&JobId::new("42")).await.unwrap_err();
    assert_eq!(err, StoreQueryError::HttpStatus(500));
}

fn search_body() -> serde_json::Value {
    json!({
        "totalHits": 2,
        "foods": [
            {
                "description": "Chicken, breast, grilled",
                "foodNutrients": [
                    {"nutrientName": "Water", "value": 65.0, "unitName": "G"},
                    {"nutrientName": "Protein", "value": 31.0, "unitName": "G"},
                    {"nutrientName": "Energy", "value": 690.0, "unitName": "kJ"},
                    {"nutrientName": "Energy", "value": 165.0, "unitName": "KCAL"},
                    {"nutrientName": "Protein", "value": 30.5, "unitName": "G"},
                    {"nutrientName": "Sodium, Na", "value": 74.0, "unitName": "MG"}
                ]
            },
            {
                "description": "Second match is ignored",
                "foodNutrients": [
                    {"nutrientName": "Total Sugars", "value": 1.0, "unitName": "G"}
                ]
            }
        ]
    })
}

#[tokio::test]
async fn enrichment_searches_category_phrase_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .and(query_param("query", "grilled chicken breast"))
        .and(query_param("dataType", "Foundation"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let enricher = UsdaEnricher::new(&settings_for(&server)).unwrap();
    let records = enrich(&enricher, Category::Meat).await;

    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.name.as_str(), r.value, r.unit))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Protein", 31.0, NutrientUnit::G),
            ("Energy", 165.0, NutrientUnit::Kcal),
            ("Sodium, Na", 74.0, NutrientUnit::Mg),
        ]
    );
}

#[tokio::test]
async fn enrichment_without_foods_reports_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foods": []})))
        .mount(&server)
        .await;

    let enricher = UsdaEnricher::new(&settings_for(&server)).unwrap();
    let err = enricher.search("egg").await.unwrap_err();
    assert_eq!(err, EnrichError::NoResults("egg".to_string()));
    assert!(enrich(&enricher, Category::Egg).await.is_empty());
}

#[tokio::test]
async fn enrichment_failures_degrade_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let forbidden = UsdaEnricher::new(&settings).unwrap();
    assert_eq!(
        forbidden.search("egg").await.unwrap_err(),
        EnrichError::HttpStatus(403)
    );
    assert!(enrich(&forbidden, Category::Egg).await.is_empty());

    let broken = UsdaEnricher::new(&ClientSettings {
        enrichment_url: format!("{}/broken/search", server.uri()),
        ..settings
    })
    .unwrap();
    assert!(matches!(
        broken.search("egg").await,
        Err(EnrichError::Decode(_))
    ));
    assert!(enrich(&broken, Category::Egg).await.is_empty());
}
