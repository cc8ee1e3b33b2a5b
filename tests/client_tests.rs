// HTTP client tests against mocked Sanity, Gemini and OpenAI endpoints

use mockito::{Matcher, Server};
use serde_json::json;
use urbanclay_feed::models::{ImageMetadata, SearchFilters};
use urbanclay_feed::services::{
    resolve_reference_image, GeminiClient, ImageGenerator, Reindexer, SanityClient, SanityError,
    PLACEHOLDER_IMAGE_URL,
};

const QUERY_PATH: &str = r"^/v2023-05-03/data/query/production";
const MUTATE_PATH: &str = r"^/v2023-05-03/data/mutate/production";
const ASSETS_PATH: &str = r"^/v2023-05-03/assets/images/production";

fn sanity(server: &Server, token: Option<&str>) -> SanityClient {
    SanityClient::new(
        server.url(),
        "2023-05-03".to_string(),
        "production".to_string(),
        token.map(str::to_string),
    )
    .unwrap()
}

fn gemini(server: &Server, key: Option<&str>) -> GeminiClient {
    GeminiClient::new(server.url(), "gemini-1.5-flash".to_string(), key.map(str::to_string)).unwrap()
}

fn seed() -> ImageMetadata {
    ImageMetadata {
        title: "Residential for Jaipur".to_string(),
        style: "Heritage".to_string(),
        material: "Terracotta Jali".to_string(),
        project_type: "Residential".to_string(),
        ..ImageMetadata::default()
    }
}

#[tokio::test]
async fn test_candidate_pool_parses_cms_documents() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "result": [
                    {"_id": "img-1", "title": "Jali Screen", "imageUrl": "https://cdn.sanity.io/a.jpg",
                     "material": "Terracotta Jali", "style": "Heritage", "projectType": "Residential"},
                    {"_id": "img-2", "title": null, "imageUrl": null, "material": null, "style": null, "projectType": null}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let candidates = sanity(&server, Some("sk-test")).fetch_candidate_pool(200).await.unwrap();

    mock.assert_async().await;
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, "img-1");
    assert_eq!(candidates[0].material.as_deref(), Some("Terracotta Jali"));
    assert!(candidates[1].image_url.is_none());
}

#[tokio::test]
async fn test_inspiration_walks_all_fallbacks() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": []}"#)
        .expect(3)
        .create_async()
        .await;

    let images = sanity(&server, None)
        .inspiration_images(&["Clay Flooring".to_string()], "Rustic")
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(images.is_empty());
}

#[tokio::test]
async fn test_inspiration_stops_at_first_hit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": [{"_id": "img-9", "imageUrl": "https://cdn.sanity.io/9.jpg"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let images = sanity(&server, None)
        .inspiration_images(&["Brick Tile".to_string()], "Modern Minimal")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(images.len(), 1);
}

#[tokio::test]
async fn test_product_by_id_missing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .match_query(Matcher::UrlEncoded("$id".to_string(), "\"gone\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": null}"#)
        .create_async()
        .await;

    let product = sanity(&server, None).product_by_id("gone").await.unwrap();

    mock.assert_async().await;
    assert!(product.is_none());
}

#[tokio::test]
async fn test_similar_items_binds_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("$id".to_string(), "\"img-1\"".to_string()),
            Matcher::UrlEncoded("$material".to_string(), "\"Terracotta Jali\"".to_string()),
            Matcher::UrlEncoded("$style".to_string(), "\"Heritage\"".to_string()),
            Matcher::Regex(r"0\.\.\.4".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"result": [
                {"_id": "img-2", "imageUrl": "https://cdn.sanity.io/2.jpg", "material": "Terracotta Jali", "style": "Rustic"},
                {"_id": "img-3", "imageUrl": "https://cdn.sanity.io/3.jpg", "material": "Brick Tile", "style": "Heritage"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let similar = sanity(&server, None)
        .similar_items("img-1", "Terracotta Jali", "Heritage")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(similar.len(), 2);
    assert!(similar.iter().all(|c| c.id != "img-1"));
}

#[tokio::test]
async fn test_unauthorized_query() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(401)
        .with_body(r#"{"error": "Unauthorized"}"#)
        .create_async()
        .await;

    let err = sanity(&server, Some("wrong"))
        .search_catalog(&SearchFilters::free_text("red"))
        .await
        .unwrap_err();

    assert!(matches!(err, SanityError::Unauthorized));
}

#[tokio::test]
async fn test_upload_creates_catalog_document() {
    let mut server = Server::new_async().await;
    let asset = server
        .mock("POST", Matcher::Regex(ASSETS_PATH.to_string()))
        .match_header("content-type", "image/png")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"document": {"_id": "image-abc123-1024x1024-png", "url": "https://cdn.sanity.io/x.png"}}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", Matcher::Regex(MUTATE_PATH.to_string()))
        .match_body(Matcher::PartialJson(json!({
            "mutations": [{
                "create": {
                    "_type": "architecturalImage",
                    "title": "Brick Tile - Commercial (Contemporary)",
                    "colorProfile": "Custom",
                    "isUserUpload": true
                }
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"transactionId": "tx1", "results": [{"id": "doc-42", "operation": "create"}]}"#)
        .create_async()
        .await;

    let id = sanity(&server, Some("sk-test"))
        .upload_image(
            vec![0x89, 0x50, 0x4e, 0x47],
            "image/png",
            "facade.png",
            "Brick Tile",
            "Contemporary",
            "Commercial",
        )
        .await
        .unwrap();

    asset.assert_async().await;
    create.assert_async().await;
    assert_eq!(id, "doc-42");
}

#[tokio::test]
async fn test_reference_image_prefers_catalog() {
    let mut server = Server::new_async().await;
    let query = server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": {"imageUrl": "https://cdn.sanity.io/exact.jpg"}}"#)
        .expect(1)
        .create_async()
        .await;

    let url = resolve_reference_image(&sanity(&server, None), None, &seed()).await;

    query.assert_async().await;
    assert_eq!(url, "https://cdn.sanity.io/exact.jpg");
}

#[tokio::test]
async fn test_reference_image_placeholder_when_catalog_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": null}"#)
        .expect(3)
        .create_async()
        .await;

    let url = resolve_reference_image(&sanity(&server, None), None, &seed()).await;
    assert_eq!(url, PLACEHOLDER_IMAGE_URL);
}

#[tokio::test]
async fn test_reference_image_generated_when_catalog_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": null}"#)
        .create_async()
        .await;
    let generation = server
        .mock("POST", "/v1/images/generations")
        .match_header("authorization", "Bearer sk-openai")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"created": 1, "data": [{"url": "https://images.openai.test/gen.png"}]}"#)
        .create_async()
        .await;

    let generator = ImageGenerator::new(server.url(), "dall-e-3".to_string(), "sk-openai".to_string()).unwrap();
    let url = resolve_reference_image(&sanity(&server, None), Some(&generator), &seed()).await;

    generation.assert_async().await;
    assert_eq!(url, "https://images.openai.test/gen.png");
}

#[tokio::test]
async fn test_gemini_analysis_strips_fences() {
    let mut server = Server::new_async().await;
    let text = "```json\n{\"style\": \"Heritage\", \"material\": \"Terracotta Jali\", \"name\": \"Antique Red Jali\"}\n```";
    let mock = server
        .mock("POST", Matcher::Regex(r"^/v1beta/models/gemini-1.5-flash:generateContent".to_string()))
        .match_query(Matcher::UrlEncoded("key".to_string(), "g-key".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string())
        .create_async()
        .await;

    let analysis = gemini(&server, Some("g-key"))
        .analyze_image(b"\xff\xd8\xff", "image/jpeg")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(analysis.material, "Terracotta Jali");
    assert_eq!(analysis.name.as_deref(), Some("Antique Red Jali"));
}

#[tokio::test]
async fn test_gemini_search_falls_back_to_free_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(r"^/v1beta/models/".to_string()))
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let filters = gemini(&server, Some("g-key")).parse_search_query("sunset brick cafe").await;
    assert_eq!(filters, SearchFilters::free_text("sunset brick cafe"));
}

#[tokio::test]
async fn test_gemini_search_parses_filters() {
    let mut server = Server::new_async().await;
    let text = r#"{"materials": ["Exposed Brick"], "styles": ["Modern Minimal"], "projectTypes": ["Commercial"], "freeText": "red"}"#;
    server
        .mock("POST", Matcher::Regex(r"^/v1beta/models/".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string())
        .create_async()
        .await;

    let filters = gemini(&server, Some("g-key")).parse_search_query("clean red brick offices").await;

    assert_eq!(filters.materials, vec!["Exposed Brick"]);
    assert_eq!(filters.project_types, vec!["Commercial"]);
    assert_eq!(filters.free_text.as_deref(), Some("red"));
}

#[tokio::test]
async fn test_reindex_continues_past_failures() {
    let mut server = Server::new_async().await;
    let image_url = format!("{}/images/a.jpg", server.url());
    server
        .mock("GET", Matcher::Regex(QUERY_PATH.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"result": [
                {"_id": "a", "url": image_url},
                {"_id": "b", "url": null}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/images/a.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(vec![0xff, 0xd8, 0xff])
        .create_async()
        .await;
    let patch = server
        .mock("POST", Matcher::Regex(MUTATE_PATH.to_string()))
        .match_body(Matcher::PartialJson(json!({
            "mutations": [{"patch": {"id": "a", "set": {"isAiAnalyzed": true}}}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": [{"id": "a", "operation": "update"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let sanity = sanity(&server, Some("sk-test"));
    // No key: analysis returns the fixed fallback classification
    let gemini = gemini(&server, None);
    let report = Reindexer::new(&sanity, &gemini).unwrap().run(false).await.unwrap();

    patch.assert_async().await;
    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.results[1].error.as_deref(), Some("Image has no URL"));
}
