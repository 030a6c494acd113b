//! Integration tests for bands-catalog API endpoints
//!
//! Each test drives the full router against its own in-memory database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use bands_catalog::model::{BandPageResponse, CountResponse, MusicBand, MusicGenre};
use bands_catalog::{build_router, db, AppState};
use bands_common::xml::from_xml_str;
use bands_common::ErrorDesc;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

async fn setup_app() -> Router {
    let pool = db::connect_in_memory().await.expect("in-memory database");
    build_router(AppState::new(pool))
}

fn xml_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/xml")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn band_xml(name: &str, participants: i64, singles: Option<i64>, genre: &str) -> String {
    let singles = singles
        .map(|n| format!("<singlesCount>{}</singlesCount>", n))
        .unwrap_or_default();
    format!(
        "<bandRequest>\
           <name>{}</name>\
           <coordinates><x>5</x><y>7</y></coordinates>\
           <numberOfParticipants>{}</numberOfParticipants>\
           {}\
           <albumsCount>3</albumsCount>\
           <musicGenre>{}</musicGenre>\
           <label><name>Harvest</name><sales>1000</sales></label>\
         </bandRequest>",
        name, participants, singles, genre
    )
}

async fn create(app: &Router, name: &str, participants: i64, singles: Option<i64>, genre: &str) -> MusicBand {
    let response = app
        .clone()
        .oneshot(xml_request("POST", "/bands", &band_xml(name, participants, singles, genre)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    from_xml_str(&body_text(response).await).expect("band document")
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn error_of(response: Response) -> ErrorDesc {
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/xml"), "got {}", content_type);
    from_xml_str(&body_text(response).await).expect("errorDesc document")
}

async fn seed(app: &Router) {
    create(app, "Pink Floyd", 4, Some(10), "PROGRESSIVE_ROCK").await;
    create(app, "Genesis", 5, Some(3), "PROGRESSIVE_ROCK").await;
    create(app, "Ramones", 4, None, "PUNK_ROCK").await;
    create(app, "Wu-Tang Clan", 9, Some(10), "HIP_HOP").await;
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let response = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bands-catalog");
    assert!(body["version"].is_string());
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_create_and_get_band() {
    let app = setup_app().await;
    let band = create(&app, "  King Crimson ", 5, Some(2), "PROGRESSIVE_ROCK").await;

    assert!(band.id >= 1);
    assert_eq!(band.name, "King Crimson");
    assert_eq!(band.coordinates.x, 5);
    assert_eq!(band.genre, MusicGenre::ProgressiveRock);
    assert_eq!(band.label.map(|l| l.sales), Some(1000));

    let response = send(&app, empty_request("GET", &format!("/bands/{}", band.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(fetched, band);
}

#[tokio::test]
async fn test_create_without_optional_fields() {
    let app = setup_app().await;
    let body = "<bandRequest><name>Minimal</name><coordinates><x>1</x></coordinates>\
                <numberOfParticipants>1</numberOfParticipants><musicGenre>HIP_HOP</musicGenre>\
                <label/></bandRequest>";
    let response = send(&app, xml_request("POST", "/bands", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(band.coordinates.y, 0);
    assert_eq!(band.singles_count, None);
    assert_eq!(band.label, None);
}

#[tokio::test]
async fn test_create_with_empty_optional_numbers() {
    let app = setup_app().await;
    let body = "<bandRequest><name>Neu!</name><coordinates><x>1</x><y></y></coordinates>\
                <numberOfParticipants>2</numberOfParticipants><singlesCount></singlesCount>\
                <albumsCount></albumsCount><musicGenre>PUNK_ROCK</musicGenre></bandRequest>";
    let response = send(&app, xml_request("POST", "/bands", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(band.coordinates.y, 0);
    assert_eq!(band.singles_count, None);
    assert_eq!(band.albums_count, None);
}

#[tokio::test]
async fn test_create_validation_failure_lists_fields() {
    let app = setup_app().await;
    let body = "<bandRequest><name>  </name><numberOfParticipants>0</numberOfParticipants>\
                <musicGenre>JAZZ</musicGenre></bandRequest>";
    let response = send(&app, xml_request("POST", "/bands", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let envelope = error_of(response).await;
    assert_eq!(envelope.error, "BAD_REQUEST");
    assert_eq!(envelope.path, "/bands");
    let fields: Vec<_> = envelope.errors.iter().map(|e| e.field.as_str()).collect();
    for expected in ["coordinates", "musicGenre", "name", "numberOfParticipants"] {
        assert!(fields.contains(&expected), "missing {} in {:?}", expected, fields);
    }
}

#[tokio::test]
async fn test_create_over_participant_cap_is_unprocessable() {
    let app = setup_app().await;
    let response = send(&app, xml_request("POST", "/bands", &band_xml("Choir", 101, None, "HIP_HOP"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_of(response).await.error, "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn test_create_rejects_non_xml_body() {
    let app = setup_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/bands")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Json Band"}"#))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_create_rejects_malformed_xml() {
    let app = setup_app().await;
    let response = send(&app, xml_request("POST", "/bands", "<bandRequest><name>oops</bandRequest>")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(response).await.path, "/bands");
}

#[tokio::test]
async fn test_get_missing_band_is_not_found() {
    let app = setup_app().await;
    let response = send(&app, empty_request("GET", "/bands/42")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let envelope = error_of(response).await;
    assert_eq!(envelope.error, "NOT_FOUND");
    assert_eq!(envelope.path, "/bands/42");
    assert!(!envelope.timestamp.is_empty());
}

#[tokio::test]
async fn test_bad_id_is_bad_request() {
    let app = setup_app().await;
    for uri in ["/bands/abc", "/bands/0", "/bands/-1"] {
        let response = send(&app, empty_request("GET", uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_update_replaces_band() {
    let app = setup_app().await;
    let band = create(&app, "Original", 3, Some(1), "PUNK_ROCK").await;

    let uri = format!("/bands/{}", band.id);
    let response = send(&app, xml_request("PUT", &uri, &band_xml("Renamed", 6, Some(8), "HIP_HOP"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(updated.id, band.id);
    assert_eq!(updated.creation_date, band.creation_date);
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.number_of_participants, 6);
    assert_eq!(updated.genre, MusicGenre::HipHop);
}

#[tokio::test]
async fn test_update_missing_band_is_not_found() {
    let app = setup_app().await;
    let response = send(&app, xml_request("PUT", "/bands/9", &band_xml("Nobody", 2, None, "HIP_HOP"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_band() {
    let app = setup_app().await;
    let band = create(&app, "Short Lived", 2, None, "PUNK_ROCK").await;
    let uri = format!("/bands/{}", band.id);

    let response = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Searches
// =============================================================================

#[tokio::test]
async fn test_filters_without_body_pages_everything() {
    let app = setup_app().await;
    seed(&app).await;

    let response = send(&app, empty_request("POST", "/bands/filters?page=2&size=3")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: BandPageResponse = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.size, 3);
    assert_eq!(page.pagination.total_count, 4);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.bands.band.len(), 1);
    assert_eq!(page.bands.band[0].name, "Wu-Tang Clan");
}

#[tokio::test]
async fn test_filters_by_criteria_and_sort() {
    let app = setup_app().await;
    seed(&app).await;

    let body = "<bandSearchRequest><genre>PROGRESSIVE_ROCK</genre></bandSearchRequest>";
    let response = send(&app, xml_request("POST", "/bands/filters?sort=name,asc", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: BandPageResponse = from_xml_str(&body_text(response).await).unwrap();
    let names: Vec<_> = page.bands.band.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Genesis", "Pink Floyd"]);
}

#[tokio::test]
async fn test_filters_page_past_end_is_empty() {
    let app = setup_app().await;
    seed(&app).await;

    let response = send(&app, empty_request("POST", "/bands/filters?page=5")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: BandPageResponse = from_xml_str(&body_text(response).await).unwrap();
    assert!(page.bands.band.is_empty());
    assert_eq!(page.pagination.total_count, 4);
}

#[tokio::test]
async fn test_filters_rejects_bad_paging_and_sort() {
    let app = setup_app().await;
    for uri in [
        "/bands/filters?page=0",
        "/bands/filters?size=101",
        "/bands/filters?size=abc",
        "/bands/filters?sort=label",
    ] {
        let response = send(&app, empty_request("POST", uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_filters_participants_over_cap_is_unprocessable() {
    let app = setup_app().await;
    let body = "<bandSearchRequest><numberOfParticipants>500</numberOfParticipants></bandSearchRequest>";
    let response = send(&app, xml_request("POST", "/bands/filters", body)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_by_name() {
    let app = setup_app().await;
    seed(&app).await;

    let body = "<substring><value>en</value></substring>";
    let response = send(&app, xml_request("POST", "/bands/search-by-name?size=200", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: BandPageResponse = from_xml_str(&body_text(response).await).unwrap();
    let names: Vec<_> = page.bands.band.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Genesis"]);
    assert_eq!(page.pagination.size, 200);
}

#[tokio::test]
async fn test_search_by_name_with_largest_size() {
    let app = setup_app().await;
    seed(&app).await;

    let body = "<substring><value>e</value></substring>";
    let response = send(&app, xml_request("POST", "/bands/search-by-name?size=9223372036854775807", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: BandPageResponse = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(page.pagination.total_count, 2);
    assert_eq!(page.pagination.total_pages, 1);
    assert_eq!(page.bands.band.len(), 2);
}

#[tokio::test]
async fn test_search_by_name_requires_value() {
    let app = setup_app().await;
    let response = send(&app, xml_request("POST", "/bands/search-by-name", "<substring><value> </value></substring>")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, empty_request("POST", "/bands/search-by-name")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Counts
// =============================================================================

#[tokio::test]
async fn test_singles_counts() {
    let app = setup_app().await;
    seed(&app).await;

    let response = send(&app, empty_request("GET", "/bands/singles/equally/10")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let count: CountResponse = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(count.value, 2);

    let response = send(&app, empty_request("GET", "/bands/singles/greater/2")).await;
    let count: CountResponse = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(count.value, 3);

    let response = send(&app, empty_request("GET", "/bands/singles/greater/ten")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Gateway mutations
// =============================================================================

#[tokio::test]
async fn test_add_single_endpoint() {
    let app = setup_app().await;
    let band = create(&app, "No Singles Yet", 3, None, "PUNK_ROCK").await;

    let uri = format!("/grammy/band/{}/singles/add", band.id);
    let response = send(&app, empty_request("POST", &uri)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.is_empty());

    let response = send(&app, empty_request("GET", &format!("/bands/{}", band.id))).await;
    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(band.singles_count, Some(1));

    let response = send(&app, empty_request("POST", "/grammy/band/999/singles/add")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_single_at_maximum_keeps_band_readable() {
    let app = setup_app().await;
    let body = band_xml("Prolific", 3, Some(i64::MAX), "PUNK_ROCK");
    let response = send(&app, xml_request("POST", "/bands", &body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();

    let uri = format!("/grammy/band/{}/singles/add", band.id);
    let response = send(&app, empty_request("POST", &uri)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(&app, empty_request("GET", &format!("/bands/{}", band.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(band.singles_count, Some(i64::MAX));
}

#[tokio::test]
async fn test_remove_participant_endpoint() {
    let app = setup_app().await;
    let band = create(&app, "Duo", 2, None, "HIP_HOP").await;
    let uri = format!("/grammy/band/{}/participants/remove", band.id);

    let response = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_of(response).await.path, uri);

    let response = send(&app, empty_request("GET", &format!("/bands/{}", band.id))).await;
    let band: MusicBand = from_xml_str(&body_text(response).await).unwrap();
    assert_eq!(band.number_of_participants, 1);
}
