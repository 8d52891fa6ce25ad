#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotkeys_api::{
    CategoryPayload, Error, FavoritePayload, ProgramPayload, Query, RestClient, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RestClient::new(
        base_url,
        SecretString::from("anon-key".to_owned()),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn table(name: &str) -> String {
    format!("/rest/v1/{name}")
}

// ── Credential headers ──────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_api_key_as_bearer_without_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(table("categories")))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_access_token_replaces_bearer() {
    let (server, client) = setup().await;
    client.set_access_token(Some(SecretString::from("user-jwt".to_owned())));

    Mock::given(method("GET"))
        .and(path(table("favorites")))
        .and(query_param("user_id", "eq.u1"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "f1", "user_id": "u1", "program_id": "p1" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let favorites = client.list_favorites("u1").await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].program_id, "p1");
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_programs_embeds_category_and_orders_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(table("programs")))
        .and(query_param("select", "*,category:categories(*)"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "p1",
                "category_id": "c1",
                "name": "Code",
                "description": "Editor",
                "icon": null,
                "is_popular": true,
                "category": { "id": "c1", "name": "Editors", "slug": "editors", "color": "#3b82f6" }
            },
            {
                "id": "p2",
                "category_id": "gone",
                "name": "Orphan",
                "category": null
            }
        ])))
        .mount(&server)
        .await;

    let programs = client.list_programs().await.unwrap();
    assert_eq!(programs.len(), 2);
    assert_eq!(
        programs[0].category.as_ref().map(|c| c.slug.as_str()),
        Some("editors")
    );
    assert!(programs[1].category.is_none());
}

#[tokio::test]
async fn test_list_shortcuts_filters_by_program() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(table("shortcuts")))
        .and(query_param("program_id", "eq.p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "program_id": "p1", "name": "Save", "keys": "Ctrl+S", "description": null }
        ])))
        .mount(&server)
        .await;

    let shortcuts = client.list_shortcuts(Some("p1")).await.unwrap();
    assert_eq!(shortcuts[0].keys, "Ctrl+S");
}

#[tokio::test]
async fn test_get_profile_missing_row_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(table("profiles")))
        .and(query_param("id", "eq.u9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.get_profile("u9").await.unwrap().is_none());
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_insert_category_returns_representation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(table("categories")))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({
            "name": "Browsers",
            "slug": "browsers",
            "description": "",
            "icon": "",
            "color": "#3b82f6"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "c9", "name": "Browsers", "slug": "browsers", "description": "", "icon": "", "color": "#3b82f6" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .insert_category(&CategoryPayload {
            name: "Browsers",
            slug: "browsers",
            description: "",
            icon: "",
            color: "#3b82f6",
        })
        .await
        .unwrap();
    assert_eq!(created.id, "c9");
}

#[tokio::test]
async fn test_update_program_targets_row_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(table("programs")))
        .and(query_param("id", "eq.p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p1", "category_id": "c1", "name": "VS Code", "is_popular": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_program(
            "p1",
            &ProgramPayload {
                category_id: "c1",
                name: "VS Code",
                description: "",
                icon: "",
                is_popular: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "VS Code");
}

#[tokio::test]
async fn test_update_matching_no_rows_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(table("categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client
        .update_category(
            "missing",
            &CategoryPayload {
                name: "X",
                slug: "x",
                description: "",
                icon: "",
                color: "#3b82f6",
            },
        )
        .await;
    assert!(
        matches!(&result, Err(e) if e.is_not_found()),
        "expected not-found, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_shortcuts_of_program_counts_rows() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(table("shortcuts")))
        .and(query_param("program_id", "eq.p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "program_id": "p1", "name": "Save", "keys": "Ctrl+S" },
            { "id": "s2", "program_id": "p1", "name": "Open", "keys": "Ctrl+O" }
        ])))
        .mount(&server)
        .await;

    assert_eq!(client.delete_shortcuts_of_program("p1").await.unwrap(), 2);
}

#[tokio::test]
async fn test_unfiltered_delete_is_refused_locally() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result: Result<Vec<serde_json::Value>, Error> =
        client.delete("shortcuts", &Query::new()).await;
    assert!(matches!(result, Err(Error::Rest { status: 400, .. })));
}

#[tokio::test]
async fn test_empty_body_decodes_as_no_rows() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(table("favorites")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_favorite("u1", "p1").await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unique_violation_is_detected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(table("favorites")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "details": "Key (user_id, program_id)=(u1, p1) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let err = client
        .insert_favorite(&FavoritePayload {
            user_id: "u1",
            program_id: "p1",
        })
        .await
        .unwrap_err();

    assert!(err.is_unique_violation(), "got: {err:?}");
    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let result = client.list_categories().await;
    assert!(
        matches!(&result, Err(Error::Authentication { message }) if message == "Invalid API key"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_in_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.list_categories().await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn test_malformed_rows_are_deserialization_errors() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 5 }])))
        .mount(&server)
        .await;

    let result = client.list_categories().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}
