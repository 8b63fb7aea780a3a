//! Tool dispatch tests against a mocked upstream

use mevzuat_mcp::MevzuatServer;
use mevzuat_mcp::mcp::{
    ARTICLE_CONTENT_TOOL, ARTICLE_TREE_TOOL, UNIFIED_CONTENT_TOOL, UNIFIED_SEARCH_TOOL, all_tools,
    find_tool,
};
use rmcp::model::{CallToolResult, ErrorCode, JsonObject};
use serde_json::{Value, json};

mod common;

fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn unknown_tool_is_a_protocol_error() {
    let server = common::setup_mock_server().await;
    let mcp = MevzuatServer::new(common::test_service(&server));

    let err = mcp.dispatch("search_anayasa", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("search_anayasa"));
}

#[tokio::test]
async fn invalid_arguments_never_reach_upstream() {
    let mut server = common::setup_mock_server().await;
    let listing = server
        .mock("GET", "/aramasonuclari")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let mcp = MevzuatServer::new(common::test_service(&server));

    // Wrong shape
    let err = mcp
        .dispatch("search_kanun", args(json!({ "phrase": 42 })))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    // Right shape, bad value
    let err = mcp
        .dispatch(
            "search_kanun",
            args(json!({ "phrase": "vergi", "start_date": "01.01.2024" })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("start_date"));

    listing.assert_async().await;
}

#[tokio::test]
async fn search_returns_structured_page() {
    let mut server = common::setup_mock_server().await;
    let _listing = common::create_html_mock(&mut server, "/aramasonuclari", &common::vergi_listing());
    let mcp = MevzuatServer::new(common::test_service(&server));

    let result = mcp
        .dispatch("search_kanun", args(json!({ "phrase": "vergi", "page_size": 5 })))
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    let page = result.structured_content.expect("structured page");
    assert_eq!(page["total_count"], 137);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(page["items"][0]["document_id"], "1.5.200");
}

#[tokio::test]
async fn missing_document_is_a_tool_error() {
    let mut server = common::setup_mock_server().await;
    let _missing =
        common::create_error_mock(&mut server, "/anasayfa/MevzuatFihristDetayIframe", 404);
    let mcp = MevzuatServer::new(common::test_service(&server));

    let result = mcp
        .dispatch(
            "search_within_kanun",
            args(json!({ "document_id": "1.5.99999", "keyword": "vergi" })),
        )
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let text = result_text(&result);
    assert!(text.contains("Operation failed: search_within_kanun"));
    assert!(text.contains("NotFound"));
    assert!(text.contains("1.5.99999"));
}

#[tokio::test]
async fn unified_content_accepts_legacy_argument_name() {
    let mut server = common::setup_mock_server().await;
    let _content = server
        .mock("POST", "/mevzuat/getDocumentContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::bedesten_content_body(&common::law_html()))
        .create_async()
        .await;
    let mcp = MevzuatServer::new(common::test_service(&server));

    let result = mcp
        .dispatch(UNIFIED_CONTENT_TOOL, args(json!({ "mevzuat_id": "41000" })))
        .await
        .unwrap();

    let doc = result.structured_content.expect("structured document");
    assert_eq!(doc["document_id"], "41000");
    assert!(doc["markdown"].as_str().is_some_and(|m| m.contains("#### MADDE 2")));
}

#[tokio::test]
async fn article_tools_navigate_one_document() {
    let mut server = common::setup_mock_server().await;
    let _tree = server
        .mock("POST", "/mevzuat/mevzuatMaddeTree")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::bedesten_article_tree_body())
        .create_async()
        .await;
    let _article = server
        .mock("POST", "/mevzuat/getDocumentContent")
        .match_body(mockito::Matcher::PartialJson(json!({
            "data": { "id": "902", "documentType": "MADDE" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::bedesten_content_body("<p>MADDE 2 – (1) Bu Kanun kapsamı.</p>"))
        .create_async()
        .await;
    let mcp = MevzuatServer::new(common::test_service(&server));

    let result = mcp
        .dispatch(ARTICLE_TREE_TOOL, args(json!({ "mevzuat_id": "41000" })))
        .await
        .unwrap();
    let tree = result.structured_content.expect("structured tree");
    assert_eq!(tree["nodes"][0]["children"][1]["article_id"], "902");

    let result = mcp
        .dispatch(
            ARTICLE_CONTENT_TOOL,
            args(json!({ "madde_id": "902", "mevzuat_id": "41000" })),
        )
        .await
        .unwrap();
    let article = result.structured_content.expect("structured article");
    assert_eq!(article["article_id"], "902");
    assert!(article["markdown"].as_str().is_some_and(|m| m.contains("kapsamı")));

    // Missing document_id
    let err = mcp
        .dispatch(ARTICLE_CONTENT_TOOL, args(json!({ "article_id": "902" })))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[test]
fn tool_table_is_complete() {
    let names: Vec<String> = all_tools().map(|t| t.name()).collect();
    assert_eq!(names.len(), 22);
    assert!(names.iter().any(|n| n == ARTICLE_TREE_TOOL));
    assert!(names.iter().any(|n| n == UNIFIED_SEARCH_TOOL));
    assert!(find_tool("search_within_cb_kararnamesi").is_some());
    assert!(find_tool("search_within_mevzuat").is_none());
}
