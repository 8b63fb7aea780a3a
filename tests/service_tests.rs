//! End-to-end pipeline tests against a mock upstream

use mevzuat_mcp::query::{DocumentTypesArg, SortDirection, SortField};
use mevzuat_mcp::{
    ContentOrigin, DocumentType, ErrorKind, MevzuatError, SearchParams, SearchWithinParams,
    UnifiedSearchParams,
};
use mockito::Matcher;

mod common;

fn search_params(phrase: &str) -> SearchParams {
    SearchParams {
        phrase: phrase.to_string(),
        exact_phrase: false,
        start_date: None,
        end_date: None,
        page_number: 1,
        page_size: 10,
    }
}

fn unified_params(phrase: &str) -> UnifiedSearchParams {
    UnifiedSearchParams {
        phrase: Some(phrase.to_string()),
        document_id: None,
        gazette_number: None,
        document_types: None,
        page_number: 1,
        page_size: 5,
        sort_field: SortField::default(),
        sort_direction: SortDirection::default(),
    }
}

#[tokio::test]
async fn kanun_search_returns_one_bounded_page() {
    let mut server = common::setup_mock_server().await;
    let listing = server
        .mock("GET", "/aramasonuclari")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("MevzuatTur".into(), "1".into()),
            Matcher::UrlEncoded("AranacakIfade".into(), "vergi".into()),
            Matcher::UrlEncoded("Sayfa".into(), "1".into()),
            Matcher::UrlEncoded("SayfaBoyutu".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(common::vergi_listing())
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let page = service
        .search(DocumentType::Kanun, &search_params("vergi"))
        .await
        .unwrap();

    assert!(page.items.len() <= 10);
    assert!(page.total_count >= page.items.len() as u64);
    assert_eq!(page.total_count, 137);
    assert_eq!(page.items[0].document_id, "1.5.200");
    assert_eq!(page.items[0].gazette.date.as_deref(), Some("04.01.1961"));
    assert_eq!(page.query_used, "vergi");
    assert!(page.has_more());

    // Second identical call is served from the cache
    let again = service
        .search(DocumentType::Kanun, &search_params("vergi"))
        .await
        .unwrap();
    assert_eq!(again, page);
    listing.assert_async().await;
}

#[tokio::test]
async fn invalid_date_is_rejected_before_any_request() {
    let mut server = common::setup_mock_server().await;
    let listing = server
        .mock("GET", "/aramasonuclari")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let mut params = search_params("vergi");
    params.start_date = Some("2024/01/01".into());

    let err = service.search(DocumentType::Kanun, &params).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    listing.assert_async().await;
}

#[tokio::test]
async fn operators_are_sent_in_canonical_form() {
    let mut server = common::setup_mock_server().await;
    let listing = server
        .mock("GET", "/aramasonuclari")
        .match_query(Matcher::UrlEncoded(
            "AranacakIfade".into(),
            "(ceza AND hukuk) OR idare".into(),
        ))
        .with_status(200)
        .with_body(common::listing_html(&[], 0))
        .create_async()
        .await;

    let service = common::test_service(&server);
    let page = service
        .search(DocumentType::Kanun, &search_params("ceza AND hukuk OR idare"))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
    listing.assert_async().await;
}

#[tokio::test]
async fn search_within_ranks_articles_of_fetched_document() {
    let mut server = common::setup_mock_server().await;
    let document = server
        .mock("GET", "/anasayfa/MevzuatFihristDetayIframe")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("MevzuatTur".into(), "1".into()),
            Matcher::UrlEncoded("MevzuatNo".into(), "213".into()),
            Matcher::UrlEncoded("MevzuatTertip".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(common::law_html())
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let params = SearchWithinParams {
        document_id: "213".into(),
        keyword: "vergi".into(),
        case_sensitive: false,
        max_results: Some(3),
    };

    let result = service
        .search_within(DocumentType::Kanun, &params)
        .await
        .unwrap();

    assert_eq!(result.document_id, "1.5.213");
    assert_eq!(result.matches.len(), 3);
    assert!(result.total_matches >= 5);
    let ranks: Vec<usize> = result.matches.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(result.matches.windows(2).all(|w| w[0].score >= w[1].score));
    // Article 2 mentions the keyword most often
    assert_eq!(result.matches[0].article_number.as_deref(), Some("2"));
    assert_eq!(result.matches[0].title.as_deref(), Some("Vergiyi doğuran olay"));

    // A different keyword reuses the cached document
    let params = SearchWithinParams {
        keyword: "harç".into(),
        ..params
    };
    let result = service
        .search_within(DocumentType::Kanun, &params)
        .await
        .unwrap();
    assert!(result.matches.iter().any(|m| m.article_number.as_deref() == Some("5")));
    document.assert_async().await;
}

#[tokio::test]
async fn search_within_without_match_is_empty() {
    let mut server = common::setup_mock_server().await;
    let _document = common::create_html_mock(
        &mut server,
        "/anasayfa/MevzuatFihristDetayIframe",
        &common::law_html(),
    );

    let service = common::test_service(&server);
    let result = service
        .search_within(
            DocumentType::Kanun,
            &SearchWithinParams {
                document_id: "1.5.213".into(),
                keyword: "deniz ticareti".into(),
                case_sensitive: false,
                max_results: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.total_matches, 0);
    assert!(result.matches.is_empty());
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let mut server = common::setup_mock_server().await;
    let _missing = common::create_error_mock(&mut server, "/anasayfa/MevzuatFihristDetayIframe", 404);

    let service = common::test_service(&server);
    let err = service
        .search_within(
            DocumentType::Kanun,
            &SearchWithinParams {
                document_id: "99999".into(),
                keyword: "vergi".into(),
                case_sensitive: false,
                max_results: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, MevzuatError::NotFound { ref document_id } if document_id == "1.5.99999"));
}

#[tokio::test]
async fn failures_are_not_cached() {
    let mut server = common::setup_mock_server().await;
    let failing = server
        .mock("GET", "/aramasonuclari")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Error")
        .expect(2)
        .create_async()
        .await;

    let service = common::test_service(&server);
    for _ in 0..2 {
        let err = service
            .search(DocumentType::Teblig, &search_params("gümrük"))
            .await
            .unwrap_err();
        assert!(matches!(err, MevzuatError::UpstreamError { status: Some(500), .. }));
    }
    assert_eq!(service.caches().search.len(), 0);
    failing.assert_async().await;
}

#[tokio::test]
async fn pdf_type_uses_pdf_endpoint() {
    let mut server = common::setup_mock_server().await;
    let pdf = server
        .mock("GET", "/MevzuatMetin/20.5.9012.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("not really a pdf")
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let err = service
        .document(DocumentType::CbKarari, "9012")
        .await
        .unwrap_err();

    // No OCR key: the text layer strategy rejects non-PDF bytes
    assert_eq!(err.kind(), ErrorKind::ExtractionFailed);
    pdf.assert_async().await;
}

#[tokio::test]
async fn unified_content_converts_bedesten_html() {
    let mut server = common::setup_mock_server().await;
    let content = server
        .mock("POST", "/mevzuat/getDocumentContent")
        .match_header("AdaletApplicationName", "UyapMevzuat")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "data": { "id": "41000", "documentType": "MEVZUAT" }
        })))
        .with_status(200)
        .with_body(common::bedesten_content_body(&common::law_html()))
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let doc = service.unified_content("41000").await.unwrap();

    assert!(!doc.markdown.is_empty());
    assert!(doc.markdown.contains("#### MADDE 1"));
    assert!(doc.markdown.contains("## BİRİNCİ KISIM"));
    assert_eq!(doc.origin, ContentOrigin::Html);
    assert_eq!(doc.document_type, None);
    assert_eq!(doc.article_count(), 5);

    // Cached
    service.unified_content("41000").await.unwrap();
    content.assert_async().await;
}

#[tokio::test]
async fn unified_content_reports_upstream_failure_message() {
    let mut server = common::setup_mock_server().await;
    let _content = server
        .mock("POST", "/mevzuat/getDocumentContent")
        .with_status(200)
        .with_body(
            serde_json::json!({"metadata": {"FMTY": "ERROR", "FMTE": "Kayıt bulunamadı"}})
                .to_string(),
        )
        .create_async()
        .await;

    let service = common::test_service(&server);
    let err = service.unified_content("123").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamError);
    assert!(err.to_string().contains("Kayıt bulunamadı"));
    assert!(err.to_string().contains("123"));
}

#[tokio::test]
async fn unified_search_decodes_bedesten_results() {
    let mut server = common::setup_mock_server().await;
    let search = server
        .mock("POST", "/mevzuat/searchDocuments")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "data": {
                "phrase": "ticaret",
                "mevzuatTurList": ["CB_KARARNAME", "KANUN"],
                "sortFields": ["RESMI_GAZETE_TARIHI"],
                "sortDirection": "desc",
                "pageSize": 5
            },
            "applicationName": "UyapMevzuat"
        })))
        .with_status(200)
        .with_body(common::bedesten_search_body(
            2,
            &["Türk Ticaret Kanunu", "Ticaret Sicili Yönetmeliği"],
        ))
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let mut params = unified_params("ticaret");
    params.document_types = Some(DocumentTypesArg::List(vec!["kanun".into(), "CB_KARARNAME".into()]));
    let page = service.unified_search(&params).await.unwrap();

    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].document_id, "41000");
    assert_eq!(page.items[0].mevzuat_no.as_deref(), Some("5000"));
    assert_eq!(page.items[0].gazette.date.as_deref(), Some("2004-10-12"));

    // Order of the type filter does not change the cache key
    params.document_types = Some(DocumentTypesArg::Encoded(r#"["CB_KARARNAME","KANUN"]"#.into()));
    service.unified_search(&params).await.unwrap();
    search.assert_async().await;
}

#[tokio::test]
async fn unified_search_falls_back_to_proximity_queries() {
    let mut server = common::setup_mock_server().await;
    let exact = common::mock_bedesten_search(
        &mut server,
        "idari yargılama usulü",
        common::bedesten_search_body(0, &[]),
    );
    let first_pair = common::mock_bedesten_search(
        &mut server,
        "\"idari yargılama\"~10",
        common::bedesten_search_body(1, &["İdari Yargılama Usulü Kanunu"]),
    );
    let second_pair = server
        .mock("POST", "/mevzuat/searchDocuments")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "data": { "phrase": "\"yargılama usulü\"~10" }
        })))
        .expect(0)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let page = service
        .unified_search(&unified_params("idari yargılama usulü"))
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.query_used, "\"idari yargılama\"~10");
    assert_eq!(page.items[0].title, "İdari Yargılama Usulü Kanunu");
    exact.assert_async().await;
    first_pair.assert_async().await;
    second_pair.assert_async().await;
}

#[tokio::test]
async fn unified_search_requires_phrase_or_number() {
    let server = common::setup_mock_server().await;
    let service = common::test_service(&server);

    let mut params = unified_params("   ");
    params.phrase = Some("   ".into());
    let err = service.unified_search(&params).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let mut params = unified_params("x");
    params.page_size = 11;
    let err = service.unified_search(&params).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[tokio::test]
async fn article_tree_is_returned_nested() {
    let mut server = common::setup_mock_server().await;
    let tree = server
        .mock("POST", "/mevzuat/mevzuatMaddeTree")
        .match_header("AdaletApplicationName", "UyapMevzuat")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "data": { "mevzuatId": "41000" },
            "applicationName": "UyapMevzuat"
        })))
        .with_status(200)
        .with_body(common::bedesten_article_tree_body())
        .expect(2)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let tree_page = service.article_tree("41000").await.unwrap();
    assert_eq!(tree_page.document_id, "41000");
    let nodes = tree_page.nodes;

    // The id-less node is dropped
    assert_eq!(nodes.len(), 1);
    let part = &nodes[0];
    assert_eq!(part.article_id, "900");
    assert_eq!(part.article_number, None);
    assert_eq!(part.description.as_deref(), Some("Genel Hükümler"));
    let numbers: Vec<_> = part
        .children
        .iter()
        .map(|n| (n.article_id.as_str(), n.article_number.as_deref()))
        .collect();
    assert_eq!(numbers, vec![("901", Some("1")), ("902", Some("2"))]);
    // Falls back to the requested document
    assert_eq!(part.children[1].document_id, "41000");

    // Not cached
    service.article_tree("41000").await.unwrap();
    tree.assert_async().await;
}

#[tokio::test]
async fn article_content_is_fetched_once_per_article() {
    let mut server = common::setup_mock_server().await;
    let content = server
        .mock("POST", "/mevzuat/getDocumentContent")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "data": { "id": "901", "documentType": "MADDE" }
        })))
        .with_status(200)
        .with_body(common::bedesten_content_body(
            "<p>MADDE 1 – (1) Bu Kanunun amacı, vergi usulünü düzenlemektir.</p>",
        ))
        .expect(1)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let article = service.article_content("901", "41000").await.unwrap();
    assert_eq!(article.article_id, "901");
    assert_eq!(article.document_id, "41000");
    assert_eq!(article.origin, ContentOrigin::Html);
    assert!(article.markdown.contains("vergi usulünü"));

    let again = service.article_content("901", "41000").await.unwrap();
    assert_eq!(again, article);
    content.assert_async().await;
}

#[tokio::test]
async fn article_ids_are_validated_before_any_request() {
    let mut server = common::setup_mock_server().await;
    let any = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = common::test_service(&server);
    let err = service.article_content("9/../1", "41000").await.unwrap_err();
    assert!(matches!(err, MevzuatError::InvalidParameter { ref field, .. } if field == "article_id"));
    let err = service.article_tree("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    any.assert_async().await;
}
