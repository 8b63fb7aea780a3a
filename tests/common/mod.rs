//! Test utilities and fixtures for the legislation test suite

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mevzuat_mcp::{MevzuatService, ServerConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};
use std::time::Duration;

/// Creates a mock server for one test
#[allow(dead_code)]
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Configuration pointing both upstreams at `server`, without retries
#[allow(dead_code)]
pub fn test_config(server: &ServerGuard) -> ServerConfig {
    ServerConfig::builder()
        .mevzuat_base_url(server.url())
        .bedesten_base_url(format!("{}/mevzuat", server.url()))
        .request_timeout(Duration::from_secs(5))
        .max_retries(0)
        .build()
        .expect("test config is valid")
}

#[allow(dead_code)]
pub fn test_service(server: &ServerGuard) -> MevzuatService {
    MevzuatService::new(&test_config(server)).expect("service builds")
}

/// One listing row as rendered by mevzuat.gov.tr
#[allow(dead_code)]
pub fn listing_row(tur: u32, no: &str, title: &str, date: &str, number: &str) -> String {
    format!(
        r#"<tr>
            <td><a href="/mevzuat?MevzuatNo={no}&amp;MevzuatTur={tur}&amp;MevzuatTertip=5">{}</a></td>
            <td class="rg-tarih">{date}</td>
            <td class="rg-sayi">{number}</td>
        </tr>"#,
        html_escape::encode_text(title),
    )
}

/// A search listing page with the given rows and total
#[allow(dead_code)]
pub fn listing_html(rows: &[String], total: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="tr">
<head><title>Mevzuat Arama Sonuçları</title></head>
<body>
    <nav>Anasayfa</nav>
    <div class="sonuc-bilgi" data-total-count="{total}">Toplam {total} kayıt bulundu</div>
    <table id="mevzuat-results">
        <thead><tr><th>Mevzuat Adı</th><th>RG Tarihi</th><th>RG Sayısı</th></tr></thead>
        <tbody>
            {}
        </tbody>
    </table>
</body>
</html>"#,
        rows.join("\n")
    )
}

/// Ten Kanun rows matching "vergi"
#[allow(dead_code)]
pub fn vergi_listing() -> String {
    let rows: Vec<String> = (0..10)
        .map(|i| {
            listing_row(
                1,
                &format!("{}", 200 + i),
                &format!("Vergi Kanunu {i}"),
                "04.01.1961",
                &format!("{}", 10700 + i),
            )
        })
        .collect();
    listing_html(&rows, 137)
}

/// A small law with a preamble, two chapters and five articles
#[allow(dead_code)]
pub fn law_html() -> String {
    r#"<!DOCTYPE html>
<html lang="tr">
<head><title>Vergi Usul Kanunu</title><script>var x = 1;</script></head>
<body>
<header>mevzuat.gov.tr</header>
<div id="mevzuat-metin">
    <p>VERGİ USUL KANUNU</p>
    <p><b>BİRİNCİ KISIM</b></p>
    <p><b>BİRİNCİ BÖLÜM - Genel Hükümler</b></p>
    <p><b>Kapsam</b></p>
    <p><b>MADDE 1 –</b> (1) Bu kanun hükümleri vergi, resim ve harçlar hakkında uygulanır.</p>
    <p><b>Vergiyi doğuran olay</b></p>
    <p><b>MADDE 2 –</b> (1) Vergi alacağı, vergi kanunlarının vergiyi bağladıkları olayın vukuu ile doğar. Vergi ödevi ayrıca düzenlenir.</p>
    <p><b>İKİNCİ BÖLÜM</b></p>
    <p><b>Mükellef</b></p>
    <p><b>MADDE 3 –</b> (1) Mükellef, vergi kanunlarına göre kendisine vergi borcu terettüp eden gerçek veya tüzel kişidir.</p>
    <p><b>Vergi sorumlusu</b></p>
    <p><b>MADDE 4 –</b> (1) Vergi sorumlusu, verginin ödenmesi bakımından muhatap olan kişidir.</p>
    <p><b>Harçlar</b></p>
    <p><b>MADDE 5 –</b> (1) Harçlar ayrı bir kanunla düzenlenir ve vergi sayılır.</p>
</div>
<footer>Tüm hakları saklıdır</footer>
</body>
</html>"#
        .to_string()
}

/// Successful bedesten envelope around `data`
#[allow(dead_code)]
pub fn bedesten_success(data: Value) -> String {
    json!({
        "data": data,
        "metadata": { "FMTY": "SUCCESS", "FMTE": null },
    })
    .to_string()
}

#[allow(dead_code)]
pub fn bedesten_search_body(total: u64, titles: &[&str]) -> String {
    let list: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "mevzuatId": format!("{}", 41000 + i),
                "mevzuatNo": 5000 + i,
                "mevzuatAdi": title,
                "mevzuatTur": { "name": "KANUN", "description": "Kanun" },
                "resmiGazeteTarihi": "2004-10-12T00:00:00",
                "resmiGazeteSayisi": "25611",
            })
        })
        .collect();
    bedesten_success(json!({ "total": total, "mevzuatList": list }))
}

#[allow(dead_code)]
pub fn bedesten_content_body(html: &str) -> String {
    bedesten_success(json!({
        "content": STANDARD.encode(html.as_bytes()),
        "mimeType": "text/html",
    }))
}

/// Article tree of a small law: one part holding two articles
#[allow(dead_code)]
pub fn bedesten_article_tree_body() -> String {
    bedesten_success(json!({
        "maddeId": 0,
        "children": [
            {
                "maddeId": 900,
                "maddeNo": null,
                "title": "BİRİNCİ KISIM",
                "description": "Genel Hükümler",
                "mevzuatId": 41000,
                "children": [
                    { "maddeId": 901, "maddeNo": 1, "title": "Amaç", "mevzuatId": 41000, "children": [] },
                    { "maddeId": "902", "maddeNo": "2", "title": "Kapsam", "children": [] }
                ]
            },
            { "title": "Numarasız düğüm" }
        ]
    }))
}

/// Mock the bedesten search endpoint for one exact phrase
#[allow(dead_code)]
pub fn mock_bedesten_search(server: &mut Server, phrase: &str, body: String) -> Mock {
    server
        .mock("POST", "/mevzuat/searchDocuments")
        .match_body(Matcher::PartialJson(json!({ "data": { "phrase": phrase } })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create()
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body("Error")
        .create()
}
