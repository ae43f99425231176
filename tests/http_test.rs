//! End-to-end tests of the upload form through the router

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use csvview::{create_router, Config};

fn server_with(config: Config) -> TestServer {
    TestServer::new(create_router(&config).unwrap()).unwrap()
}

fn server() -> TestServer {
    server_with(Config::default())
}

fn csv_form(filename: &str, content: impl Into<Vec<u8>>) -> MultipartForm {
    let content: Vec<u8> = content.into();
    let part = Part::bytes(content)
        .file_name(filename)
        .mime_type("text/csv");
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn get_renders_blank_form() {
    let response = server().get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("<form"));
    assert!(html.contains("name=\"file\""));
    assert!(!html.contains("class=\"error\""));
    assert!(!html.contains("tableData"));
}

#[tokio::test]
async fn upload_renders_rows_and_columns() {
    let response = server()
        .post("/")
        .multipart(csv_form("data.csv", "x,y\n1,2\n3,4\n"))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"const tableData = [{"x":"1","y":"2"},{"x":"3","y":"4"}];"#));
    assert!(html.contains(
        r#"const tableColumns = [{"title":"x","field":"x","editor":"input"},{"title":"y","field":"y","editor":"input"}];"#
    ));
    assert!(html.contains("class=\"dataframe table-auto border border-collapse\""));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn wrong_extension_is_shown_as_error_with_200() {
    let response = server()
        .post("/")
        .multipart(csv_form("data.xlsx", "x,y\n1,2\n"))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Only CSV files are allowed."));
    assert!(!html.contains("tableData"));
}

#[tokio::test]
async fn oversized_upload_is_shown_as_error_with_200() {
    let mut content = b"a\n".to_vec();
    content.resize(2 * 1024 * 1024 + 1, b'7');

    let response = server()
        .post("/")
        .multipart(csv_form("big.csv", content))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("File too large (max 2MB)."));
}

#[tokio::test]
async fn upload_far_over_the_limit_is_still_too_large() {
    let mut content = b"a\n".to_vec();
    content.resize(9 * 1024 * 1024, b'7');

    let response = server()
        .post("/")
        .multipart(csv_form("big.csv", content))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("File too large (max 2MB)."));
    assert!(!html.contains("Unexpected error"));
}

#[tokio::test]
async fn rendered_rows_keep_header_order() {
    let response = server()
        .post("/")
        .multipart(csv_form("order.csv", "z,a,m\n1,2,3\n"))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"const tableData = [{"z":"1","a":"2","m":"3"}];"#));
    assert!(html.contains(
        r#"const tableColumns = [{"title":"z","field":"z","editor":"input"},{"title":"a","field":"a","editor":"input"},{"title":"m","field":"m","editor":"input"}];"#
    ));
    assert!(html.contains("<th></th>\n      <th>z</th>\n      <th>a</th>\n      <th>m</th>"));
}

#[tokio::test]
async fn configured_limit_is_used() {
    let config = Config {
        max_upload_bytes: 8,
        ..Config::default()
    };
    let response = server_with(config)
        .post("/")
        .multipart(csv_form("data.csv", "x,y\n1,2\n3,4\n"))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("File too large (max 8 bytes)."));
}

#[tokio::test]
async fn non_utf8_upload_is_shown_as_error() {
    let response = server()
        .post("/")
        .multipart(csv_form("data.csv", b"a\n\xff\xff\n".to_vec()))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Failed to decode file."));
}

#[tokio::test]
async fn malformed_csv_is_shown_as_error() {
    let response = server()
        .post("/")
        .multipart(csv_form("data.csv", "a,b\n1,2,3\n"))
        .await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains("Invalid CSV format: Expected 2 fields in line 2, saw 3"));
}

#[tokio::test]
async fn missing_file_field_is_shown_as_error() {
    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server().post("/").multipart(form).await;
    response.assert_status_ok();
    assert!(response.text().contains("No file uploaded."));
}

#[tokio::test]
async fn text_only_upload_has_no_summary() {
    let response = server()
        .post("/")
        .multipart(csv_form("people.csv", "name,city\nann,oslo\n"))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"[{"name":"ann","city":"oslo"}]"#));
    assert!(!html.contains("Numeric summary"));
}

#[tokio::test]
async fn repeated_upload_renders_identically() {
    let server = server();
    let content = "a,b\n1,x\n2,\n";

    let first = server
        .post("/")
        .multipart(csv_form("data.csv", content))
        .await
        .text();
    let second = server
        .post("/")
        .multipart(csv_form("data.csv", content))
        .await
        .text();
    assert_eq!(first, second);
}

#[tokio::test]
async fn health_check() {
    let response = server().get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn static_files_are_served_from_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), "body { color: red; }").unwrap();

    let config = Config {
        static_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let response = server_with(config).get("/static/style.css").await;
    response.assert_status_ok();
    response.assert_text("body { color: red; }");
}
