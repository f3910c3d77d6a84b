use super::*;

fn client() -> CatalogClient {
    CatalogClient::new("http://shop.test", 5, "sportshop-test/0.1", 0, 0).unwrap()
}

#[test]
fn products_url_without_filters_has_no_query() {
    let url = client().products_url(None, None).unwrap();
    assert_eq!(url.as_str(), "http://shop.test/api/products");
}

#[test]
fn products_url_with_sport_and_level() {
    let url = client()
        .products_url(Some("RUNNING"), Some(Level::Average))
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://shop.test/api/products?sport=RUNNING&level=AVERAGE"
    );
}

#[test]
fn products_url_skips_blank_sport() {
    let url = client().products_url(Some("  "), Some(Level::Expert)).unwrap();
    assert_eq!(url.as_str(), "http://shop.test/api/products?level=EXPERT");
}

#[test]
fn product_url_repeats_id_as_query() {
    let url = client().product_url("p-cyc-001").unwrap();
    assert_eq!(
        url.as_str(),
        "http://shop.test/api/products/p-cyc-001?product_id=p-cyc-001"
    );
}

#[test]
fn product_url_escapes_path_segment() {
    let url = client().product_url("a/b").unwrap();
    assert_eq!(
        url.as_str(),
        "http://shop.test/api/products/a%2Fb?product_id=a%2Fb"
    );
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = CatalogClient::new("http://shop.test/", 5, "ua", 0, 0).unwrap();
    assert_eq!(client.base_url(), "http://shop.test");
    assert_eq!(
        client.endpoint("/api/sports").unwrap().as_str(),
        "http://shop.test/api/sports"
    );
}

#[test]
fn base_url_with_path_prefix_is_kept() {
    let client = CatalogClient::new("http://shop.test/boutique", 5, "ua", 0, 0).unwrap();
    assert_eq!(
        client.endpoint("/api/sports").unwrap().as_str(),
        "http://shop.test/boutique/api/sports"
    );
}

#[test]
fn rejects_invalid_base_url() {
    let err = CatalogClient::new("not-a-url", 5, "ua", 0, 0).unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

    let err = CatalogClient::new("ftp://shop.test", 5, "ua", 0, 0).unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn error_body_message_becomes_api_error() {
    let url = Url::parse("http://shop.test/api/login").unwrap();
    let err = error_from_body(401, r#"{"error":"Identifiants invalides"}"#, &url);
    assert!(matches!(
        err,
        ClientError::Api { status: 401, ref message } if message == "Identifiants invalides"
    ));
}

#[test]
fn blank_or_missing_error_body_is_unexpected_status() {
    let url = Url::parse("http://shop.test/api/login").unwrap();
    for body in ["", "<html>oops</html>", r#"{"error":"  "}"#, "{}"] {
        let err = error_from_body(500, body, &url);
        assert!(
            matches!(err, ClientError::UnexpectedStatus { status: 500, .. }),
            "body {body:?} gave {err:?}"
        );
    }
}
