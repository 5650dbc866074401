use assetway_core::builder::build_default_registry;
use assetway_core::config::AssetwayConfig;
use assetway_core::registry::{HandlerRegistry, ResourceHandlerRegistration};
use assetway_core::serve::{ConditionalHeaders, handle_asset_request};
use http::StatusCode;
use integration_tests::{AssetTree, md5_hex};
use pretty_assertions::assert_eq;

fn registry_for(tree: &AssetTree, configure: impl FnOnce(&mut AssetwayConfig)) -> HandlerRegistry {
    let mut cfg = AssetwayConfig::default();
    cfg.resources.static_locations = vec![tree.location("static")];
    configure(&mut cfg);
    cfg.validate().unwrap();
    build_default_registry(&cfg).unwrap()
}

fn static_registration(registry: &HandlerRegistry) -> &ResourceHandlerRegistration {
    registry
        .match_request("/anything")
        .expect("static registration should match")
}

fn header<'a>(response: &'a assetway_core::serve::AssetResponse, name: &str) -> Option<&'a str> {
    response.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn serves_plain_assets_with_content_type_and_cache_control() {
    let tree = AssetTree::new();
    tree.write("static/css/app.css", b"body { margin: 0; }");
    let registry = registry_for(&tree, |cfg| {
        cfg.resources.cache_period_secs = Some(3600);
    });
    let registration = registry.match_request("/css/app.css").unwrap();

    let res =
        handle_asset_request(registration, "/css/app.css", &ConditionalHeaders::default()).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_bytes(), b"body { margin: 0; }");
    assert_eq!(header(&res, "content-type"), Some("text/css"));
    assert_eq!(header(&res, "cache-control"), Some("max-age=3600"));
    assert_eq!(header(&res, "content-length"), Some("19"));
}

#[tokio::test]
async fn missing_assets_return_404() {
    let tree = AssetTree::new();
    tree.write("static/present.txt", b"here");
    let registry = registry_for(&tree, |_| {});
    let registration = static_registration(&registry);

    let res =
        handle_asset_request(registration, "/absent.txt", &ConditionalHeaders::default()).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn path_traversal_is_rejected() {
    let tree = AssetTree::new();
    tree.write("secret.txt", b"keep out");
    tree.write("static/app.js", b"let x = 1;");
    let registry = registry_for(&tree, |_| {});
    let registration = static_registration(&registry);

    let res = handle_asset_request(
        registration,
        "/../secret.txt",
        &ConditionalHeaders::default(),
    )
    .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn content_versioned_urls_resolve_and_stale_hashes_do_not() {
    let tree = AssetTree::new();
    let css = b"body { margin: 0; }";
    tree.write("static/css/app.css", css);
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.strategy.content.enabled = true;
    });
    let registration = static_registration(&registry);
    let hash = md5_hex(css);

    let res = handle_asset_request(
        registration,
        &format!("/css/app-{hash}.css"),
        &ConditionalHeaders::default(),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_bytes(), css);

    let stale = handle_asset_request(
        registration,
        "/css/app-00000000000000000000000000000000.css",
        &ConditionalHeaders::default(),
    )
    .await;
    assert_eq!(stale.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixed_versioned_urls_resolve_only_for_the_configured_version() {
    let tree = AssetTree::new();
    tree.write("static/js/app.js", b"let x = 1;");
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.strategy.fixed.enabled = true;
        cfg.chain.strategy.fixed.version = "v9".to_string();
    });
    let registration = static_registration(&registry);

    let res = handle_asset_request(
        registration,
        "/v9/js/app.js",
        &ConditionalHeaders::default(),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let wrong = handle_asset_request(
        registration,
        "/v8/js/app.js",
        &ConditionalHeaders::default(),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unversioned_urls_still_resolve_when_a_strategy_is_active() {
    let tree = AssetTree::new();
    tree.write("static/css/app.css", b"body {}");
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.strategy.content.enabled = true;
    });
    let registration = static_registration(&registry);

    let res =
        handle_asset_request(registration, "/css/app.css", &ConditionalHeaders::default()).await;

    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn gzip_variants_are_negotiated() {
    let tree = AssetTree::new();
    let js = b"let value = 1; // padding padding padding";
    tree.write("static/js/app.js", js);
    tree.write_gz("static/js/app.js.gz", js);
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.enabled = Some(true);
        cfg.chain.gzip = true;
    });
    let registration = static_registration(&registry);

    let gzipped = handle_asset_request(registration, "/js/app.js", &ConditionalHeaders {
        accept_encoding: Some("gzip, deflate".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(gzipped.status, StatusCode::OK);
    assert_eq!(header(&gzipped, "content-encoding"), Some("gzip"));
    assert_eq!(header(&gzipped, "vary"), Some("Accept-Encoding"));
    // The variant keeps the content type of the file it stands in for.
    assert!(
        header(&gzipped, "content-type")
            .is_some_and(|ct| ct.contains("javascript")),
        "unexpected content type: {:?}",
        header(&gzipped, "content-type")
    );
    assert_ne!(gzipped.body_bytes(), js);

    let refused = handle_asset_request(registration, "/js/app.js", &ConditionalHeaders {
        accept_encoding: Some("gzip;q=0".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(refused.status, StatusCode::OK);
    assert_eq!(header(&refused, "content-encoding"), None);
    assert_eq!(refused.body_bytes(), js);

    let plain =
        handle_asset_request(registration, "/js/app.js", &ConditionalHeaders::default()).await;
    assert_eq!(header(&plain, "content-encoding"), None);
    assert_eq!(plain.body_bytes(), js);
}

#[tokio::test]
async fn app_cache_manifests_are_rewritten_through_the_chain() {
    let tree = AssetTree::new();
    let css = b"body { margin: 0; }";
    tree.write("static/css/app.css", css);
    tree.write(
        "static/offline.appcache",
        b"CACHE MANIFEST\n# version 1\ncss/app.css\nNETWORK:\n*\n",
    );
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.strategy.content.enabled = true;
        cfg.chain.html_app_cache = true;
    });
    let registration = static_registration(&registry);
    let hash = md5_hex(css);

    let res = handle_asset_request(
        registration,
        "/offline.appcache",
        &ConditionalHeaders::default(),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    let body = String::from_utf8(res.body_bytes().to_vec()).unwrap();
    assert!(body.starts_with("CACHE MANIFEST\n"), "body: {body}");
    assert!(
        body.contains(&format!("css/app-{hash}.css")),
        "manifest entry was not versioned: {body}"
    );
    assert!(body.contains("# version 1"), "comments must survive: {body}");
    assert!(body.contains("\n*\n"), "network wildcard must survive: {body}");
    assert!(body.contains("# Hash: "), "digest trailer missing: {body}");
}

#[tokio::test]
async fn conditional_requests_return_304() {
    let tree = AssetTree::new();
    tree.write("static/index.html", b"<html></html>");
    let registry = registry_for(&tree, |cfg| {
        cfg.resources.cache_period_secs = Some(60);
    });
    let registration = registry.match_request("/index.html").unwrap();

    let first = handle_asset_request(registration, "/index.html", &ConditionalHeaders::default())
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let etag = header(&first, "etag").unwrap().to_string();

    let revalidated = handle_asset_request(registration, "/index.html", &ConditionalHeaders {
        if_none_match: Some(etag.clone()),
        ..Default::default()
    })
    .await;

    assert_eq!(revalidated.status, StatusCode::NOT_MODIFIED);
    assert!(revalidated.body_bytes().is_empty());
    assert_eq!(header(&revalidated, "etag"), Some(etag.as_str()));
    assert_eq!(header(&revalidated, "cache-control"), Some("max-age=60"));
}

#[tokio::test]
async fn memoized_resolutions_survive_repeated_requests() {
    let tree = AssetTree::new();
    let css = b"body {}";
    tree.write("static/app.css", css);
    let registry = registry_for(&tree, |cfg| {
        cfg.chain.strategy.content.enabled = true;
        cfg.chain.cache = true;
    });
    let registration = static_registration(&registry);
    let hash = md5_hex(css);
    let path = format!("/app-{hash}.css");

    for _ in 0..3 {
        let res =
            handle_asset_request(registration, &path, &ConditionalHeaders::default()).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body_bytes(), css);
    }
}
