use waypoint_core::{
    NumericMatcher, Params, PathRouter, RegexMatcher, RouteBuilder, RouteError, RouteRequest,
    Router, RoutingFailure, ValueSetMatcher,
};

fn users_router() -> PathRouter {
    let mut router = PathRouter::new();
    router
        .add_route(RouteBuilder::new().get("/users").to("list").build().unwrap())
        .unwrap();
    router
        .add_route(RouteBuilder::new().get("/user/[:id]").to("detail").build().unwrap())
        .unwrap();
    router
}

#[test]
fn test_users_scenario() {
    let router = users_router();

    let result = router.match_path("GET", "/user/42");
    assert!(result.succeeded());
    assert_eq!(result.route().unwrap().identifier(), "detail");
    assert_eq!(result.param("id"), Some("42"));

    let result = router.match_path("HEAD", "/users");
    assert_eq!(result.failure_kind(), Some(RoutingFailure::MethodNotAllowed));
    assert_eq!(result.route().unwrap().identifier(), "list");
    assert_eq!(result.status_code(), Some(405));

    let result = router.match_path("GET", "/unknown");
    assert_eq!(result.failure_kind(), Some(RoutingFailure::NotFound));
    assert!(result.route().is_none());
    assert_eq!(result.status_code(), Some(404));

    assert_eq!(router.generate_uri("detail", [("id", 42)]).unwrap(), "/user/42");
}

#[test]
fn test_query_string_is_ignored() {
    let router = users_router();
    let plain = router.match_path("GET", "/users");
    let with_query = router.match_path("GET", "/users?x=1");

    assert!(with_query.succeeded());
    assert!(with_query.is_route(plain.route().unwrap()));
}

#[test]
fn test_case_insensitive_and_trailing_slash() {
    let router = users_router();
    assert!(router.match_path("GET", "/USERS/").succeeded());
    assert_eq!(router.match_path("get", "/User/7/").param("id"), Some("7"));
}

#[test]
fn test_placeholder_does_not_cross_segments() {
    let router = users_router();
    let result = router.match_path("GET", "/user/42/posts");
    assert_eq!(result.failure_kind(), Some(RoutingFailure::NotFound));
}

#[test]
fn test_params_are_url_decoded() {
    let mut router = PathRouter::new();
    router
        .add_route(RouteBuilder::new().get("/tag/[:name]").to("tag").build().unwrap())
        .unwrap();

    let result = router.match_path("GET", "/tag/rust%20lang");
    assert_eq!(result.param("name"), Some("rust lang"));
}

#[test]
fn test_bad_request_with_matcher() {
    let mut router = PathRouter::new();
    router
        .add_route(
            RouteBuilder::new()
                .get("/user/[:id]")
                .to("detail")
                .if_matches("id", NumericMatcher::new())
                .build()
                .unwrap(),
        )
        .unwrap();

    assert!(router.match_path("GET", "/user/12").succeeded());

    let result = router.match_path("GET", "/user/012");
    assert_eq!(result.failure_kind(), Some(RoutingFailure::BadRequest));
    assert_eq!(result.route().unwrap().identifier(), "detail");
    assert_eq!(result.status_code(), Some(400));
}

#[test]
fn test_matcher_fallthrough_to_later_route() {
    let mut router = PathRouter::new();
    router
        .add_route(
            RouteBuilder::new()
                .get("/post/[:key]")
                .to("post.by_id")
                .if_matches("key", NumericMatcher::new())
                .build()
                .unwrap(),
        )
        .unwrap();
    router
        .add_route(
            RouteBuilder::new()
                .get("/post/[:key]")
                .to("post.by_slug")
                .if_matches("key", RegexMatcher::new("[a-z0-9-]+").unwrap())
                .build()
                .unwrap(),
        )
        .unwrap();

    let result = router.match_path("GET", "/post/15");
    assert_eq!(result.route().unwrap().identifier(), "post.by_id");

    let result = router.match_path("GET", "/post/hello-world");
    assert!(result.succeeded());
    assert_eq!(result.route().unwrap().identifier(), "post.by_slug");

    let result = router.match_path("GET", "/post/Hello_World");
    assert_eq!(result.failure_kind(), Some(RoutingFailure::BadRequest));
    assert_eq!(result.route().unwrap().identifier(), "post.by_id");
}

#[test]
fn test_round_trip() {
    let mut router = PathRouter::new();
    let route = router
        .add_route(
            RouteBuilder::new()
                .get("/[:lang]/search/[:term]")
                .to("search")
                .if_matches("lang", ValueSetMatcher::new(["de", "en"]))
                .build()
                .unwrap(),
        )
        .unwrap();

    let params: Params = [("lang", "en"), ("term", "a b/c & d")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let uri = router.generate_uri("search", &params).unwrap();
    let result = router.match_path("GET", &uri);

    assert!(result.is_route(&route));
    assert_eq!(result.params(), &params);

    let again = router.generate_uri("search", result.params()).unwrap();
    assert_eq!(again, uri);
}

#[test]
fn test_generate_uri_errors() {
    let mut router = users_router();
    router
        .add_route(
            RouteBuilder::new()
                .get("/order/[:id]")
                .to("order")
                .if_matches("id", NumericMatcher::new())
                .build()
                .unwrap(),
        )
        .unwrap();

    let none: [(&str, &str); 0] = [];

    assert_eq!(
        router.generate_uri("", none).unwrap_err(),
        RouteError::MissingIdentifier
    );
    assert!(matches!(
        router.generate_uri("missing", none).unwrap_err(),
        RouteError::UnknownIdentifier(_)
    ));
    assert!(matches!(
        router.generate_uri("detail", none).unwrap_err(),
        RouteError::MissingParams { .. }
    ));
    assert!(matches!(
        router.generate_uri("order", [("id", "abc")]).unwrap_err(),
        RouteError::ParamMismatch { .. }
    ));

    assert_eq!(
        router.generate_uri("order", [("id", "1"), ("unused", "x")]).unwrap(),
        "/order/1"
    );
}

#[test]
fn test_route_variants_share_base() {
    let base = RouteBuilder::new()
        .from("/article/[:id]")
        .if_matches("id", NumericMatcher::new());

    let mut router = PathRouter::new();
    router
        .add_route(base.accepting("GET").to("article.show").build().unwrap())
        .unwrap();
    router
        .add_route(base.accepting("PUT").to("article.update").build().unwrap())
        .unwrap();
    router
        .add_route(base.accepting("DELETE").to("article.delete").build().unwrap())
        .unwrap();

    assert_eq!(
        router.match_path("PUT", "/article/3").route().unwrap().identifier(),
        "article.update"
    );
    assert_eq!(
        router.match_path("POST", "/article/3").failure_kind(),
        Some(RoutingFailure::MethodNotAllowed)
    );
    assert_eq!(
        router.allowed_methods("/article/3"),
        vec!["GET", "PUT", "DELETE"]
    );
}

#[test]
fn test_router_trait_object() {
    let router: Box<dyn Router> = Box::new(users_router());
    let result = router.match_request(&RouteRequest::new("GET", "/user/9"));
    assert_eq!(result.param("id"), Some("9"));

    let mut params = Params::new();
    params.insert("id".to_string(), "9".to_string());
    assert_eq!(router.generate_uri("detail", &params).unwrap(), "/user/9");
}

#[test]
fn test_http_request_matching() {
    let router = users_router();
    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri("http://localhost/user/5?expand=1")
        .body(Vec::<u8>::new())
        .unwrap();

    let result = router.match_request(&request);
    assert_eq!(result.param("id"), Some("5"));
}
