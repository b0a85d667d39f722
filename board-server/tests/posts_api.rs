use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use board_server::application::post_service::PostService;
use board_server::data::memory_post_repository::InMemoryPostRepository;
use board_server::server::api;
use serde_json::{Value, json};

macro_rules! board_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(PostService::new(Arc::new(
                    InMemoryPostRepository::new(),
                ))))
                .configure(api::<InMemoryPostRepository>),
        )
        .await
    };
}

#[actix_web::test]
async fn post_lifecycle_over_http() {
    let app = board_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({ "title": "Hello", "content": "World" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created, json!({ "postId": 1, "title": "Hello", "content": "World" }));

    let req = test::TestRequest::get().uri("/api/v1/posts/1").to_request();
    let read: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(read, created);

    let req = test::TestRequest::put()
        .uri("/api/v1/posts/1")
        .set_json(json!({ "title": "Hi", "content": "Earth" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated, json!({ "postId": 1, "title": "Hi", "content": "Earth" }));

    let req = test::TestRequest::delete().uri("/api/v1/posts/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted, json!({ "postId": 1 }));

    let req = test::TestRequest::get().uri("/api/v1/posts/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn default_listing_pages_newest_first() {
    let app = board_app!();

    for n in 1..=12 {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": format!("post {n}"), "content": "body" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<i64> = first["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["postId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![12, 11, 10, 9, 8]);
    assert_eq!(first["number"], 0);
    assert_eq!(first["size"], 5);
    assert_eq!(first["totalElements"], 12);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["first"], true);
    assert_eq!(first["last"], false);

    let req = test::TestRequest::get().uri("/api/v1/posts?page=2").to_request();
    let last: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<i64> = last["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["postId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(last["numberOfElements"], 2);
    assert_eq!(last["last"], true);

    let req = test::TestRequest::get().uri("/api/v1/posts?page=9").to_request();
    let beyond: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(beyond["empty"], true);
    assert_eq!(beyond["totalElements"], 12);
}

#[actix_web::test]
async fn non_numeric_id_is_not_routed_to_a_post() {
    let app = board_app!();

    let req = test::TestRequest::get().uri("/api/v1/posts/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
