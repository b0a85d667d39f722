use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreatePostRequest, ListPostsQuery, UpdatePostRequest};
use crate::presentation::middleware::RequestId;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Scope, web};
use tracing::info;

/// Routes under `/v1/posts`, generic over the storage backend.
pub fn scope<R: PostRepository + 'static>() -> Scope {
    web::scope("/v1/posts")
        .route("", web::post().to(create_post::<R>))
        .route("", web::get().to(read_all_posts::<R>))
        .route("/{post_id}", web::get().to(read_post::<R>))
        .route("/{post_id}", web::put().to(update_post::<R>))
        .route("/{post_id}", web::delete().to(delete_post::<R>))
}

async fn create_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let response = service.create_post(payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = response.post_id,
        "post created"
    );

    Ok(HttpResponse::Ok().json(response))
}

async fn read_post<R: PostRepository + 'static>(
    service: web::Data<PostService<R>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let response = service.read_post_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn update_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let response = service.update_post(post_id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(response))
}

async fn delete_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let response = service.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(response))
}

async fn read_all_posts<R: PostRepository + 'static>(
    service: web::Data<PostService<R>>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let request = query.into_inner().into_page_request()?;
    let page = service.read_all_post(&request).await?;
    Ok(HttpResponse::Ok().json(page))
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory_post_repository::InMemoryPostRepository;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn service() -> PostService<InMemoryPostRepository> {
        PostService::new(Arc::new(InMemoryPostRepository::new()))
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($service))
                    .service(web::scope("/api").service(scope::<InMemoryPostRepository>())),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_returns_ok_with_assigned_id() {
        let app = app!(service());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": "Hello", "content": "World" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "postId": 1, "title": "Hello", "content": "World" }));
    }

    #[actix_web::test]
    async fn missing_post_maps_to_not_found() {
        let app = app!(service());

        for req in [
            test::TestRequest::get().uri("/api/v1/posts/5").to_request(),
            test::TestRequest::put()
                .uri("/api/v1/posts/5")
                .set_json(json!({ "title": "a", "content": "b" }))
                .to_request(),
            test::TestRequest::delete().uri("/api/v1/posts/5").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["details"]["resource"], 5);
        }
    }

    #[actix_web::test]
    async fn create_without_content_is_rejected_by_extractor() {
        let app = app!(service());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": "only a title" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn listing_accepts_paging_and_sort_params() {
        let service = service();
        for title in ["b", "c", "a"] {
            service
                .create_post(CreatePostRequest {
                    title: title.into(),
                    content: "x".into(),
                })
                .await
                .unwrap();
        }
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?page=0&size=2&sort=title,asc")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["content"][0]["title"], "a");
        assert_eq!(body["content"][1]["title"], "b");
        assert_eq!(body["size"], 2);
        assert_eq!(body["totalElements"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["last"], false);
    }

    #[actix_web::test]
    async fn listing_tolerates_negative_and_garbage_paging() {
        let service = service();
        for n in 1..=3 {
            service
                .create_post(CreatePostRequest {
                    title: format!("post {n}"),
                    content: "x".into(),
                })
                .await
                .unwrap();
        }
        let app = app!(service);

        for uri in [
            "/api/v1/posts?page=-1",
            "/api/v1/posts?size=-3",
            "/api/v1/posts?page=abc&size=xyz",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["number"], 0, "{uri}");
            assert_eq!(body["size"], 5, "{uri}");
            assert_eq!(body["content"][0]["postId"], 3, "{uri}");
        }
    }

    #[actix_web::test]
    async fn listing_rejects_unknown_sort_property() {
        let app = app!(service());

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?sort=author,desc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid request: unknown sort property: author,desc");
    }
}
