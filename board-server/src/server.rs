use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::RequestContext;
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Mounts `/api/health` and `/api/v1/posts`. The caller registers `web::Data<PostService<R>>`.
pub fn api<R: PostRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .service(handlers::post::scope::<R>()),
    );
}

pub async fn start_rest_server<R: PostRepository + 'static>(
    config: AppConfig,
    post_service: PostService<R>,
) -> anyhow::Result<()> {
    build_server(config, post_service)?
        .await
        .map_err(anyhow::Error::new)?;

    Ok(())
}

/// Binds the listener and returns the server without driving it.
pub fn build_server<R: PostRepository + 'static>(
    config: AppConfig,
    post_service: PostService<R>,
) -> std::io::Result<Server> {
    let bind_address = (config.host.clone(), config.port);

    let server = HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(RequestContext)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(post_service.clone()))
            .configure(api::<R>)
    })
    .bind(bind_address)?;

    for addr in server.addrs() {
        info!(%addr, "HTTP server listening");
    }

    Ok(server.run())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory_post_repository::{InMemoryPostRepository, InMemoryPostTransaction};
    use crate::domain::error::DomainError;
    use crate::domain::page::{Page, PageRequest};
    use crate::domain::post::Post;
    use crate::infrastructure::config::StorageConfig;
    use actix_web::test;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    /// A store that can only be shared through `Arc`, never cloned.
    struct UncloneableRepository(InMemoryPostRepository);

    #[async_trait]
    impl PostRepository for UncloneableRepository {
        type Tx = InMemoryPostTransaction;

        async fn begin(&self) -> Result<Self::Tx, DomainError> {
            self.0.begin().await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
            self.0.find_by_id(id).await
        }

        async fn find_all(&self, request: &PageRequest) -> Result<Page<Post>, DomainError> {
            self.0.find_all(request).await
        }
    }

    fn local_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            storage: StorageConfig::Memory,
            cors_origins: vec!["*".into()],
        }
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let service = PostService::new(Arc::new(InMemoryPostRepository::new()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(api::<InMemoryPostRepository>),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn server_builds_for_a_store_that_is_not_clone() {
        let service = PostService::new(Arc::new(UncloneableRepository(
            InMemoryPostRepository::new(),
        )));
        let worker_copy = service.clone();

        let server = build_server(local_config(), service).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;

        let created = worker_copy
            .create_post(crate::presentation::dto::CreatePostRequest {
                title: "Hello".into(),
                content: "World".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.post_id, 1);
    }
}
