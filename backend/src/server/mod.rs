//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
pub(crate) use metrics::build_prometheus;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use legal_entities::Trace;
#[cfg(debug_assertions)]
use legal_entities::doc::ApiDoc;
use legal_entities::inbound::http::bank_accounts::{
    create_bank_account, delete_bank_account, get_bank_account, list_bank_accounts,
    update_bank_account,
};
use legal_entities::inbound::http::health::{HealthState, live, ready};
use legal_entities::inbound::http::json_config;
use legal_entities::inbound::http::legal_entities::{
    create_legal_entity, delete_legal_entity, get_legal_entity, list_legal_entities,
    update_legal_entity,
};
use legal_entities::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_legal_entities)
        .service(create_legal_entity)
        .service(get_legal_entity)
        .service(update_legal_entity)
        .service(delete_legal_entity)
        .service(list_bank_accounts)
        .service(create_bank_account)
        .service(get_bank_account)
        .service(update_bank_account)
        .service(delete_bank_account);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: binding, storage, event and optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the event publisher cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let bind_addr = config.bind_addr;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use legal_entities::domain::TRACE_ID_HEADER;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn memory_deps() -> AppDependencies {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("addr"));
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config).expect("state builds"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn resource_routes_are_mounted_under_api_v1() {
        let app = actix_test::init_service(build_app(memory_deps())).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/legal-entities")
            .set_json(json!({"name": "Acme LLC"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["name"], "Acme LLC");
    }

    #[rstest]
    #[actix_web::test]
    async fn error_responses_carry_request_trace_id() {
        let app = actix_test::init_service(build_app(memory_deps())).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/legal-entities/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace id header");
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["traceId"], header.as_str());
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_is_reported_before_start() {
        let app = actix_test::init_service(build_app(memory_deps())).await;

        let req = actix_test::TestRequest::get().uri("/health/ready").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
