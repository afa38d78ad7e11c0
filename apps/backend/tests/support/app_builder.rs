use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use accounts::config::db::DbKind;
use accounts::infra::state::build_state;
use accounts::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use accounts::routes;
use accounts::state::{AppState, SecurityConfig};

pub const TEST_SECRET: &[u8] = b"integration-tests-secret-integration-tests";

/// Fresh SQLite in-memory state with migrations applied.
pub async fn test_state() -> AppState {
    build_state()
        .with_db(DbKind::SqliteMemory)
        .with_security(SecurityConfig::new(TEST_SECRET.to_vec()))
        .build()
        .await
        .expect("test state should build")
}

/// Builder for test Actix services wired like `main.rs`.
pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Production routes behind the production middleware stack.
    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(web::Data::new(self.state))
                .configure(routes::configure),
        )
        .await
    }
}

/// ```ignore
/// let state = test_state().await;
/// let app = create_test_app(state.clone()).build().await;
/// ```
pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
