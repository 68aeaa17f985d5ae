use std::sync::Once;

use frappe_sdk::FrappeApp;
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Install a test subscriber once; output is controlled by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock site and an app pointed at it.
pub async fn mock_site() -> (MockServer, FrappeApp) {
    init_tracing();
    let server = MockServer::start().await;
    let app = FrappeApp::new(server.uri()).expect("Failed to create app");
    (server, app)
}
