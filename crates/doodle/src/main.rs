use doodle::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DoodleError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // First argument wins over the environment.
    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DOODLE_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let server = DoodleServer::builder().bind(&addr).build().await?;
    server.run().await
}
