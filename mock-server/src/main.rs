use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let username =
        std::env::var("TXERPA_USERNAME").unwrap_or_else(|_| mock_server::DEFAULT_USERNAME.to_string());
    let password =
        std::env::var("TXERPA_PASSWORD").unwrap_or_else(|_| mock_server::DEFAULT_PASSWORD.to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %username, "listening");
    mock_server::run(listener, &username, &password).await
}
