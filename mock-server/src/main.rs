use mock_server::Credentials;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let defaults = Credentials::default();
    let credentials = Credentials {
        user: std::env::var("SENDGRID_USER").unwrap_or(defaults.user),
        key: std::env::var("SENDGRID_PASS").unwrap_or(defaults.key),
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr} (api user {})", credentials.user);
    mock_server::run(listener, credentials).await
}
