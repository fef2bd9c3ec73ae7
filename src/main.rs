#[tokio::main]
async fn main() {
    elevate::start_server().await;
}
