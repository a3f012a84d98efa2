#[tokio::main]
async fn main() {
    gear::start_server().await;
}
