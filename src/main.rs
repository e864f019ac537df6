#[tokio::main]
async fn main() {
    sk_events_backend::run().await;
}
