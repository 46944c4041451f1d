#[tokio::main]
async fn main() -> std::io::Result<()> {
    tour_booking::run().await
}
