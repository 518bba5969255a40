#[tokio::main]
async fn main() {
    // Failures are reported, never turned into a non-zero exit code
    if let Err(e) = listing_harvester::run().await {
        eprintln!("Error: {e:#}");
    }
}
