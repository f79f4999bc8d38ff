#[tokio::main]
async fn main() {
    if let Err(e) = nodulewatch::run().await {
        eprintln!("nodulewatch failed to start: {e}");
        std::process::exit(1);
    }
}
