//! AKACorpTech site - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = akacorp_site::run().await {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}
