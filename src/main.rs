#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = quizforge_rust::run().await {
        eprintln!("quizforge-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
