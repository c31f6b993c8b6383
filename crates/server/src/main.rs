#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcqgen_server::start().await
}
