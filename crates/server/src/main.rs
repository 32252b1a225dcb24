#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docstruct_server::start().await
}
