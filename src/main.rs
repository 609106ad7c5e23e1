#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    kwitansi_server::run().await?;
    Ok(())
}
