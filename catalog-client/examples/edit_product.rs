// catalog-client/examples/edit_product.rs
// Add images to an existing product and save it

use anyhow::Context;
use catalog_client::{CatalogClient, ClientConfig, EditSession, PreviewRegistry, ProductLine};
use shared::models::filter_by_name;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_client::logger::init_logger("info", false)?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        println!(
            "Usage: {} <email> <password> <product name> <image>...",
            args[0]
        );
        println!(
            "  Example: {} admin@shop.com secret12 \"argan\" ./front.png ./side.png",
            args[0]
        );
        return Ok(());
    }
    let (email, password, query, images) = (&args[1], &args[2], &args[3], &args[4..]);

    let config = ClientConfig::from_env();
    let mut client = CatalogClient::from_config(&config)?;
    client.login(email, password).await?;

    let products = client.list_products(ProductLine::Haircare).await?;
    let product = filter_by_name(&products, query)
        .into_iter()
        .next()
        .with_context(|| format!("no haircare product matches '{}'", query))?;
    tracing::info!(id = %product.id, name = %product.name, "Editing product");

    let mut session = EditSession::edit(ProductLine::Haircare, product, PreviewRegistry::new())
        .configure(&config);
    session.append_paths(images).await?;

    for (index, url) in session.display_urls(client.base_url()).iter().enumerate() {
        println!("  [{}] {}", index, url.as_deref().unwrap_or("-"));
    }

    let report = session.submit(&client, &client).await?;
    println!(
        "Saved {} image(s): {} uploaded, {} dropped",
        report.images.len(),
        report.uploaded,
        report.dropped
    );
    Ok(())
}
