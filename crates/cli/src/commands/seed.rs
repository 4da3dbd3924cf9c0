//! `seed` command: insert demo products into the hosted backend.

use rust_decimal::Decimal;

use yarnhaven_admin::supabase::types::NewProduct;

use super::CliError;

/// Demo catalog: (title, price, category, stock, description).
const DEMO_PRODUCTS: &[(&str, &str, &str, i32, &str)] = &[
    (
        "Chunky Knit Blanket",
        "89.50",
        "blankets",
        3,
        "Oversized hand-crocheted blanket in undyed merino.",
    ),
    (
        "Granny Square Cardigan",
        "64.00",
        "clothing",
        5,
        "Patchwork cardigan crocheted from worsted-weight cotton.",
    ),
    (
        "Cotton Market Tote",
        "24.00",
        "bags",
        10,
        "Stretchy open-weave tote that packs down to pocket size.",
    ),
    (
        "Amigurumi Octopus",
        "18.50",
        "toys",
        8,
        "Palm-sized plush octopus with safety eyes.",
    ),
    (
        "Chunky Beanie",
        "22.00",
        "accessories",
        12,
        "Ribbed winter beanie in super-bulky wool.",
    ),
    (
        "Plant Hanger",
        "15.00",
        "home",
        7,
        "Macrame-style crocheted hanger for a 6-inch pot.",
    ),
];

/// Insert the demo products.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or any insert fails.
pub async fn run() -> Result<(), CliError> {
    let client = super::service_client_from_env()?;

    for (title, price, category, stock, description) in DEMO_PRODUCTS {
        let price: Decimal = price.parse().unwrap_or_default();
        let slug = title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");

        let product = NewProduct {
            title: (*title).to_owned(),
            slug,
            description: (*description).to_owned(),
            price,
            category: (*category).to_owned(),
            stock: *stock,
            image_urls: Vec::new(),
        };

        client.create_product(&product).await?;
        tracing::info!("Seeded product: {title}");
    }

    tracing::info!("Seeded {} products", DEMO_PRODUCTS.len());
    Ok(())
}
