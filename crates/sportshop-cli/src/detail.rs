//! Product detail handler.

use sportshop_client::DetailOutcome;
use sportshop_core::SportLabels;

use crate::app::App;
use crate::render;

/// Print one product, merged with its seed extras when the seed knows it.
///
/// # Errors
///
/// Returns an error when the product does not exist or cannot be loaded.
pub(crate) async fn run_product(app: &App, id: &str) -> anyhow::Result<()> {
    app.catalog.refresh_sports().await;

    match app.catalog.product_detail(id).await {
        DetailOutcome::Found {
            product,
            details,
            from_seed,
        } => {
            let labels = SportLabels::from_options(&app.catalog.sports());

            let mut texts = vec![
                product.name.clone(),
                product.description.clone(),
                product.category.label().to_owned(),
                render::OFFLINE_DETAIL.to_owned(),
                render::stock_summary(product.availability()),
            ];
            texts.extend(product.sports.iter().map(|key| labels.label(key)));
            texts.extend(product.levels.iter().map(|l| l.label().to_owned()));
            if let Some(details) = &details {
                texts.extend(details.features.iter().map(|f| (*f).to_owned()));
                texts.push(render::delivery(details.delivery_days));
            }
            app.prime(texts.iter().map(String::as_str)).await;

            if from_seed {
                eprintln!("{}", app.t(render::OFFLINE_DETAIL));
            }
            let display = |text: &str| app.t(text);
            print!(
                "{}",
                render::product_detail(&product, details.as_ref(), &labels, &display)
            );
            Ok(())
        }
        DetailOutcome::NotFound => {
            anyhow::bail!("Aucun produit ne correspond a l'identifiant {id}.")
        }
        DetailOutcome::Failed { message } => anyhow::bail!("{message}"),
        DetailOutcome::Stale => Ok(()),
    }
}
