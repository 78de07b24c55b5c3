// Review Report - query the review collection and print summary statistics as JSON
use anyhow::Context;
use review_indexer::config::{collection_from_env, connect_store, StoreBackend};
use review_indexer::report::ReviewSummary;
use review_indexer_shared::{ReviewQuery, DEFAULT_QUERY_LIMIT};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // stdout carries the report, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    let mut query = ReviewQuery::all().with_limit(
        env::var("REPORT_LIMIT")
            .unwrap_or_else(|_| DEFAULT_QUERY_LIMIT.to_string())
            .parse()
            .unwrap_or(DEFAULT_QUERY_LIMIT),
    );
    if let Ok(product_id) = env::var("REPORT_PRODUCT_ID") {
        if !product_id.trim().is_empty() {
            query = query.for_product(product_id.trim());
        }
    }
    if let Ok(min_rating) = env::var("REPORT_MIN_RATING") {
        let min_rating: f64 = min_rating
            .trim()
            .parse()
            .with_context(|| format!("REPORT_MIN_RATING '{}' is not a number", min_rating))?;
        query = query.with_min_rating(min_rating);
    }

    let collection = collection_from_env();
    info!("Querying collection '{}' with {:?}", collection, query);

    let backend = StoreBackend::from_env().require_persistent()?;
    let store = connect_store(backend, &collection).await?;
    let reviews = store.query_reviews(&query).await?;
    info!("Fetched {} reviews", reviews.len());

    let summary = ReviewSummary::from_reviews(&reviews);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
