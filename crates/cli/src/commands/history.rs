use std::path::Path;

use mixmart_core::config::{AppConfig, LoadOptions};
use mixmart_core::{HistoryMiner, HistoryRecommendation};

use crate::commands::{read_catalog, read_orders, CommandResult};

pub fn run(
    orders_path: &Path,
    market_path: Option<&Path>,
    catalog_path: &Path,
    json: bool,
) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "history",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = match read_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(failure) => return failure.into_result("history"),
    };
    let orders = match read_orders(orders_path, "order history") {
        Ok(orders) => orders,
        Err(failure) => return failure.into_result("history"),
    };
    let market = match market_path.map(|path| read_orders(path, "market orders")).transpose() {
        Ok(market) => market,
        Err(failure) => return failure.into_result("history"),
    };

    let mut miner = HistoryMiner::new(&catalog, config.history);
    if let Some(market) = market.as_deref() {
        miner = miner.with_market_orders(market);
    }
    let records = miner.recommendations(&orders);
    let message = render_records(&records);

    if json {
        match serde_json::to_value(&records) {
            Ok(data) => CommandResult::success_with_data("history", message, data),
            Err(error) => {
                CommandResult::failure("history", "serialization", error.to_string(), 6)
            }
        }
    } else {
        CommandResult::success("history", message)
    }
}

fn render_records(records: &[HistoryRecommendation]) -> String {
    if records.is_empty() {
        return "no history recommendations".to_owned();
    }

    let mut lines = vec![format!("{} history recommendations:", records.len())];
    for record in records {
        lines.push(format!(
            "  - {:.2} {}: {} [{}]",
            record.confidence, record.product.id.0, record.product.name, record.reason
        ));
    }
    lines.join("\n")
}
