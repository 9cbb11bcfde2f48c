use mixmart_core::config::{AppConfig, LoadOptions};
use mixmart_core::fixtures::{demo_catalog, demo_customer_orders, demo_market_orders};
use mixmart_core::{ComparatorEngine, HistoryMiner, ProductId};
use serde_json::json;

use crate::commands::CommandResult;

/// Demo reference product for the comparator half of the walkthrough.
const DEMO_REFERENCE: &str = "rm-n25";

pub fn run(json: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "demo",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = demo_catalog();
    let history = demo_customer_orders();
    let market = demo_market_orders();

    let Some(reference) = catalog.find(&ProductId(DEMO_REFERENCE.to_owned())) else {
        return CommandResult::failure(
            "demo",
            "fixture_integrity",
            format!("demo catalog is missing `{DEMO_REFERENCE}`"),
            6,
        );
    };

    let groups = ComparatorEngine::new(config.comparator).recommendations(reference, &catalog);
    let records = HistoryMiner::new(&catalog, config.history)
        .with_market_orders(&market)
        .recommendations(&history);

    let mut lines = vec![format!("comparator groups for {DEMO_REFERENCE}:")];
    for group in &groups {
        lines.push(format!("  {}", group.title));
        for record in &group.records {
            lines.push(format!("    - {}: {}", record.product.id.0, record.reason));
        }
    }
    lines.push(format!("history records for the demo customer ({} orders):", history.len()));
    for record in &records {
        lines.push(format!(
            "    - {:.2} {}: {}",
            record.confidence, record.product.id.0, record.reason
        ));
    }
    let message = lines.join("\n");

    if json {
        CommandResult::success_with_data(
            "demo",
            message,
            json!({ "compare": groups, "history": records }),
        )
    } else {
        CommandResult::success("demo", message)
    }
}
