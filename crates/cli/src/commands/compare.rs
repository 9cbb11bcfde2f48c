use std::path::Path;

use mixmart_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use mixmart_core::{ComparatorEngine, ProductId, RecommendationGroup};

use crate::commands::{read_catalog, CommandResult};

pub fn run(product_id: &str, catalog_path: &Path, max: Option<usize>, json: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        overrides: ConfigOverrides { max_per_group: max, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "compare",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = match read_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(failure) => return failure.into_result("compare"),
    };

    let Some(reference) = catalog.find(&ProductId(product_id.to_owned())) else {
        return CommandResult::failure(
            "compare",
            "unknown_product",
            format!("product `{product_id}` is not in the catalog snapshot"),
            5,
        );
    };

    let groups = ComparatorEngine::new(config.comparator).recommendations(reference, &catalog);
    let message = render_groups(product_id, &groups);

    if json {
        match serde_json::to_value(&groups) {
            Ok(data) => CommandResult::success_with_data("compare", message, data),
            Err(error) => {
                CommandResult::failure("compare", "serialization", error.to_string(), 6)
            }
        }
    } else {
        CommandResult::success("compare", message)
    }
}

fn render_groups(product_id: &str, groups: &[RecommendationGroup]) -> String {
    if groups.is_empty() {
        return format!("no recommendations for {product_id}");
    }

    let mut lines = vec![format!("recommendations for {product_id}:")];
    for group in groups {
        lines.push(format!("{} ({})", group.title, group.description));
        for record in &group.records {
            lines.push(format!("  - {}: {} [{}]", record.product.id.0, record.product.name, record.reason));
        }
    }
    lines.join("\n")
}
