//! CLI argument merging with config

use crate::domain::{Config, ResetPolicy, SortOrder};

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub selector: Option<Vec<String>>,
    pub extra_stopwords: Option<Vec<String>>,
    pub reset_policy: Option<ResetPolicy>,
    pub order: Option<SortOrder>,
    pub sort_field: Option<String>,
    pub limit: Option<usize>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(selector) = cli.selector {
        if !selector.is_empty() {
            base_config.selector = selector;
        }
    }
    if let Some(extra) = cli.extra_stopwords {
        for word in extra {
            if !base_config.stopwords.extra.contains(&word) {
                base_config.stopwords.extra.push(word);
            }
        }
    }
    if let Some(reset_policy) = cli.reset_policy {
        base_config.reset_policy = reset_policy;
    }
    if let Some(order) = cli.order {
        base_config.order = order;
    }
    if let Some(sort_field) = cli.sort_field {
        base_config.sort_field = sort_field;
    }
    if let Some(limit) = cli.limit {
        base_config.limit = limit;
    }

    base_config
}
