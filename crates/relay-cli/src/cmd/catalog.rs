use anyhow::Result;

use relay_core::config::GatewayConfig;

use crate::output;

pub async fn run(config: GatewayConfig, all: bool, json: bool) -> Result<()> {
    let dispatcher = super::dispatcher(config);
    let catalog = dispatcher.catalog().get_catalog(!all).await?;

    if json {
        output::print_json(&catalog)?;
        return Ok(());
    }

    let rows = catalog
        .entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.clone(),
                entry.name.clone(),
                entry
                    .safety_tier
                    .clone()
                    .map(String::from)
                    .unwrap_or_default(),
                if entry.enabled { "yes" } else { "no" }.to_string(),
                entry.remote_target.clone(),
            ]
        })
        .collect();
    output::print_table(&["ID", "NAME", "TIER", "ENABLED", "TARGET"], rows);
    Ok(())
}
