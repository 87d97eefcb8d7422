use anyhow::{bail, Context, Result};
use serde_json::Value;

use relay_core::config::GatewayConfig;
use relay_core::dispatch::InvokeRequest;

use crate::output;

pub struct InvokeArgs {
    pub action: String,
    pub user: Option<String>,
    pub groups: Vec<String>,
    pub uris: Vec<String>,
    pub params: Option<String>,
}

pub async fn run(config: GatewayConfig, args: InvokeArgs, json: bool) -> Result<()> {
    let params = match &args.params {
        Some(raw) => {
            let value: Value =
                serde_json::from_str(raw).context("--params must be a JSON object")?;
            match value {
                Value::Object(map) => Some(map),
                _ => bail!("--params must be a JSON object"),
            }
        }
        None => None,
    };

    let request = InvokeRequest {
        action_id: args.action,
        caller_id: args.user,
        groups: args.groups,
        selected_uris: args.uris,
        params,
    };

    let dispatcher = super::dispatcher(config);
    let outcome = dispatcher.dispatch(&request).await?;

    if json {
        output::print_json(&outcome)?;
        return Ok(());
    }

    println!("status: {}", outcome.status_code);
    println!("{}", serde_json::to_string_pretty(&outcome.body)?);
    Ok(())
}
