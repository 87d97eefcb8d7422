use anyhow::Result;

use relay_core::config::GatewayConfig;

pub async fn run(config: GatewayConfig, port: u16) -> Result<()> {
    relay_server::serve(config, port).await
}
