pub mod catalog;
pub mod invoke;
pub mod resolve;
pub mod serve;

use std::sync::Arc;

use relay_core::config::GatewayConfig;
use relay_core::dispatch::Dispatcher;
use relay_core::store::HttpRemoteStore;

/// Wire a dispatcher against the configured HTTP endpoints.
pub(crate) fn dispatcher(config: GatewayConfig) -> Dispatcher {
    let store = Arc::new(HttpRemoteStore::new(
        &config.store_url,
        &config.functions_url,
    ));
    Dispatcher::new(config, store)
}
