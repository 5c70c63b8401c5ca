//! HTTP server command.

use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::identify::IdentificationService;
use crate::server;

/// Start the identification server and block until shutdown
pub fn cmd_serve(rt: &Runtime, config: Config, port: Option<u16>) -> anyhow::Result<()> {
    let identify_config = config.identify_config()?;

    let mut server_config = config.server;
    if let Some(port) = port {
        server_config.port = port;
    }

    rt.block_on(async {
        let service = IdentificationService::new(&identify_config)?;
        tracing::info!(
            rate = identify_config.requests_per_second,
            endpoint = %identify_config.acoustid_endpoint,
            "Identification service ready"
        );

        server::serve(Arc::new(service), &server_config).await?;
        Ok(())
    })
}
