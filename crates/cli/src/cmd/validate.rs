use anyhow::Context;
use stitch_domain::StitchConfig;
use stitch_infra::client_from_config;
use tracing::info;

use super::print_result;

pub async fn run(config: &StitchConfig) -> anyhow::Result<()> {
    let client = client_from_config(config)?;

    info!(
        client_id = client.credentials().client_id(),
        base_url = %client.base_url(),
        "validating credentials"
    );

    let result = client.validate(None, true).await.context("validation request failed")?;
    info!("credentials accepted");

    print_result(&result)
}
