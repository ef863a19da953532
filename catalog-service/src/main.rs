use anyhow::Context;
use catalog_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config).context("initialising tracing")?;

    let database = config
        .database
        .clone()
        .context("database.url is not configured (set CATALOG_DATABASE__URL)")?;

    let pool = create_pool(&database)
        .await
        .context("connecting to PostgreSQL")?;
    let state = AppState::new(config.clone(), pool);

    let app = health::routes()
        .with_state(state.clone())
        .merge(routes::api(&state));

    Server::new(config).serve(app).await?;

    Ok(())
}
