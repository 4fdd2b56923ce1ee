use anyhow::Context;

use super::connect;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::manager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    manager::migrate(&pool).await.context("failed to run migrations")?;
    output_success(output_format, "Migrations applied", None)
}
