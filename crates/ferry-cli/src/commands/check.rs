use ferry_cms::CmsError;
use ferry_config::FerryConfig;
use ferry_core::ContentKind;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output_rows;
use crate::progress;

const COLUMNS: &[&str] = &["system", "url", "status", "detail"];

#[derive(Debug, Serialize)]
struct CheckRow {
    system: &'static str,
    url: String,
    status: &'static str,
    detail: String,
}

impl CheckRow {
    fn missing(system: &'static str, url: &str, fields: &[&str]) -> Self {
        Self {
            system,
            url: url.to_string(),
            status: "missing",
            detail: format!("not configured: {}", fields.join(", ")),
        }
    }

    fn failed(system: &'static str, url: &str, error: &CmsError) -> Self {
        let status = if error.is_unauthorized() {
            "unauthorized"
        } else if error.is_unreachable() {
            "unreachable"
        } else {
            "error"
        };
        Self {
            system,
            url: url.to_string(),
            status,
            detail: error.to_string(),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

async fn check_strapi(config: &FerryConfig) -> anyhow::Result<CheckRow> {
    let url = config.strapi.base_url().to_string();
    if !config.strapi.is_configured() {
        return Ok(CheckRow::missing("strapi", &url, &config.strapi.missing_fields()));
    }

    let client = bootstrap::strapi_client(config)?;
    let collection = ContentKind::Work.strapi_collection();
    let row = match progress::track("checking Strapi", client.fetch_page(collection, 1)).await {
        Ok((_, page_count)) => CheckRow {
            system: "strapi",
            url,
            status: "ok",
            detail: format!("{collection}: {page_count} page(s)"),
        },
        Err(error) => CheckRow::failed("strapi", &url, &error),
    };
    Ok(row)
}

async fn check_wordpress(config: &FerryConfig) -> anyhow::Result<CheckRow> {
    let url = config.wordpress.url.clone();
    if !config.wordpress.is_configured() {
        return Ok(CheckRow::missing("wordpress", &url, &config.wordpress.missing_fields()));
    }

    let client = bootstrap::wordpress_client(config)?;
    let row = match progress::track("checking WordPress", client.current_user()).await {
        Ok(user) => CheckRow {
            system: "wordpress",
            url: client.rest_root().to_string(),
            status: "ok",
            detail: format!("authenticated as {}", user.name),
        },
        Err(error) => CheckRow::failed("wordpress", &url, &error),
    };
    Ok(row)
}

/// Handle `ferry check`.
pub async fn handle(config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = vec![check_strapi(config).await?, check_wordpress(config).await?];
    output_rows(&rows, COLUMNS, flags.format)?;

    let failing = rows.iter().filter(|row| !row.is_ok()).count();
    if failing > 0 {
        anyhow::bail!("{failing} check(s) failed");
    }
    Ok(())
}
