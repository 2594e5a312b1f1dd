//! Account domain - which Instagram account the page publishes to

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{PublishError, Result};
use crate::services::graph::GraphClient;

const PAGE_FIELDS: &str = "connected_instagram_account{id,username},name,can_post";

/// The page and the Instagram account connected to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBinding {
    pub page_id: String,
    pub ig_id: String,
    pub username: Option<String>,
    pub page_name: Option<String>,
    pub can_post: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    name: Option<String>,
    can_post: Option<bool>,
    connected_instagram_account: Option<ConnectedAccount>,
}

#[derive(Debug, Deserialize)]
struct ConnectedAccount {
    id: String,
    username: Option<String>,
}

/// Look up the Instagram account connected to `page_id`.
///
/// The connected account is authoritative: a differing `configured_ig_id`
/// is logged and ignored.
pub async fn resolve_account(
    graph: &GraphClient,
    page_id: &str,
    configured_ig_id: Option<&str>,
) -> Result<AccountBinding> {
    let body = graph.get(page_id, &[("fields", PAGE_FIELDS)]).await?;

    let page: PageResponse =
        serde_json::from_value(body.clone()).map_err(|_| PublishError::MissingField {
            context: "resolve account",
            field: "connected_instagram_account",
            body: body.clone(),
        })?;

    let connected = page
        .connected_instagram_account
        .ok_or_else(|| PublishError::NotConnected {
            page_id: page_id.to_string(),
        })?;

    info!(
        username = connected.username.as_deref().unwrap_or("?"),
        ig_id = %connected.id,
        page = page.name.as_deref().unwrap_or("?"),
        can_post = ?page.can_post,
        "Instagram account connected"
    );

    if let Some(configured) = configured_ig_id {
        if configured != connected.id {
            warn!(
                configured,
                connected = %connected.id,
                "INSTAGRAM_ID differs from the connected account, using the connected one"
            );
        }
    }

    Ok(AccountBinding {
        page_id: page_id.to_string(),
        ig_id: connected.id,
        username: connected.username,
        page_name: page.name,
        can_post: page.can_post,
    })
}
