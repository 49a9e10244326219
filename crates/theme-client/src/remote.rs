//! Remote theme repository
//!
//! Endpoints:
//! - `GET /v1/theme?theme=<name>` returns the theme JSON
//! - `POST /v1/saveTheme` with `{theme, previousName?}`
//! - `DELETE /v1/deleteTheme?theme=<name>`
//! - `GET /v1/themes` returns `{themes: [...]}`

use crate::client::{ApiRequest, ErrorBody, RestClient};
use crate::error::ClientError;
use async_trait::async_trait;
use serde::Deserialize;
use storage::repository::{Result, SaveThemeRequest, ThemeRepository};
use theme_core::theme::Theme;

/// Reply of the save and delete endpoints
///
/// The backend may answer 2xx with the error envelope instead of
/// `{success: false}`; its message is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AckReply {
    Failed {
        error: ErrorBody,
    },
    Ack {
        #[serde(default)]
        success: bool,
    },
}

/// Reply of the list endpoint
#[derive(Debug, Clone, Deserialize)]
struct ThemeList {
    #[serde(default)]
    themes: Vec<String>,
}

/// Themes stored by the dashboard backend
#[derive(Debug, Clone)]
pub struct RemoteThemeRepository {
    client: RestClient,
}

impl RemoteThemeRepository {
    /// Create a repository over a REST client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &RestClient {
        &self.client
    }

    fn check_success(reply: AckReply, action: &str) -> std::result::Result<(), ClientError> {
        match reply {
            AckReply::Ack { success: true } => Ok(()),
            AckReply::Ack { success: false } => {
                Err(ClientError::Rejected(format!("{action} was not acknowledged")))
            }
            AckReply::Failed { error } => Err(ClientError::Rejected(error.message)),
        }
    }
}

#[async_trait]
impl ThemeRepository for RemoteThemeRepository {
    async fn get(&self, name: &str) -> Result<Option<Theme>> {
        let request = ApiRequest::get("theme").param("theme", name);
        match self.client.send::<Theme>(&request).await {
            Ok(theme) => Ok(Some(theme)),
            Err(ClientError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, request: &SaveThemeRequest) -> Result<()> {
        let api_request = ApiRequest::post("saveTheme").json_body(request)?;
        let reply: AckReply = self.client.send(&api_request).await?;
        Self::check_success(reply, "save")?;

        tracing::info!(theme = %request.theme.name, "saved theme remotely");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let request = ApiRequest::delete("deleteTheme").param("theme", name);
        match self.client.send::<AckReply>(&request).await {
            Ok(reply) => {
                Self::check_success(reply, "delete")?;
                tracing::info!(theme = name, "deleted remote theme");
                Ok(true)
            }
            Err(ClientError::Api { status: 404, .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let list: ThemeList = self.client.send(&ApiRequest::get("themes")).await?;
        Ok(list.themes)
    }
}
