use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use maxctl_auth::{Credentials, DEFAULT_REGION, sign_request};
use maxctl_common::{
    error::{MaxctlError, Result},
    time,
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::{alias::HostConfig, api::AdminApi, types::PoolStatus};

const ADMIN_PREFIX: &str = "/minio/admin/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`AdminApi`] signing every request with SigV4.
#[derive(Clone)]
pub struct AdminClient {
    endpoint: Url,
    credentials: Credentials,
    region: String,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Code", alias = "code", default)]
    code: String,
    #[serde(rename = "Message", alias = "message", default)]
    message: String,
}

impl AdminClient {
    pub fn new(host: &HostConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                MaxctlError::Transport(format!("unable to build http client: {err}"))
            })?;

        Ok(Self {
            endpoint: host.url.clone(),
            credentials: host.credentials(),
            region: host.region.clone().unwrap_or_else(|| DEFAULT_REGION.to_string()),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn admin_url(&self, path: &str, pool: Option<&str>) -> Result<Url> {
        let mut url = self
            .endpoint
            .join(&format!("{ADMIN_PREFIX}/{path}"))
            .map_err(|err| {
                MaxctlError::InvalidArgument(format!("invalid admin url for {path}: {err}"))
            })?;
        if let Some(pool) = pool {
            url.query_pairs_mut().append_pair("pool", pool);
        }
        Ok(url)
    }

    async fn execute(&self, method: Method, url: Url) -> Result<reqwest::Response> {
        debug!(%method, %url, "sending admin request");

        let mut request = self.client.request(method.clone(), url.clone());
        if !self.credentials.is_anonymous() {
            let headers = sign_request(
                &self.credentials,
                &self.region,
                method.as_str(),
                &url,
                b"",
                time::now(),
            )
            .map_err(|err| MaxctlError::InvalidArgument(format!("unable to sign request: {err}")))?;
            request = request.headers(headers);
        }

        let response = request.send().await.map_err(|err| {
            MaxctlError::Transport(format!("unable to reach {}: {err}", self.endpoint))
        })?;

        let status = response.status();
        debug!(%status, "admin response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }

    async fn read_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.execute(Method::GET, url).await?;
        let body = response.bytes().await.map_err(|err| {
            MaxctlError::Transport(format!(
                "unable to read response from {}: {err}",
                self.endpoint
            ))
        })?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn list_pools_status(&self) -> Result<Vec<PoolStatus>> {
        let url = self.admin_url("pools/list", None)?;
        self.read_json(url).await
    }

    async fn status_pool(&self, pool: &str) -> Result<PoolStatus> {
        let url = self.admin_url("pools/status", Some(pool))?;
        self.read_json(url).await
    }

    async fn decommission_pool(&self, pool: &str) -> Result<()> {
        let url = self.admin_url("pools/decommission", Some(pool))?;
        self.execute(Method::POST, url).await?;
        Ok(())
    }

    async fn cancel_decommission(&self, pool: &str) -> Result<()> {
        let url = self.admin_url("pools/cancel", Some(pool))?;
        self.execute(Method::POST, url).await?;
        Ok(())
    }
}

/// Maps a non-success admin response onto the error taxonomy.
///
/// The cluster's message is kept verbatim; the status reason is used only when
/// the body carries no message at all.
pub fn error_from_response(status: StatusCode, body: &str) -> MaxctlError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).unwrap_or_else(|_| ErrorResponse {
        code: String::new(),
        message: body.trim().to_string(),
    });
    let message = if parsed.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string()
    } else {
        parsed.message
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MaxctlError::Auth(message),
        StatusCode::NOT_FOUND => MaxctlError::NotFound(message),
        _ if parsed.code.contains("NotFound") => MaxctlError::NotFound(message),
        _ => MaxctlError::semantic(parsed.code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_error_keeps_cluster_message() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"Code":"XMinioAdminPoolNotDraining","Message":"pool not draining"}"#,
        );
        assert!(matches!(
            &err,
            MaxctlError::Semantic { code, .. } if code == "XMinioAdminPoolNotDraining"
        ));
        assert_eq!(err.to_string(), "pool not draining");
    }

    #[test]
    fn auth_and_not_found_by_status() {
        assert!(matches!(
            error_from_response(StatusCode::FORBIDDEN, r#"{"Code":"AccessDenied","Message":"Access Denied."}"#),
            MaxctlError::Auth(message) if message == "Access Denied."
        ));
        assert!(matches!(
            error_from_response(StatusCode::NOT_FOUND, ""),
            MaxctlError::NotFound(message) if message == "Not Found"
        ));
    }

    #[test]
    fn not_found_code_on_bad_request() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":"XMinioAdminPoolNotFound","message":"pool not found"}"#,
        );
        assert!(matches!(err, MaxctlError::NotFound(message) if message == "pool not found"));
    }

    #[test]
    fn plain_text_body_is_passed_through() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "backend offline\n");
        assert_eq!(err.to_string(), "backend offline");
    }

    #[test]
    fn admin_url_encodes_pool() {
        let host = HostConfig {
            url: Url::parse("http://localhost:9000").unwrap(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            region: None,
        };
        let client = AdminClient::new(&host).unwrap();
        let url = client
            .admin_url("pools/cancel", Some("http://server{5...8}/disk{1...4}"))
            .unwrap();
        assert_eq!(url.path(), "/minio/admin/v3/pools/cancel");
        assert_eq!(
            url.query_pairs().next().unwrap().1,
            "http://server{5...8}/disk{1...4}"
        );
    }
}
