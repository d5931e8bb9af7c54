use async_trait::async_trait;
use pwforge_core::remote::{RemoteClient, RemoteError};
use pwforge_core::wire::{
    Envelope, FolderAddRequest, FolderEditRequest, FolderResponse, PasswordAddRequest,
    PasswordEditRequest, PasswordResponse, PasswordSearchRequest, PasswordSearchResponse,
    VaultAddRequest, VaultEditRequest, VaultOperationResponse, VaultResponse,
};
use pwforge_core::Secret;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "Passwork-Auth";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: Secret,
}

/// [`RemoteClient`] over the Passwork v4 REST API.
///
/// Each trait method is exactly one HTTP request. Transport failures are
/// mapped to [`RemoteError`]; response envelopes are passed through
/// untouched so the engines can interpret their status.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use pwforge_client::{ClientConfig, PassworkClient};
/// use pwforge_core::Provider;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let client = PassworkClient::connect(&config).await?;
///     let provider = Provider::new(Arc::new(client));
///     Ok(())
/// }
/// ```
pub struct PassworkClient {
    http: reqwest::Client,
    base: Url,
    token: Secret,
}

impl PassworkClient {
    /// Log in with the configured API key and return a ready client.
    pub async fn connect(config: &ClientConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(map_transport)?;
        let base = config.api_base();

        let url = endpoint(&base, &["auth", "login", config.api_key.expose()])?;
        debug!("logging in to {}", base);
        let response = http.post(url).send().await.map_err(map_transport)?;

        let envelope: Envelope<LoginData> = match read_body(response).await {
            Err(RemoteError::Http { status, message }) if status == 401 || status == 403 => {
                return Err(RemoteError::Unauthorized { message });
            }
            other => other?,
        };
        let login = envelope.into_result().map_err(|e| match e {
            RemoteError::Rejected { status, code } => RemoteError::Unauthorized {
                message: format!(
                    "login refused with status '{}' (code: {})",
                    status,
                    code.as_deref().unwrap_or("none")
                ),
            },
            other => other,
        })?;

        info!("logged in to {}", base);
        Ok(Self {
            http,
            base,
            token: login.token,
        })
    }

    /// End the session. Failures are logged and ignored.
    pub async fn logout(&self) {
        let result = match self.request(Method::POST, &["auth", "logout"]) {
            Ok(request) => request.send().await.map_err(map_transport).map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("logout failed: {}", e);
        }
    }

    /// Base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let url = endpoint(&self.base, segments)?;
        debug!("{} {}", method, url.path());
        Ok(self
            .http
            .request(method, url)
            .header(AUTH_HEADER, self.token.expose()))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<T, RemoteError> {
        let response = self
            .request(method, segments)?
            .send()
            .await
            .map_err(map_transport)?;
        read_body(response).await
    }

    async fn call_with<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .request(method, segments)?
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;
        read_body(response).await
    }

    /// Issue a delete. An empty body counts as success; a non-success
    /// envelope is reported as rejected.
    async fn delete(&self, segments: &[&str]) -> Result<(), RemoteError> {
        let response = self
            .request(Method::DELETE, segments)?
            .send()
            .await
            .map_err(map_transport)?;
        let body = checked_bytes(response).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let envelope: Envelope<serde_json::Value> = parse(&body)?;
        if envelope.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Rejected {
                status: envelope.status,
                code: envelope.code,
            })
        }
    }
}

impl std::fmt::Debug for PassworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassworkClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

/// Append path segments to the API base, percent-encoding each.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RemoteError::Network {
            message: format!("{} cannot be used as an API base", base),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a reqwest failure. The URL is stripped from the message because the
/// login path carries the API key.
fn map_transport(error: reqwest::Error) -> RemoteError {
    let error = error.without_url();
    if error.is_timeout() {
        RemoteError::Timeout
    } else if error.is_decode() {
        RemoteError::Malformed {
            message: error.to_string(),
        }
    } else {
        RemoteError::Network {
            message: error.to_string(),
        }
    }
}

/// Map the HTTP status and return the raw body.
///
/// A non-2xx response whose body is an error envelope is passed through so
/// its status is interpreted like any other envelope.
async fn checked_bytes(response: reqwest::Response) -> Result<Vec<u8>, RemoteError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound);
    }
    let body = response.bytes().await.map_err(map_transport)?;
    if !status.is_success() && !is_error_envelope(&body) {
        return Err(RemoteError::Http {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body.to_vec())
}

fn is_error_envelope(body: &[u8]) -> bool {
    serde_json::from_slice::<Envelope<serde_json::Value>>(body)
        .is_ok_and(|envelope| !envelope.is_success())
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    serde_json::from_slice(body).map_err(|e| RemoteError::Malformed {
        message: e.to_string(),
    })
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
    let body = checked_bytes(response).await?;
    parse(&body)
}

#[async_trait]
impl RemoteClient for PassworkClient {
    async fn add_vault(
        &self,
        request: &VaultAddRequest,
    ) -> Result<VaultOperationResponse, RemoteError> {
        self.call_with(Method::POST, &["vaults"], request).await
    }

    async fn get_vault(&self, id: &str) -> Result<VaultResponse, RemoteError> {
        self.call(Method::GET, &["vaults", id]).await
    }

    async fn edit_vault(
        &self,
        id: &str,
        request: &VaultEditRequest,
    ) -> Result<VaultOperationResponse, RemoteError> {
        self.call_with(Method::PUT, &["vaults", id], request).await
    }

    async fn delete_vault(&self, id: &str) -> Result<(), RemoteError> {
        self.delete(&["vaults", id]).await
    }

    async fn add_folder(&self, request: &FolderAddRequest) -> Result<FolderResponse, RemoteError> {
        self.call_with(Method::POST, &["folders"], request).await
    }

    async fn get_folder(&self, id: &str) -> Result<FolderResponse, RemoteError> {
        self.call(Method::GET, &["folders", id]).await
    }

    async fn edit_folder(
        &self,
        id: &str,
        request: &FolderEditRequest,
    ) -> Result<FolderResponse, RemoteError> {
        self.call_with(Method::PUT, &["folders", id], request).await
    }

    async fn delete_folder(&self, id: &str) -> Result<(), RemoteError> {
        self.delete(&["folders", id]).await
    }

    async fn add_password(
        &self,
        request: &PasswordAddRequest,
    ) -> Result<PasswordResponse, RemoteError> {
        self.call_with(Method::POST, &["passwords"], request).await
    }

    async fn get_password(&self, id: &str) -> Result<PasswordResponse, RemoteError> {
        self.call(Method::GET, &["passwords", id]).await
    }

    async fn edit_password(
        &self,
        id: &str,
        request: &PasswordEditRequest,
    ) -> Result<PasswordResponse, RemoteError> {
        self.call_with(Method::PUT, &["passwords", id], request).await
    }

    async fn delete_password(&self, id: &str) -> Result<(), RemoteError> {
        self.delete(&["passwords", id]).await
    }

    async fn search_passwords(
        &self,
        request: &PasswordSearchRequest,
    ) -> Result<PasswordSearchResponse, RemoteError> {
        self.call_with(Method::POST, &["passwords", "search"], request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("https://example.com/api/v4").unwrap();
        let url = endpoint(&base, &["passwords", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v4/passwords/a%20b%2Fc");
    }

    #[test]
    fn test_is_error_envelope() {
        assert!(is_error_envelope(br#"{"status":"error","code":"folderNotFound"}"#));
        assert!(!is_error_envelope(br#"{"status":"success","data":"v1"}"#));
        assert!(!is_error_envelope(b"boom"));
        assert!(!is_error_envelope(b""));
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let base = Url::parse("https://example.com/api/v4/").unwrap();
        let url = endpoint(&base, &["vaults"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v4/vaults");
    }
}
