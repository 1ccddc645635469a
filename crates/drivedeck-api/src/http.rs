//! HTTP implementation of the gateway.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response, multipart};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use drivedeck_core::{AuthSession, DirectoryEntry, FileEntry, path as remote_path};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Serialize)]
struct CreateDirectoryRequest<'a> {
    name: &'a str,
}

/// Stateless HTTP façade over the remote file service.
///
/// Holds a shared [`AuthSession`]; the bearer header is attached to every
/// request iff the session carries a token. Path segments are passed
/// through unencoded, matching what the backend expects.
pub struct HttpGateway {
    client: Client,
    session: AuthSession,
}

impl HttpGateway {
    /// Create a gateway for a session.
    pub fn new(session: AuthSession) -> Self {
        Self {
            client: Client::new(),
            session,
        }
    }

    /// The session this gateway was built with.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.session.base_url())
    }

    fn get(&self, route: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(route)))
    }

    fn post(&self, route: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(route)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Pass a successful response through; turn anything else into an
    /// [`GatewayError::Api`] with the body captured eagerly.
    async fn check(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn authenticate(&self, username: &str, password: &str) -> GatewayResult<String> {
        debug!(username, "authenticating");
        let response = self
            .post("auth/login")
            .json(&AuthRequest { username, password })
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        Ok(auth.token)
    }

    async fn list_files(&self, directory: &str) -> GatewayResult<Vec<FileEntry>> {
        let directory = remote_path::canonical(directory);
        debug!(%directory, "listing files");
        let response = self.get(&format!("files/{directory}")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_directories(&self, directory: &str) -> GatewayResult<Vec<DirectoryEntry>> {
        let directory = remote_path::canonical(directory);
        debug!(%directory, "listing subdirectories");
        let response = self.get(&format!("directories/{directory}")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn upload_file(&self, directory: &str, local: &Path) -> GatewayResult<FileEntry> {
        let directory = remote_path::canonical(directory);
        let name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                GatewayError::Validation(format!("not a valid file name: {}", local.display()))
            })?
            .to_string();
        debug!(%directory, name, "uploading file");

        let file = File::open(local).await?;
        let part = multipart::Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .file_name(name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .post(&format!("files/{directory}"))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn download_file(
        &self,
        directory: &str,
        filename: &str,
        target: &Path,
    ) -> GatewayResult<()> {
        let directory = remote_path::canonical(directory);
        debug!(%directory, filename, target = %target.display(), "downloading file");

        let response = self
            .get(&format!("files/{directory}/{filename}"))
            .send()
            .await?;
        let response = Self::check(response).await?;

        // Source stream and sink both close on drop, success or failure.
        let mut sink = File::create(target).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            sink.write_all(&chunk?).await?;
        }
        sink.flush().await?;
        Ok(())
    }

    async fn create_directory(&self, parent: &str, name: &str) -> GatewayResult<DirectoryEntry> {
        let parent = remote_path::canonical(parent);
        debug!(%parent, name, "creating directory");
        let response = self
            .post(&format!("directories/{parent}"))
            .json(&CreateDirectoryRequest { name })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn gateway(token: Option<&str>) -> HttpGateway {
        HttpGateway::new(AuthSession::new(
            "http://host/api",
            token.map(str::to_string),
        ))
    }

    #[test]
    fn test_bearer_header_present_with_token() {
        let request = gateway(Some("t0k3n")).get("files/.").build().unwrap();
        let header = request.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer t0k3n");
    }

    #[test]
    fn test_no_header_without_token() {
        let request = gateway(None).get("files/.").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_no_header_with_empty_token() {
        let request = gateway(Some("")).get("files/.").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_routes_join_the_base_url() {
        let gw = gateway(None);
        assert_eq!(gw.url("auth/login"), "http://host/api/auth/login");
        assert_eq!(gw.url("files/docs/a.txt"), "http://host/api/files/docs/a.txt");
    }
}
