use crate::config::DashboardConfig;
use crate::errors::ClientError;
use crate::models::{DataResponse, DatasetInfo, PlotResponse, SelectedFile, StatsResponse, UploadResponse};
use crate::plot::PlotRequest;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

/// The four endpoints of the analysis backend. Application-level errors
/// (`error` fields, `success: false`) come back as
/// [`ClientError::Application`].
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<DatasetInfo, ClientError>;
    async fn stats(&self) -> Result<StatsResponse, ClientError>;
    async fn data(&self) -> Result<DataResponse, ClientError>;
    async fn plot(&self, request: &PlotRequest) -> Result<PlotResponse, ClientError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DashboardApi for HttpBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<DatasetInfo, ClientError> {
        let mut part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if let Some(mime) = &file.content_type {
            part = part.mime_str(mime)?;
        }
        let form = multipart::Form::new().part("file", part);

        debug!(filename = %file.name, size = file.bytes.len(), "posting upload");
        let response = self.client.post(self.url("/upload")).multipart(form).send().await?;
        let reply: UploadResponse = Self::read_json(response).await?;
        upload_outcome(reply)
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let response = self.client.get(self.url("/stats")).send().await?;
        let reply: StatsResponse = Self::read_json(response).await?;
        match reply.error {
            Some(message) => Err(ClientError::Application(message)),
            None => Ok(reply),
        }
    }

    async fn data(&self) -> Result<DataResponse, ClientError> {
        let response = self.client.get(self.url("/data")).send().await?;
        let reply: DataResponse = Self::read_json(response).await?;
        match reply.error {
            Some(message) => Err(ClientError::Application(message)),
            None => Ok(reply),
        }
    }

    async fn plot(&self, request: &PlotRequest) -> Result<PlotResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/plot"))
            .query(&request.query())
            .send()
            .await?;
        Self::read_json(response).await
    }
}

pub fn upload_outcome(reply: UploadResponse) -> Result<DatasetInfo, ClientError> {
    match reply {
        UploadResponse {
            success: true,
            info: Some(info),
            error: None,
        } => Ok(info),
        UploadResponse { error: Some(message), .. } => Err(ClientError::Application(message)),
        _ => Err(ClientError::Application("Upload failed".to_string())),
    }
}
