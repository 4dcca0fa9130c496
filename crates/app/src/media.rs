//! Image uploads.
//!
//! Banner and product imagery goes to a hosted media service via unsigned
//! multipart upload; only the resulting public URL is kept.

use async_trait::async_trait;
use mockall::automock;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;

/// A successfully uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Public HTTPS URL of the stored image.
    pub secure_url: String,
}

/// Errors from the media uploader.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload request failed")]
    Request(#[from] reqwest::Error),

    /// The service answered 2xx but without a usable URL.
    #[error("upload response carried no secure_url")]
    MissingUrl,
}

/// Narrow interface to the media upload service.
#[automock]
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload raw image bytes, returning the public URL.
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadedImage, UploadError>;
}

/// Uploader backed by an unsigned upload endpoint.
#[derive(Debug, Clone)]
pub struct HostedUploader {
    client: reqwest::Client,
    endpoint: String,
    preset: String,
}

impl HostedUploader {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            preset: preset.into(),
        }
    }
}

#[async_trait]
impl MediaUploader for HostedUploader {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadedImage, UploadError> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("upload_preset", self.preset.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let image = parse_upload_response(&body)?;

        tracing::info!(url = %image.secure_url, "image uploaded");

        Ok(image)
    }
}

fn parse_upload_response(body: &Value) -> Result<UploadedImage, UploadError> {
    let secure_url = body["secure_url"]
        .as_str()
        .ok_or(UploadError::MissingUrl)?;

    Ok(UploadedImage {
        secure_url: secure_url.to_string(),
    })
}
