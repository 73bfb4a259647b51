use super::{ObjectStorage, StorageError};
use crate::config::StorageConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

/// Client for a Supabase-compatible storage REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    endpoint: Url,
    access_key: String,
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseStorage {
    pub fn new(endpoint: &str, access_key: &str) -> Result<Self, StorageError> {
        if access_key.is_empty() {
            return Err(StorageError::NotConfigured {
                message: "access key is empty".to_string(),
            });
        }
        let endpoint = Url::parse(endpoint).map_err(|e| StorageError::NotConfigured {
            message: format!("invalid endpoint '{endpoint}': {e}"),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(StorageError::NotConfigured {
                message: format!("endpoint '{endpoint}' cannot be used as a base URL"),
            });
        }

        Ok(Self {
            client: Client::new(),
            endpoint,
            access_key: access_key.to_string(),
        })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| StorageError::NotConfigured {
            message: "no endpoint set (SUPABASE_URL or TECHFORM_STORAGE__ENDPOINT)".to_string(),
        })?;
        let access_key = config.access_key.as_deref().ok_or_else(|| StorageError::NotConfigured {
            message: "no access key set (SUPABASE_KEY or TECHFORM_STORAGE__ACCESS_KEY)".to_string(),
        })?;
        Self::new(endpoint, access_key)
    }

    /// `{endpoint}/storage/v1/object/{bucket}/{key}` with each segment escaped
    pub fn object_url(&self, bucket: &str, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", bucket, key]);
        }
        url
    }
}

fn content_type_for(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    } else {
        body.trim().to_string()
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, bucket: &str, key: &str, content: &[u8]) -> Result<(), StorageError> {
        let url = self.object_url(bucket, key);
        debug!(bucket, key, bytes = content.len(), "Uploading object");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_key)
            .header("apikey", &self.access_key)
            .header("x-upsert", "false")
            .header(reqwest::header::CONTENT_TYPE, content_type_for(key))
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(bucket, key, status = status.as_u16(), "Object stored");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(status, &body);
        warn!(bucket, key, status = status.as_u16(), %message, "Storage rejected upload");
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_escapes_segments() {
        let storage = SupabaseStorage::new("https://project.supabase.co/", "key").unwrap();
        let url = storage.object_url("form-react", "my photo.png");
        assert_eq!(
            url.as_str(),
            "https://project.supabase.co/storage/v1/object/form-react/my%20photo.png"
        );
    }

    #[test]
    fn test_rejects_missing_configuration() {
        assert!(matches!(
            SupabaseStorage::new("not a url", "key"),
            Err(StorageError::NotConfigured { .. })
        ));
        assert!(matches!(
            SupabaseStorage::new("https://project.supabase.co", ""),
            Err(StorageError::NotConfigured { .. })
        ));
        assert!(matches!(
            SupabaseStorage::from_config(&StorageConfig::default()),
            Err(StorageError::NotConfigured { .. })
        ));
    }

    #[test]
    fn test_rejection_message_prefers_service_message() {
        let body = r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#;
        assert_eq!(
            rejection_message(StatusCode::CONFLICT, body),
            "The resource already exists"
        );
        assert_eq!(rejection_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(rejection_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for("avatar.PNG"), "image/png");
        assert_eq!(content_type_for("avatar.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
