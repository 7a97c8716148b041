use crate::models::RawProfile;
use crate::services::source::{ProfileSource, StoreError};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Connection details for an Appwrite-compatible document database
///
/// Credentials are injected from configuration at process start.
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub collection: String,
    pub page_size: usize,
    pub timeout: Duration,
}

/// Document database client
///
/// Reads active profiles from a document collection, paging through the
/// collection with `limit`/`offset` queries until every document is fetched.
pub struct DocumentStoreClient {
    config: DocumentStoreConfig,
    client: Client,
}

/// One page of documents plus the collection total reported by the server
struct DocumentPage {
    profiles: Vec<RawProfile>,
    documents: usize,
    total: u64,
}

impl DocumentStoreClient {
    /// Create a new document store client
    pub fn new(config: DocumentStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            self.config.collection
        )
    }

    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<DocumentPage, StoreError> {
        let queries = vec![
            "equal(\"isActive\", true)".to_string(),
            format!("limit({})", limit),
            format!("offset({})", offset),
        ];
        let queries_json = serde_json::to_string(&queries)?;
        let full_url = format!("{}?queries={}", self.documents_url(), urlencoding::encode(&queries_json));

        tracing::debug!("Fetching profile documents (offset {}, limit {})", offset, limit);

        let response = self
            .client
            .get(&full_url)
            .header("X-Appwrite-Key", &self.config.api_key)
            .header("X-Appwrite-Project", &self.config.project_id)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(StoreError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Document store returned {}: {}", status, body);
                return Err(StoreError::Api(format!("Failed to fetch profiles: {}", status)));
            }
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        let profiles = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value::<RawProfile>(data.clone()) {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        // Without an id the record cannot take part in matching
                        tracing::warn!(
                            "Skipping document {} without usable id: {}",
                            doc.get("$id").and_then(|id| id.as_str()).unwrap_or("<unknown>"),
                            e
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(DocumentPage {
            profiles,
            documents: documents.len(),
            total,
        })
    }
}

impl ProfileSource for DocumentStoreClient {
    async fn fetch_active_profiles(&self) -> Result<Vec<RawProfile>, StoreError> {
        let page_size = self.config.page_size.max(1);
        let mut profiles = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.fetch_page(offset, page_size).await?;
            profiles.extend(page.profiles);
            offset += page.documents;

            if page.documents == 0 || offset as u64 >= page.total {
                break;
            }
        }

        tracing::debug!("Fetched {} active profiles from document store", profiles.len());

        Ok(profiles)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.fetch_page(0, 1).await.map(|_| true)
    }
}
