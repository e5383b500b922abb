// src/integrations/catalog/client.rs
//
// Catalog HTTP client
//
// ARCHITECTURE:
// - JSON client for an Immich-style photo server
// - Authenticates every call with the `x-api-key` header
// - Maps wire data → domain values (NO session mutation)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Non-2xx answers become `AppError::Api` with the server's status and body
// - One malformed asset never fails a whole page; it is skipped and logged

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::wire::{
    search_for, AlbumResponse, AssetResponse, BulkIdResponse, CreateAlbumBody, IdsBody,
    SearchResponse, UpdateAssetsBody,
};
use super::CatalogTransport;
use crate::config::ServerConfig;
use crate::domain::{Album, AlbumId, Asset, AssetFlag, AssetId, FetchRequest, PageResponse};
use crate::error::{AppError, AppResult};

const API_KEY_HEADER: &str = "x-api-key";

pub struct HttpCatalogClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl HttpCatalogClient {
    pub fn new(config: &ServerConfig) -> AppResult<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, "application/json")
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    /// Send and decode a JSON answer
    async fn execute<T>(&self, request: RequestBuilder) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = Self::send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and ignore the body
    async fn execute_empty(&self, request: RequestBuilder) -> AppResult<()> {
        Self::send(request).await.map(|_| ())
    }

    async fn send(request: RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    fn decode_assets(items: Vec<AssetResponse>) -> Vec<Asset> {
        items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.clone();
                match item.into_asset() {
                    Ok(asset) => Some(asset),
                    Err(e) => {
                        warn!("Skipping asset {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogClient {
    async fn fetch_page(&self, request: &FetchRequest) -> AppResult<PageResponse> {
        let (endpoint, body) = search_for(request);
        debug!("Fetching page {} of {} via {}", request.page, request.source, endpoint.path());

        let response: SearchResponse = self
            .execute(self.request(Method::POST, endpoint.path()).json(&body))
            .await?;

        // `count` stays the server's: it drives end-of-data detection
        Ok(PageResponse {
            assets: Self::decode_assets(response.assets.items),
            total: response.assets.total,
            count: response.assets.count,
        })
    }

    async fn fetch_membership(&self, asset_id: &AssetId) -> AppResult<Vec<AlbumId>> {
        let albums: Vec<AlbumResponse> = self
            .execute(
                self.request(Method::GET, "/api/albums")
                    .query(&[("assetId", asset_id.as_str())]),
            )
            .await?;

        Ok(albums.into_iter().map(|album| AlbumId::new(album.id)).collect())
    }

    async fn fetch_albums(&self) -> AppResult<Vec<Album>> {
        let albums: Vec<AlbumResponse> = self.execute(self.request(Method::GET, "/api/albums")).await?;

        Ok(albums
            .into_iter()
            .filter_map(|album| {
                let id = album.id.clone();
                album
                    .into_album()
                    .map_err(|e| warn!("Skipping album {}: {}", id, e))
                    .ok()
            })
            .collect())
    }

    async fn change_membership(&self, album_id: &AlbumId, asset_id: &AssetId, is_addition: bool) -> AppResult<()> {
        let method = if is_addition { Method::PUT } else { Method::DELETE };
        let path = format!("/api/albums/{}/assets", album_id);
        let body = IdsBody {
            ids: vec![asset_id.to_string()],
        };

        let rows: Vec<BulkIdResponse> = self.execute(self.request(method, &path).json(&body)).await?;

        match rows.into_iter().find(|row| row.id == asset_id.as_str()) {
            Some(row) if row.success => Ok(()),
            // Already in the requested state
            Some(BulkIdResponse {
                error: Some(error), ..
            }) if (is_addition && error == "duplicate") || (!is_addition && error == "not_found") => {
                debug!("Album {} already in requested state for {}", album_id, asset_id);
                Ok(())
            }
            Some(row) => Err(AppError::Api {
                status: 400,
                message: format!(
                    "album {} refused {}: {}",
                    album_id,
                    asset_id,
                    row.error.unwrap_or_else(|| "unknown".to_string())
                ),
            }),
            None => Err(AppError::Other(format!(
                "album {} answer did not mention {}",
                album_id, asset_id
            ))),
        }
    }

    async fn update_asset(&self, asset_id: &AssetId, flag: AssetFlag, value: bool) -> AppResult<()> {
        let body = UpdateAssetsBody {
            ids: vec![asset_id.to_string()],
            is_favorite: (flag == AssetFlag::Favorite).then_some(value),
            is_archived: (flag == AssetFlag::Archived).then_some(value),
        };
        self.execute_empty(self.request(Method::PUT, "/api/assets").json(&body)).await
    }

    async fn create_album(&self, name: &str) -> AppResult<Album> {
        let body = CreateAlbumBody {
            album_name: name.to_string(),
        };
        let album: AlbumResponse = self.execute(self.request(Method::POST, "/api/albums").json(&body)).await?;
        album.into_album()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn config(url: &str) -> ServerConfig {
        ServerConfig {
            server_url: url.to_string(),
            api_key: "secret".to_string(),
            session: SessionConfig::default(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = HttpCatalogClient::new(&config("https://photos.example/")).unwrap();
        assert_eq!(client.base_url, "https://photos.example");
        assert_eq!(client.api_key, "secret");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HttpCatalogClient::new(&config("http://localhost:2283/")).unwrap();
        assert_eq!(client.url("/api/albums"), "http://localhost:2283/api/albums");
    }

    #[test]
    fn test_request_carries_api_key() {
        let client = HttpCatalogClient::new(&config("http://localhost:2283")).unwrap();
        let request = client.request(Method::GET, "/api/albums").build().unwrap();
        assert_eq!(request.headers().get(API_KEY_HEADER).unwrap(), "secret");
        assert_eq!(request.url().as_str(), "http://localhost:2283/api/albums");
    }

    #[test]
    fn test_malformed_assets_are_skipped() {
        let items: Vec<AssetResponse> = serde_json::from_str(
            r#"[
                {"id": "ok", "fileCreatedAt": "2024-01-01T00:00:00Z", "fileModifiedAt": "2024-01-01T00:00:00Z"},
                {"id": "bad", "fileCreatedAt": "not a date", "fileModifiedAt": "2024-01-01T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let assets = HttpCatalogClient::decode_assets(items);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id.as_str(), "ok");
    }

    // Network round-trips belong to an integration suite against a live server
}
