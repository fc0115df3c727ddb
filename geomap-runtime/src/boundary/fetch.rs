use super::BoundaryFetcher;
use async_trait::async_trait;
use cfg_if::cfg_if;
use geojson::GeoJson;
use geomap_common::error::{GeoMapError, Result, ResultWithContext};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Loads boundary documents over HTTP(S), or from disk for `file://` URLs and plain paths
#[derive(Debug, Clone)]
pub struct HttpBoundaryFetcher {
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

enum Location {
    Http(Url),
    File(PathBuf),
}

impl HttpBoundaryFetcher {
    pub fn try_new(timeout: Duration) -> Result<Self> {
        cfg_if! {
            if #[cfg(feature = "http")] {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|err| {
                        GeoMapError::internal(format!("Failed to build HTTP client: {err}"))
                    })?;
                Ok(Self { client })
            } else {
                log::debug!("HTTP support disabled, ignoring timeout {timeout:?}");
                Ok(Self {})
            }
        }
    }

    /// Fetcher using a caller-built HTTP client, e.g. one with custom proxy settings
    #[cfg(feature = "http")]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read_text(&self, location: Location) -> Result<String> {
        match location {
            Location::Http(url) => self.read_http(url).await,
            Location::File(path) => read_file(path).await,
        }
    }

    async fn read_http(&self, url: Url) -> Result<String> {
        cfg_if! {
            if #[cfg(feature = "http")] {
                let response = self.client.get(url).send().await.map_err(fetch_error)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(GeoMapError::boundary_fetch(format!(
                        "HTTP error! status: {}",
                        status.as_u16()
                    )));
                }
                response.text().await.map_err(fetch_error)
            } else {
                Err(GeoMapError::boundary_fetch(format!(
                    "The `http` feature flag must be enabled to fetch {url}"
                )))
            }
        }
    }
}

async fn read_file(path: PathBuf) -> Result<String> {
    cfg_if! {
        if #[cfg(feature = "fs")] {
            tokio::fs::read_to_string(&path).await.map_err(|err| {
                GeoMapError::boundary_fetch(format!("Failed to read {}: {err}", path.display()))
            })
        } else {
            Err(GeoMapError::boundary_fetch(format!(
                "The `fs` feature flag must be enabled to read {}",
                path.display()
            )))
        }
    }
}

fn fetch_error<E: Display>(err: E) -> GeoMapError {
    GeoMapError::boundary_fetch(err.to_string())
}

fn locate(url: &str) -> Result<Location> {
    match Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(Location::Http(parsed)),
            "file" => parsed.to_file_path().map(Location::File).map_err(|_| {
                GeoMapError::boundary_fetch(format!("Invalid file URL: {url}"))
            }),
            scheme => Err(GeoMapError::boundary_fetch(format!(
                "Unsupported URL scheme {scheme:?} in {url}"
            ))),
        },
        // No scheme, so a path on the local file system
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Location::File(PathBuf::from(url))),
        Err(err) => Err(fetch_error(format!("Invalid boundary URL {url}: {err}"))),
    }
}

/// Parse a boundary document. Syntax and structure errors are boundary fetch errors.
pub fn parse_boundary(text: &str) -> Result<GeoJson> {
    Ok(text.parse::<GeoJson>()?)
}

#[async_trait]
impl BoundaryFetcher for HttpBoundaryFetcher {
    async fn fetch(&self, url: &str) -> Result<Arc<GeoJson>> {
        log::debug!("Fetching boundary document {url}");
        let location = locate(url)?;
        let text = self.read_text(location).await?;
        let document = parse_boundary(&text)
            .with_context(|| format!("Failed to parse boundary document {url}"))?;
        log::debug!("Loaded boundary document {url}");
        Ok(Arc::new(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomap_common::error::ErrorKind;

    #[test]
    fn test_locate() {
        assert!(matches!(
            locate("https://a.example/za.geojson"),
            Ok(Location::Http(_))
        ));
        assert!(matches!(
            locate("data/za.geojson"),
            Ok(Location::File(path)) if path == PathBuf::from("data/za.geojson")
        ));
        let err = locate("ftp://a.example/za.geojson").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::BoundaryFetch);
    }

    #[test]
    fn test_parse_errors_are_fetch_errors() {
        let err = parse_boundary("{not json").unwrap_err();
        assert!(matches!(err, GeoMapError::GeoJsonError(..)));
        assert_eq!(err.kind(), ErrorKind::BoundaryFetch);
        assert_eq!(err.duplicate().kind(), ErrorKind::BoundaryFetch);

        let err = parse_boundary(r#"{"type": "Nonsense"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BoundaryFetch);

        let doc = parse_boundary(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(matches!(doc, GeoJson::FeatureCollection(_)));
    }
}
