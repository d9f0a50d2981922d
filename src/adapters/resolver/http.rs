//! Network-backed resolver
//!
//! Fetches managed datastream content from a running repository through the
//! API-A-Lite `get` endpoint:
//! `http://{host}/fedora/get/{pid}/{dsid}/{dateTime}`. The date is the
//! version's `CREATED` timestamp, which selects that version rather than the
//! current one. No retries are attempted; any failure is reported as a fetch
//! error.

use super::traits::{ContentSource, IdResolver};
use crate::config::{HttpResolverConfig, ResolverKind, SecretString};
use crate::domain::{InternalId, MigrationError, ResolveError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Resolver that reads content from a repository host over HTTP
pub struct HttpResolver {
    /// HTTP client for making requests
    client: Client,

    /// Base URL built from the `host:port` string
    base_url: Url,

    /// Basic auth username
    username: Option<String>,

    /// Basic auth password
    password: Option<SecretString>,
}

impl HttpResolver {
    /// Create a resolver for `host` (a `host:port` string)
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the host does not form a valid URL
    /// or the HTTP client cannot be built.
    pub fn new(host: &str, config: &HttpResolverConfig) -> Result<Self> {
        let base_url = Url::parse(&format!("http://{host}/")).map_err(|e| {
            MigrationError::Configuration(format!("Invalid repository host '{host}': {e}"))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MigrationError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// URL the content of `id`, created at `as_of`, is fetched from
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is not a `PID+DSID+VERSIONID` reference
    /// and `Fetch` if the version has no creation date to address it by.
    pub fn content_url(
        &self,
        id: &InternalId,
        as_of: Option<DateTime<Utc>>,
    ) -> std::result::Result<Url, ResolveError> {
        let not_found = || ResolveError::NotFound {
            id: id.to_string(),
            resolver: ResolverKind::Http.as_str(),
        };

        let (pid, dsid, version) = id.parts().ok_or_else(not_found)?;
        let created = as_of.ok_or_else(|| ResolveError::Fetch {
            id: id.to_string(),
            resolver: ResolverKind::Http.as_str(),
            message: format!("version {version} has no CREATED date to request it by"),
        })?;
        let date_time = format_date_time(&created);

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| not_found())?
            .clear()
            .extend(["fedora", "get", pid, dsid, date_time.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl IdResolver for HttpResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Http
    }

    async fn resolve(
        &self,
        id: &InternalId,
        as_of: Option<DateTime<Utc>>,
    ) -> std::result::Result<ContentSource, ResolveError> {
        let url = self.content_url(id, as_of)?;
        tracing::debug!(internal_id = %id, url = %url, "Fetching datastream content");

        let mut request = self.client.get(url.clone());
        if let Some(username) = &self.username {
            request = request.basic_auth(
                username,
                self.password.as_ref().map(|p| p.expose_secret().as_ref().to_string()),
            );
        }

        let response = request.send().await.map_err(|e| ResolveError::Fetch {
            id: id.to_string(),
            resolver: ResolverKind::Http.as_str(),
            message: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Fetch {
                id: id.to_string(),
                resolver: ResolverKind::Http.as_str(),
                message: format!("{url} returned HTTP {}", status.as_u16()),
            });
        }

        Ok(ContentSource::Remote {
            id: id.to_string(),
            response,
        })
    }
}

/// Date format API-A-Lite accepts for `asOfDateTime` path segments
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn resolver(host: &str) -> HttpResolver {
        HttpResolver::new(host, &HttpResolverConfig::default()).unwrap()
    }

    fn created(second: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2006, 8, 8, 14, 39, second).unwrap())
    }

    #[test]
    fn test_content_url() {
        let resolver = resolver("fcrepo.example.com:8080");
        let id = InternalId::new("umd:1+DS1+DS1.0").unwrap();
        assert_eq!(
            resolver.content_url(&id, created(8)).unwrap().as_str(),
            "http://fcrepo.example.com:8080/fedora/get/umd:1/DS1/2006-08-08T14:39:08.000Z"
        );
    }

    #[test]
    fn test_content_url_differs_per_version() {
        let resolver = resolver("repo:8080");
        let first = resolver
            .content_url(&InternalId::new("umd:1+DS+DS.0").unwrap(), created(8))
            .unwrap();
        let second = resolver
            .content_url(&InternalId::new("umd:1+DS+DS.1").unwrap(), created(9))
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_content_url_without_created_date_is_fetch_error() {
        let resolver = resolver("repo:8080");
        let id = InternalId::new("umd:1+DS+DS.0").unwrap();
        assert!(matches!(
            resolver.content_url(&id, None),
            Err(ResolveError::Fetch { resolver: "http", .. })
        ));
    }

    #[test]
    fn test_content_url_rejects_unstructured_id() {
        let resolver = resolver("fcrepo.example.com");
        let id = InternalId::new("not-a-reference").unwrap();
        assert!(matches!(
            resolver.content_url(&id, created(8)),
            Err(ResolveError::NotFound { resolver: "http", .. })
        ));
    }

    #[test]
    fn test_format_date_time_keeps_milliseconds() {
        let date = DateTime::parse_from_rfc3339("2006-08-08T14:39:08.123Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date_time(&date), "2006-08-08T14:39:08.123Z");
    }

    #[test]
    fn test_invalid_host_is_configuration_error() {
        let result = HttpResolver::new("bad host:port:extra", &HttpResolverConfig::default());
        assert!(matches!(result, Err(MigrationError::Configuration(_))));
    }

    #[test]
    fn test_kind() {
        assert_eq!(resolver("localhost").kind(), ResolverKind::Http);
    }
}
