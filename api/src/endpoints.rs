use pretalx_core::{PretalxError, QueryParams, Resource, Result};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::PretalxClient;

const EVENTS_PATH: &str = "/api/events/";
const ME_PATH: &str = "/api/me";

impl PretalxClient {
    /// Identity of the authenticated user
    pub async fn me(&self) -> Result<Value> {
        let url = self.url_for(ME_PATH)?;
        self.get_json(url, &QueryParams::new()).await
    }

    /// All events, or a single one when `event` is given
    pub async fn events(&self, event: Option<&str>, params: &QueryParams) -> Result<Value> {
        self.get(event, None, None, params).await
    }

    pub async fn submissions(
        &self,
        event: &str,
        code: Option<&str>,
        params: &QueryParams,
    ) -> Result<Value> {
        self.resource(event, Resource::Submissions, code, params).await
    }

    pub async fn talks(&self, event: &str, code: Option<&str>, params: &QueryParams) -> Result<Value> {
        self.resource(event, Resource::Talks, code, params).await
    }

    pub async fn speakers(
        &self,
        event: &str,
        code: Option<&str>,
        params: &QueryParams,
    ) -> Result<Value> {
        self.resource(event, Resource::Speakers, code, params).await
    }

    pub async fn reviews(&self, event: &str, code: Option<&str>, params: &QueryParams) -> Result<Value> {
        self.resource(event, Resource::Reviews, code, params).await
    }

    pub async fn rooms(&self, event: &str, code: Option<&str>, params: &QueryParams) -> Result<Value> {
        self.resource(event, Resource::Rooms, code, params).await
    }

    /// Collection or single object of an event-scoped resource
    pub async fn resource(
        &self,
        event: &str,
        resource: Resource,
        code: Option<&str>,
        params: &QueryParams,
    ) -> Result<Value> {
        self.get(Some(event), Some(resource.segment()), code, params)
            .await
    }

    /// Generic GET below `/api/events/`. `params` go to the query string only.
    pub async fn get(
        &self,
        event: Option<&str>,
        endpoint: Option<&str>,
        code: Option<&str>,
        params: &QueryParams,
    ) -> Result<Value> {
        let url = self.resource_url(event, endpoint, code)?;
        self.get_json(url, params).await
    }

    /// Build `{root}/api/events/[{event}/[{endpoint}/[{code}]]]`.
    ///
    /// Each present segment is percent-encoded and appended in order; empty
    /// strings are skipped and `.`/`..` are rejected. The code never gets a
    /// trailing slash.
    pub fn resource_url(
        &self,
        event: Option<&str>,
        endpoint: Option<&str>,
        code: Option<&str>,
    ) -> Result<Url> {
        fn present(s: Option<&str>) -> Option<&str> {
            s.filter(|s| !s.is_empty())
        }

        let segments: Vec<&str> = [present(event), present(endpoint), present(code)]
            .into_iter()
            .flatten()
            .collect();

        if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(PretalxError::InvalidUrl(format!(
                "path segment `{}` is not allowed",
                bad
            )));
        }

        let mut url = self.url_for(EVENTS_PATH)?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                PretalxError::InvalidUrl(format!("{} cannot be a base", self.root_url()))
            })?;
            path.pop_if_empty().extend(&segments);
            if present(code).is_none() {
                path.push("");
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url, params: &QueryParams) -> Result<Value> {
        let path = url.path().to_string();

        debug!(%url, params = params.len(), "GET");

        let response = self
            .client()
            .get(url)
            .headers(self.headers().clone())
            .query(params)
            .send()
            .await
            .map_err(|e| PretalxError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%status, %path, "failed to read error body: {}", e);
                    String::new()
                }
            };
            warn!(%status, %path, "pretalx request failed");
            return Err(PretalxError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PretalxError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PretalxClient {
        PretalxClient::with_token("https://example.org", "T").unwrap()
    }

    fn url(event: Option<&str>, endpoint: Option<&str>, code: Option<&str>) -> String {
        client()
            .resource_url(event, endpoint, code)
            .unwrap()
            .to_string()
    }

    #[test]
    fn bare_events_url() {
        assert_eq!(url(None, None, None), "https://example.org/api/events/");
    }

    #[test]
    fn event_url_has_trailing_slash() {
        assert_eq!(
            url(Some("myconf"), None, None),
            "https://example.org/api/events/myconf/"
        );
    }

    #[test]
    fn collection_url() {
        assert_eq!(
            url(Some("myconf"), Some("talks"), None),
            "https://example.org/api/events/myconf/talks/"
        );
    }

    #[test]
    fn object_url_has_no_trailing_slash() {
        assert_eq!(
            url(Some("myconf"), Some("talks"), Some("XYZ")),
            "https://example.org/api/events/myconf/talks/XYZ"
        );
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(
            url(Some(""), Some("talks"), Some("")),
            "https://example.org/api/events/talks/"
        );
    }

    #[test]
    fn root_path_is_replaced() {
        let client = PretalxClient::with_token("https://example.org/sub/dir/", "T").unwrap();
        assert_eq!(
            client
                .resource_url(Some("myconf"), Some("rooms"), None)
                .unwrap()
                .as_str(),
            "https://example.org/api/events/myconf/rooms/"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let url = client()
            .resource_url(Some("my/conf"), Some("talks"), Some("X?state=evil#frag"))
            .unwrap();

        assert_eq!(url.path(), "/api/events/my%2Fconf/talks/X%3Fstate=evil%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn dot_segments_are_rejected() {
        let client = client();
        for bad in [".", ".."] {
            assert!(matches!(
                client.resource_url(Some(bad), None, None),
                Err(PretalxError::InvalidUrl(_))
            ));
            assert!(matches!(
                client.resource_url(Some("myconf"), Some("talks"), Some(bad)),
                Err(PretalxError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn dotted_names_are_kept() {
        assert_eq!(
            url(Some("../../me#"), None, None),
            "https://example.org/api/events/..%2F..%2Fme%23/"
        );
        assert_eq!(
            url(Some("conf.2024"), None, None),
            "https://example.org/api/events/conf.2024/"
        );
    }
}
