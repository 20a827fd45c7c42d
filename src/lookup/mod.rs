// src/lookup/mod.rs

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Resolves a structure identifier to its human-readable title.
pub trait StructureLookup {
    /// `Ok(None)` means the lookup answered but carried no title.
    fn title(&self, structure: &str) -> Result<Option<String>>;
}

/// Data-dictionary client: one blocking GET per structure, no retries.
pub struct NdaClient {
    client: Client,
    base: Url,
}

impl NdaClient {
    pub fn new(base: Url) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// The base URL with `structure` appended as one percent-encoded path
    /// segment.
    pub fn structure_url(&self, structure: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("lookup base {} cannot take a path", self.base))?
            .pop_if_empty()
            .push(structure);
        Ok(url)
    }
}

impl StructureLookup for NdaClient {
    fn title(&self, structure: &str) -> Result<Option<String>> {
        let url = self.structure_url(structure)?;
        debug!(%url, "looking up structure");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "lookup returned non-success status");
        }
        let body: Value = resp
            .json()
            .with_context(|| format!("decoding JSON from {}", url))?;

        Ok(title_from(&body))
    }
}

/// Answers every lookup with no title, without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl StructureLookup for Offline {
    fn title(&self, _structure: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn title_from(body: &Value) -> Option<String> {
    body.get("title")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> NdaClient {
        let base = Url::parse(&format!(
            "{}/api/datadictionary/datastructure",
            server.url()
        ))
        .unwrap();
        NdaClient::new(base).unwrap()
    }

    #[test]
    fn title_field_is_extracted() -> Result<()> {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/api/datadictionary/datastructure/abcd_mri01")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"shortName":"abcd_mri01","title":"MRI Info"}"#)
            .create();

        let title = client_for(&server).title("abcd_mri01")?;
        m.assert();
        assert_eq!(title.as_deref(), Some("MRI Info"));
        Ok(())
    }

    #[test]
    fn missing_title_is_none() -> Result<()> {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/datadictionary/datastructure/pdem02")
            .with_status(200)
            .with_body(r#"{"shortName":"pdem02"}"#)
            .create();

        assert_eq!(client_for(&server).title("pdem02")?, None);
        Ok(())
    }

    #[test]
    fn error_status_with_json_body_is_none() -> Result<()> {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/datadictionary/datastructure/unknown01")
            .with_status(404)
            .with_body(r#"{"error":"not found"}"#)
            .create();

        assert_eq!(client_for(&server).title("unknown01")?, None);
        Ok(())
    }

    #[test]
    fn non_json_body_is_fatal() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/datadictionary/datastructure/abcd_mri01")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create();

        let err = client_for(&server).title("abcd_mri01").unwrap_err();
        assert!(format!("{:#}", err).contains("decoding JSON"));
    }

    #[test]
    fn base_without_trailing_slash_keeps_its_path() {
        let client = NdaClient::with_client(
            Client::new(),
            Url::parse("https://nda.nih.gov/api/datadictionary/datastructure").unwrap(),
        );
        assert_eq!(
            client.structure_url("abcd_ksad01").unwrap().as_str(),
            "https://nda.nih.gov/api/datadictionary/datastructure/abcd_ksad01"
        );
    }

    #[test]
    fn structure_name_stays_one_path_segment() {
        let client = NdaClient::with_client(
            Client::new(),
            Url::parse("https://nda.nih.gov/api/datadictionary/datastructure/").unwrap(),
        );
        assert_eq!(
            client.structure_url("abcd:x01").unwrap().as_str(),
            "https://nda.nih.gov/api/datadictionary/datastructure/abcd:x01"
        );
        let url = client.structure_url("abcd#01").unwrap();
        assert_eq!(
            url.as_str(),
            "https://nda.nih.gov/api/datadictionary/datastructure/abcd%2301"
        );
        assert_eq!(url.fragment(), None);
        let url = client.structure_url("abcd?v=1").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(
            url.path(),
            "/api/datadictionary/datastructure/abcd%3Fv=1"
        );
    }

    #[test]
    fn cannot_be_a_base_url_is_an_error() {
        let client =
            NdaClient::with_client(Client::new(), Url::parse("mailto:nda@nih.gov").unwrap());
        assert!(client.structure_url("abcd_mri01").is_err());
    }

    #[test]
    fn non_string_title_is_none() {
        assert_eq!(title_from(&json!({"title": null})), None);
        assert_eq!(title_from(&json!({"title": 3})), None);
        assert_eq!(title_from(&json!([1, 2])), None);
        assert_eq!(
            title_from(&json!({"title": "Youth Prosocial Behavior"})).as_deref(),
            Some("Youth Prosocial Behavior")
        );
    }

    #[test]
    fn offline_never_has_a_title() -> Result<()> {
        assert_eq!(Offline.title("abcd_mri01")?, None);
        Ok(())
    }
}
