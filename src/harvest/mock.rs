//! In-memory [`DocumentFetcher`] for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use url::Url;

use crate::traits::{DocumentFetcher, FetchError};

enum Canned {
    Body(String),
    Fail(String),
}

/// Serves canned responses keyed by the `identifier` query parameter and
/// records the identifiers it was asked for, in order.
#[derive(Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

pub(crate) fn oai_record(payload: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<OAI-PMH>\n  <GetRecord>\n    <record>\n      <header/>\n      <metadata>\n        {}\n      </metadata>\n    </record>\n  </GetRecord>\n</OAI-PMH>\n",
        payload
    )
}

pub(crate) fn oai_error(code: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<OAI-PMH>\n  <error code=\"{}\">{}</error>\n</OAI-PMH>\n",
        code, message
    )
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_record(self, identifier: &str, payload: &str) -> Self {
        self.with_body(identifier, &oai_record(payload))
    }

    pub(crate) fn with_error(self, identifier: &str, code: &str, message: &str) -> Self {
        self.with_body(identifier, &oai_error(code, message))
    }

    pub(crate) fn with_body(mut self, identifier: &str, body: &str) -> Self {
        self.responses
            .insert(identifier.to_string(), Canned::Body(body.to_string()));
        self
    }

    /// Writes a partial body, then fails.
    pub(crate) fn with_failure(mut self, identifier: &str, message: &str) -> Self {
        self.responses
            .insert(identifier.to_string(), Canned::Fail(message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    fn fetcher_id(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let parsed = Url::parse(url)?;
        let identifier = parsed
            .query_pairs()
            .find(|(key, _)| key == "identifier")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(identifier.clone());

        match self.responses.get(&identifier) {
            Some(Canned::Body(body)) => {
                tokio::fs::write(dest, body).await?;
                Ok(())
            }
            Some(Canned::Fail(message)) => {
                tokio::fs::write(dest, "<OAI-PMH><GetRec").await?;
                Err(FetchError::Request(message.clone().into()))
            }
            None => Err(FetchError::Request(
                format!("no canned response for {}", identifier).into(),
            )),
        }
    }
}
