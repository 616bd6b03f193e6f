//! Classification of raw `GetRecord` responses.
//!
//! Responses are recognised by marker substrings and two patterns rather than
//! by parsing the XML envelope. Only the inner metadata or error fragment is
//! ever needed. The decision order matters: record markers are checked
//! before error markers, so a metadata payload that happens to contain a
//! literal `</error>` still classifies as a success.

use regex::Regex;
use std::sync::LazyLock;

use crate::harvest::traits::{FetchOutcome, MalformedReason};

const RECORD_CLOSE: &str = "</GetRecord>";
const METADATA_CLOSE: &str = "</metadata>";
const ERROR_CLOSE: &str = "</error>";

// Greedy: spans up to the last closing tag.
static METADATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<metadata[^>]*>(.*)</metadata>").expect("metadata pattern compiles")
});

static ERROR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<error.*code=['"]([^'"]*)['"][^>]*>(.*)</error>"#)
        .expect("error pattern compiles")
});

/// Classifies a raw response body. Never fails and holds no state.
pub fn classify(raw: &str) -> FetchOutcome {
    if raw.contains(RECORD_CLOSE) && raw.contains(METADATA_CLOSE) {
        return match METADATA_PATTERN.captures(raw) {
            Some(caps) => FetchOutcome::Success(caps[1].trim().to_string()),
            None => FetchOutcome::Malformed(MalformedReason::NoMetadata),
        };
    }

    if raw.contains(ERROR_CLOSE) {
        return match ERROR_PATTERN.captures(raw) {
            Some(caps) => FetchOutcome::ProtocolError {
                code: caps[1].to_string(),
                message: caps[2].to_string(),
            },
            None => FetchOutcome::Malformed(MalformedReason::UnparsableError),
        };
    }

    FetchOutcome::Malformed(MalformedReason::NoRecordOrError)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2024-01-01T00:00:00Z</responseDate>
  <request verb="GetRecord" identifier="oai:example.org:1" metadataPrefix="oai_dc">https://example.org/oai</request>
  <GetRecord>
    <record>
      <header>
        <identifier>oai:example.org:1</identifier>
      </header>
      <metadata>
        <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/">
          <dc:title>A title</dc:title>
        </oai_dc:dc>
      </metadata>
      <about>provenance</about>
    </record>
  </GetRecord>
</OAI-PMH>
"#;

    #[test]
    fn test_record_scenario() {
        let raw = "<OAI-PMH>...<GetRecord><metadata><record>DATA</record></metadata></GetRecord></OAI-PMH>";
        assert_eq!(
            classify(raw),
            FetchOutcome::Success("<record>DATA</record>".to_string())
        );
    }

    #[test]
    fn test_record_is_trimmed_and_siblings_ignored() {
        let outcome = classify(RECORD);
        let FetchOutcome::Success(payload) = &outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert!(payload.starts_with("<oai_dc:dc"));
        assert!(payload.ends_with("</oai_dc:dc>"));
        assert!(payload.contains("<dc:title>A title</dc:title>"));
        assert!(!payload.contains("<header>"));
        assert!(!payload.contains("provenance"));
    }

    #[test]
    fn test_metadata_element_with_attributes() {
        let raw = r#"<GetRecord><metadata xmlns:x="urn:x">
  payload
</metadata></GetRecord>"#;
        assert_eq!(classify(raw), FetchOutcome::Success("payload".to_string()));
    }

    #[test]
    fn test_record_markers_without_metadata_element() {
        let raw = "<GetRecord><record>no opening tag</metadata></record></GetRecord>";
        assert_eq!(
            classify(raw),
            FetchOutcome::Malformed(MalformedReason::NoMetadata)
        );
    }

    #[test]
    fn test_error_scenario() {
        let raw = r#"<OAI-PMH>...<error code="idDoesNotExist">Unknown id</error></OAI-PMH>"#;
        let outcome = classify(raw);
        assert_eq!(
            outcome,
            FetchOutcome::ProtocolError {
                code: "idDoesNotExist".to_string(),
                message: "Unknown id".to_string(),
            }
        );
        assert_eq!(outcome.failure_reason().unwrap(), "idDoesNotExist: Unknown id");
    }

    #[test]
    fn test_error_with_single_quotes() {
        let raw = "<OAI-PMH><error code='cannotDisseminateFormat'>bad prefix</error></OAI-PMH>";
        assert_eq!(
            classify(raw),
            FetchOutcome::ProtocolError {
                code: "cannotDisseminateFormat".to_string(),
                message: "bad prefix".to_string(),
            }
        );
    }

    #[test]
    fn test_error_without_code() {
        let raw = "<OAI-PMH><error>something went wrong</error></OAI-PMH>";
        assert_eq!(
            classify(raw),
            FetchOutcome::Malformed(MalformedReason::UnparsableError)
        );
    }

    #[test]
    fn test_neither_record_nor_error() {
        for raw in ["", "<html><body>Service Unavailable</body></html>", "<GetRecord></GetRecord>"] {
            assert_eq!(
                classify(raw),
                FetchOutcome::Malformed(MalformedReason::NoRecordOrError),
                "input: {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_metadata_markers_take_precedence_over_error() {
        let raw = "<GetRecord><metadata><note>see </error> here</note></metadata></GetRecord>";
        assert_eq!(
            classify(raw),
            FetchOutcome::Success("<note>see </error> here</note>".to_string())
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let inputs = [
            RECORD,
            r#"<error code="badArgument">x</error>"#,
            "<error>x</error>",
            "plain text",
        ];
        for raw in inputs {
            assert_eq!(classify(raw), classify(raw));
        }
    }
}
