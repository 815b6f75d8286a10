//! Per-unit error taxonomy.
//!
//! Everything here is local to one (team, season) fetch, one store write or one AI batch.
//! The orchestrator logs these and moves on; only configuration problems abort a run.

use thiserror::Error;

/// Adapter failures. An empty roster (404 or zero rows) is not an error and is returned as `Ok(vec![])`.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network failure or a non-2xx status that does not mean "no data".
    #[error("source unavailable: {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    /// The page or payload came back but did not have the expected layout.
    #[error("parse mismatch at {url}: {reason} (fragment: {fragment})")]
    ParseMismatch {
        url: String,
        reason: String,
        fragment: String,
    },

    /// The team descriptor lacks the id this adapter builds its URL from.
    #[error("team {team} is not configured for {adapter}: missing {field}")]
    NotConfigured {
        team: String,
        adapter: &'static str,
        field: &'static str,
    },
}

impl SourceError {
    pub fn unavailable(url: &str, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn mismatch(url: &str, reason: impl Into<String>, fragment: &str) -> Self {
        Self::ParseMismatch {
            url: url.to_string(),
            reason: reason.into(),
            fragment: truncate_for_log(fragment, 240),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store write failed for {target}: {reason}")]
    StoreWriteError { target: String, reason: String },

    #[error("invalid table name {0:?}")]
    InvalidTable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn write(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreWriteError {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AiError {
    /// Transport or HTTP failure talking to the model endpoint. Fails the whole batch.
    #[error("model request failed: {0}")]
    Transport(String),

    /// Body was not parseable JSON, or had no usable shape at all.
    #[error("AI response malformed: {0}")]
    AiResponseMalformed(String),
}

/// Cut long upstream bodies down before they reach a log line.
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    let compact: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= max_chars {
        return compact;
    }
    let mut out: String = compact.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_fragment_is_truncated_and_compacted() {
        let raw = format!("<tr>\n   <td>{}</td>\n</tr>", "x".repeat(500));
        let err = SourceError::mismatch("https://example.test", "no name column", &raw);
        match err {
            SourceError::ParseMismatch { fragment, .. } => {
                assert!(fragment.starts_with("<tr> <td>"));
                assert!(fragment.chars().count() <= 241);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
