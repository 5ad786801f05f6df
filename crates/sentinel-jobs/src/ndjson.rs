//! NDJSON line parsing for bulk-job input streams.
//!
//! Blank lines are skipped silently; a line that fails to parse as a
//! [`BulkJobItem`] is counted but does not abort the stream — the job
//! continues with whatever records did parse (spec: malformed lines are
//! recorded, never surfaced to the caller as a failure).

use futures::stream::{BoxStream, StreamExt};
use sentinel_core::{BulkJobItem, Error, Result};

/// Result of draining an NDJSON object to completion.
pub struct ParsedStream {
    pub items: Vec<BulkJobItem>,
    pub parse_error_count: usize,
}

/// Reads every line from `lines`, parsing non-blank ones as [`BulkJobItem`].
/// Only a read failure from the underlying stream (not a parse failure) is
/// propagated as an `Err`.
pub async fn parse_ndjson_lines(mut lines: BoxStream<'static, std::io::Result<String>>) -> Result<ParsedStream> {
    let mut items = Vec::new();
    let mut parse_error_count = 0usize;

    while let Some(line) = lines.next().await {
        let line = line.map_err(Error::from)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<BulkJobItem>(trimmed) {
            Ok(item) => items.push(item),
            Err(_) => parse_error_count += 1,
        }
    }

    Ok(ParsedStream { items, parse_error_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn lines_of(values: &[&str]) -> BoxStream<'static, std::io::Result<String>> {
        let owned: Vec<std::io::Result<String>> = values.iter().map(|v| Ok(v.to_string())).collect();
        stream::iter(owned).boxed()
    }

    #[tokio::test]
    async fn parses_valid_records_and_skips_blank_lines() {
        let parsed = parse_ndjson_lines(lines_of(&[
            r#"{"requestId":"1","name":"Nicolas Maduro"}"#,
            "",
            r#"{"requestId":"2","name":"Bob Jones","entityType":"INDIVIDUAL"}"#,
        ]))
        .await
        .unwrap();

        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.parse_error_count, 0);
        assert_eq!(parsed.items[0].request_id, "1");
    }

    #[tokio::test]
    async fn counts_malformed_lines_without_aborting() {
        let parsed = parse_ndjson_lines(lines_of(&[
            r#"{"requestId":"1","name":"Valid"}"#,
            "not json at all",
            r#"{"requestId":"3","name":"Also Valid"}"#,
        ]))
        .await
        .unwrap();

        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.parse_error_count, 1);
    }

    #[tokio::test]
    async fn empty_stream_yields_no_items() {
        let parsed = parse_ndjson_lines(lines_of(&[])).await.unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.parse_error_count, 0);
    }
}
