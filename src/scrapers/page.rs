//! Extraction of the JSON that YouTube embeds in its HTML pages.
//!
//! Channel and watch pages bootstrap themselves from inline script blobs:
//! `var ytInitialData = {...};` holds the rendered content, and the
//! `ytcfg.set({...})` call carries the innertube client context and API key.
//! None of these are worth a full HTML parse; they are located by marker
//! strings and handed to `serde_json`.

use crate::error::ScrapeError;
use serde_json::Value;
use std::collections::VecDeque;

const INITIAL_DATA_MARKER: &str = "var ytInitialData = ";
const CONTEXT_MARKER: &str = "INNERTUBE_CONTEXT";
const API_KEY_MARKER: &str = "innertubeApiKey";

/// Slice of `html` that starts `skip` bytes after the first occurrence of
/// `key` and ends right before the next `stop`.
///
/// Returns `None` when either marker is missing.
pub fn json_after<'a>(html: &'a str, key: &str, skip: usize, stop: &str) -> Option<&'a str> {
    let begin = html.find(key)? + key.len() + skip;
    let rest = html.get(begin..)?;
    let end = rest.find(stop)?;
    Some(&rest[..end])
}

/// The page's `ytInitialData` object.
pub fn initial_data(html: &str, url: &str) -> Result<Value, ScrapeError> {
    let raw = json_after(html, INITIAL_DATA_MARKER, 0, "};").ok_or_else(|| {
        ScrapeError::MissingEmbeddedData {
            what: "ytInitialData",
            url: url.to_string(),
        }
    })?;
    Ok(serde_json::from_str(&format!("{raw}}}"))?)
}

/// The innertube `client` object from `INNERTUBE_CONTEXT`.
///
/// The context is cut at the first `"}},`, which closes the `client` object
/// and the object holding it; the two braces are put back before parsing.
pub fn innertube_client(html: &str, url: &str) -> Result<Value, ScrapeError> {
    let raw = json_after(html, CONTEXT_MARKER, 2, "\"}},").ok_or_else(|| {
        ScrapeError::MissingEmbeddedData {
            what: "INNERTUBE_CONTEXT",
            url: url.to_string(),
        }
    })?;
    let mut context: Value = serde_json::from_str(&format!("{raw}\"}}}}"))?;
    match context.get_mut("client") {
        Some(client) => Ok(client.take()),
        None => Err(ScrapeError::MissingField { field: "client" }),
    }
}

/// The innertube API key used for `browse` continuations.
pub fn api_key(html: &str, url: &str) -> Result<String, ScrapeError> {
    json_after(html, API_KEY_MARKER, 3, "\"")
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::MissingEmbeddedData {
            what: "innertubeApiKey",
            url: url.to_string(),
        })
}

/// Client version advertised in the innertube client object.
pub fn client_version(client: &Value) -> Result<&str, ScrapeError> {
    client
        .get("clientVersion")
        .and_then(Value::as_str)
        .ok_or(ScrapeError::MissingField {
            field: "clientVersion",
        })
}

/// Breadth-first iterator over every value stored under a given key.
///
/// Objects are walked in key order and arrays in element order. A matching
/// value is yielded but not descended into.
pub struct SearchKey<'a> {
    key: &'a str,
    queue: VecDeque<&'a Value>,
}

impl<'a> Iterator for SearchKey<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.queue.pop_front() {
            match current {
                Value::Object(map) => {
                    let mut found = None;
                    for (k, v) in map {
                        if k == self.key {
                            found = Some(v);
                        } else {
                            self.queue.push_back(v);
                        }
                    }
                    if found.is_some() {
                        return found;
                    }
                }
                Value::Array(items) => self.queue.extend(items.iter()),
                _ => {}
            }
        }
        None
    }
}

pub fn search_key<'a>(value: &'a Value, key: &'a str) -> SearchKey<'a> {
    SearchKey {
        key,
        queue: VecDeque::from([value]),
    }
}

/// Plain text of a YouTube text object: `simpleText`, or the joined `runs`.
pub fn text_of(value: &Value) -> Option<String> {
    if let Some(simple) = value.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }
    let runs = value.get("runs")?.as_array()?;
    Some(
        runs.iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = concat!(
        r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY":"k","innertubeApiKey":"AIzaTestKey","#,
        r#""INNERTUBE_CONTEXT":{"client":{"hl":"en","clientName":"WEB","clientVersion":"2.20240101.00.00"}},"#,
        r#""INNERTUBE_CONTEXT_CLIENT_NAME":1});</script>"#,
        r#"<script>var ytInitialData = {"contents":{"tabs":[{"title":"Videos"}]}};</script></html>"#,
    );

    #[test]
    fn test_json_after_finds_slice() {
        assert_eq!(json_after("abc KEY: value; rest", "KEY", 2, ";"), Some("value"));
    }

    #[test]
    fn test_json_after_missing_markers() {
        assert_eq!(json_after("nothing here", "KEY", 0, ";"), None);
        assert_eq!(json_after("KEY without stop", "KEY", 0, ";"), None);
    }

    #[test]
    fn test_initial_data_parses() {
        let data = initial_data(PAGE, "https://example.test").unwrap();
        assert_eq!(data["contents"]["tabs"][0]["title"], "Videos");
    }

    #[test]
    fn test_initial_data_missing() {
        let err = initial_data("<html></html>", "https://example.test").unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::MissingEmbeddedData {
                what: "ytInitialData",
                ..
            }
        ));
    }

    #[test]
    fn test_innertube_client_and_version() {
        let client = innertube_client(PAGE, "https://example.test").unwrap();
        assert_eq!(client["clientName"], "WEB");
        assert_eq!(client_version(&client).unwrap(), "2.20240101.00.00");
    }

    #[test]
    fn test_api_key() {
        assert_eq!(api_key(PAGE, "https://example.test").unwrap(), "AIzaTestKey");
        assert!(api_key("<html></html>", "https://example.test").is_err());
    }

    #[test]
    fn test_search_key_is_breadth_first() {
        let data = json!({
            "a": { "deep": { "deeper": { "target": "third" } } },
            "b": [ { "target": "second" } ],
            "target": "first",
        });
        let found: Vec<_> = search_key(&data, "target")
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(found, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_search_key_does_not_descend_into_match() {
        let data = json!({ "target": { "target": "inner" } });
        let found: Vec<_> = search_key(&data, "target").collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_object());
    }

    #[test]
    fn test_search_key_keeps_array_order() {
        let data = json!({
            "items": [
                { "videoRenderer": { "videoId": "one" } },
                { "videoRenderer": { "videoId": "two" } },
                { "videoRenderer": { "videoId": "three" } },
            ]
        });
        let ids: Vec<_> = search_key(&data, "videoRenderer")
            .filter_map(|v| v["videoId"].as_str())
            .collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_text_of_variants() {
        assert_eq!(
            text_of(&json!({ "simpleText": "Mar 3, 2021" })).as_deref(),
            Some("Mar 3, 2021")
        );
        assert_eq!(
            text_of(&json!({ "runs": [{ "text": "Premiered " }, { "text": "Mar 3, 2021" }] }))
                .as_deref(),
            Some("Premiered Mar 3, 2021")
        );
        assert_eq!(text_of(&json!("plain")), None);
    }
}
