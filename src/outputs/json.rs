//! JSON rendering of enriched channel listings.
//!
//! The output is a single JSON array, one object per video, in listing
//! order. Compact by default; `pretty` indents it for reading.

use crate::error::Result;
use crate::models::VideoRecord;
use tracing::{debug, instrument};

/// Serialize `videos` to a JSON array string.
#[instrument(level = "debug", skip(videos), fields(count = videos.len()))]
pub fn render_videos(videos: &[VideoRecord], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(videos)?
    } else {
        serde_json::to_string(videos)?
    };
    debug!(bytes = json.len(), "Rendered JSON");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn enriched(id: &str, date: &str) -> VideoRecord {
        let mut record = VideoRecord::new(id);
        record.extra.insert("title".to_string(), json!({ "simpleText": id.to_uppercase() }));
        record.date_text = Some(date.to_string());
        record
    }

    #[test]
    fn test_render_compact() {
        let out = render_videos(&[enriched("a", "Jan 1, 2024")], false).unwrap();
        assert_eq!(
            out,
            r#"[{"videoId":"a","title":{"simpleText":"A"},"dateText":"Jan 1, 2024"}]"#
        );
    }

    #[test]
    fn test_render_pretty_same_value() {
        let videos = [enriched("a", "Jan 1, 2024"), enriched("b", "Feb 2, 2024")];
        let pretty = render_videos(&videos, true).unwrap();
        assert!(pretty.contains('\n'));
        let compact = render_videos(&videos, false).unwrap();
        let lhs: Value = serde_json::from_str(&pretty).unwrap();
        let rhs: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_videos(&[], false).unwrap(), "[]");
    }
}
