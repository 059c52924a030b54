//! Item projection: stored item to protocol field set.

use crate::mailstore::StoredItem;
use aerosync_protocol::{BodyOptions, BodyPayload, BodyType, ItemFields};

/// Maps stored items into the field set the protocol serializes,
/// applying the client's truncation and body preferences.
///
/// Stateless; one instance is shared across all exchanges.
#[derive(Debug, Clone)]
pub struct ItemProjector {
    preview_max_chars: usize,
}

impl ItemProjector {
    /// Creates a projector with the given preview cap.
    pub fn new(preview_max_chars: usize) -> Self {
        Self { preview_max_chars }
    }

    /// Projects one stored item under the client's body options.
    ///
    /// Body data and preview are mutually exclusive: when any body
    /// content is sent (truncated or not), no preview is emitted; the
    /// preview only appears on metadata-only syncs.
    pub fn project(&self, item: &StoredItem, options: &BodyOptions) -> ItemFields {
        let (body, preview) = if options.wants_body() {
            (Some(self.project_body(item, options)), None)
        } else {
            (None, Some(self.preview_of(&item.body)))
        };

        ItemFields {
            server_id: item.server_id.clone(),
            subject: item.subject.clone(),
            from: item.from.clone(),
            to: item.to.clone(),
            date_received: item.date_received.clone(),
            read: item.read,
            importance: 1,
            message_class: "IPM.Note".to_string(),
            body,
            preview,
        }
    }

    fn project_body(&self, item: &StoredItem, options: &BodyOptions) -> BodyPayload {
        let body_type = options.body_type.unwrap_or(BodyType::PlainText);
        let full = item.body.as_str();
        let total = full.len();

        match options.truncation_size {
            Some(limit) if total > limit => BodyPayload {
                body_type,
                data: clip_to_char_boundary(full, limit).to_string(),
                truncated: true,
                // Size metadata reports the untruncated size so the
                // client can request the remainder later.
                estimated_size: total,
            },
            _ => BodyPayload {
                body_type,
                data: full.to_string(),
                truncated: false,
                estimated_size: total,
            },
        }
    }

    fn preview_of(&self, body: &str) -> String {
        let flattened: String = body
            .chars()
            .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
            .collect();
        flattened.chars().take(self.preview_max_chars).collect()
    }
}

/// Clips a string to at most `max_bytes` bytes without splitting a
/// UTF-8 character.
fn clip_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_body(body: &str) -> StoredItem {
        StoredItem {
            server_id: "1:1".into(),
            subject: "subject".into(),
            from: "a@example.com".into(),
            to: "b@example.com".into(),
            date_received: "2026-08-27T08:00:00.000Z".into(),
            read: true,
            body: body.to_string(),
        }
    }

    fn wants_body(truncation: Option<usize>) -> BodyOptions {
        BodyOptions {
            body_type: Some(BodyType::PlainText),
            truncation_size: truncation,
            mime_support: false,
        }
    }

    #[test]
    fn full_body_when_it_fits() {
        let projector = ItemProjector::new(255);
        let fields = projector.project(&item_with_body("short body"), &wants_body(Some(500)));

        let body = fields.body.unwrap();
        assert_eq!(body.data, "short body");
        assert!(!body.truncated);
        assert_eq!(body.estimated_size, 10);
        assert!(fields.preview.is_none());
    }

    #[test]
    fn full_body_when_no_truncation_requested() {
        let projector = ItemProjector::new(255);
        let big = "x".repeat(20_000);
        let fields = projector.project(&item_with_body(&big), &wants_body(None));

        let body = fields.body.unwrap();
        assert_eq!(body.data.len(), 20_000);
        assert!(!body.truncated);
    }

    #[test]
    fn truncated_body_reports_original_size() {
        let projector = ItemProjector::new(255);
        let big = "x".repeat(20_000);
        let fields = projector.project(&item_with_body(&big), &wants_body(Some(500)));

        let body = fields.body.unwrap();
        assert!(body.truncated);
        assert!(body.data.len() <= 500);
        assert_eq!(body.estimated_size, 20_000);
        assert!(fields.preview.is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let projector = ItemProjector::new(255);
        // Each 'é' is 2 bytes; a 5-byte budget must not split one.
        let fields = projector.project(&item_with_body("ééééé"), &wants_body(Some(5)));

        let body = fields.body.unwrap();
        assert!(body.truncated);
        assert_eq!(body.data, "éé");
        assert_eq!(body.estimated_size, 10);
    }

    #[test]
    fn metadata_only_sync_gets_preview_and_no_body() {
        let projector = ItemProjector::new(255);
        let fields = projector.project(
            &item_with_body("line one\r\nline two"),
            &BodyOptions::default(),
        );

        assert!(fields.body.is_none());
        assert_eq!(fields.preview.as_deref(), Some("line one  line two"));
    }

    #[test]
    fn preview_is_bounded() {
        let projector = ItemProjector::new(255);
        let big = "y".repeat(4_000);
        let fields = projector.project(&item_with_body(&big), &BodyOptions::default());
        assert_eq!(fields.preview.unwrap().chars().count(), 255);
    }

    #[test]
    fn preview_and_body_are_exclusive() {
        let projector = ItemProjector::new(255);
        let item = item_with_body("body");

        let with_body = projector.project(&item, &wants_body(Some(2)));
        assert!(with_body.body.is_some() && with_body.preview.is_none());

        let without_body = projector.project(&item, &BodyOptions::default());
        assert!(without_body.body.is_none() && without_body.preview.is_some());
    }
}
