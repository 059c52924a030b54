//! Ping command: long-poll change notification.

use crate::error::{ProtocolError, ProtocolResult};
use aerosync_wbxml::{pages, Element};

/// Ping-specific wire status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingStatus {
    /// The heartbeat elapsed with no changes.
    Expired,
    /// Changes arrived in at least one watched folder.
    ChangesOccurred,
    /// The request omitted required parameters.
    MissingParameters,
    /// The requested heartbeat was outside the server's bounds.
    HeartbeatOutOfRange,
}

impl PingStatus {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            PingStatus::Expired => 1,
            PingStatus::ChangesOccurred => 2,
            PingStatus::MissingParameters => 3,
            PingStatus::HeartbeatOutOfRange => 5,
        }
    }
}

/// A parsed Ping request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    /// Requested heartbeat in seconds; `None` reuses the prior value.
    pub heartbeat_interval: Option<u32>,
    /// Folder ids to watch for changes.
    pub folder_ids: Vec<String>,
}

impl PingRequest {
    /// Maps a decoded `<Ping>` tree onto a typed request.
    pub fn from_element(root: &Element) -> ProtocolResult<Self> {
        if root.tag != "Ping" || root.page != pages::PING {
            return Err(ProtocolError::UnexpectedRoot {
                expected: "Ping",
                found: root.tag.to_string(),
            });
        }

        let heartbeat_interval = match root.child_value("HeartbeatInterval") {
            Some(text) => Some(text.parse().map_err(|_| ProtocolError::InvalidValue {
                element: "HeartbeatInterval",
                value: text.to_string(),
            })?),
            None => None,
        };

        let mut folder_ids = Vec::new();
        if let Some(folders) = root.child("Folders") {
            for folder in folders.children_named("Folder") {
                let id = folder
                    .child_value("Id")
                    .ok_or(ProtocolError::MissingElement { element: "Id" })?;
                folder_ids.push(id.to_string());
            }
        }

        Ok(Self {
            heartbeat_interval,
            folder_ids,
        })
    }
}

/// A Ping response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResponse {
    /// Outcome of the wait.
    pub status: PingStatus,
    /// Folders in which changes arrived, for status `ChangesOccurred`.
    pub changed_folders: Vec<String>,
}

impl PingResponse {
    /// A response reporting the heartbeat elapsed quietly.
    pub fn expired() -> Self {
        Self {
            status: PingStatus::Expired,
            changed_folders: Vec::new(),
        }
    }

    /// A response naming the folders that changed.
    pub fn changes(changed_folders: Vec<String>) -> Self {
        Self {
            status: PingStatus::ChangesOccurred,
            changed_folders,
        }
    }

    /// Builds the `<Ping>` response tree.
    pub fn to_element(&self) -> Element {
        let mut children = vec![Element::text(
            pages::PING,
            "Status",
            self.status.code().to_string(),
        )];
        if !self.changed_folders.is_empty() {
            children.push(Element::container(
                pages::PING,
                "Folders",
                self.changed_folders
                    .iter()
                    .map(|id| Element::text(pages::PING, "Folder", id.clone()))
                    .collect(),
            ));
        }
        Element::container(pages::PING, "Ping", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_with_folders() {
        let tree = Element::container(
            pages::PING,
            "Ping",
            vec![
                Element::text(pages::PING, "HeartbeatInterval", "300"),
                Element::container(
                    pages::PING,
                    "Folders",
                    vec![Element::container(
                        pages::PING,
                        "Folder",
                        vec![
                            Element::text(pages::PING, "Id", "inbox"),
                            Element::text(pages::PING, "Class", "Email"),
                        ],
                    )],
                ),
            ],
        );
        let request = PingRequest::from_element(&tree).unwrap();
        assert_eq!(request.heartbeat_interval, Some(300));
        assert_eq!(request.folder_ids, vec!["inbox".to_string()]);
    }

    #[test]
    fn folder_without_id_rejected() {
        let tree = Element::container(
            pages::PING,
            "Ping",
            vec![Element::container(
                pages::PING,
                "Folders",
                vec![Element::container(
                    pages::PING,
                    "Folder",
                    vec![Element::text(pages::PING, "Class", "Email")],
                )],
            )],
        );
        assert!(matches!(
            PingRequest::from_element(&tree),
            Err(ProtocolError::MissingElement { element: "Id" })
        ));
    }

    #[test]
    fn response_codes() {
        let quiet = PingResponse::expired().to_element();
        assert_eq!(quiet.child_value("Status"), Some("1"));
        assert!(quiet.child("Folders").is_none());

        let busy = PingResponse::changes(vec!["inbox".into()]).to_element();
        assert_eq!(busy.child_value("Status"), Some("2"));
        assert_eq!(
            busy.child("Folders").unwrap().child_value("Folder"),
            Some("inbox")
        );
    }
}
