//! FolderSync command: folder hierarchy listing.

use crate::error::{ProtocolError, ProtocolResult};
use crate::status::Status;
use aerosync_wbxml::{pages, Element};

/// Well-known folder type codes.
pub mod folder_type {
    /// User-created mail folder.
    pub const USER_MAIL: u8 = 1;
    /// Default inbox.
    pub const INBOX: u8 = 2;
    /// Drafts folder.
    pub const DRAFTS: u8 = 3;
    /// Deleted items.
    pub const DELETED: u8 = 4;
    /// Sent items.
    pub const SENT: u8 = 5;
    /// Outbox.
    pub const OUTBOX: u8 = 6;
}

/// A synchronizable folder exposed by the mail store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Server-assigned folder identifier.
    pub server_id: String,
    /// Parent folder id, "0" for top-level folders.
    pub parent_id: String,
    /// Human-readable name.
    pub display_name: String,
    /// One of the [`folder_type`] codes.
    pub folder_type: u8,
}

/// A parsed FolderSync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSyncRequest {
    /// Client's folder-hierarchy sync key.
    pub sync_key: String,
}

impl FolderSyncRequest {
    /// Maps a decoded `<FolderSync>` tree onto a typed request.
    pub fn from_element(root: &Element) -> ProtocolResult<Self> {
        if root.tag != "FolderSync" || root.page != pages::FOLDER_HIERARCHY {
            return Err(ProtocolError::UnexpectedRoot {
                expected: "FolderSync",
                found: root.tag.to_string(),
            });
        }
        let sync_key = root
            .child_value("SyncKey")
            .ok_or(ProtocolError::MissingElement { element: "SyncKey" })?
            .to_string();
        Ok(Self { sync_key })
    }
}

/// A FolderSync response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSyncResponse {
    /// Command status.
    pub status: Status,
    /// Fresh folder-hierarchy sync key.
    pub sync_key: String,
    /// Folders added since the client's key (the full list on bootstrap).
    pub added: Vec<Folder>,
}

impl FolderSyncResponse {
    /// Builds the `<FolderSync>` response tree.
    pub fn to_element(&self) -> Element {
        let mut children = vec![
            Element::text(pages::FOLDER_HIERARCHY, "Status", self.status.as_wire()),
            Element::text(pages::FOLDER_HIERARCHY, "SyncKey", self.sync_key.clone()),
        ];

        let mut changes = vec![Element::text(
            pages::FOLDER_HIERARCHY,
            "Count",
            self.added.len().to_string(),
        )];
        for folder in &self.added {
            changes.push(Element::container(
                pages::FOLDER_HIERARCHY,
                "Add",
                vec![
                    Element::text(pages::FOLDER_HIERARCHY, "ServerId", folder.server_id.clone()),
                    Element::text(pages::FOLDER_HIERARCHY, "ParentId", folder.parent_id.clone()),
                    Element::text(
                        pages::FOLDER_HIERARCHY,
                        "DisplayName",
                        folder.display_name.clone(),
                    ),
                    Element::text(
                        pages::FOLDER_HIERARCHY,
                        "Type",
                        folder.folder_type.to_string(),
                    ),
                ],
            ));
        }
        children.push(Element::container(
            pages::FOLDER_HIERARCHY,
            "Changes",
            changes,
        ));

        Element::container(pages::FOLDER_HIERARCHY, "FolderSync", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request() {
        let tree = Element::container(
            pages::FOLDER_HIERARCHY,
            "FolderSync",
            vec![Element::text(pages::FOLDER_HIERARCHY, "SyncKey", "0")],
        );
        let request = FolderSyncRequest::from_element(&tree).unwrap();
        assert_eq!(request.sync_key, "0");
    }

    #[test]
    fn missing_sync_key_rejected() {
        let tree = Element::container(pages::FOLDER_HIERARCHY, "FolderSync", vec![]);
        assert!(matches!(
            FolderSyncRequest::from_element(&tree),
            Err(ProtocolError::MissingElement { element: "SyncKey" })
        ));
    }

    #[test]
    fn response_lists_folders() {
        let response = FolderSyncResponse {
            status: Status::Ok,
            sync_key: "1".into(),
            added: vec![Folder {
                server_id: "inbox".into(),
                parent_id: "0".into(),
                display_name: "Inbox".into(),
                folder_type: folder_type::INBOX,
            }],
        };
        let tree = response.to_element();
        assert_eq!(tree.child_value("Status"), Some("1"));
        let changes = tree.child("Changes").unwrap();
        assert_eq!(changes.child_value("Count"), Some("1"));
        let add = changes.child("Add").unwrap();
        assert_eq!(add.child_value("DisplayName"), Some("Inbox"));
        assert_eq!(add.child_value("Type"), Some("2"));
    }
}
