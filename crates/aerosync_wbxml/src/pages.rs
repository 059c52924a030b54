//! Authoritative token tables, one per code page.
//!
//! Each table maps element names to tag tokens for one namespace page.
//! The tables are consulted by both the encoder and the decoder; an
//! exhaustive round-trip test in this module keeps every pair honest.

/// Code page index for the AirSync namespace.
pub const AIRSYNC: u8 = 0;
/// Code page index for the Email namespace.
pub const EMAIL: u8 = 2;
/// Code page index for the FolderHierarchy namespace.
pub const FOLDER_HIERARCHY: u8 = 7;
/// Code page index for the Ping namespace.
pub const PING: u8 = 13;
/// Code page index for the AirSyncBase namespace.
pub const AIRSYNC_BASE: u8 = 17;

/// An immutable per-namespace mapping of element names to tag tokens.
///
/// Loaded once as process constants; never mutated.
#[derive(Debug)]
pub struct CodePage {
    /// Page index selected by a SWITCH_PAGE instruction.
    pub index: u8,
    /// Namespace name, for diagnostics.
    pub name: &'static str,
    tags: &'static [(u8, &'static str)],
}

impl CodePage {
    /// Returns the tag token for an element name, without the content flag.
    pub fn token(&self, tag: &str) -> Option<u8> {
        self.tags
            .iter()
            .find(|(_, name)| *name == tag)
            .map(|(token, _)| *token)
    }

    /// Returns the element name for a tag token (content flag stripped).
    pub fn tag(&self, token: u8) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, name)| *name)
    }

    /// Iterates over every (token, name) pair in the page.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &'static str)> + '_ {
        self.tags.iter().copied()
    }
}

/// The AirSync page: collection sync structure.
pub static AIRSYNC_PAGE: CodePage = CodePage {
    index: AIRSYNC,
    name: "AirSync",
    tags: &[
        (0x05, "Sync"),
        (0x06, "Responses"),
        (0x07, "Add"),
        (0x08, "Change"),
        (0x09, "Delete"),
        (0x0A, "Fetch"),
        (0x0B, "SyncKey"),
        (0x0C, "ClientId"),
        (0x0D, "ServerId"),
        (0x0E, "Status"),
        (0x0F, "Collection"),
        (0x10, "Class"),
        (0x12, "CollectionId"),
        (0x13, "GetChanges"),
        (0x14, "MoreAvailable"),
        (0x15, "WindowSize"),
        (0x16, "Commands"),
        (0x17, "Options"),
        (0x18, "FilterType"),
        (0x1B, "Conflict"),
        (0x1C, "Collections"),
        (0x1D, "ApplicationData"),
        (0x1E, "DeletesAsMoves"),
        (0x20, "Supported"),
        (0x21, "SoftDelete"),
        (0x22, "MIMESupport"),
        (0x23, "MIMETruncation"),
        (0x24, "Wait"),
        (0x25, "Limit"),
        (0x26, "Partial"),
        (0x27, "ConversationMode"),
        (0x28, "MaxItems"),
        (0x29, "HeartbeatInterval"),
    ],
};

/// The Email page: message field payloads.
pub static EMAIL_PAGE: CodePage = CodePage {
    index: EMAIL,
    name: "Email",
    tags: &[
        (0x0C, "Body"),
        (0x0D, "BodySize"),
        (0x0E, "BodyTruncated"),
        (0x0F, "DateReceived"),
        (0x11, "DisplayTo"),
        (0x12, "Importance"),
        (0x13, "MessageClass"),
        (0x14, "Subject"),
        (0x15, "Read"),
        (0x16, "To"),
        (0x17, "Cc"),
        (0x18, "From"),
        (0x19, "ReplyTo"),
        (0x39, "ThreadTopic"),
        (0x3A, "MIMEData"),
        (0x3B, "MIMETruncated"),
        (0x3C, "MIMESize"),
        (0x3D, "InternetCPID"),
    ],
};

/// The FolderHierarchy page: folder listing and hierarchy sync.
pub static FOLDER_HIERARCHY_PAGE: CodePage = CodePage {
    index: FOLDER_HIERARCHY,
    name: "FolderHierarchy",
    tags: &[
        (0x07, "DisplayName"),
        (0x08, "ServerId"),
        (0x09, "ParentId"),
        (0x0A, "Type"),
        (0x0C, "Status"),
        (0x0E, "Changes"),
        (0x0F, "Add"),
        (0x10, "Delete"),
        (0x11, "Update"),
        (0x12, "SyncKey"),
        (0x13, "FolderCreate"),
        (0x14, "FolderDelete"),
        (0x15, "FolderUpdate"),
        (0x16, "FolderSync"),
        (0x17, "Count"),
    ],
};

/// The Ping page: long-poll change notification.
pub static PING_PAGE: CodePage = CodePage {
    index: PING,
    name: "Ping",
    tags: &[
        (0x05, "Ping"),
        (0x06, "AutdState"),
        (0x07, "Status"),
        (0x08, "HeartbeatInterval"),
        (0x09, "Folders"),
        (0x0A, "Folder"),
        (0x0B, "Id"),
        (0x0C, "Class"),
        (0x0D, "MaxFolders"),
    ],
};

/// The AirSyncBase page: body preferences and body payloads.
pub static AIRSYNC_BASE_PAGE: CodePage = CodePage {
    index: AIRSYNC_BASE,
    name: "AirSyncBase",
    tags: &[
        (0x05, "BodyPreference"),
        (0x06, "Type"),
        (0x07, "TruncationSize"),
        (0x08, "AllOrNone"),
        (0x0A, "Body"),
        (0x0B, "Data"),
        (0x0C, "EstimatedDataSize"),
        (0x0D, "Truncated"),
        (0x0E, "Attachments"),
        (0x0F, "Attachment"),
        (0x10, "DisplayName"),
        (0x14, "NativeBodyType"),
        (0x15, "ContentType"),
        (0x16, "Preview"),
    ],
};

/// Every code page this implementation carries.
pub static PAGES: &[&CodePage] = &[
    &AIRSYNC_PAGE,
    &EMAIL_PAGE,
    &FOLDER_HIERARCHY_PAGE,
    &PING_PAGE,
    &AIRSYNC_BASE_PAGE,
];

/// Looks up a code page by its index.
pub fn by_index(index: u8) -> Option<&'static CodePage> {
    PAGES.iter().find(|p| p.index == index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lookup_by_index() {
        assert_eq!(by_index(AIRSYNC).unwrap().name, "AirSync");
        assert_eq!(by_index(EMAIL).unwrap().name, "Email");
        assert_eq!(by_index(AIRSYNC_BASE).unwrap().name, "AirSyncBase");
        assert!(by_index(99).is_none());
    }

    #[test]
    fn token_and_tag_are_inverse() {
        for page in PAGES {
            for (token, name) in page.entries() {
                assert_eq!(page.token(name), Some(token), "{}::{}", page.name, name);
                assert_eq!(page.tag(token), Some(name), "{}::{:#x}", page.name, token);
            }
        }
    }

    #[test]
    fn no_duplicate_tokens_or_names_within_a_page() {
        for page in PAGES {
            let entries: Vec<_> = page.entries().collect();
            for (i, (token, name)) in entries.iter().enumerate() {
                for (other_token, other_name) in &entries[i + 1..] {
                    assert_ne!(token, other_token, "{}: duplicate token", page.name);
                    assert_ne!(name, other_name, "{}: duplicate name", page.name);
                }
            }
        }
    }

    #[test]
    fn tokens_avoid_control_range() {
        // 0x00-0x04 are control tokens (SWITCH_PAGE, END, ENTITY, STR_I,
        // LITERAL) and may never appear as tag tokens.
        for page in PAGES {
            for (token, _) in page.entries() {
                assert!(token >= 0x05, "{}: token {:#x} in control range", page.name, token);
                assert!(token < 0x40, "{}: token {:#x} collides with content flag", page.name, token);
            }
        }
    }

    #[test]
    fn well_known_airsync_tokens() {
        assert_eq!(AIRSYNC_PAGE.token("Sync"), Some(0x05));
        assert_eq!(AIRSYNC_PAGE.token("SyncKey"), Some(0x0B));
        assert_eq!(AIRSYNC_PAGE.token("Collections"), Some(0x1C));
        assert_eq!(AIRSYNC_PAGE.token("MoreAvailable"), Some(0x14));
    }
}
