//! Sync command: request parsing and response building.

use crate::error::{ProtocolError, ProtocolResult};
use crate::status::Status;
use aerosync_wbxml::{pages, Element};

/// Largest window size a client may request; larger values are clamped.
pub const MAX_WINDOW_SIZE: u32 = 512;

/// Body representation requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Plain text body.
    PlainText,
    /// HTML body.
    Html,
    /// Full MIME message.
    Mime,
}

impl BodyType {
    /// Parses the wire value of an AirSyncBase `Type` element.
    pub fn parse(value: &str) -> ProtocolResult<Self> {
        match value {
            "1" => Ok(BodyType::PlainText),
            "2" => Ok(BodyType::Html),
            "4" => Ok(BodyType::Mime),
            other => Err(ProtocolError::InvalidValue {
                element: "Type",
                value: other.to_string(),
            }),
        }
    }

    /// Wire representation.
    pub fn as_wire(self) -> &'static str {
        match self {
            BodyType::PlainText => "1",
            BodyType::Html => "2",
            BodyType::Mime => "4",
        }
    }
}

/// Per-collection body preference options.
///
/// `body_type == None` means the client asked for a metadata-only sync;
/// the projector then emits a preview instead of body data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyOptions {
    /// Preferred body representation, if any body content is wanted.
    pub body_type: Option<BodyType>,
    /// Maximum body bytes per item; `None` means untruncated.
    pub truncation_size: Option<usize>,
    /// Whether the client supports MIME payloads.
    pub mime_support: bool,
}

impl BodyOptions {
    /// Returns true if the client asked for any body content.
    pub fn wants_body(&self) -> bool {
        self.body_type.is_some()
    }
}

/// One collection entry in a Sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    /// Collection (folder) identifier.
    pub collection_id: String,
    /// Client's progression token for this collection.
    pub sync_key: String,
    /// Whether the client wants server-side changes in the response.
    pub get_changes: bool,
    /// Requested window size, clamped to [`MAX_WINDOW_SIZE`].
    pub window_size: Option<u32>,
    /// Body preference options.
    pub options: BodyOptions,
}

/// A parsed Sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// The collections the client wants to synchronize.
    pub collections: Vec<CollectionRequest>,
}

impl SyncRequest {
    /// Maps a decoded `<Sync>` tree onto a typed request.
    pub fn from_element(root: &Element) -> ProtocolResult<Self> {
        if root.tag != "Sync" || root.page != pages::AIRSYNC {
            return Err(ProtocolError::UnexpectedRoot {
                expected: "Sync",
                found: root.tag.to_string(),
            });
        }
        let collections = root
            .child("Collections")
            .ok_or(ProtocolError::MissingElement {
                element: "Collections",
            })?;

        let mut parsed = Vec::new();
        for collection in collections.children_named("Collection") {
            parsed.push(Self::parse_collection(collection)?);
        }
        if parsed.is_empty() {
            return Err(ProtocolError::MissingElement {
                element: "Collection",
            });
        }
        Ok(Self { collections: parsed })
    }

    fn parse_collection(collection: &Element) -> ProtocolResult<CollectionRequest> {
        let sync_key = collection
            .child_value("SyncKey")
            .ok_or(ProtocolError::MissingElement { element: "SyncKey" })?
            .to_string();
        let collection_id = collection
            .child_value("CollectionId")
            .ok_or(ProtocolError::MissingElement {
                element: "CollectionId",
            })?
            .to_string();

        // An empty <GetChanges/> marker means true, as does "1".
        let get_changes = match collection.child("GetChanges") {
            Some(el) => el.value().map_or(true, |v| v != "0"),
            None => false,
        };

        let window_size = match collection.child_value("WindowSize") {
            Some(text) => {
                let value: u32 = text.parse().map_err(|_| ProtocolError::InvalidValue {
                    element: "WindowSize",
                    value: text.to_string(),
                })?;
                if value == 0 {
                    return Err(ProtocolError::InvalidValue {
                        element: "WindowSize",
                        value: text.to_string(),
                    });
                }
                Some(value.min(MAX_WINDOW_SIZE))
            }
            None => None,
        };

        let options = match collection.child("Options") {
            Some(el) => Self::parse_options(el)?,
            None => BodyOptions::default(),
        };

        Ok(CollectionRequest {
            collection_id,
            sync_key,
            get_changes,
            window_size,
            options,
        })
    }

    fn parse_options(options: &Element) -> ProtocolResult<BodyOptions> {
        let mut parsed = BodyOptions::default();

        if let Some(pref) = options.child("BodyPreference") {
            if let Some(type_text) = pref.child_value("Type") {
                parsed.body_type = Some(BodyType::parse(type_text)?);
            }
            if let Some(size_text) = pref.child_value("TruncationSize") {
                let size: usize = size_text.parse().map_err(|_| ProtocolError::InvalidValue {
                    element: "TruncationSize",
                    value: size_text.to_string(),
                })?;
                parsed.truncation_size = Some(size);
            }
        }
        if let Some(mime) = options.child_value("MIMESupport") {
            parsed.mime_support = mime != "0";
        }
        Ok(parsed)
    }
}

/// Body data included with a projected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPayload {
    /// Representation of `data`.
    pub body_type: BodyType,
    /// Body content, possibly truncated.
    pub data: String,
    /// Whether `data` was clipped to the truncation size.
    pub truncated: bool,
    /// Size of the untruncated body in bytes, so the client can fetch
    /// the remainder later.
    pub estimated_size: usize,
}

/// Projected view of a stored item, ready for serialization.
///
/// Invariant: `preview` is only set when `body` is absent; body data and
/// preview are mutually exclusive on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    /// Server-assigned item reference.
    pub server_id: String,
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: String,
    /// Receipt timestamp, already formatted for the wire.
    pub date_received: String,
    /// Read flag.
    pub read: bool,
    /// Importance (0 low, 1 normal, 2 high).
    pub importance: u8,
    /// Message class.
    pub message_class: String,
    /// Body payload, when body content was requested.
    pub body: Option<BodyPayload>,
    /// Short plain-text preview, when no body content was requested.
    pub preview: Option<String>,
}

impl ItemFields {
    /// Builds the `<ApplicationData>` subtree for this item.
    pub fn application_data(&self) -> Element {
        let mut children = vec![
            Element::text(pages::EMAIL, "Subject", self.subject.clone()),
            Element::text(pages::EMAIL, "From", self.from.clone()),
            Element::text(pages::EMAIL, "To", self.to.clone()),
            Element::text(pages::EMAIL, "DateReceived", self.date_received.clone()),
            Element::text(pages::EMAIL, "Read", if self.read { "1" } else { "0" }),
            Element::text(pages::EMAIL, "Importance", self.importance.to_string()),
            Element::text(pages::EMAIL, "MessageClass", self.message_class.clone()),
        ];

        if let Some(body) = &self.body {
            children.push(Element::container(
                pages::AIRSYNC_BASE,
                "Body",
                vec![
                    Element::text(pages::AIRSYNC_BASE, "Type", body.body_type.as_wire()),
                    Element::text(
                        pages::AIRSYNC_BASE,
                        "EstimatedDataSize",
                        body.estimated_size.to_string(),
                    ),
                    Element::text(
                        pages::AIRSYNC_BASE,
                        "Truncated",
                        if body.truncated { "1" } else { "0" },
                    ),
                    Element::text(pages::AIRSYNC_BASE, "Data", body.data.clone()),
                ],
            ));
        } else if let Some(preview) = &self.preview {
            children.push(Element::text(
                pages::AIRSYNC_BASE,
                "Preview",
                preview.clone(),
            ));
        }

        Element::container(pages::AIRSYNC, "ApplicationData", children)
    }
}

/// One item operation inside a change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOperation {
    /// A new item the client has not seen.
    Add {
        /// Projected item fields, including the server id.
        fields: ItemFields,
    },
    /// An item the client already has, with updated fields.
    Change {
        /// Projected item fields, including the server id.
        fields: ItemFields,
    },
    /// An item removed from the collection.
    Delete {
        /// Server id of the removed item.
        server_id: String,
    },
}

impl ItemOperation {
    /// The server id this operation refers to.
    pub fn server_id(&self) -> &str {
        match self {
            ItemOperation::Add { fields } | ItemOperation::Change { fields } => &fields.server_id,
            ItemOperation::Delete { server_id } => server_id,
        }
    }

    /// Builds the `<Add>`/`<Change>`/`<Delete>` subtree.
    pub fn to_element(&self) -> Element {
        match self {
            ItemOperation::Add { fields } => Element::container(
                pages::AIRSYNC,
                "Add",
                vec![
                    Element::text(pages::AIRSYNC, "ServerId", fields.server_id.clone()),
                    fields.application_data(),
                ],
            ),
            ItemOperation::Change { fields } => Element::container(
                pages::AIRSYNC,
                "Change",
                vec![
                    Element::text(pages::AIRSYNC, "ServerId", fields.server_id.clone()),
                    fields.application_data(),
                ],
            ),
            ItemOperation::Delete { server_id } => Element::container(
                pages::AIRSYNC,
                "Delete",
                vec![Element::text(pages::AIRSYNC, "ServerId", server_id.clone())],
            ),
        }
    }
}

/// An ordered batch of item operations with a continuation flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Operations in stable (oldest-pending-change first) order.
    pub operations: Vec<ItemOperation>,
    /// True when changed items remain beyond this batch.
    pub has_more: bool,
}

impl ChangeBatch {
    /// An empty batch with nothing pending.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of operations in the batch.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True if the batch contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Per-collection part of a Sync response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionResponse {
    /// Collection identifier echoed from the request.
    pub collection_id: String,
    /// The fresh progression token issued with this response.
    pub sync_key: String,
    /// Per-collection status; authoritative for the exchange.
    pub status: Status,
    /// The change batch, empty on errors.
    pub batch: ChangeBatch,
}

impl CollectionResponse {
    /// Builds this collection's `<Collection>` subtree.
    ///
    /// The subtree is what the coordinator serializes and caches for
    /// byte-identical replay, independent of sibling collections.
    pub fn to_element(&self) -> Element {
        let mut children = vec![
            Element::text(pages::AIRSYNC, "SyncKey", self.sync_key.clone()),
            Element::text(pages::AIRSYNC, "CollectionId", self.collection_id.clone()),
            Element::text(pages::AIRSYNC, "Status", self.status.as_wire()),
        ];
        if self.batch.has_more {
            children.push(Element::empty(pages::AIRSYNC, "MoreAvailable"));
        }
        if !self.batch.is_empty() {
            children.push(Element::container(
                pages::AIRSYNC,
                "Commands",
                self.batch
                    .operations
                    .iter()
                    .map(ItemOperation::to_element)
                    .collect(),
            ));
        }
        Element::container(pages::AIRSYNC, "Collection", children)
    }
}

/// A complete Sync response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResponse {
    /// One entry per requested collection.
    pub collections: Vec<CollectionResponse>,
}

impl SyncResponse {
    /// Builds the `<Sync>` response tree.
    ///
    /// Only the per-collection `<Status>`/`<SyncKey>` pair is emitted;
    /// there is no top-level status element.
    pub fn to_element(&self) -> Element {
        Self::envelope(self.collections.iter().map(CollectionResponse::to_element).collect())
    }

    /// Wraps prebuilt `<Collection>` subtrees in the `<Sync>` envelope.
    pub fn envelope(collections: Vec<Element>) -> Element {
        Element::container(
            pages::AIRSYNC,
            "Sync",
            vec![Element::container(pages::AIRSYNC, "Collections", collections)],
        )
    }
}
