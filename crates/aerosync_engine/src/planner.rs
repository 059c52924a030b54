//! Batch/window planning.

use crate::error::EngineResult;
use aerosync_protocol::ItemOperation;
use aerosync_wbxml::encode;

/// Encoded documents carry a 4-byte preamble that a subtree spliced
/// into a larger response does not pay again.
const PREAMBLE_LEN: usize = 4;

/// One candidate operation with its change-sequence position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    /// The change sequence this operation drains.
    pub sequence: u64,
    /// The serializable operation.
    pub operation: ItemOperation,
}

/// The planner's verdict for one response batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBatch {
    /// Selected operations, in the input's stable order.
    pub selected: Vec<PendingOperation>,
    /// True if any candidate remained unselected.
    pub has_more: bool,
    /// True if the batch was force-filled with a single oversized item.
    /// The loop detector accounts a forced batch as zero natural
    /// progress, since it means the byte budget bound nothing.
    pub forced: bool,
}

/// Selects how many pending operations fit one response.
///
/// Pure and non-blocking: iterates candidates in stable order, stops
/// before exceeding either the window count or the byte budget.
#[derive(Debug, Clone, Copy)]
pub struct WindowPlanner;

impl WindowPlanner {
    /// Plans a batch from the available operations.
    ///
    /// If even the first candidate exceeds the byte budget on its own,
    /// exactly one item is included anyway so that an available batch is
    /// never empty and the session always makes forward progress.
    pub fn plan(
        available: Vec<PendingOperation>,
        window_size: u32,
        byte_budget: usize,
    ) -> EngineResult<PlannedBatch> {
        let window = window_size.max(1) as usize;
        let total = available.len();
        let mut selected = Vec::new();
        let mut used_bytes = 0usize;
        let mut forced = false;

        for pending in available {
            if selected.len() >= window {
                break;
            }
            let size = Self::estimated_size(&pending.operation)?;
            if used_bytes + size > byte_budget {
                if selected.is_empty() {
                    // Oversized first item: include it alone rather than
                    // stalling the session.
                    selected.push(pending);
                    forced = true;
                }
                break;
            }
            used_bytes += size;
            selected.push(pending);
        }

        let has_more = selected.len() < total;
        Ok(PlannedBatch {
            selected,
            has_more,
            forced,
        })
    }

    /// Projected serialized size of one operation subtree.
    pub fn estimated_size(operation: &ItemOperation) -> EngineResult<usize> {
        let bytes = encode(&operation.to_element())?;
        Ok(bytes.len() - PREAMBLE_LEN)
    }
}
