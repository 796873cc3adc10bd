//! The typed, immutable dump model.
//!
//! Every entity is built once by its parser and never mutated after it
//! is attached to its parent. A field whose key never appears in the
//! document keeps its `Default` value; the parsers validate the
//! *absence of unknown* keys, not completeness.

use std::collections::BTreeMap;

use crate::handle::Handle;

/// Root of a parsed dump document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DumpFile {
    /// Format version string, captured verbatim.
    pub version: String,
    /// Wall-clock time the instrumented run started.
    pub start_time: String,
    /// Elapsed time between start and the snapshot.
    pub time_since_start: String,
    /// Free-form layer settings, unique keys.
    pub settings: BTreeMap<String, String>,
    /// The single instance report.
    pub instance: Instance,
    /// Device reports in document order.
    pub devices: Vec<Device>,
}

/// The API instance and its application info.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instance {
    pub handle: Handle,
    pub application: String,
    pub application_version: u32,
    pub engine: String,
    pub engine_version: u32,
    /// API version as printed by the layer, a custom text format.
    pub api_version: String,
    /// Enabled instance extension names, in document order.
    pub extensions: Vec<String>,
}

/// One logical device report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Device {
    pub handle: Handle,
    pub device_name: String,
    /// Custom-formatted text, not numeric.
    pub api_version: String,
    /// Custom-formatted text, not numeric.
    pub driver_version: String,
    pub vendor_id: u32,
    pub device_id: u32,
    pub queues: Vec<Queue>,
    /// Command buffers still in flight at the snapshot.
    ///
    /// Mutually exclusive with [`Device::all_command_buffers`]: a report
    /// carries one list or the other, never both.
    pub incomplete_command_buffers: Vec<CommandBuffer>,
    /// Every command buffer, for full-snapshot reports.
    pub all_command_buffers: Vec<CommandBuffer>,
    /// Enabled device extension names, in document order.
    pub extensions: Vec<String>,
}

/// A device queue and the submissions still pending on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Queue {
    pub handle: Handle,
    pub queue_family_index: u32,
    pub index: u32,
    pub incomplete_submits: Vec<Submit>,
}

/// One queue-submission event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Submit {
    pub id: u32,
    pub submit_infos: Vec<SubmitInfo>,
}

/// One batch within a submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitInfo {
    pub id: u64,
    pub state: String,
    /// Names of the command buffers executed by this batch.
    pub command_buffers: Vec<String>,
    pub signal_semaphores: Vec<SemaphoreInfo>,
    pub wait_semaphores: Vec<SemaphoreInfo>,
}

/// A semaphore observed by a submission batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SemaphoreInfo {
    pub handle: Handle,
    /// Semaphore type name (`type` in the document).
    pub kind: String,
    pub value: u64,
    pub last_value: u64,
}

/// A recorded command buffer and its execution progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandBuffer {
    pub state: String,
    pub handle: Handle,
    pub command_pool: Handle,
    pub queue: Handle,
    pub fence: Handle,
    pub submit_info_id: u64,
    pub level: String,
    pub simultaneous_use: bool,
    pub begin_value: u32,
    pub end_value: u32,
    pub top_checkpoint_value: u32,
    pub bottom_checkpoint_value: u32,
    pub last_started_command: u32,
    pub last_completed_command: u32,
    /// Recorded commands in execution order.
    pub commands: Vec<Command>,
}

/// One recorded command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    pub id: u32,
    pub checkpoint_value: u32,
    pub name: String,
    pub state: String,
    pub message: String,
}
