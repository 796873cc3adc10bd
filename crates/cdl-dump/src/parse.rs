//! Strict, closed-world entity parsers.
//!
//! Each parser walks its mapping's entries exactly once and routes
//! every key through a closed `match`; the default arm turns any key
//! outside the entity's recognized set into
//! [`ParseError::UnknownField`], so the parser doubles as a schema
//! conformance check for the document format.
//!
//! Handler failures propagate immediately; there is no recovery and no
//! partial model. A recognized key that repeats overwrites the earlier
//! value — except in `settings`, which rejects duplicates outright.
//! Fields whose keys never appear keep their `Default` values.

use std::collections::BTreeMap;

use cdl_tree::{Entry, Value};

use crate::error::ParseError;
use crate::handle::Handle;
use crate::model::{
    Command, CommandBuffer, Device, DumpFile, Instance, Queue, SemaphoreInfo, Submit, SubmitInfo,
};
use crate::scalar;

/// Parse a loaded document root into a [`DumpFile`].
///
/// The root must be a mapping. Recognized top-level keys are `version`,
/// `startTime`, `timeSinceStart`, `settings`, `SystemInfo` (accepted,
/// not decoded), `Instance`, and `Device`; each `Device` occurrence
/// appends one device report.
pub fn parse_dump(root: &Value) -> Result<DumpFile, ParseError> {
    tracing::debug!("parsing dump document");
    let mapping = scalar::as_mapping("File", root)?;
    let mut file = DumpFile::default();
    for entry in mapping {
        let key = entry_key("File", entry)?;
        let value = &entry.value;
        match key {
            "version" => file.version = scalar::as_string(value)?,
            "startTime" => file.start_time = scalar::as_string(value)?,
            "timeSinceStart" => file.time_since_start = scalar::as_string(value)?,
            "settings" => file.settings = parse_settings(value)?,
            // System info decoding is not implemented; the subtree is
            // accepted and ignored.
            "SystemInfo" => {}
            "Instance" => file.instance = parse_instance(value)?,
            "Device" => file.devices.push(parse_device(value)?),
            _ => return Err(unknown("File", key)),
        }
    }
    tracing::debug!(devices = file.devices.len(), "parsed dump document");
    Ok(file)
}

/// Parse the free-form settings map. Keys must be unique.
fn parse_settings(node: &Value) -> Result<BTreeMap<String, String>, ParseError> {
    let mapping = scalar::as_mapping("settings", node)?;
    let mut settings = BTreeMap::new();
    for entry in mapping {
        let key = entry_key("settings", entry)?;
        let value = scalar::as_string(&entry.value)?;
        if settings.insert(key.to_owned(), value).is_some() {
            return Err(ParseError::DuplicateSetting {
                key: key.to_owned(),
            });
        }
    }
    Ok(settings)
}

fn parse_instance(node: &Value) -> Result<Instance, ParseError> {
    let mapping = scalar::as_mapping("Instance", node)?;
    let mut instance = Instance::default();
    for entry in mapping {
        let key = entry_key("Instance", entry)?;
        let value = &entry.value;
        match key {
            "handle" => instance.handle = parse_handle(value)?,
            "applicationInfo" => parse_app_info(&mut instance, value)?,
            "extensions" => instance.extensions = parse_names("Instance", value)?,
            _ => return Err(unknown("Instance", key)),
        }
    }
    Ok(instance)
}

fn parse_app_info(instance: &mut Instance, node: &Value) -> Result<(), ParseError> {
    let mapping = scalar::as_mapping("applicationInfo", node)?;
    for entry in mapping {
        let key = entry_key("applicationInfo", entry)?;
        let value = &entry.value;
        match key {
            "application" => instance.application = scalar::as_string(value)?,
            "applicationVersion" => instance.application_version = scalar::as_u32(value)?,
            "engine" => instance.engine = scalar::as_string(value)?,
            "engineVersion" => instance.engine_version = scalar::as_u32(value)?,
            // Printed by the layer in a custom format; kept as text.
            "apiVersion" => instance.api_version = scalar::as_string(value)?,
            _ => return Err(unknown("applicationInfo", key)),
        }
    }
    Ok(())
}

fn parse_device(node: &Value) -> Result<Device, ParseError> {
    let mapping = scalar::as_mapping("Device", node)?;
    let mut device = Device::default();
    for entry in mapping {
        let key = entry_key("Device", entry)?;
        let value = &entry.value;
        match key {
            "handle" => device.handle = parse_handle(value)?,
            "deviceName" => device.device_name = scalar::as_string(value)?,
            // apiVersion and driverVersion are printed by the layer in
            // a custom format; kept as text.
            "apiVersion" => device.api_version = scalar::as_string(value)?,
            "driverVersion" => device.driver_version = scalar::as_string(value)?,
            "vendorID" => device.vendor_id = scalar::as_u32(value)?,
            "deviceID" => device.device_id = scalar::as_u32(value)?,
            "Queues" => device.queues = parse_sequence("Device", value, parse_queue)?,
            "IncompleteCommandBuffers" => {
                device.incomplete_command_buffers =
                    parse_sequence("Device", value, parse_command_buffer)?;
            }
            "AllCommandBuffers" => {
                device.all_command_buffers =
                    parse_sequence("Device", value, parse_command_buffer)?;
            }
            "extensions" => device.extensions = parse_names("Device", value)?,
            _ => return Err(unknown("Device", key)),
        }
    }
    // Checked once, after full field population: a device report is a
    // full snapshot or an incomplete-only snapshot, never both.
    if !device.all_command_buffers.is_empty() && !device.incomplete_command_buffers.is_empty() {
        return Err(ParseError::ConflictingCommandBufferLists {
            device: device.handle,
        });
    }
    tracing::trace!(
        device = %device.handle,
        queues = device.queues.len(),
        "parsed device report"
    );
    Ok(device)
}

fn parse_queue(node: &Value) -> Result<Queue, ParseError> {
    let mapping = scalar::as_mapping("Queue", node)?;
    let mut queue = Queue::default();
    for entry in mapping {
        let key = entry_key("Queue", entry)?;
        let value = &entry.value;
        match key {
            "handle" => queue.handle = parse_handle(value)?,
            "queueFamilyIndex" => queue.queue_family_index = scalar::as_u32(value)?,
            "index" => queue.index = scalar::as_u32(value)?,
            // Queue flag decoding is not implemented; accepted, ignored.
            "flags" => {}
            "IncompleteSubmits" => {
                queue.incomplete_submits = parse_sequence("Queue", value, parse_submit)?;
            }
            _ => return Err(unknown("Queue", key)),
        }
    }
    Ok(queue)
}

fn parse_submit(node: &Value) -> Result<Submit, ParseError> {
    let mapping = scalar::as_mapping("Submit", node)?;
    let mut submit = Submit::default();
    for entry in mapping {
        let key = entry_key("Submit", entry)?;
        let value = &entry.value;
        match key {
            "id" => submit.id = scalar::as_u32(value)?,
            "SubmitInfos" => {
                submit.submit_infos = parse_sequence("Submit", value, parse_submit_info)?;
            }
            _ => return Err(unknown("Submit", key)),
        }
    }
    Ok(submit)
}

fn parse_submit_info(node: &Value) -> Result<SubmitInfo, ParseError> {
    let mapping = scalar::as_mapping("SubmitInfo", node)?;
    let mut info = SubmitInfo::default();
    for entry in mapping {
        let key = entry_key("SubmitInfo", entry)?;
        let value = &entry.value;
        match key {
            "id" => info.id = scalar::as_u64(value)?,
            "state" => info.state = scalar::as_string(value)?,
            "CommandBuffers" => info.command_buffers = parse_names("SubmitInfo", value)?,
            "SignalSemaphores" => {
                info.signal_semaphores =
                    parse_sequence("SubmitInfo", value, parse_semaphore_info)?;
            }
            "WaitSemaphores" => {
                info.wait_semaphores = parse_sequence("SubmitInfo", value, parse_semaphore_info)?;
            }
            _ => return Err(unknown("SubmitInfo", key)),
        }
    }
    Ok(info)
}

fn parse_semaphore_info(node: &Value) -> Result<SemaphoreInfo, ParseError> {
    let mapping = scalar::as_mapping("SemaphoreInfo", node)?;
    let mut info = SemaphoreInfo::default();
    for entry in mapping {
        let key = entry_key("SemaphoreInfo", entry)?;
        let value = &entry.value;
        match key {
            "handle" => info.handle = parse_handle(value)?,
            "type" => info.kind = scalar::as_string(value)?,
            "value" => info.value = scalar::as_u64(value)?,
            "lastValue" => info.last_value = scalar::as_u64(value)?,
            _ => return Err(unknown("SemaphoreInfo", key)),
        }
    }
    Ok(info)
}

fn parse_command_buffer(node: &Value) -> Result<CommandBuffer, ParseError> {
    let mapping = scalar::as_mapping("CommandBuffer", node)?;
    let mut cb = CommandBuffer::default();
    for entry in mapping {
        let key = entry_key("CommandBuffer", entry)?;
        let value = &entry.value;
        match key {
            "state" => cb.state = scalar::as_string(value)?,
            "handle" => cb.handle = parse_handle(value)?,
            "commandPool" => cb.command_pool = parse_handle(value)?,
            "queue" => cb.queue = parse_handle(value)?,
            "fence" => cb.fence = parse_handle(value)?,
            "submitInfoId" => cb.submit_info_id = scalar::as_u64(value)?,
            "level" => cb.level = scalar::as_string(value)?,
            "simultaneousUse" => cb.simultaneous_use = scalar::as_bool(value)?,
            "beginValue" => cb.begin_value = scalar::as_u32(value)?,
            "endValue" => cb.end_value = scalar::as_u32(value)?,
            "topCheckpointValue" => cb.top_checkpoint_value = scalar::as_u32(value)?,
            "bottomCheckpointValue" => cb.bottom_checkpoint_value = scalar::as_u32(value)?,
            "lastStartedCommand" => cb.last_started_command = scalar::as_u32(value)?,
            "lastCompletedCommand" => cb.last_completed_command = scalar::as_u32(value)?,
            "Commands" => cb.commands = parse_sequence("CommandBuffer", value, parse_command)?,
            _ => return Err(unknown("CommandBuffer", key)),
        }
    }
    Ok(cb)
}

fn parse_command(node: &Value) -> Result<Command, ParseError> {
    let mapping = scalar::as_mapping("Command", node)?;
    let mut command = Command::default();
    for entry in mapping {
        let key = entry_key("Command", entry)?;
        let value = &entry.value;
        match key {
            "id" => command.id = scalar::as_u32(value)?,
            "checkpointValue" => command.checkpoint_value = scalar::as_u32(value)?,
            "name" => command.name = scalar::as_string(value)?,
            "state" => command.state = scalar::as_string(value)?,
            "message" => command.message = scalar::as_string(value)?,
            // Parameter and internal-state decoding is not implemented;
            // the subtrees are accepted and ignored.
            "parameters" => {}
            "internalState" => {}
            _ => return Err(unknown("Command", key)),
        }
    }
    Ok(command)
}

fn unknown(entity: &'static str, key: &str) -> ParseError {
    ParseError::UnknownField {
        entity,
        key: key.to_owned(),
    }
}

fn entry_key<'a>(entity: &'static str, entry: &'a Entry) -> Result<&'a str, ParseError> {
    entry.key.as_str().ok_or(ParseError::Structure {
        entity,
        expected: "scalar key",
        found: entry.key.kind(),
    })
}

fn parse_handle(value: &Value) -> Result<Handle, ParseError> {
    Handle::parse(scalar::as_str(value)?)
}

/// Parse each element of a sequence node in source order; the first
/// element failure aborts the sequence.
fn parse_sequence<T>(
    entity: &'static str,
    value: &Value,
    parse_item: impl Fn(&Value) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    scalar::as_sequence(entity, value)?
        .iter()
        .map(parse_item)
        .collect()
}

fn parse_names(entity: &'static str, value: &Value) -> Result<Vec<String>, ParseError> {
    parse_sequence(entity, value, scalar::as_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(source: &str) -> Value {
        cdl_tree::parse(source).unwrap()
    }

    #[test]
    fn test_unknown_key_rejected_per_entity() {
        assert_eq!(
            parse_dump(&node("bogus: 1")).unwrap_err(),
            unknown("File", "bogus")
        );
        assert_eq!(
            parse_instance(&node("bogus: 1")).unwrap_err(),
            unknown("Instance", "bogus")
        );
        assert_eq!(
            parse_instance(&node("applicationInfo:\n  bogus: 1")).unwrap_err(),
            unknown("applicationInfo", "bogus")
        );
        assert_eq!(
            parse_device(&node("bogus: 1")).unwrap_err(),
            unknown("Device", "bogus")
        );
        assert_eq!(
            parse_queue(&node("bogus: 1")).unwrap_err(),
            unknown("Queue", "bogus")
        );
        assert_eq!(
            parse_submit(&node("bogus: 1")).unwrap_err(),
            unknown("Submit", "bogus")
        );
        assert_eq!(
            parse_submit_info(&node("bogus: 1")).unwrap_err(),
            unknown("SubmitInfo", "bogus")
        );
        assert_eq!(
            parse_semaphore_info(&node("bogus: 1")).unwrap_err(),
            unknown("SemaphoreInfo", "bogus")
        );
        assert_eq!(
            parse_command_buffer(&node("bogus: 1")).unwrap_err(),
            unknown("CommandBuffer", "bogus")
        );
        assert_eq!(
            parse_command(&node("bogus: 1")).unwrap_err(),
            unknown("Command", "bogus")
        );
    }

    #[test]
    fn test_unexpected_queue_priority_key() {
        let source = "handle: \"0x1 [queue]\"\nqueueFamilyIndex: 0\npriority: high";
        let err = parse_queue(&node(source)).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownField {
                entity: "Queue",
                key: "priority".to_owned()
            }
        );
    }

    #[test]
    fn test_queue_flags_accepted_and_ignored() {
        let queue = parse_queue(&node("index: 2\nflags: [GRAPHICS, COMPUTE]")).unwrap();
        assert_eq!(queue.index, 2);
        assert_eq!(queue, Queue { index: 2, ..Queue::default() });
    }

    #[test]
    fn test_command_opaque_subtrees_ignored() {
        let source = "\
id: 7
name: vkCmdDraw
state: INCOMPLETE
parameters:
  - name: vertexCount
    value: 3
internalState:
  anything: goes";
        let command = parse_command(&node(source)).unwrap();
        assert_eq!(command.id, 7);
        assert_eq!(command.name, "vkCmdDraw");
        assert_eq!(command.state, "INCOMPLETE");
    }

    #[test]
    fn test_settings_unique_and_duplicate() {
        let settings = parse_settings(&node("a: \"1\"\nb: \"2\"")).unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings["a"], "1");
        assert_eq!(settings["b"], "2");

        let err = parse_settings(&node("a: \"1\"\na: \"2\"")).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateSetting {
                key: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_device_command_buffer_lists_exclusive() {
        let all_only = "\
handle: \"0xd [device]\"
AllCommandBuffers:
  - handle: \"0xc1 [cb1]\"
  - handle: \"0xc2 [cb2]\"";
        let device = parse_device(&node(all_only)).unwrap();
        assert_eq!(device.all_command_buffers.len(), 2);
        assert!(device.incomplete_command_buffers.is_empty());

        let both = "\
handle: \"0xd [device]\"
AllCommandBuffers:
  - handle: \"0xc1 [cb1]\"
IncompleteCommandBuffers:
  - handle: \"0xc2 [cb2]\"";
        let err = parse_device(&node(both)).unwrap_err();
        assert_eq!(
            err,
            ParseError::ConflictingCommandBufferLists {
                device: Handle {
                    value: 0xd,
                    name: "device".to_owned()
                }
            }
        );
    }

    #[test]
    fn test_commands_preserve_source_order() {
        let source = "\
Commands:
  - name: vkCmdBindPipeline
  - name: vkCmdDraw
  - name: vkCmdEndRenderPass";
        let cb = parse_command_buffer(&node(source)).unwrap();
        let names: Vec<_> = cb.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["vkCmdBindPipeline", "vkCmdDraw", "vkCmdEndRenderPass"]
        );
    }

    #[test]
    fn test_repeated_entity_key_overwrites() {
        // Entity mappings do not deduplicate keys; the later occurrence
        // wins. Settings are the only map with duplicate rejection.
        let command = parse_command(&node("name: first\nname: second")).unwrap();
        assert_eq!(command.name, "second");
    }

    #[test]
    fn test_missing_keys_leave_defaults() {
        let info = parse_submit_info(&node("id: 9")).unwrap();
        assert_eq!(info.id, 9);
        assert_eq!(info.state, "");
        assert!(info.command_buffers.is_empty());
        assert!(info.signal_semaphores.is_empty());
        assert!(info.wait_semaphores.is_empty());
    }

    #[test]
    fn test_semaphore_info_fields() {
        let source = "\
handle: \"0x5e [timeline]\"
type: TIMELINE
value: 12
lastValue: 11";
        let info = parse_semaphore_info(&node(source)).unwrap();
        assert_eq!(info.handle.value, 0x5e);
        assert_eq!(info.kind, "TIMELINE");
        assert_eq!(info.value, 12);
        assert_eq!(info.last_value, 11);
    }

    #[test]
    fn test_submit_info_semaphores_parsed_per_element() {
        let source = "\
id: 1
WaitSemaphores:
  - handle: \"0x1 [a]\"
    value: 1
  - handle: \"0x2 [b]\"
    value: 2";
        let info = parse_submit_info(&node(source)).unwrap();
        assert_eq!(info.wait_semaphores.len(), 2);
        assert_eq!(info.wait_semaphores[0].handle.name, "a");
        assert_eq!(info.wait_semaphores[1].handle.name, "b");
        assert_eq!(info.wait_semaphores[1].value, 2);
    }

    #[test]
    fn test_element_failure_aborts_sequence() {
        let source = "\
Queues:
  - index: 0
  - index: not-a-number";
        let err = parse_device(&node(source)).unwrap_err();
        assert_eq!(
            err,
            ParseError::ScalarCoercion {
                expected: "u32",
                literal: "not-a-number".to_owned()
            }
        );
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = parse_dump(&node("- just\n- a\n- list")).unwrap_err();
        assert_eq!(
            err,
            ParseError::Structure {
                entity: "File",
                expected: "mapping",
                found: "sequence"
            }
        );
    }

    #[test]
    fn test_bad_handle_fails_entity() {
        let err = parse_queue(&node("handle: \"0x1 queue\"")).unwrap_err();
        assert_eq!(
            err,
            ParseError::HandleFormat {
                literal: "0x1 queue".to_owned()
            }
        );
    }
}
