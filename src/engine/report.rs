//! JSON report shapes emitted by `lvm fullreport` and `lvs`, and their
//! normalisation into the inventory model.
//!
//! LVM encodes every number as a decimal string, so sizes are parsed here
//! rather than by serde.

use camino::Utf8PathBuf;
use serde::Deserialize;

use super::error::{EngineBug, EngineError};
use crate::inventory::{GroupInventory, Inventory, LogicalVolume, VolumeGroup, VolumeKind};

pub(super) const FULLREPORT: &str = "fullreport";
pub(super) const LVS: &str = "lvs";

#[derive(Debug, Deserialize)]
struct Report<T> {
    report: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FullReportEntry {
    #[serde(default)]
    vg: Vec<RawGroup>,
    #[serde(default)]
    lv: Vec<RawVolume>,
}

#[derive(Debug, Deserialize)]
struct ProbeEntry {
    #[serde(default)]
    lv: Vec<RawVolume>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    vg_name: String,
    #[serde(default)]
    vg_uuid: String,
    vg_size: String,
    vg_free: String,
}

#[derive(Debug, Deserialize)]
struct RawVolume {
    lv_name: String,
    #[serde(default)]
    vg_name: String,
    #[serde(default)]
    lv_path: String,
    #[serde(default)]
    lv_size: String,
    #[serde(default)]
    lv_attr: String,
    #[serde(default)]
    origin: String,
    #[serde(default)]
    pool_lv: String,
}

/// Result of probing a single volume name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Probe {
    /// No volume with that name exists in the group.
    Absent,
    /// A volume exists and has the given type.
    Present(VolumeKind),
}

pub(super) fn parse_full_report(stdout: &str) -> Result<Inventory, EngineError> {
    let parsed: Report<FullReportEntry> = decode(FULLREPORT, stdout)?;
    let mut groups = Vec::with_capacity(parsed.report.len());
    for entry in parsed.report {
        if let Some(group) = normalise_entry(entry)? {
            groups.push(group);
        }
    }
    Ok(Inventory::new(groups))
}

pub(super) fn parse_probe(target: &str, stdout: &str) -> Result<Probe, EngineError> {
    let parsed: Report<ProbeEntry> = decode(LVS, stdout)?;
    let mut entries = parsed.report.into_iter();
    let entry = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        (None, _) => return Err(missing_record(LVS, target)),
        (Some(_), Some(_)) => return Err(multiple_records(LVS, target)),
    };

    let mut volumes = entry.lv.into_iter();
    let volume = match (volumes.next(), volumes.next()) {
        (Some(volume), None) => volume,
        (None, _) => return Err(missing_record(LVS, target)),
        (Some(_), Some(_)) => return Err(multiple_records(LVS, target)),
    };

    VolumeKind::from_attr(&volume.lv_attr)
        .map(Probe::Present)
        .ok_or_else(|| empty_attribute(LVS, target))
}

fn normalise_entry(entry: FullReportEntry) -> Result<Option<GroupInventory>, EngineError> {
    let mut groups = entry.vg.into_iter();
    let raw_group = match (groups.next(), groups.next()) {
        (Some(group), None) => group,
        (None, _) if entry.lv.is_empty() => return Ok(None),
        (None, _) => return Err(missing_record(FULLREPORT, "volume group of a report entry")),
        (Some(group), Some(_)) => return Err(multiple_records(FULLREPORT, &group.vg_name)),
    };

    let group = normalise_group(raw_group)?;
    let volumes = entry
        .lv
        .into_iter()
        .map(|raw| normalise_volume(raw, &group.name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(GroupInventory { group, volumes }))
}

fn normalise_group(raw: RawGroup) -> Result<VolumeGroup, EngineError> {
    let size_bytes = parse_bytes("vg_size", &raw.vg_size)?;
    let free_bytes = parse_bytes("vg_free", &raw.vg_free)?;
    if free_bytes > size_bytes {
        return Err(EngineBug::FreeExceedsSize {
            vg_name: raw.vg_name,
            size_bytes,
            free_bytes,
        }
        .into());
    }
    Ok(VolumeGroup {
        name: raw.vg_name,
        uuid: raw.vg_uuid,
        size_bytes,
        free_bytes,
    })
}

fn normalise_volume(raw: RawVolume, vg_name: &str) -> Result<LogicalVolume, EngineError> {
    if raw.lv_attr.is_empty() {
        return Err(empty_attribute(
            FULLREPORT,
            &format!("{vg_name}/{}", raw.lv_name),
        ));
    }
    let size_bytes = parse_bytes("lv_size", &raw.lv_size)?;
    let owner = if raw.vg_name.is_empty() {
        vg_name.to_owned()
    } else {
        raw.vg_name
    };
    Ok(LogicalVolume {
        name: raw.lv_name,
        vg_name: owner,
        path: non_empty(&raw.lv_path).map(Utf8PathBuf::from),
        size_bytes,
        attr: raw.lv_attr,
        origin: non_empty(&raw.origin),
        pool: non_empty(&raw.pool_lv),
    })
}

fn decode<T>(command: &str, stdout: &str) -> Result<T, EngineError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(stdout).map_err(|err| EngineError::Parse {
        command: command.to_owned(),
        message: err.to_string(),
    })
}

fn parse_bytes(field: &str, value: &str) -> Result<u64, EngineError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix('B').unwrap_or(trimmed);
    digits.parse::<u64>().map_err(|err| EngineError::Parse {
        command: String::from(FULLREPORT),
        message: format!("{field} value '{value}' is not a byte count: {err}"),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn missing_record(command: &str, target: &str) -> EngineError {
    EngineBug::MissingRecord {
        command: command.to_owned(),
        target: target.to_owned(),
    }
    .into()
}

fn multiple_records(command: &str, target: &str) -> EngineError {
    EngineBug::MultipleRecords {
        command: command.to_owned(),
        target: target.to_owned(),
    }
    .into()
}

fn empty_attribute(command: &str, target: &str) -> EngineError {
    EngineBug::EmptyAttribute {
        command: command.to_owned(),
        target: target.to_owned(),
    }
    .into()
}
