//! Disk volume join
//!
//! `Image_Volume_Space_Query_DM` is queried twice: once for the volume definitions
//! (`host: volid devtype size region_names...`) and once for the free extents
//! (`host: volid devtype start size group_name region_name`). The definitions seed one
//! record per volume, then every free extent on a known volume is folded into it.

use super::{FieldValue, ReportRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static DEFINITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<host>[^:]+): (?P<volid>\S+) (?P<devtype>\S+) (?P<size>\S+) (?P<region_names>.+)")
        .expect("Invalid disk definition regex")
});

static FREE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<host>[^:]+): (?P<volid>\S+)\s+(?P<devtype>\S+)\s+(?P<start>\S+)\s+(?P<size>\S+)\s+(?P<group_name>\S+)\s+(?P<region_name>\S+)\s*$",
    )
    .expect("Invalid disk free space regex")
});

/// Merged state of one volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRecord {
    /// Volume identifier (volser)
    pub volume: String,
    /// 1 once any free extent of the volume starts at cylinder 1, 0 otherwise
    pub status: u8,
    /// Defined size, kept as text if the report does not hold a number
    pub space_total: FieldValue,
    /// Sum of the sizes of all free extents, saturating at `i64::MAX`
    pub space_free: i64,
}

impl VolumeRecord {
    fn defined(volume: &str, size: FieldValue) -> Self {
        VolumeRecord {
            volume: volume.to_string(),
            status: 0,
            space_total: size,
            space_free: 0,
        }
    }
}

impl ReportRecord for VolumeRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "volume" => Some(FieldValue::Text(self.volume.clone())),
            "status" => Some(FieldValue::Int(i64::from(self.status))),
            "space_total" => Some(self.space_total.clone()),
            "space_free" => Some(FieldValue::Int(self.space_free)),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Join the definition and free space reports of a node
///
/// Returns one record per defined volume in no particular order. Both reports are needed, so
/// the result is empty if either one has no lines.
pub fn parse_disk<S: AsRef<str>>(
    node_id: &str,
    def_lines: &[S],
    free_lines: &[S],
) -> Vec<VolumeRecord> {
    if def_lines.is_empty() || free_lines.is_empty() {
        return Vec::new();
    }

    let mut volumes = collect_definitions(node_id, def_lines);
    apply_free_extents(node_id, free_lines, &mut volumes);

    volumes.into_values().collect()
}

/// First pass: one fresh record per volume id, a later definition replaces an earlier one
fn collect_definitions<S: AsRef<str>>(
    node_id: &str,
    lines: &[S],
) -> HashMap<String, VolumeRecord> {
    let mut volumes = HashMap::new();

    for line in lines {
        let Some(captures) = DEFINITION_LINE.captures(line.as_ref()) else {
            continue;
        };
        if captures["host"].trim() != node_id {
            continue;
        }
        let volid = captures["volid"].trim();
        let size = FieldValue::int_or_text(captures["size"].trim());
        volumes.insert(volid.to_string(), VolumeRecord::defined(volid, size));
    }

    volumes
}

/// Second pass: fold free extents into the known volumes
fn apply_free_extents<S: AsRef<str>>(
    node_id: &str,
    lines: &[S],
    volumes: &mut HashMap<String, VolumeRecord>,
) {
    for line in lines {
        let Some(captures) = FREE_LINE.captures(line.as_ref()) else {
            continue;
        };
        if captures["host"].trim() != node_id {
            continue;
        }
        let (Ok(start), Ok(size)) = (
            captures["start"].parse::<i64>(),
            captures["size"].parse::<i64>(),
        ) else {
            continue;
        };
        let Some(volume) = volumes.get_mut(captures["volid"].trim()) else {
            continue;
        };
        if start == 1 {
            volume.status = 1;
        }
        volume.space_free = volume.space_free.saturating_add(size);
    }
}
