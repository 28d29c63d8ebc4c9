//! Stage 1: pull payload attributes out of the line stream, grouped by payload type.

use std::collections::BTreeMap;

use super::{CRLF, is_payload_attribute};

/// Attribute lines declaring one payload type, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadGroup {
    pub id: u32,
    pub lines: Vec<String>,
}

impl PayloadGroup {
    /// Concatenated raw text, each line CRLF-terminated.
    pub fn text(&self) -> String {
        super::join_lines(&self.lines)
    }
}

/// Payload groups keyed by payload-type id.
///
/// Iteration is ascending by id so selection is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PayloadGroups {
    groups: BTreeMap<u32, Vec<String>>,
}

/// Result of running the classifier over a whole offer.
#[derive(Debug, Default)]
pub struct Partition {
    /// Lines that stay in the main stream.
    pub kept: Vec<String>,
    pub groups: PayloadGroups,
}

/// Payload-type id this attribute line belongs to, if it should be grouped.
///
/// The id is the first token after the colon and must be numeric, so
/// `a=rtcp-fb:* nack` stays in place. Lines whose second token starts with
/// `http` or `ur` look like header-extension or URI parameters and are left
/// alone too.
pub fn payload_id(line: &str) -> Option<u32> {
    if !is_payload_attribute(line) {
        return None;
    }

    let (_, value) = line.split_once(':')?;
    let mut tokens = value.split_whitespace();
    let id = tokens.next()?.parse::<u32>().ok()?;

    match tokens.next() {
        Some(second) if second.starts_with("http") || second.starts_with("ur") => None,
        _ => Some(id),
    }
}

impl PayloadGroups {
    /// Classify one line, absorbing it if it declares a payload type.
    ///
    /// Returns `true` if the line should stay in the main stream.
    pub fn classify(&mut self, line: &str) -> bool {
        match payload_id(line) {
            Some(id) => {
                self.groups.entry(id).or_default().push(line.to_string());
                false
            }
            None => true,
        }
    }

    /// Run the classifier over every non-empty line of an offer.
    pub fn partition(sdp: &str) -> Partition {
        let mut partition = Partition::default();
        for line in sdp.split(CRLF).filter(|line| !line.is_empty()) {
            if partition.groups.classify(line) {
                partition.kept.push(line.to_string());
            }
        }

        tracing::debug!(
            kept = partition.kept.len(),
            groups = partition.groups.len(),
            "classified payload attributes"
        );
        partition
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<PayloadGroup> {
        self.groups.get(&id).map(|lines| PayloadGroup {
            id,
            lines: lines.clone(),
        })
    }

    /// Groups in ascending payload-type order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[String])> {
        self.groups.iter().map(|(id, lines)| (*id, lines.as_slice()))
    }
}
