//! Per-zone code aggregation for the detail panel.
//!
//! A zone's code list repeats the same code string once per participant. The
//! panel shows one card per distinct code, so references are grouped by exact
//! code string with a per-participant frequency breakdown under each card.

use serde::Serialize;
use std::collections::HashMap;

use crate::payload::CodeReference;

/// All references sharing one code string, with their summed frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeGroup {
    pub code: String,
    pub total_frequency: u32,
    /// Member references in input order.
    pub members: Vec<CodeReference>,
}

/// Groups references by code string, preserving first-seen order of distinct
/// codes.
///
/// The grouping is stable: members keep their input order within a group, and
/// re-running on the same input yields identical groups and totals.
pub fn group_codes(codes: &[CodeReference]) -> Vec<CodeGroup> {
    let mut groups: Vec<CodeGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for reference in codes {
        match index.get(reference.code.as_str()) {
            Some(&at) => {
                groups[at].total_frequency += reference.frequency;
                groups[at].members.push(reference.clone());
            }
            None => {
                index.insert(reference.code.as_str(), groups.len());
                groups.push(CodeGroup {
                    code: reference.code.clone(),
                    total_frequency: reference.frequency,
                    members: vec![reference.clone()],
                });
            }
        }
    }

    groups
}
