// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Funnel aggregation over redirect records.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::record::RedirectRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub service: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Aggregate view of the redirect list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSummary {
    pub total_redirects: usize,
    pub unique_sessions: usize,
    /// Services by redirect count, descending.
    pub top_services: Vec<ServiceCount>,
    /// Sources by redirect count, descending.
    pub conversion_by_source: Vec<SourceCount>,
    /// Average redirects per distinct session; 0.0 when there are none.
    pub redirects_per_session: f64,
}

impl FunnelSummary {
    pub fn from_records(records: &[RedirectRecord]) -> Self {
        let unique_sessions = records
            .iter()
            .map(|r| r.session_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let redirects_per_session = if unique_sessions == 0 {
            0.0
        } else {
            records.len() as f64 / unique_sessions as f64
        };

        Self {
            total_redirects: records.len(),
            unique_sessions,
            top_services: frequencies(records.iter().map(|r| r.service.as_str()))
                .into_iter()
                .map(|(service, count)| ServiceCount { service, count })
                .collect(),
            conversion_by_source: frequencies(records.iter().map(|r| r.source.as_str()))
                .into_iter()
                .map(|(source, count)| SourceCount { source, count })
                .collect(),
            redirects_per_session,
        }
    }
}

/// Counts per key, descending. Ties keep first-appearance order.
fn frequencies<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
