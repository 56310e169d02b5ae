/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Line-oriented diff built on a longest-common-subsequence table
//!
//! Time and space are `O(m * n)` in the line counts. Prompt templates are a
//! few hundred lines at most; callers diffing larger documents should bound
//! the input first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Unchanged,
    Added,
    Removed,
}

/// A single line of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub content: String,
}

impl DiffLine {
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self { kind: DiffKind::Unchanged, content: content.into() }
    }

    pub fn added(content: impl Into<String>) -> Self {
        Self { kind: DiffKind::Added, content: content.into() }
    }

    pub fn removed(content: impl Into<String>) -> Self {
        Self { kind: DiffKind::Removed, content: content.into() }
    }
}

/// Line counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Diff `old_text` against `new_text` line by line.
///
/// Both inputs are split on `'\n'`. When backtracking hits a tie between
/// dropping an old line and taking a new one, the added line is emitted first
/// (so it lands after the removed line in the final order).
pub fn diff_lines(old_text: &str, new_text: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = old_text.split('\n').collect();
    let new: Vec<&str> = new_text.split('\n').collect();
    let (m, n) = (old.len(), new.len());

    // dp[i][j] = LCS length of old[..i] and new[..j]
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            lines.push(DiffLine::unchanged(old[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            lines.push(DiffLine::added(new[j - 1]));
            j -= 1;
        } else {
            lines.push(DiffLine::removed(old[i - 1]));
            i -= 1;
        }
    }
    lines.reverse();
    lines
}

pub fn summarize(lines: &[DiffLine]) -> DiffSummary {
    lines.iter().fold(DiffSummary::default(), |mut summary, line| {
        match line.kind {
            DiffKind::Unchanged => summary.unchanged += 1,
            DiffKind::Added => summary.added += 1,
            DiffKind::Removed => summary.removed += 1,
        }
        summary
    })
}

/// Display form: one line per entry, prefixed with two spaces, `+ ` or `- `
pub fn render_diff(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let prefix = match line.kind {
                DiffKind::Unchanged => "  ",
                DiffKind::Added => "+ ",
                DiffKind::Removed => "- ",
            };
            format!("{prefix}{}", line.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reassemble the old side of a diff
pub fn old_text(lines: &[DiffLine]) -> String {
    join_kinds(lines, DiffKind::Removed)
}

/// Reassemble the new side of a diff
pub fn new_text(lines: &[DiffLine]) -> String {
    join_kinds(lines, DiffKind::Added)
}

fn join_kinds(lines: &[DiffLine], side: DiffKind) -> String {
    lines
        .iter()
        .filter(|line| line.kind == DiffKind::Unchanged || line.kind == side)
        .map(|line| line.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
