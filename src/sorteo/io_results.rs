use crate::sorteo::*;

use serde::{Deserialize, Serialize};

/// The results of a draw, as written to and read from JSON.
///
/// Reading is strict: unknown keys and participant values that are not strings
/// are rejected. Missing participant fields are caught when exporting.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawSummary {
    #[serde(rename = "preRegistered")]
    pub pre_registered: usize,
    pub reserves: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub selected: Vec<CanonicalRecord>,
    pub alternates: Vec<CanonicalRecord>,
}

impl DrawSummary {
    pub fn from_draw(result: &DrawResult, seed: Option<u64>) -> DrawSummary {
        DrawSummary {
            pre_registered: result.want_selected,
            reserves: result.want_alternates,
            seed,
            selected: result.selected.iter().map(|p| p.to_record()).collect(),
            alternates: result.alternates.iter().map(|p| p.to_record()).collect(),
        }
    }
}

pub fn read_results(path: &str) -> SorteoResult<DrawSummary> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_results(&contents, path)
}

pub fn parse_results(contents: &str, path: &str) -> SorteoResult<DrawSummary> {
    let summary: DrawSummary =
        serde_json::from_str(contents).context(ParsingJsonSnafu { path })?;
    if summary.selected.len() != summary.pre_registered
        || summary.alternates.len() != summary.reserves
    {
        whatever!(
            "The file {} lists {} selected and {} alternates, but declares {} and {}",
            path,
            summary.selected.len(),
            summary.alternates.len(),
            summary.pre_registered,
            summary.reserves
        );
    }
    debug!(
        "parse_results: {} selected, {} alternates",
        summary.selected.len(),
        summary.alternates.len()
    );
    Ok(summary)
}

pub fn to_json_string(summary: &DrawSummary) -> SorteoResult<String> {
    serde_json::to_string_pretty(summary).context(WritingJsonSnafu {})
}
