use crate::sorteo::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// excel or csv. Guessed from the extension if missing.
    pub provider: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(rename = "preRegistered")]
    _pre_registered: Option<JSValue>,
    #[serde(rename = "reserves")]
    _reserves: Option<JSValue>,
    #[serde(rename = "randomSeed")]
    _random_seed: Option<JSValue>,
}

impl RulesConfig {
    pub fn pre_registered(&self) -> SorteoResult<Option<usize>> {
        read_js_count("preRegistered", &self._pre_registered)
    }

    pub fn reserves(&self) -> SorteoResult<Option<usize>> {
        read_js_count("reserves", &self._reserves)
    }

    pub fn random_seed(&self) -> SorteoResult<Option<u64>> {
        match &self._random_seed {
            None | Some(JSValue::Null) => Ok(None),
            Some(JSValue::Number(n)) => n
                .as_u64()
                .map(Some)
                .context(InvalidSeedSnafu { value: n.to_string() }),
            Some(JSValue::String(s)) => parse_seed(s).map(Some),
            Some(x) => InvalidSeedSnafu {
                value: x.to_string(),
            }
            .fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "xlsxFile")]
    pub xlsx_file: Option<String>,
    #[serde(rename = "pdfFile")]
    pub pdf_file: Option<String>,
    #[serde(rename = "jsonFile")]
    pub json_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawConfig {
    #[serde(rename = "inputSource")]
    pub input_source: Option<InputSource>,
    pub rules: Option<RulesConfig>,
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
}

pub fn read_config(path: &str) -> SorteoResult<DrawConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents, path)
}

pub fn parse_config(contents: &str, path: &str) -> SorteoResult<DrawConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

// Counts may be written as numbers or as strings.
fn read_js_count(label: &str, x: &Option<JSValue>) -> SorteoResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => parse_count(label, &n.to_string())
            .map(Some)
            .context(InvalidCountSnafu {}),
        Some(JSValue::String(s)) => parse_count(label, s).map(Some).context(InvalidCountSnafu {}),
        Some(other) => parse_count(label, &other.to_string())
            .map(Some)
            .context(InvalidCountSnafu {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config() {
        let c = parse_config("{}", "c.json").unwrap();
        assert_eq!(c, DrawConfig::default());
    }

    #[test]
    fn counts_as_numbers_or_strings() {
        let c = parse_config(
            r#"{"rules": {"preRegistered": 60, "reserves": "20", "randomSeed": 12}}"#,
            "c.json",
        )
        .unwrap();
        let rules = c.rules.unwrap();
        assert_eq!(rules.pre_registered().unwrap(), Some(60));
        assert_eq!(rules.reserves().unwrap(), Some(20));
        assert_eq!(rules.random_seed().unwrap(), Some(12));
    }

    #[test]
    fn negative_or_fractional_counts() {
        let c = parse_config(
            r#"{"rules": {"preRegistered": -1, "reserves": 2.5}}"#,
            "c.json",
        )
        .unwrap();
        let rules = c.rules.unwrap();
        assert!(matches!(
            rules.pre_registered(),
            Err(SorteoError::InvalidCount { .. })
        ));
        assert!(matches!(
            rules.reserves(),
            Err(SorteoError::InvalidCount { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = parse_config(r#"{"rules": {"preInscriptos": 60}}"#, "c.json");
        assert!(matches!(res, Err(SorteoError::ParsingJson { .. })));
    }
}
