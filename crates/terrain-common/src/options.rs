//! Typed `--<kind><Key> <value>` option accumulation.
//!
//! Command lines follow a fixed template where the first letter after the
//! dashes selects the value type:
//!
//! ```text
//! --sFNameSrc data/hf.tif   string
//! --bBlur no                bool (false for FALSE/NO/VENDA/BEDA/NAHI, true otherwise)
//! --iBlurSize 4             integer
//! --fNoiseRatio 0.05        float
//! ```
//!
//! The stored key keeps the type letter (`bBlur`), matching the names used
//! by the configuration objects that consume the map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{TerrainError, TerrainResult};

/// Tokens (compared upper-cased) that turn a `--b` option off.
const FALSE_TOKENS: [&str; 5] = ["FALSE", "NO", "VENDA", "BEDA", "NAHI"];

/// A single typed option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Accumulated options keyed by their flag name without the leading dashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionMap {
    values: BTreeMap<String, OptionValue>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    /// Get a string option; a value of another type is a configuration error.
    pub fn get_str(&self, key: &str) -> TerrainResult<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_mismatch(key, "string", other)),
        }
    }

    pub fn get_bool(&self, key: &str) -> TerrainResult<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(key, "bool", other)),
        }
    }

    pub fn get_int(&self, key: &str) -> TerrainResult<Option<i64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(type_mismatch(key, "int", other)),
        }
    }

    /// Get a float option. Integer values are widened.
    pub fn get_float(&self, key: &str) -> TerrainResult<Option<f64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Float(f)) => Ok(Some(*f)),
            Some(OptionValue::Int(i)) => Ok(Some(*i as f64)),
            Some(other) => Err(type_mismatch(key, "float", other)),
        }
    }

    /// Render the map as JSON, used when parsing stops on an unknown argument.
    pub fn to_json(&self) -> TerrainResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn type_mismatch(key: &str, expected: &str, found: &OptionValue) -> TerrainError {
    TerrainError::config(format!("option '{}' expected {} value, found {:?}", key, expected, found))
}

/// Result of accumulating option arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every argument was consumed.
    Complete(OptionMap),
    /// An unrecognized argument was hit with no callback to handle it.
    ///
    /// The caller is expected to report the map gathered so far and exit
    /// successfully.
    Stopped { options: OptionMap, at: usize },
}

impl ParseOutcome {
    pub fn options(&self) -> &OptionMap {
        match self {
            ParseOutcome::Complete(options) => options,
            ParseOutcome::Stopped { options, .. } => options,
        }
    }

    pub fn into_options(self) -> OptionMap {
        match self {
            ParseOutcome::Complete(options) => options,
            ParseOutcome::Stopped { options, .. } => options,
        }
    }
}

/// Accumulate typed options, stopping at the first unrecognized argument.
///
/// `args` must not include the program name.
pub fn parse_option_args(args: &[String]) -> TerrainResult<ParseOutcome> {
    parse_options(args, None::<fn(&[String], usize) -> TerrainResult<usize>>)
}

/// Accumulate typed options, handing unrecognized arguments to `callback`.
///
/// The callback receives the full argument list and the index of the
/// unrecognized argument, and returns how many arguments after it it
/// consumed.
pub fn parse_option_args_with<F>(args: &[String], callback: F) -> TerrainResult<OptionMap>
where
    F: FnMut(&[String], usize) -> TerrainResult<usize>,
{
    Ok(parse_options(args, Some(callback))?.into_options())
}

fn parse_options<F>(args: &[String], mut callback: Option<F>) -> TerrainResult<ParseOutcome>
where
    F: FnMut(&[String], usize) -> TerrainResult<usize>,
{
    let mut options = OptionMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        let kind = typed_option_kind(arg);

        let Some(kind) = kind else {
            match callback.as_mut() {
                Some(cb) => {
                    let consumed = cb(args, i)?;
                    i += 1 + consumed;
                    continue;
                }
                None => return Ok(ParseOutcome::Stopped { options, at: i }),
            }
        };

        let key = &arg[2..];
        let raw = args
            .get(i + 1)
            .ok_or_else(|| TerrainError::config(format!("option '{}' is missing its value", arg)))?;

        let value = match kind {
            's' => OptionValue::Str(raw.clone()),
            'b' => OptionValue::Bool(!FALSE_TOKENS.contains(&raw.to_uppercase().as_str())),
            'i' => OptionValue::Int(raw.parse().map_err(|_| {
                TerrainError::config(format!("option '{}' expects an integer, got '{}'", arg, raw))
            })?),
            'f' => OptionValue::Float(raw.parse().map_err(|_| {
                TerrainError::config(format!("option '{}' expects a float, got '{}'", arg, raw))
            })?),
            _ => unreachable!("typed_option_kind only returns s, b, i or f"),
        };

        options.insert(key, value);
        i += 2;
    }

    Ok(ParseOutcome::Complete(options))
}

fn typed_option_kind(arg: &str) -> Option<char> {
    let rest = arg.strip_prefix("--")?;
    let kind = rest.chars().next()?;
    matches!(kind, 's' | 'b' | 'i' | 'f').then_some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_typed_options() {
        let outcome = parse_option_args(&args(&[
            "--sCmd",
            "gray2color",
            "--bBlur",
            "nahi",
            "--iBlurSize",
            "4",
            "--fNoiseRatio",
            "0.25",
        ]))
        .unwrap();

        let options = match outcome {
            ParseOutcome::Complete(options) => options,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(options.get_str("sCmd").unwrap(), Some("gray2color"));
        assert_eq!(options.get_bool("bBlur").unwrap(), Some(false));
        assert_eq!(options.get_int("iBlurSize").unwrap(), Some(4));
        assert_eq!(options.get_float("fNoiseRatio").unwrap(), Some(0.25));
    }

    #[test]
    fn test_bool_true_for_any_other_token() {
        let options = parse_option_args(&args(&["--bFlip", "maybe"])).unwrap().into_options();
        assert_eq!(options.get_bool("bFlip").unwrap(), Some(true));
    }

    #[test]
    fn test_unknown_argument_stops() {
        let outcome = parse_option_args(&args(&["--iBlurSize", "2", "extra", "--bFlip", "no"])).unwrap();
        match outcome {
            ParseOutcome::Stopped { options, at } => {
                assert_eq!(at, 2);
                assert_eq!(options.len(), 1);
            }
            other => panic!("expected stop, got {:?}", other),
        }
    }

    #[test]
    fn test_callback_consumes_arguments() {
        let mut seen = Vec::new();
        let options = parse_option_args_with(
            &args(&["--ref", "a.tif", "--iBlurSize", "3"]),
            |all, at| {
                seen.push(all[at + 1].clone());
                Ok(1)
            },
        )
        .unwrap();
        assert_eq!(seen, vec!["a.tif".to_string()]);
        assert_eq!(options.get_int("iBlurSize").unwrap(), Some(3));
    }

    #[test]
    fn test_missing_value_is_error() {
        assert!(parse_option_args(&args(&["--iBlurSize"])).is_err());
        assert!(parse_option_args(&args(&["--iBlurSize", "four"])).is_err());
    }

    #[test]
    fn test_type_mismatch() {
        let options = parse_option_args(&args(&["--sBlur", "yes"])).unwrap().into_options();
        assert!(options.get_bool("sBlur").is_err());
    }

    #[test]
    fn test_json_dump() {
        let options = parse_option_args(&args(&["--bFlip", "no", "--iBlurSize", "2"]))
            .unwrap()
            .into_options();
        assert_eq!(options.to_json().unwrap(), r#"{"bFlip":false,"iBlurSize":2}"#);
    }
}
