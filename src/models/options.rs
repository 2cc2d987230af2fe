//! Fixed header configuration
//!
//! Options arrive from JavaScript as a plain object. Only the known keys are
//! read; anything else is ignored. Missing keys take their defaults, and so
//! does a known key whose value cannot be used (with a warning).

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Default distance (px) from the top of the viewport at which the header pins
pub const DEFAULT_TOP: f64 = 0.0;

/// Default stacking order of the mirror table
pub const DEFAULT_Z_INDEX: i32 = 100;

/// Class added to every mirror table
pub const MIRROR_CLASS: &str = "js-fixed-header";

/// Suffix appended to the source table id to form the mirror id
pub const MIRROR_ID_SUFFIX: &str = "-fix";

/// `display` value of a shown mirror
pub const SHOWN_DISPLAY: &str = "table";

/// `display` value of a hidden mirror (and of a hidden source table)
pub const HIDDEN_DISPLAY: &str = "none";

/// How the mirror is positioned on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// `position: fixed` from the stylesheet. Offsets are written once.
    #[default]
    CssFixed,
    /// `position: absolute` anchored to `<body>`, offsets tracked on scroll and resize.
    /// Copes better with responsive layouts.
    JsFixed,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CssFixed => "css-fixed",
            Mode::JsFixed => "js-fixed",
        }
    }

    /// Mode-specific class marker, e.g. `js-fixed-header-type-css-fixed`
    pub fn class_name(&self) -> String {
        format!("{}-type-{}", MIRROR_CLASS, self.as_str())
    }
}

/// CSS `z-index` of the mirror: an integer or `auto`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZIndex {
    Auto,
    Value(i32),
}

impl Default for ZIndex {
    fn default() -> Self {
        ZIndex::Value(DEFAULT_Z_INDEX)
    }
}

impl From<i32> for ZIndex {
    fn from(value: i32) -> Self {
        ZIndex::Value(value)
    }
}

impl fmt::Display for ZIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZIndex::Auto => f.write_str("auto"),
            ZIndex::Value(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for ZIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ZIndex::Auto => serializer.serialize_str("auto"),
            ZIndex::Value(value) => serializer.serialize_i32(*value),
        }
    }
}

struct ZIndexVisitor;

impl<'de> Visitor<'de> for ZIndexVisitor {
    type Value = ZIndex;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, an integer string or \"auto\"")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ZIndex, E> {
        i32::try_from(value)
            .map(ZIndex::Value)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ZIndex, E> {
        i32::try_from(value)
            .map(ZIndex::Value)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    // JavaScript numbers arrive as f64
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<ZIndex, E> {
        if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
            Ok(ZIndex::Value(value as i32))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ZIndex, E> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ZIndex::Auto);
        }
        trimmed
            .parse::<i32>()
            .map(ZIndex::Value)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for ZIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ZIndexVisitor)
    }
}

/// Immutable configuration of a fixed header
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Pin threshold in px; the mirror shows once the table top passes above it
    pub top: f64,
    pub z_index: ZIndex,
    pub mode: Mode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            z_index: ZIndex::default(),
            mode: Mode::default(),
        }
    }
}

/// Lenient: never fails, see [`Options::from_json`]
impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Options::from_json(&raw))
    }
}

/// Overwrite `slot` with the value under `key`, if present and usable
fn merge_key<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, slot: &mut T) {
    match map.get(key) {
        None | Some(Value::Null) => {}
        Some(raw) => match T::deserialize(raw) {
            Ok(value) => *slot = value,
            Err(e) => log::warn!("ignoring fixed header option `{}`: {}", key, e),
        },
    }
}

impl Options {
    pub fn new(top: f64, z_index: impl Into<ZIndex>, mode: Mode) -> Self {
        Self {
            top,
            z_index: z_index.into(),
            mode,
        }
    }

    /// Build options from a plain object, key by key.
    ///
    /// A bad value only costs its own key. `type` is the historical name of
    /// `mode` and is read when `mode` is absent.
    pub fn from_json(raw: &Value) -> Self {
        let mut options = Self::default();
        let Some(map) = raw.as_object() else {
            if !raw.is_null() {
                log::warn!("fixed header options must be an object, using defaults");
            }
            return options;
        };
        merge_key(map, "top", &mut options.top);
        merge_key(map, "zIndex", &mut options.z_index);
        let mode_key = if map.contains_key("mode") { "mode" } else { "type" };
        merge_key(map, mode_key, &mut options.mode);
        options
    }

    pub fn with_top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_js_fixed(&self) -> bool {
        self.mode == Mode::JsFixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.top, 0.0);
        assert_eq!(options.z_index, ZIndex::Value(100));
        assert_eq!(options.mode, Mode::CssFixed);
    }

    #[test]
    fn test_partial_object_keeps_defaults() {
        let options: Options = serde_json::from_str(r#"{"top": 20}"#).unwrap();
        assert_eq!(options, Options::default().with_top(20.0));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let options: Options =
            serde_json::from_str(r#"{"zIndex": 5, "color": "red", "rows": [1, 2]}"#).unwrap();
        assert_eq!(options.z_index, ZIndex::Value(5));
        assert_eq!(options.top, 0.0);
    }

    #[test]
    fn test_mode_and_legacy_type_key() {
        let by_mode: Options = serde_json::from_str(r#"{"mode": "js-fixed"}"#).unwrap();
        let by_type: Options = serde_json::from_str(r#"{"type": "js-fixed"}"#).unwrap();
        assert_eq!(by_mode.mode, Mode::JsFixed);
        assert_eq!(by_type.mode, Mode::JsFixed);
    }

    #[test]
    fn test_unknown_mode_keeps_default() {
        let options: Options = serde_json::from_str(r#"{"mode": "sticky", "top": 8}"#).unwrap();
        assert_eq!(options.mode, Mode::CssFixed);
        assert_eq!(options.top, 8.0);
    }

    #[test]
    fn test_bad_key_keeps_the_others() {
        let options: Options =
            serde_json::from_str(r#"{"top": 20, "zIndex": "high", "mode": "js-fixed"}"#).unwrap();
        assert_eq!(options, Options::new(20.0, 100, Mode::JsFixed));

        let options: Options = serde_json::from_str(r#"{"top": "20px", "zIndex": 7}"#).unwrap();
        assert_eq!(options, Options::new(0.0, 7, Mode::CssFixed));
    }

    #[test]
    fn test_z_index_forms() {
        let parse = |raw: &str| serde_json::from_str::<Options>(raw).unwrap().z_index;
        assert_eq!(parse(r#"{"zIndex": "auto"}"#), ZIndex::Auto);
        assert_eq!(parse(r#"{"zIndex": "12"}"#), ZIndex::Value(12));
        assert_eq!(parse(r#"{"zIndex": -3}"#), ZIndex::Value(-3));
        assert_eq!(parse(r#"{"zIndex": 4.0}"#), ZIndex::Value(4));
        assert_eq!(parse(r#"{"zIndex": 4.5}"#), ZIndex::Value(100));
        assert_eq!(parse(r#"{"zIndex": null}"#), ZIndex::Value(100));
        assert_eq!(ZIndex::Auto.to_string(), "auto");
        assert_eq!(ZIndex::Value(100).to_string(), "100");
    }

    #[test]
    fn test_mode_key_wins_over_type() {
        let options: Options = serde_json::from_str(r#"{"mode": "css-fixed", "type": "js-fixed"}"#).unwrap();
        assert_eq!(options.mode, Mode::CssFixed);
    }

    #[test]
    fn test_non_object_gives_defaults() {
        assert_eq!(Options::from_json(&serde_json::json!(42)), Options::default());
        assert_eq!(Options::from_json(&Value::Null), Options::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(Options::default().with_mode(Mode::JsFixed)).unwrap();
        assert_eq!(value, serde_json::json!({"top": 0.0, "zIndex": 100, "mode": "js-fixed"}));
        let auto = Options::new(0.0, ZIndex::Auto, Mode::CssFixed);
        assert_eq!(serde_json::to_value(auto).unwrap()["zIndex"], "auto");
    }

    #[test]
    fn test_class_names() {
        assert_eq!(Mode::CssFixed.class_name(), "js-fixed-header-type-css-fixed");
        assert_eq!(Mode::JsFixed.class_name(), "js-fixed-header-type-js-fixed");
    }
}
