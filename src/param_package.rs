//! Flat key/value parameter sets describing an input binding or a device
//!
//! The wire form is `key:value,key:value`. The reserved characters `$`, `,` and `:`
//! are escaped as `$2`, `$1` and `$0`. An empty package serializes to `[empty]`.
//!
//! ```text
//! engine:gamepad,guid:000000000000045e00000000000002ea,port:0,button:96
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::{error, trace};

/// Literal emitted for a package without entries
pub const EMPTY_PACKAGE: &str = "[empty]";

const PAIR_SEPARATOR: char = ',';
const KEY_VALUE_SEPARATOR: char = ':';
const ESCAPE: char = '$';

const ESCAPED_KEY_VALUE_SEPARATOR: &str = "$0";
const ESCAPED_PAIR_SEPARATOR: &str = "$1";
const ESCAPED_ESCAPE: &str = "$2";

/// Conversion between a typed value and its textual parameter form
pub trait ParamValue: Sized {
    fn from_param(text: &str) -> Option<Self>;
    fn to_param(&self) -> String;
}

impl ParamValue for String {
    fn from_param(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn to_param(&self) -> String {
        self.clone()
    }
}

impl ParamValue for bool {
    // Only "0" and "1" are valid boolean texts
    fn from_param(text: &str) -> Option<Self> {
        match text {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        }
    }

    fn to_param(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

macro_rules! numeric_param_value {
    ($($ty:ty),*) => {
        $(
            impl ParamValue for $ty {
                fn from_param(text: &str) -> Option<Self> {
                    text.trim().parse::<$ty>().ok()
                }

                fn to_param(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_param_value!(i32, i64, u32, u64, usize, f32, f64);

/// Ordered key/value package with unique keys
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamPackage {
    entries: Vec<(String, String)>,
}

impl ParamPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the wire form. Malformed pairs are logged and skipped, never fatal.
    pub fn parse(serialized: &str) -> Self {
        let mut package = Self::new();
        if serialized == EMPTY_PACKAGE || serialized.is_empty() {
            return package;
        }

        for pair in serialized.split(PAIR_SEPARATOR) {
            let fields: Vec<&str> = pair.split(KEY_VALUE_SEPARATOR).collect();
            if fields.len() != 2 {
                error!(
                    "Invalid key pair '{}' in parameter package '{}' ({} fields)",
                    pair,
                    serialized,
                    fields.len()
                );
                continue;
            }
            package.insert_raw(unescape(fields[0]), unescape(fields[1]));
        }

        package
    }

    pub fn serialize(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_PACKAGE.to_string();
        }

        self.entries
            .iter()
            .map(|(key, value)| format!("{}{}{}", escape(key), KEY_VALUE_SEPARATOR, escape(value)))
            .collect::<Vec<_>>()
            .join(&PAIR_SEPARATOR.to_string())
    }

    /// Typed lookup. Missing keys and malformed values yield `default`.
    pub fn get<T: ParamValue>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.raw(key) else {
            trace!("Parameter package has no key '{}', using default", key);
            return default;
        };

        match T::from_param(raw) {
            Some(value) => value,
            None => {
                error!(
                    "Malformed value '{}' for key '{}', using default",
                    raw, key
                );
                default
            }
        }
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key, default.to_string())
    }

    pub fn set<T: ParamValue>(&mut self, key: &str, value: T) {
        self.insert_raw(key.to_string(), value.to_param());
    }

    pub fn has(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    pub fn erase(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn insert_raw(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamPackage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut package = Self::new();
        for (key, value) in iter {
            package.insert_raw(key.into(), value.into());
        }
        package
    }
}

impl fmt::Display for ParamPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl Serialize for ParamPackage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ParamPackage::serialize(self))
    }
}

impl<'de> Deserialize<'de> for ParamPackage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(ParamPackage::parse(&text))
    }
}

// `$` first so the escapes introduced for `,` and `:` are not escaped again
fn escape(text: &str) -> String {
    text.replace(ESCAPE, ESCAPED_ESCAPE)
        .replace(PAIR_SEPARATOR, ESCAPED_PAIR_SEPARATOR)
        .replace(KEY_VALUE_SEPARATOR, ESCAPED_KEY_VALUE_SEPARATOR)
}

fn unescape(text: &str) -> String {
    text.replace(ESCAPED_KEY_VALUE_SEPARATOR, ":")
        .replace(ESCAPED_PAIR_SEPARATOR, ",")
        .replace(ESCAPED_ESCAPE, "$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    // Counts WARN and ERROR events
    struct LoudEvents(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for LoudEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn missing_keys_stay_quiet_malformed_values_do_not() {
        let loud = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(LoudEvents(loud.clone()));
        let params = ParamPackage::parse("port:two");

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(params.get("button", 7), 7);
            assert_eq!(params.get_str("engine", "any"), "any");
            assert_eq!(loud.load(Ordering::SeqCst), 0);

            assert_eq!(params.get("port", 0), 0);
            assert_eq!(loud.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn parses_engine_and_code() {
        let params = ParamPackage::parse("engine:keyboard,code:23");
        assert_eq!(params.get_str("engine", ""), "keyboard");
        assert_eq!(params.get("code", 0), 23);
    }

    #[test]
    fn empty_sentinel_both_ways() {
        assert_eq!(ParamPackage::new().serialize(), "[empty]");
        assert!(ParamPackage::parse("[empty]").is_empty());
    }

    #[test]
    fn reserved_characters_survive() {
        let mut params = ParamPackage::new();
        params.set("display", "Pad: 1, $2".to_string());
        params.set("a$0", "$1:$".to_string());

        let wire = params.serialize();
        assert!(!wire.contains("Pad:"));
        assert_eq!(ParamPackage::parse(&wire), params);
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let params = ParamPackage::parse("engine:gamepad,broken,a:b:c,port:2");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("port", 0), 2);
        assert!(!params.has("broken"));
    }

    #[test]
    fn malformed_numbers_fall_back_to_default() {
        let params = ParamPackage::parse("port:two,scale:0.5x");
        assert_eq!(params.get("port", 7), 7);
        assert_eq!(params.get("scale", 1.5f32), 1.5);
        assert_eq!(params.get("missing", -1), -1);
    }

    #[test]
    fn booleans_only_accept_zero_and_one() {
        let params = ParamPackage::parse("on:1,off:0,yes:true,two:2");
        assert!(params.get("on", false));
        assert!(!params.get("off", true));
        assert!(params.get("yes", true));
        assert!(!params.get("two", false));
    }

    #[test]
    fn set_overwrites_and_keeps_position() {
        let mut params = ParamPackage::parse("engine:gamepad,port:0,guid:abc");
        params.set("port", 3);
        assert_eq!(params.serialize(), "engine:gamepad,port:3,guid:abc");

        params.erase("port");
        assert!(!params.has("port"));
        params.clear();
        assert_eq!(params.serialize(), EMPTY_PACKAGE);
    }
}
