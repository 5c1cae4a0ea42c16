use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use regex::Regex;
use serde_yaml::Value;

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = key.as_str().unwrap_or_default();
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => panic!("unexpected value at {prefix}: {other:?}"),
    }
}

fn load(locale: &str) -> BTreeMap<String, String> {
    let path = format!("locales/{locale}.yml");
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
    let value: Value =
        serde_yaml::from_str(&text).unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));
    let mut out = BTreeMap::new();
    flatten("", &value, &mut out);
    out
}

fn placeholders(text: &str) -> BTreeSet<String> {
    let re = Regex::new(r"%\{(\w+)\}").unwrap();
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

#[test]
fn every_locale_has_the_same_keys() {
    let en = load("en");
    for locale in ["ja"] {
        let other = load(locale);
        let missing: Vec<_> = en.keys().filter(|k| !other.contains_key(*k)).collect();
        let extra: Vec<_> = other.keys().filter(|k| !en.contains_key(*k)).collect();
        assert!(missing.is_empty(), "{locale} is missing {missing:?}");
        assert!(extra.is_empty(), "{locale} has unknown keys {extra:?}");
    }
}

#[test]
fn placeholders_match_across_locales() {
    let en = load("en");
    let ja = load("ja");
    for (key, text) in &en {
        let Some(translated) = ja.get(key) else {
            continue;
        };
        assert_eq!(
            placeholders(text),
            placeholders(translated),
            "placeholders differ for {key}"
        );
    }
}

#[test]
fn no_translation_is_empty() {
    for locale in ["en", "ja"] {
        for (key, text) in load(locale) {
            assert!(!text.trim().is_empty(), "{locale}: {key} is empty");
        }
    }
}
