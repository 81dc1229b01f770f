//! Variable helpers shared by the inventory pipeline.
//!
//! Host variables are kept as [`serde_yaml::Mapping`] so that nested values
//! from definition files survive untouched and insertion order is preserved.

use serde_yaml::{Mapping, Value};

/// A set of host variables.
pub type Vars = Mapping;

/// Merge `b` into a copy of `a`, with `a` winning every conflict.
///
/// Keys only present in `b` are added. Where both sides hold a mapping the
/// two are merged recursively under the same rule. Any other collision keeps
/// the value from `a` and is not reported. Neither input is modified.
///
/// ```
/// use fs_inventory::vars::merge;
///
/// let a: serde_yaml::Mapping = serde_yaml::from_str("a: 1").unwrap();
/// let b: serde_yaml::Mapping = serde_yaml::from_str("{a: 2, b: 3}").unwrap();
/// let merged = merge(&a, &b);
/// assert_eq!(merged, serde_yaml::from_str::<serde_yaml::Mapping>("{a: 1, b: 3}").unwrap());
/// ```
pub fn merge(a: &Mapping, b: &Mapping) -> Mapping {
    if a.is_empty() {
        return b.clone();
    }
    if b.is_empty() {
        return a.clone();
    }

    let mut merged = a.clone();
    for (key, b_value) in b {
        match merged.get_mut(key) {
            Some(Value::Mapping(a_map)) => {
                if let Value::Mapping(b_map) = b_value {
                    *a_map = merge(a_map, b_map);
                }
            }
            Some(_) => {}
            None => {
                merged.insert(key.clone(), b_value.clone());
            }
        }
    }
    merged
}

/// Render a scalar YAML value as a string.
///
/// Returns `None` for null, sequences, mappings and tagged values.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether a value counts as "set" for the purpose of host derivations.
///
/// Null, `false`, zero and empty strings or collections are not set.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Collect the scalar items of a sequence value as strings.
///
/// Anything that is not a sequence yields an empty list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_sequence)
        .map(|seq| seq.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default()
}

/// Copy of `vars` in which every key is a string, at every nesting level.
///
/// Numeric and boolean keys are rendered as strings. Null, list, mapping and
/// tagged keys cannot name a variable: those entries are dropped, as is a
/// rendered key that collides with one already present. Each dropped entry is
/// described in the returned list.
pub fn string_keyed(vars: &Mapping) -> (Mapping, Vec<String>) {
    let mut dropped = Vec::new();
    let cleaned = string_keyed_mapping(vars, "", &mut dropped);
    (cleaned, dropped)
}

fn string_keyed_mapping(mapping: &Mapping, parent: &str, dropped: &mut Vec<String>) -> Mapping {
    let mut cleaned = Mapping::with_capacity(mapping.len());

    for (key, value) in mapping {
        let Some(name) = scalar_to_string(key) else {
            let location = if parent.is_empty() { "top level" } else { parent };
            dropped.push(format!("dropped {} key at {location}", key_kind(key)));
            continue;
        };
        let path = if parent.is_empty() {
            name.clone()
        } else {
            format!("{parent}.{name}")
        };

        let key = Value::String(name);
        if cleaned.contains_key(&key) {
            dropped.push(format!("dropped duplicate key '{path}'"));
            continue;
        }
        let value = string_keyed_value(value, &path, dropped);
        cleaned.insert(key, value);
    }
    cleaned
}

fn string_keyed_value(value: &Value, path: &str, dropped: &mut Vec<String>) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(string_keyed_mapping(mapping, path, dropped)),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| string_keyed_value(item, &format!("{path}[{i}]"), dropped))
                .collect(),
        ),
        Value::Tagged(tagged) => {
            let mut tagged = (**tagged).clone();
            tagged.value = string_keyed_value(&tagged.value, path, dropped);
            Value::Tagged(Box::new(tagged))
        }
        other => other.clone(),
    }
}

fn key_kind(key: &Value) -> &'static str {
    match key {
        Value::Null => "a null",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged",
        _ => "a scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_merge_first_argument_wins() {
        let merged = merge(&mapping("a: 1"), &mapping("{a: 2, b: 3}"));
        assert_eq!(merged, mapping("{a: 1, b: 3}"));
    }

    #[test]
    fn test_merge_nested_mappings() {
        let a = mapping("net: {ip: 10.0.0.1, vlan: 10}");
        let b = mapping("net: {ip: 10.0.0.2, mask: 24}\nextra: true");
        let merged = merge(&a, &b);
        assert_eq!(
            merged,
            mapping("net: {ip: 10.0.0.1, vlan: 10, mask: 24}\nextra: true")
        );
    }

    #[test]
    fn test_merge_mapping_against_scalar_keeps_first() {
        let merged = merge(&mapping("net: {ip: 10.0.0.1}"), &mapping("net: dhcp"));
        assert_eq!(merged, mapping("net: {ip: 10.0.0.1}"));

        let merged = merge(&mapping("net: dhcp"), &mapping("net: {ip: 10.0.0.1}"));
        assert_eq!(merged, mapping("net: dhcp"));
    }

    #[test]
    fn test_merge_empty_inputs() {
        let filled = mapping("a: 1");
        assert_eq!(merge(&Mapping::new(), &filled), filled);
        assert_eq!(merge(&filled, &Mapping::new()), filled);
        assert!(merge(&Mapping::new(), &Mapping::new()).is_empty());
    }

    #[test]
    fn test_merge_empty_nested_takes_other_side() {
        let merged = merge(&mapping("net: {}"), &mapping("net: {ip: 10.0.0.1}"));
        assert_eq!(merged, mapping("net: {ip: 10.0.0.1}"));
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let a = mapping("a: 1");
        let b = mapping("b: 2");
        let _ = merge(&a, &b);
        assert_eq!(a, mapping("a: 1"));
        assert_eq!(b, mapping("b: 2"));
    }

    #[test]
    fn test_merge_preserves_key_order_of_first() {
        let merged = merge(&mapping("{z: 1, a: 2}"), &mapping("{m: 3}"));
        let keys: Vec<_> = merged.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::from("")));
        assert!(!is_truthy(&Value::from(0)));
        assert!(is_truthy(&Value::from("10.1.1.1")));
        assert!(is_truthy(&Value::from(true)));
    }

    #[test]
    fn test_string_keyed_renders_scalar_keys() {
        let (cleaned, dropped) = string_keyed(&mapping("{1: one, true: yes, name: web}"));
        assert_eq!(cleaned, mapping("{'1': one, 'true': yes, name: web}"));
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_string_keyed_drops_unnameable_keys() {
        let mut rule = mapping("port: 22");
        rule.insert(Value::Mapping(mapping("x: 1")), Value::from("y"));
        let mut vars = mapping("~: oops\n[a, b]: list\nnet:\n  ~: nested\n  ip: 10.0.0.1");
        vars.insert("rules".into(), Value::Sequence(vec![Value::Mapping(rule)]));
        vars.insert("owner".into(), "ops".into());

        let (cleaned, dropped) = string_keyed(&vars);
        assert_eq!(
            cleaned,
            mapping("{net: {ip: 10.0.0.1}, rules: [{port: 22}], owner: ops}")
        );
        assert_eq!(
            dropped,
            vec![
                "dropped a null key at top level",
                "dropped a list key at top level",
                "dropped a null key at net",
                "dropped a mapping key at rules[0]",
            ]
        );
    }

    #[test]
    fn test_string_keyed_drops_colliding_keys() {
        let (cleaned, dropped) = string_keyed(&mapping("{'1': first, 1: second}"));
        assert_eq!(cleaned, mapping("{'1': first}"));
        assert_eq!(dropped, vec!["dropped duplicate key '1'"]);
    }

    #[test]
    fn test_string_list() {
        let value: Value = serde_yaml::from_str("[web, 42, {x: 1}]").unwrap();
        assert_eq!(string_list(Some(&value)), vec!["web", "42"]);
        assert!(string_list(Some(&Value::from("web"))).is_empty());
        assert!(string_list(None).is_empty());
    }
}
