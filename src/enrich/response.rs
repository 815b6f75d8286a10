//! Turning a model answer into per-name enrichment.
//!
//! Models do not always follow the requested layout. The body is classified once into a
//! [`ResponseShape`] and every requested name is then looked up against that shape, with a
//! positional fallback before the name is given up on.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::AiError;
use crate::model::EnrichmentFields;
use crate::normalization::match_key;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{ "<exact name>": {...}, ... }`, the layout the prompt asks for.
    NameKeyed(Map<String, Value>),
    /// `{ "1": {...}, "2": {...} }`. Zero-based when a `"0"` key is present.
    IndexKeyed { entries: Map<String, Value>, zero_based: bool },
    /// `[ {...}, {...} ]`, either positional objects or `{ "<name>": {...} }` wrappers.
    ArrayForm(Vec<Value>),
}

/// Names the model answered usefully, and names it did not.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedBatch {
    pub enriched: Vec<(String, EnrichmentFields)>,
    pub skipped: Vec<String>,
}

pub fn strip_code_fences(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    // drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn is_index_key(k: &str) -> bool {
    !k.is_empty() && k.chars().all(|c| c.is_ascii_digit())
}

fn has_name_key(map: &Map<String, Value>, names: &[String]) -> bool {
    names.iter().any(|n| find_by_name(map, n).is_some())
}

/// Position of the key answering `name`: exact first, then accent- and case-insensitive.
fn position_of(map: &Map<String, Value>, name: &str) -> Option<usize> {
    map.keys().position(|k| k == name).or_else(|| {
        let wanted = match_key(name);
        map.keys().position(|k| match_key(k) == wanted)
    })
}

fn find_by_name<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    position_of(map, name).and_then(|i| map.values().nth(i))
}

pub fn classify(root: Value, names: &[String]) -> Result<ResponseShape, AiError> {
    match root {
        Value::Array(items) => Ok(ResponseShape::ArrayForm(items)),
        Value::Object(map) => {
            if has_name_key(&map, names) {
                return Ok(ResponseShape::NameKeyed(map));
            }
            if !map.is_empty() && map.keys().all(|k| is_index_key(k)) {
                let zero_based = map.contains_key("0");
                return Ok(ResponseShape::IndexKeyed { entries: map, zero_based });
            }
            // single wrapper key such as {"athletes": [...]}
            if map.len() == 1 {
                if let Some(inner) = map.values().next() {
                    if inner.is_array() || (inner.is_object() && inner.get("phonetic").is_none()) {
                        return classify(inner.clone(), names);
                    }
                }
            }
            Ok(ResponseShape::NameKeyed(map))
        }
        other => Err(AiError::AiResponseMalformed(format!(
            "expected object or array, got {}",
            crate::error::truncate_for_log(&other.to_string(), 80)
        ))),
    }
}

impl ResponseShape {
    fn len(&self) -> usize {
        match self {
            ResponseShape::NameKeyed(map) => map.len(),
            ResponseShape::IndexKeyed { entries, .. } => entries.len(),
            ResponseShape::ArrayForm(items) => items.len(),
        }
    }

    /// Position of the entry that names `name` explicitly, if any.
    fn named_position(&self, name: &str) -> Option<usize> {
        match self {
            ResponseShape::NameKeyed(map) => position_of(map, name),
            ResponseShape::IndexKeyed { .. } => None,
            ResponseShape::ArrayForm(items) => items
                .iter()
                .position(|item| item.as_object().is_some_and(|o| position_of(o, name).is_some())),
        }
    }

    fn at(&self, pos: usize) -> Option<&Value> {
        match self {
            ResponseShape::NameKeyed(map) => map.values().nth(pos),
            ResponseShape::IndexKeyed { .. } => None,
            ResponseShape::ArrayForm(items) => items.get(pos),
        }
    }

    /// Raw entry for every requested name, in request order.
    ///
    /// An entry matched by name belongs to that name only. A name with no match falls back to
    /// the entry at its own position, provided the answer has one entry per name and no other
    /// name claimed that entry.
    fn entries_for(&self, names: &[String]) -> Vec<Option<&Value>> {
        if let ResponseShape::IndexKeyed { entries, zero_based } = self {
            return (0..names.len())
                .map(|idx| {
                    let key = if *zero_based { idx } else { idx + 1 };
                    entries.get(&key.to_string())
                })
                .collect();
        }
        let named: Vec<Option<usize>> = names.iter().map(|n| self.named_position(n)).collect();
        let positional = self.len() == names.len();
        named
            .iter()
            .enumerate()
            .map(|(idx, pos)| match pos {
                Some(p) => self.at(*p),
                None if positional && !named.contains(&Some(idx)) => self.at(idx),
                None => None,
            })
            .collect()
    }
}

/// Text form of a field value: strings trimmed, numbers stringified, single-string objects unwrapped.
fn coerce(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) if o.len() == 1 => o.values().next().and_then(coerce),
        _ => None,
    }
}

fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(coerce))
}

fn fields_from(entry: &Value, name: &str) -> Option<EnrichmentFields> {
    let mut obj = entry.as_object()?;
    // the model sometimes nests the answer under the name again
    if !obj.contains_key("phonetic") {
        if let Some(inner) = find_by_name(obj, name).and_then(Value::as_object) {
            obj = inner;
        }
    }
    let phonetic = field(obj, &["phonetic", "phonetic_name"]);
    let hardware_safe = field(obj, &["hardware_safe", "hardware_safe_name", "hardwareSafe"]);
    if phonetic.is_none() && hardware_safe.is_none() {
        return None;
    }
    Some(EnrichmentFields {
        phonetic_name: phonetic,
        ipa_name: field(obj, &["ipa", "ipa_name"]),
        chinese_name: field(obj, &["chinese", "chinese_name"]),
        hardware_safe_name: hardware_safe,
    }
    .with_fallbacks(name))
}

/// Parse a model answer for `names`. Only an unreadable body is an error; names without usable
/// data are reported in `skipped` and left for a later run.
pub fn parse_response(text: &str, names: &[String]) -> Result<ParsedBatch, AiError> {
    let body = strip_code_fences(text);
    let root: Value = serde_json::from_str(body).map_err(|e| {
        AiError::AiResponseMalformed(format!(
            "{e}: {}",
            crate::error::truncate_for_log(body, 120)
        ))
    })?;
    let shape = classify(root, names)?;

    let mut out = ParsedBatch::default();
    for (name, entry) in names.iter().zip(shape.entries_for(names)) {
        match entry.and_then(|e| fields_from(e, name)) {
            Some(fields) => out.enriched.push((name.clone(), fields)),
            None => {
                warn!(target = "enrich", player = %name, "no usable enrichment in model answer");
                out.skipped.push(name.clone());
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_keyed_inside_code_fence() {
        let text = "```json\n{\"Luka Doncic\": {\"phonetic\": \"LOO-kah DON-chich\", \"ipa\": \"/ˈluːka/\", \"chinese\": \"卢卡·东契奇\", \"hardware_safe\": \"LUKA DONCIC\"}}\n```";
        let parsed = parse_response(text, &names(&["Luka Doncic"])).unwrap();
        assert!(parsed.skipped.is_empty());
        let (name, f) = &parsed.enriched[0];
        assert_eq!(name, "Luka Doncic");
        assert_eq!(f.chinese_name.as_deref(), Some("卢卡·东契奇"));
        assert_eq!(f.hardware_safe_name.as_deref(), Some("LUKA DONCIC"));
    }

    #[test]
    fn index_keyed_one_and_zero_based() {
        let ns = names(&["A Player", "B Player"]);
        let one = r#"{"1": {"phonetic": "ay"}, "2": {"phonetic": "bee"}}"#;
        let p = parse_response(one, &ns).unwrap();
        assert_eq!(p.enriched[1].1.phonetic_name.as_deref(), Some("bee"));

        let zero = r#"{"0": {"phonetic": "ay"}, "1": {"phonetic": "bee"}}"#;
        let p = parse_response(zero, &ns).unwrap();
        assert_eq!(p.enriched[0].1.phonetic_name.as_deref(), Some("ay"));
        assert_eq!(p.enriched[1].1.phonetic_name.as_deref(), Some("bee"));
    }

    #[test]
    fn array_form_wrapped_and_positional() {
        let ns = names(&["A Player", "B Player"]);
        let wrapped = r#"[{"B Player": {"phonetic": "bee"}}, {"A Player": {"phonetic": "ay"}}]"#;
        let p = parse_response(wrapped, &ns).unwrap();
        assert_eq!(p.enriched[0].1.phonetic_name.as_deref(), Some("ay"));

        let positional = r#"[{"phonetic": "ay"}, {"phonetic": "bee", "ipa": 42}]"#;
        let p = parse_response(positional, &ns).unwrap();
        assert_eq!(p.enriched[1].1.ipa_name.as_deref(), Some("42"));
    }

    #[test]
    fn coercion_and_fallbacks() {
        let ns = names(&["José Ramírez"]);
        let text = r#"{"Jose Ramirez": {"phonetic": {"text": "ho-ZAY"}, "chinese": ["x"]}}"#;
        let p = parse_response(text, &ns).unwrap();
        let f = &p.enriched[0].1;
        assert_eq!(f.phonetic_name.as_deref(), Some("ho-ZAY"));
        assert_eq!(f.chinese_name, None);
        assert_eq!(f.hardware_safe_name.as_deref(), Some("JOSE RAMIREZ"));
    }

    #[test]
    fn nested_under_name_is_unwrapped() {
        let ns = names(&["A Player"]);
        let text = r#"{"A Player": {"A Player": {"phonetic": "ay"}}}"#;
        let p = parse_response(text, &ns).unwrap();
        assert_eq!(p.enriched[0].1.phonetic_name.as_deref(), Some("ay"));
    }

    #[test]
    fn incomplete_entries_are_skipped() {
        let ns = names(&["A Player", "B Player"]);
        let text = r#"{"A Player": {"ipa": "/eɪ/"}, "B Player": {"hardware_safe": "B PLAYER"}}"#;
        let p = parse_response(text, &ns).unwrap();
        assert_eq!(p.skipped, vec!["A Player"]);
        assert_eq!(p.enriched.len(), 1);
        // a stored answer always carries a phonetic form
        assert_eq!(p.enriched[0].1.phonetic_name.as_deref(), Some("B Player"));
    }

    #[test]
    fn entry_claimed_by_name_is_not_reused_positionally() {
        let ns = names(&["A Player", "B Player"]);
        let text = r#"{"Bee Plaier": {"phonetic": "bee"}, "A Player": {"phonetic": "ay"}}"#;
        let p = parse_response(text, &ns).unwrap();
        assert_eq!(p.enriched.len(), 1);
        assert_eq!(p.enriched[0].0, "A Player");
        assert_eq!(p.enriched[0].1.phonetic_name.as_deref(), Some("ay"));
        assert_eq!(p.skipped, vec!["B Player"]);

        let wrapped = r#"[{"Bee Plaier": {"phonetic": "bee"}}, {"A Player": {"phonetic": "ay"}}]"#;
        let p = parse_response(wrapped, &ns).unwrap();
        assert_eq!(p.skipped, vec!["B Player"]);
    }

    #[test]
    fn unclaimed_entry_still_falls_back_by_position() {
        let ns = names(&["A Player", "B Player"]);
        let text = r#"{"A Player": {"phonetic": "ay"}, "Bee Plaier": {"phonetic": "bee"}}"#;
        let p = parse_response(text, &ns).unwrap();
        assert!(p.skipped.is_empty());
        assert_eq!(p.enriched[1].1.phonetic_name.as_deref(), Some("bee"));
    }

    #[test]
    fn unreadable_body_is_malformed() {
        let ns = names(&["A"]);
        assert!(matches!(
            parse_response("Sure! Here you go:", &ns),
            Err(AiError::AiResponseMalformed(_))
        ));
        assert!(matches!(parse_response("42", &ns), Err(AiError::AiResponseMalformed(_))));
    }
}
