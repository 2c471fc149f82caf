use serde_json::{Map, Value, json};

pub const DEFAULT_INDENT: usize = 4;
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Engine configuration as a JSON object addressed by dotted paths.
///
/// Recognised keys:
/// - `generate.indent`: spaces per nesting level in generated text (default 4)
/// - `flowchart.keyword`: `flowchart` or `graph`, the header written by the generator
/// - `gantt.dateFormat`: date format assumed by gantt charts without a `dateFormat` line
#[derive(Debug, Clone, PartialEq)]
pub struct Config(Value);

impl Default for Config {
    fn default() -> Self {
        Self(json!({
            "generate": { "indent": DEFAULT_INDENT },
            "flowchart": { "keyword": "flowchart" },
            "gantt": { "dateFormat": DEFAULT_DATE_FORMAT },
        }))
    }
}

impl Config {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.get(dotted_path)?.as_u64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Non-object roots are replaced so this never panics on user-supplied JSON.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    pub fn indent(&self) -> usize {
        self.get_u64("generate.indent")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_INDENT)
    }

    pub fn flowchart_keyword(&self) -> &str {
        match self.get_str("flowchart.keyword") {
            Some("graph") => "graph",
            _ => "flowchart",
        }
    }

    pub fn gantt_date_format(&self) -> &str {
        self.get_str("gantt.dateFormat")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
