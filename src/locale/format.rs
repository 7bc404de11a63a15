use serde_json::{Map, Number, Value};
use std::path::Path;
use yaml_rust::yaml::Hash;
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

use super::tree::{LocaleNode, LocaleTree};

/// Persisted document format of a locale catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleFormat {
    Json,
    Yaml,
}

impl LocaleFormat {
    /// Pick the format from a file extension (`json`, `yml`, `yaml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(LocaleFormat::Json),
            "yml" | "yaml" => Some(LocaleFormat::Yaml),
            _ => None,
        }
    }

    /// File extensions tried, in order, when looking up a language's catalog
    pub fn candidate_extensions() -> &'static [&'static str] {
        &["json", "yml", "yaml"]
    }

    /// Parse a document into a tree. The error string is the parser's reason.
    pub fn load(self, text: &str) -> std::result::Result<LocaleTree, String> {
        match self {
            LocaleFormat::Json => load_json(text),
            LocaleFormat::Yaml => load_yaml(text),
        }
    }

    /// Deterministic re-encoding with a single trailing newline.
    ///
    /// YAML output is reloaded before it is returned: the emitter leaves some
    /// number-like strings (`0o17`) unquoted, and a document that would read
    /// back differently is rejected rather than written.
    pub fn serialize(self, tree: &LocaleTree) -> std::result::Result<String, String> {
        let mut out = match self {
            LocaleFormat::Json => serde_json::to_string_pretty(&tree_to_json(tree))
                .map_err(|e| e.to_string())?,
            LocaleFormat::Yaml => {
                let mut out = String::new();
                YamlEmitter::new(&mut out)
                    .dump(&tree_to_yaml(tree))
                    .map_err(|e| format!("{:?}", e))?;
                let reloaded = load_yaml(&out)
                    .map_err(|e| format!("Emitted YAML does not reload: {}", e))?;
                if let Some(path) = first_divergence(tree, &reloaded) {
                    return Err(format!(
                        "Value at '{}' would not read back unchanged from YAML",
                        path
                    ));
                }
                out
            }
        };
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        out.push('\n');
        Ok(out)
    }

    /// Whether `text` carries comments that a rewrite of the document would drop
    pub fn has_comments(self, text: &str) -> bool {
        match self {
            LocaleFormat::Json => strip_json_comments(text).len() != text.len(),
            LocaleFormat::Yaml => text.lines().any(yaml_line_has_comment),
        }
    }
}

/// First key path whose node differs between the two trees
fn first_divergence(expected: &LocaleTree, actual: &LocaleTree) -> Option<String> {
    if expected == actual {
        return None;
    }
    expected
        .key_paths()
        .into_iter()
        .chain(actual.key_paths())
        .find(|path| expected.get(path) != actual.get(path))
        .or_else(|| Some("<root>".to_string()))
}

/// A `#` outside quoted scalars, at line start or after whitespace
fn yaml_line_has_comment(line: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut prev = ' ';
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match quote {
            Some('"') if ch == '\\' => {
                chars.next();
            }
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if (ch == '"' || ch == '\'') && (prev.is_whitespace() || "[{,".contains(prev)) => {
                quote = Some(ch)
            }
            None if ch == '#' && prev.is_whitespace() => return true,
            None => {}
        }
        prev = ch;
    }
    false
}

fn load_json(text: &str) -> std::result::Result<LocaleTree, String> {
    let cleaned = strip_json_comments(text);
    let root: Value =
        serde_json::from_str(&cleaned).map_err(|e| format!("Invalid JSON syntax: {}", e))?;
    match root {
        Value::Object(map) => Ok(tree_from_json(map)),
        other => Err(format!(
            "Expected an object at the document root, found {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn tree_from_json(map: Map<String, Value>) -> LocaleTree {
    let mut tree = LocaleTree::new();
    for (key, value) in map {
        let node = match value {
            Value::Object(child) => LocaleNode::Branch(tree_from_json(child)),
            Value::String(s) => LocaleNode::Text(s),
            other => LocaleNode::Literal(other),
        };
        tree.insert(key, node);
    }
    tree
}

fn tree_to_json(tree: &LocaleTree) -> Value {
    let mut map = Map::new();
    for (key, node) in tree.iter() {
        let value = match node {
            LocaleNode::Text(s) => Value::String(s.clone()),
            LocaleNode::Branch(child) => tree_to_json(child),
            LocaleNode::Literal(v) => v.clone(),
        };
        map.insert(key.clone(), value);
    }
    Value::Object(map)
}

/// Strip `//` and `/* */` comments outside of string literals, keeping line breaks
fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

fn load_yaml(text: &str) -> std::result::Result<LocaleTree, String> {
    let docs = YamlLoader::load_from_str(text).map_err(|e| format!("Invalid YAML syntax: {}", e))?;
    match docs.into_iter().next() {
        None => Ok(LocaleTree::new()),
        Some(Yaml::Hash(hash)) => tree_from_yaml(hash),
        Some(_) => Err("Expected a mapping at the document root".to_string()),
    }
}

fn tree_from_yaml(hash: Hash) -> std::result::Result<LocaleTree, String> {
    let mut tree = LocaleTree::new();
    for (key, value) in hash {
        let key = match key {
            Yaml::String(s) => s,
            Yaml::Integer(i) => i.to_string(),
            Yaml::Boolean(b) => b.to_string(),
            other => return Err(format!("Unsupported mapping key {:?}", other)),
        };
        let node = match value {
            Yaml::Hash(child) => LocaleNode::Branch(tree_from_yaml(child)?),
            Yaml::String(s) => LocaleNode::Text(s),
            other => LocaleNode::Literal(yaml_scalar_to_json(other)?),
        };
        tree.insert(key, node);
    }
    Ok(tree)
}

fn yaml_scalar_to_json(yaml: Yaml) -> std::result::Result<Value, String> {
    Ok(match yaml {
        Yaml::Null | Yaml::BadValue => Value::Null,
        Yaml::Boolean(b) => Value::Bool(b),
        Yaml::Integer(i) => Value::Number(i.into()),
        Yaml::Real(r) => r
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(r)),
        Yaml::String(s) => Value::String(s),
        Yaml::Array(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_scalar_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Hash(hash) => {
            let mut map = Map::new();
            for (k, v) in hash {
                let key = k
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("Unsupported mapping key {:?}", k))?;
                map.insert(key, yaml_scalar_to_json(v)?);
            }
            Value::Object(map)
        }
        Yaml::Alias(_) => return Err("YAML aliases are not supported".to_string()),
    })
}

fn tree_to_yaml(tree: &LocaleTree) -> Yaml {
    let mut hash = Hash::new();
    for (key, node) in tree.iter() {
        let value = match node {
            LocaleNode::Text(s) => Yaml::String(s.clone()),
            LocaleNode::Branch(child) => tree_to_yaml(child),
            LocaleNode::Literal(v) => json_to_yaml(v),
        };
        hash.insert(Yaml::String(key.clone()), value);
    }
    Yaml::Hash(hash)
}

fn json_to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Array(items) => Yaml::Array(items.iter().map(json_to_yaml).collect()),
        Value::Object(map) => {
            let mut hash = Hash::new();
            for (k, v) in map {
                hash.insert(Yaml::String(k.clone()), json_to_yaml(v));
            }
            Yaml::Hash(hash)
        }
    }
}
