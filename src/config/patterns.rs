use crate::error::{AuditError, Result};
use crate::locale::KEY_DELIMITER;
use regex::Regex;

/// A key candidate recovered by one rule, with its 1-indexed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    pub key: String,
    pub line: usize,
}

/// Outcome of vetting a raw captured string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A static, namespaced translation key
    Key(String),
    /// A key assembled at runtime (template literal); cannot be resolved statically
    Dynamic(String),
    /// Not a translation key (local variable, prose, etc.)
    Rejected,
}

/// Decide whether a captured string is a usable key path.
///
/// Keys must be namespaced (contain the delimiter), may not start with `$`,
/// and may not contain whitespace or empty segments.
pub fn classify_candidate(raw: &str) -> Candidate {
    if raw.contains("${") {
        return Candidate::Dynamic(raw.to_string());
    }
    if raw.starts_with('$') || !raw.contains(KEY_DELIMITER) {
        return Candidate::Rejected;
    }
    if raw.chars().any(char::is_whitespace) || raw.split(KEY_DELIMITER).any(str::is_empty) {
        return Candidate::Rejected;
    }
    Candidate::Key(raw.to_string())
}

/// Maps byte offsets to 1-indexed line numbers
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

/// One calling convention for "look up a translated string by key".
///
/// The regex must have exactly one capture group holding the raw key.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| AuditError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.captures_len() != 2 {
            return Err(AuditError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "expected exactly one capture group".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Every raw capture in `text`, in order of appearance
    pub fn find_keys(&self, text: &str, lines: &LineIndex) -> Vec<KeyMatch> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| KeyMatch {
                key: m.as_str().to_string(),
                line: lines.line_of(m.start()),
            })
            .collect()
    }
}

fn builtin(name: &str, pattern: &str) -> PatternRule {
    match PatternRule::new(name, pattern) {
        Ok(rule) => rule,
        Err(e) => unreachable!("built-in rule '{}' failed to compile: {}", name, e),
    }
}

/// Default extraction rules for react-i18next / vue-i18n / react-intl style code
pub fn default_patterns() -> Vec<PatternRule> {
    vec![
        // t('key'), t("key"), t(`key`), t('key', {...}); also i18n.t( / $t( / I18n.t(
        builtin("t-call", r#"\bt\(\s*['"`]([^'"`]+)['"`]\s*[,)]"#),
        // <Trans i18nKey="key" />
        builtin("i18n-key-attr", r#"i18nKey\s*=\s*\{?\s*['"`]([^'"`]+)['"`]"#),
        // useTranslation('namespace')
        builtin("use-translation", r#"useTranslation\(\s*['"`]([^'"`]+)['"`]\s*\)"#),
        // <FormattedMessage id="key" />
        builtin("formatted-message", r#"<FormattedMessage\s[^>]*?\bid=\s*['"]([^'"]+)['"]"#),
        // defineMessages({ greeting: { id: 'key', ... } })
        builtin("define-messages", r#"\bid:\s*['"]([^'"]+)['"]"#),
    ]
}
