use serde_json::{Map, Value};

const NAME_KEYS: &[&str] = &["name", "nom", "full_name"];
const EMAIL_KEYS: &[&str] = &["email", "mail"];
const YEARS_KEYS: &[&str] = &["years_exp", "years_experience", "experience", "années_exp", "annees_exp"];
const SKILLS_KEYS: &[&str] = &["skills", "compétences", "competences"];
const AVAILABILITY_KEYS: &[&str] = &["availability", "disponibilité", "disponibilite"];
const INSTITUTION_KEYS: &[&str] = &["institution_tier", "school_tier"];
const DOCUMENT_KEYS: &[&str] = &["document", "cv", "resume"];

/// One raw input row. Fields are loosely typed and any of them may be
/// missing; accessors fall back to defaults instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Zero-based position in the source, used for stable tie-breaking.
    pub position: usize,
    fields: Map<String, Value>,
}

impl CandidateRecord {
    /// Keys are lower-cased and trimmed so "Name" and " name" both resolve.
    pub fn new(position: usize, fields: Map<String, Value>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(key, value)| (key.trim().to_lowercase(), value))
            .collect();
        Self { position, fields }
    }

    /// First non-null value among `aliases`.
    pub fn field(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| !value.is_null())
    }

    /// Text form of a field: strings as-is, lists joined with ", ",
    /// numbers and booleans formatted, missing as "".
    pub fn text(&self, aliases: &[&str]) -> String {
        self.field(aliases).map(value_to_text).unwrap_or_default()
    }

    pub fn name(&self) -> String {
        let name = self.text(NAME_KEYS);
        let name = name.trim();
        if name.is_empty() {
            "Unknown".to_string()
        } else {
            name.to_string()
        }
    }

    pub fn email(&self) -> String {
        self.text(EMAIL_KEYS).trim().to_string()
    }

    pub fn years_raw(&self) -> Option<&Value> {
        self.field(YEARS_KEYS)
    }

    pub fn skills(&self) -> String {
        self.text(SKILLS_KEYS)
    }

    pub fn availability(&self) -> String {
        self.text(AVAILABILITY_KEYS)
    }

    pub fn institution_tier(&self) -> Option<String> {
        let tier = self.text(INSTITUTION_KEYS);
        let tier = tier.trim();
        (!tier.is_empty()).then(|| tier.to_string())
    }

    /// Look up the categorical field used by a scoring bonus. Any institution
    /// tier alias resolves through all of them.
    pub fn category(&self, field: &str) -> Option<String> {
        let key = field.trim().to_lowercase();
        if INSTITUTION_KEYS.contains(&key.as_str()) {
            return self.institution_tier();
        }
        let value = self.text(&[key.as_str()]);
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn document_path(&self) -> Option<String> {
        let path = self.text(DOCUMENT_KEYS);
        let path = path.trim();
        (!path.is_empty()).then(|| path.to_string())
    }

    /// Compact JSON view of the record handed to the judge when no document
    /// is attached.
    pub fn summary_json(&self) -> String {
        let filtered: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(key, _)| !DOCUMENT_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(filtered).to_string()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
