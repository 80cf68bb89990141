//! Record validation for Curadoria
//!
//! Turns one raw fragment entry into a typed [`Material`], or explains every
//! reason it cannot. Title uniqueness is tracked through an explicit
//! [`TitleSet`] owned by the caller's run, so independent runs never share
//! state.

use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::schema::{keys, Comment, Material, Token, UnknownToken};
use crate::storage::fragment::RawRecord;

/// Keys a material entry may carry
const KNOWN_KEYS: &[&str] = &[
    keys::TITLE,
    keys::AUTHOR,
    keys::URL,
    keys::SUBJECTS,
    keys::FORMAT,
    keys::MINUTES_REQUIRED,
    keys::PREREQUISITES,
    keys::PACE,
    keys::LEARNING_STYLE,
    keys::LANGUAGE,
    keys::DIFFICULTY,
    keys::IS_FREE,
    keys::RECOMMENDED_BY,
    keys::COMMENTS,
    keys::SOURCE_PATH,
];

/// What is wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("missing required field")]
    Missing,

    #[error("must not be empty")]
    Empty,

    #[error("expected {0}")]
    WrongType(&'static str),

    #[error("must be greater than zero (got {0})")]
    NotPositive(i64),

    #[error("{0} is out of range")]
    OutOfRange(i64),

    #[error(transparent)]
    UnknownToken(#[from] UnknownToken),
}

/// A failing field/constraint pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Record key, with an index for list entries (`assuntos[2]`)
    pub field: String,
    pub problem: Problem,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.field, self.problem)
    }
}

/// Lowercase titles accepted so far in one run, with the fragment that
/// claimed each of them
#[derive(Debug, Default, Clone)]
pub struct TitleSet {
    seen: BTreeMap<String, String>,
}

impl TitleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment that first claimed `title`, compared case-insensitively
    pub fn first_seen(&self, title: &str) -> Option<&str> {
        self.seen.get(&title.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains_key(&title.to_lowercase())
    }

    fn insert(&mut self, title: &str, source_path: &str) {
        self.seen
            .insert(title.to_lowercase(), source_path.to_string());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Validate one raw record against the schema and the run's title set.
///
/// A duplicate title is rejected before any other check and leaves `titles`
/// untouched. Otherwise every field is checked and all failures are reported
/// together. Only an accepted record adds its title to `titles`.
pub fn validate_record(record: &RawRecord, titles: &mut TitleSet) -> Result<Material> {
    let Some(map) = record.value.as_mapping() else {
        return Err(Error::SchemaViolation {
            title: None,
            source_path: record.source_path.clone(),
            position: record.position,
            violations: vec![FieldViolation::new("entry", Problem::WrongType("a mapping"))],
        });
    };

    let title = map
        .get(keys::TITLE)
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty());

    if let Some(title) = title {
        if let Some(first_seen_in) = titles.first_seen(title) {
            return Err(Error::DuplicateTitle {
                title: title.to_string(),
                source_path: record.source_path.clone(),
                position: record.position,
                first_seen_in: first_seen_in.to_string(),
            });
        }
    }

    for key in map.keys() {
        match key.as_str() {
            Some(k) if KNOWN_KEYS.contains(&k) => {}
            _ => tracing::debug!(
                "Ignoring unknown key {:?} in {} (entry {})",
                key,
                record.source_path,
                record.position
            ),
        }
    }

    // Every field is checked before building so that all violations are reported.
    let mut fields = Fields::new(map);
    let checked_title = fields.string(keys::TITLE);
    let author = fields.string(keys::AUTHOR);
    let url = fields.string(keys::URL);
    let subjects = fields.token_set(keys::SUBJECTS, true);
    let format = fields.token(keys::FORMAT);
    let minutes_required = fields.positive_int(keys::MINUTES_REQUIRED);
    let prerequisites = fields.token_set(keys::PREREQUISITES, false);
    let pace = fields.token(keys::PACE);
    let learning_style = fields.token(keys::LEARNING_STYLE);
    let language = fields.token(keys::LANGUAGE);
    let difficulty = fields.token(keys::DIFFICULTY);
    let is_free = fields.boolean(keys::IS_FREE);
    let recommended_by = fields.identifiers(keys::RECOMMENDED_BY);
    let comments = fields.comments(keys::COMMENTS);

    let material = (|| {
        Some(Material {
            title: checked_title?,
            author: author?,
            url: url?,
            subjects: subjects?,
            format: format?,
            minutes_required: minutes_required?,
            prerequisites: prerequisites?,
            pace: pace?,
            learning_style: learning_style?,
            language: language?,
            difficulty: difficulty?,
            is_free: is_free?,
            recommended_by: recommended_by?,
            comments: comments?,
            source_path: record.source_path.clone(),
        })
    })();

    match material {
        Some(material) if fields.violations.is_empty() => {
            titles.insert(&material.title, &record.source_path);
            Ok(material)
        }
        _ => Err(Error::SchemaViolation {
            title: title.map(str::to_string),
            source_path: record.source_path.clone(),
            position: record.position,
            violations: fields.violations,
        }),
    }
}

/// Field accessor that records a violation for every failed lookup
struct Fields<'a> {
    map: &'a Mapping,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Mapping) -> Self {
        Self {
            map,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, field: impl Into<String>, problem: Problem) {
        self.violations.push(FieldViolation::new(field, problem));
    }

    fn required(&mut self, key: &'static str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => {
                self.fail(key, Problem::Missing);
                None
            }
            Some(value) => Some(value),
        }
    }

    fn optional(&self, key: &'static str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn string(&mut self, key: &'static str) -> Option<String> {
        let value = self.required(key)?;
        non_empty_string(value).map_err(|p| self.fail(key, p)).ok()
    }

    fn token<T: Token>(&mut self, key: &'static str) -> Option<T> {
        let value = self.required(key)?;
        match value.as_str() {
            Some(token) => match T::from_token(token) {
                Some(t) => Some(t),
                None => {
                    self.fail(key, UnknownToken::new::<T>(token).into());
                    None
                }
            },
            None => {
                self.fail(key, Problem::WrongType("a string"));
                None
            }
        }
    }

    fn token_set<T: Token>(&mut self, key: &'static str, required: bool) -> Option<BTreeSet<T>> {
        let value = if required {
            self.required(key)?
        } else {
            match self.optional(key) {
                Some(value) => value,
                None => return Some(BTreeSet::new()),
            }
        };

        let Some(items) = value.as_sequence() else {
            self.fail(key, Problem::WrongType("a list"));
            return None;
        };

        let mut set = BTreeSet::new();
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            let field = format!("{}[{}]", key, i + 1);
            match item.as_str() {
                Some(token) => match T::from_token(token) {
                    Some(t) => {
                        set.insert(t);
                    }
                    None => {
                        self.fail(field, UnknownToken::new::<T>(token).into());
                        valid = false;
                    }
                },
                None => {
                    self.fail(field, Problem::WrongType("a string"));
                    valid = false;
                }
            }
        }

        if valid && required && set.is_empty() {
            self.fail(key, Problem::Empty);
            valid = false;
        }

        valid.then_some(set)
    }

    fn positive_int(&mut self, key: &'static str) -> Option<u32> {
        let value = self.required(key)?;
        let Some(n) = value.as_i64() else {
            self.fail(key, Problem::WrongType("an integer"));
            return None;
        };
        if n <= 0 {
            self.fail(key, Problem::NotPositive(n));
            return None;
        }
        match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                self.fail(key, Problem::OutOfRange(n));
                None
            }
        }
    }

    fn boolean(&mut self, key: &'static str) -> Option<bool> {
        let value = self.required(key)?;
        let flag = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => yaml11_bool(s),
            _ => None,
        };
        match flag {
            Some(b) => Some(b),
            None => {
                self.fail(key, Problem::WrongType("true or false"));
                None
            }
        }
    }

    fn identifiers(&mut self, key: &'static str) -> Option<BTreeSet<String>> {
        let value = self.required(key)?;
        let Some(items) = value.as_sequence() else {
            self.fail(key, Problem::WrongType("a list"));
            return None;
        };

        let mut set = BTreeSet::new();
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            match non_empty_string(item) {
                Ok(id) => {
                    set.insert(id);
                }
                Err(problem) => {
                    self.fail(format!("{}[{}]", key, i + 1), problem);
                    valid = false;
                }
            }
        }

        if valid && set.is_empty() {
            self.fail(key, Problem::Empty);
            valid = false;
        }

        valid.then_some(set)
    }

    fn comments(&mut self, key: &'static str) -> Option<Vec<Comment>> {
        let Some(value) = self.optional(key) else {
            return Some(Vec::new());
        };
        let Some(items) = value.as_sequence() else {
            self.fail(key, Problem::WrongType("a list"));
            return None;
        };

        let mut comments = Vec::with_capacity(items.len());
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            let prefix = format!("{}[{}]", key, i + 1);
            let Some(entry) = item.as_mapping() else {
                self.fail(prefix, Problem::WrongType("a mapping"));
                valid = false;
                continue;
            };

            let author = self.comment_field(entry, &prefix, keys::COMMENT_AUTHOR);
            let text = self.comment_field(entry, &prefix, keys::COMMENT_TEXT);
            match (author, text) {
                (Some(author), Some(text)) => comments.push(Comment { author, text }),
                _ => valid = false,
            }
        }

        valid.then_some(comments)
    }

    fn comment_field(&mut self, entry: &Mapping, prefix: &str, key: &'static str) -> Option<String> {
        let field = format!("{}.{}", prefix, key);
        match entry.get(key).filter(|v| !v.is_null()) {
            None => {
                self.fail(field, Problem::Missing);
                None
            }
            Some(value) => non_empty_string(value).map_err(|p| self.fail(field, p)).ok(),
        }
    }
}

fn non_empty_string(value: &Value) -> std::result::Result<String, Problem> {
    match value.as_str() {
        Some(s) if s.trim().is_empty() => Err(Problem::Empty),
        Some(s) => Ok(s.to_string()),
        None => Err(Problem::WrongType("a string")),
    }
}

/// YAML 1.1 boolean spellings, which serde_yaml leaves as strings
fn yaml11_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" => Some(true),
        "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Format, Subject};

    const VALID: &str = r#"
titulo: Introdução ao Python
autoria: Jane Doe
url: https://example.com/python-course
assuntos: [python, programação básica, python]
formato: vídeo
minutos_necessarios: 90
prerequisitos: [matemática básica]
ritmo: médio
estilo_aprendizagem: visual
idioma: english
nivel_dificuldade: iniciante
eh_gratuito: true
recomendado_por: [camilamaia]
comentarios:
  - usuario: camilamaia
    texto: Adoro o capítulo 5!
"#;

    fn record(yaml: &str) -> RawRecord {
        RawRecord {
            source_path: "materials/test.yml".to_string(),
            position: 1,
            value: serde_yaml::from_str(yaml).unwrap(),
        }
    }

    fn with(key: &str, value: &str) -> RawRecord {
        let mut rec = record(VALID);
        let map = rec.value.as_mapping_mut().unwrap();
        map.insert(Value::from(key), serde_yaml::from_str(value).unwrap());
        rec
    }

    fn without(key: &str) -> RawRecord {
        let mut rec = record(VALID);
        rec.value.as_mapping_mut().unwrap().remove(key);
        rec
    }

    fn violations(result: Result<Material>) -> Vec<FieldViolation> {
        match result {
            Err(Error::SchemaViolation { violations, .. }) => violations,
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_record() {
        let mut titles = TitleSet::new();
        let material = validate_record(&record(VALID), &mut titles).unwrap();

        assert_eq!(material.format, Format::Video);
        assert_eq!(material.subjects.len(), 2);
        assert!(material.prerequisites.contains(&Subject::BasicMath));
        assert_eq!(material.comments.len(), 1);
        assert_eq!(material.source_path, "materials/test.yml");
        assert!(titles.contains("INTRODUÇÃO AO PYTHON"));
    }

    #[test]
    fn test_duplicate_title_is_case_insensitive() {
        let mut titles = TitleSet::new();
        validate_record(&record(VALID), &mut titles).unwrap();

        let dup = with(keys::TITLE, "introdução ao PYTHON");
        match validate_record(&dup, &mut titles) {
            Err(Error::DuplicateTitle { first_seen_in, .. }) => {
                assert_eq!(first_seen_in, "materials/test.yml")
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn test_rejected_record_does_not_claim_title() {
        let mut titles = TitleSet::new();
        let bad = with(keys::SUBJECTS, "[]");
        assert!(validate_record(&bad, &mut titles).is_err());
        assert!(titles.is_empty());

        // The same title is still available to a valid record
        assert!(validate_record(&record(VALID), &mut titles).is_ok());
    }

    #[test]
    fn test_empty_subjects_rejected() {
        let v = violations(validate_record(&with(keys::SUBJECTS, "[]"), &mut TitleSet::new()));
        assert_eq!(v, vec![FieldViolation::new(keys::SUBJECTS, Problem::Empty)]);
    }

    #[test]
    fn test_optional_fields_default() {
        let mut rec = without(keys::PREREQUISITES);
        rec.value.as_mapping_mut().unwrap().remove(keys::COMMENTS);
        let material = validate_record(&rec, &mut TitleSet::new()).unwrap();
        assert!(material.prerequisites.is_empty());
        assert!(material.comments.is_empty());
    }

    #[test]
    fn test_every_violation_reported() {
        let mut rec = without(keys::AUTHOR);
        let map = rec.value.as_mapping_mut().unwrap();
        map.insert(Value::from(keys::FORMAT), Value::from("vhs"));
        map.insert(Value::from(keys::MINUTES_REQUIRED), Value::from(0));
        map.insert(Value::from(keys::IS_FREE), Value::from("sim"));

        let v = violations(validate_record(&rec, &mut TitleSet::new()));
        let fields: Vec<&str> = v.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![keys::AUTHOR, keys::FORMAT, keys::MINUTES_REQUIRED, keys::IS_FREE]
        );
        assert_eq!(v[0].problem, Problem::Missing);
        assert!(matches!(v[1].problem, Problem::UnknownToken(_)));
        assert_eq!(v[2].problem, Problem::NotPositive(0));
        assert_eq!(v[3].problem, Problem::WrongType("true or false"));
    }

    #[test]
    fn test_list_entries_are_indexed() {
        let v = violations(validate_record(
            &with(keys::SUBJECTS, "[python, rust]"),
            &mut TitleSet::new(),
        ));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "assuntos[2]");

        let v = violations(validate_record(
            &with(keys::COMMENTS, "[{usuario: ana}]"),
            &mut TitleSet::new(),
        ));
        assert_eq!(v, vec![FieldViolation::new("comentarios[1].texto", Problem::Missing)]);
    }

    #[test]
    fn test_recommended_by_must_be_non_empty() {
        let v = violations(validate_record(
            &with(keys::RECOMMENDED_BY, "[]"),
            &mut TitleSet::new(),
        ));
        assert_eq!(v, vec![FieldViolation::new(keys::RECOMMENDED_BY, Problem::Empty)]);

        let v = violations(validate_record(
            &with(keys::RECOMMENDED_BY, "camilamaia"),
            &mut TitleSet::new(),
        ));
        assert_eq!(v[0].problem, Problem::WrongType("a list"));
    }

    #[test]
    fn test_yaml11_booleans_accepted() {
        let cases = [
            ("yes", true),
            ("On", true),
            ("'true'", true),
            ("no", false),
            ("off", false),
        ];
        for (raw, expected) in cases {
            let material =
                validate_record(&with("eh_gratuito", raw), &mut TitleSet::new()).unwrap();
            assert_eq!(material.is_free, expected, "{}", raw);
        }

        let v = violations(validate_record(&with("eh_gratuito", "talvez"), &mut TitleSet::new()));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "eh_gratuito");
        assert!(matches!(v[0].problem, Problem::WrongType(_)));
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let v = violations(validate_record(&with(keys::LANGUAGE, "English"), &mut TitleSet::new()));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, keys::LANGUAGE);
    }

    #[test]
    fn test_non_mapping_entry() {
        let rec = record("just a string");
        let v = violations(validate_record(&rec, &mut TitleSet::new()));
        assert_eq!(v[0].problem, Problem::WrongType("a mapping"));
    }

    #[test]
    fn test_loader_source_path_wins() {
        let rec = with(keys::SOURCE_PATH, "elsewhere/other.yml");
        let material = validate_record(&rec, &mut TitleSet::new()).unwrap();
        assert_eq!(material.source_path, "materials/test.yml");
    }
}
