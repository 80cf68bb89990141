//! Material and Comment record shapes
//!
//! Wire keys are the ones contributors already use in fragment files; Rust
//! field names follow the catalog's English vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tokens::{Difficulty, Format, Language, LearningStyle, Pace, Subject};

/// Record keys as they appear in fragment and aggregate files
pub mod keys {
    pub const TITLE: &str = "titulo";
    pub const AUTHOR: &str = "autoria";
    pub const URL: &str = "url";
    pub const SUBJECTS: &str = "assuntos";
    pub const FORMAT: &str = "formato";
    pub const MINUTES_REQUIRED: &str = "minutos_necessarios";
    pub const PREREQUISITES: &str = "prerequisitos";
    pub const PACE: &str = "ritmo";
    pub const LEARNING_STYLE: &str = "estilo_aprendizagem";
    pub const LANGUAGE: &str = "idioma";
    pub const DIFFICULTY: &str = "nivel_dificuldade";
    pub const IS_FREE: &str = "eh_gratuito";
    pub const RECOMMENDED_BY: &str = "recomendado_por";
    pub const COMMENTS: &str = "comentarios";
    pub const SOURCE_PATH: &str = "file_path";

    pub const COMMENT_AUTHOR: &str = "usuario";
    pub const COMMENT_TEXT: &str = "texto";
}

/// A contributor's comment on a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Username on the contribution platform
    #[serde(rename = "usuario")]
    pub author: String,
    #[serde(rename = "texto")]
    pub text: String,
}

/// A validated learning material
///
/// Field declaration order is the field order of the aggregate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "autoria")]
    pub author: String,

    pub url: String,

    #[serde(rename = "assuntos")]
    pub subjects: BTreeSet<Subject>,

    #[serde(rename = "formato")]
    pub format: Format,

    #[serde(rename = "minutos_necessarios")]
    pub minutes_required: u32,

    #[serde(rename = "prerequisitos", default)]
    pub prerequisites: BTreeSet<Subject>,

    #[serde(rename = "ritmo")]
    pub pace: Pace,

    #[serde(rename = "estilo_aprendizagem")]
    pub learning_style: LearningStyle,

    #[serde(rename = "idioma")]
    pub language: Language,

    #[serde(rename = "nivel_dificuldade")]
    pub difficulty: Difficulty,

    #[serde(rename = "eh_gratuito")]
    pub is_free: bool,

    /// Contributor usernames, kept sorted
    #[serde(rename = "recomendado_por")]
    pub recommended_by: BTreeSet<String>,

    #[serde(rename = "comentarios", default)]
    pub comments: Vec<Comment>,

    /// `<directory>/<file>` of the fragment this record came from
    #[serde(rename = "file_path")]
    pub source_path: String,
}

impl Material {
    /// Key used for the case-insensitive title uniqueness check
    pub fn title_key(&self) -> String {
        self.title.to_lowercase()
    }
}
