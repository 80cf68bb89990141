//! Integration tests for Curadoria
//!
//! Tests full runs from fragment files on disk through validation, the
//! aggregate file and the query engine.

use curadoria::query::{self, SortField};
use curadoria::schema::{Format, Subject};
use curadoria::{Catalog, Error, Query};
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a catalog with an empty materials directory
fn setup_catalog() -> (TempDir, Catalog) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir(tmp.path().join("materials")).expect("Failed to create materials dir");
    let catalog = Catalog::open(tmp.path()).expect("Failed to open catalog");
    (tmp, catalog)
}

/// Helper to write a fragment file into the materials directory
fn fragment(root: &Path, name: &str, entries: &[String]) {
    std::fs::write(root.join("materials").join(name), entries.concat())
        .expect("Failed to write fragment");
}

/// One YAML list entry with the given varying fields
fn entry(title: &str, author: &str, subjects: &str, format: &str, minutes: u32) -> String {
    format!(
        r#"- titulo: "{title}"
  autoria: "{author}"
  url: "https://example.com/{minutes}"
  assuntos: {subjects}
  formato: "{format}"
  minutos_necessarios: {minutes}
  prerequisitos: []
  ritmo: "médio"
  estilo_aprendizagem: "visual"
  idioma: "português (BR)"
  nivel_dificuldade: "iniciante"
  eh_gratuito: true
  recomendado_por: [camilamaia]
  comentarios:
    - usuario: joaodasilva
      texto: "Muito bom"
"#
    )
}

fn titles(materials: &[&curadoria::Material]) -> Vec<String> {
    materials.iter().map(|m| m.title.clone()).collect()
}

// =============================================================================
// Collect Tests
// =============================================================================

#[test]
fn test_collect_writes_aggregate() {
    let (tmp, catalog) = setup_catalog();
    fragment(
        tmp.path(),
        "python.yml",
        &[entry("Python para iniciantes", "Jane Doe", "[python]", "vídeo", 90)],
    );

    let report = catalog.collect(None, None).unwrap();
    assert_eq!(report.stats.accepted, 1);
    assert_eq!(report.stats.files_read, 1);

    let content = std::fs::read_to_string(tmp.path().join("all_materials.yml")).unwrap();
    assert!(content.starts_with("# auto-generated file, please don't change it\n"));
    assert!(content.contains("file_path: materials/python.yml"));

    let loaded = catalog.load(None).unwrap();
    assert_eq!(loaded, report.materials);
}

#[test]
fn test_collect_is_idempotent() {
    let (tmp, catalog) = setup_catalog();
    fragment(
        tmp.path(),
        "a.yml",
        &[
            entry("Flask", "Ana", "[python, desenvolvimento web]", "vídeo", 60),
            entry("CSS Grid", "Bia", "[css, html]", "artigo", 15),
        ],
    );
    fragment(tmp.path(), "b.yaml", &[entry("SQL", "Caio", "[bancos de dados]", "livro", 300)]);

    catalog.collect(None, None).unwrap();
    let first = std::fs::read(tmp.path().join("all_materials.yml")).unwrap();
    catalog.collect(None, None).unwrap();
    let second = std::fs::read(tmp.path().join("all_materials.yml")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_duplicate_title_across_files() {
    let (tmp, catalog) = setup_catalog();
    fragment(tmp.path(), "a.yml", &[entry("Intro", "Ana", "[python]", "vídeo", 10)]);
    fragment(tmp.path(), "b.yml", &[entry("intro", "Bia", "[css]", "artigo", 20)]);

    let report = catalog.collect(None, None).unwrap();
    assert_eq!(report.materials.len(), 1);
    assert_eq!(report.materials[0].author, "Ana");
    assert_eq!(report.stats.rejected, 1);

    let err = catalog.validate(None).unwrap_err();
    match err {
        Error::DuplicateTitle {
            title,
            source_path,
            first_seen_in,
            ..
        } => {
            assert_eq!(title, "intro");
            assert_eq!(source_path, "materials/b.yml");
            assert_eq!(first_seen_in, "materials/a.yml");
        }
        other => panic!("expected DuplicateTitle, got {other:?}"),
    }
}

#[test]
fn test_empty_subjects_rejected() {
    let (tmp, catalog) = setup_catalog();
    fragment(
        tmp.path(),
        "a.yml",
        &[
            entry("Sem assunto", "Ana", "[]", "vídeo", 10),
            entry("Com assunto", "Ana", "[python]", "vídeo", 10),
        ],
    );

    let report = catalog.collect(None, None).unwrap();
    assert_eq!(titles(&report.materials.iter().collect::<Vec<_>>()), vec!["Com assunto"]);
    assert!(matches!(
        &report.skipped[0],
        Error::SchemaViolation { title: Some(t), .. } if t == "Sem assunto"
    ));

    assert!(matches!(
        catalog.validate(None).unwrap_err(),
        Error::SchemaViolation { .. }
    ));
}

#[test]
fn test_malformed_fragment_is_isolated() {
    let (tmp, catalog) = setup_catalog();
    fragment(tmp.path(), "1.yml", &[entry("Um", "Ana", "[python]", "vídeo", 10)]);
    std::fs::write(
        tmp.path().join("materials/2.yml"),
        "- titulo: \"Dois\n  autoria: [unclosed\n",
    )
    .unwrap();
    fragment(tmp.path(), "3.yml", &[entry("Três", "Bia", "[css]", "artigo", 20)]);

    let report = catalog.collect(None, None).unwrap();
    assert_eq!(titles(&report.materials.iter().collect::<Vec<_>>()), vec!["Um", "Três"]);
    assert_eq!(report.parse_errors(), 1);
    assert_eq!(report.stats.files_read, 2);
    assert_eq!(report.stats.files_skipped, 1);
}

#[test]
fn test_shared_fields_through_anchor() {
    let (tmp, catalog) = setup_catalog();
    let base = entry("Um", "Ana", "[python]", "vídeo", 10)
        .replacen("- titulo", "- &base\n  titulo", 1);
    let derived = "- <<: *base\n  titulo: \"Dois\"\n  url: \"https://example.com/dois\"\n";
    std::fs::write(tmp.path().join("materials/a.yml"), format!("{base}{derived}")).unwrap();

    let report = catalog.collect(None, None).unwrap();
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(titles(&report.materials.iter().collect::<Vec<_>>()), vec!["Um", "Dois"]);
    assert_eq!(report.materials[1].author, "Ana");
    assert_eq!(report.materials[1].url, "https://example.com/dois");
}

#[test]
fn test_unrecognized_extensions_ignored() {
    let (tmp, catalog) = setup_catalog();
    fragment(tmp.path(), "a.yml", &[entry("Um", "Ana", "[python]", "vídeo", 10)]);
    std::fs::write(tmp.path().join("materials/README.md"), "# not a fragment\n").unwrap();

    let stats = catalog.validate(None).unwrap();
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.files_read, 1);
}

// =============================================================================
// Validate Tests
// =============================================================================

#[test]
fn test_validate_writes_nothing() {
    let (tmp, catalog) = setup_catalog();
    fragment(tmp.path(), "a.yml", &[entry("Um", "Ana", "[python]", "vídeo", 10)]);

    let stats = catalog.validate(None).unwrap();
    assert_eq!(stats.records_seen, 1);
    assert!(!tmp.path().join("all_materials.yml").exists());
}

#[test]
fn test_config_overrides_paths() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("curadoria_coletiva/materials")).unwrap();
    std::fs::write(
        tmp.path().join("curadoria.yaml"),
        "materials_dir: curadoria_coletiva/materials\noutput: curadoria_coletiva/all_materials.yml\n",
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("curadoria_coletiva/materials/a.yml"),
        entry("Um", "Ana", "[python]", "vídeo", 10),
    )
    .unwrap();

    let catalog = Catalog::open(tmp.path()).unwrap();
    let report = catalog.collect(None, None).unwrap();
    assert_eq!(report.materials[0].source_path, "materials/a.yml");
    assert!(tmp.path().join("curadoria_coletiva/all_materials.yml").exists());
}

// =============================================================================
// Query Tests
// =============================================================================

fn searchable_catalog() -> (TempDir, Vec<curadoria::Material>) {
    let (tmp, catalog) = setup_catalog();
    fragment(
        tmp.path(),
        "a.yml",
        &[
            entry("Curso longo", "Jane Doe", "[python, desenvolvimento web]", "vídeo", 90),
            entry("Artigo curto", "John Roe", "[python]", "artigo", 30),
            entry("Livro médio", "Jane Roe", "[css]", "livro", 60),
        ],
    );
    catalog.collect(None, None).unwrap();
    let materials = catalog.load(None).unwrap();
    (tmp, materials)
}

#[test]
fn test_filters_combine() {
    let (_tmp, materials) = searchable_catalog();

    let result = query::execute(
        &materials,
        &Query::new()
            .subject(Subject::Python)
            .subject(Subject::WebDevelopment),
    );
    assert_eq!(titles(&result.materials), vec!["Curso longo"]);

    let result = query::execute(
        &materials,
        &Query::new().format(Format::Video).format(Format::Book),
    );
    assert_eq!(titles(&result.materials), vec!["Curso longo", "Livro médio"]);

    let result = query::execute(
        &materials,
        &Query::new().subject(Subject::Python).format(Format::Book),
    );
    assert!(result.is_empty());
}

#[test]
fn test_free_text_case_insensitive() {
    let (_tmp, materials) = searchable_catalog();
    let result = query::execute(&materials, &Query::new().text("jane"));
    assert_eq!(titles(&result.materials), vec!["Curso longo", "Livro médio"]);
}

#[test]
fn test_sort_by_minutes() {
    let (_tmp, materials) = searchable_catalog();
    let result = query::execute(&materials, &Query::new().sort_by(SortField::MinutesRequired));
    let minutes: Vec<u32> = result.materials.iter().map(|m| m.minutes_required).collect();
    assert_eq!(minutes, vec![30, 60, 90]);
}

#[test]
fn test_sort_field_parses_cli_names() {
    assert_eq!("minutes".parse::<SortField>().unwrap(), SortField::MinutesRequired);
    assert!("url".parse::<SortField>().is_err());
}

#[test]
fn test_missing_aggregate() {
    let (_tmp, catalog) = setup_catalog();
    let err = catalog.load(None).unwrap_err();
    assert!(matches!(err, Error::AggregateNotFound { .. }));
    assert!(err.suggestion().unwrap().contains("curadoria collect"));
}
