use std::fs;
use std::path::Path;

use services::{CatalogConfig, ChallengeRegistry, LoadReport, UrlSource};
use tutor_core::catalog::builtin_challenges;

fn write_builtin_documents(dir: &Path) {
    for (n, challenge) in builtin_challenges().iter().enumerate() {
        let document = serde_json::json!({
            "id": challenge.id().as_str(),
            "title": challenge.title(),
            "description": challenge.description(),
            "code": challenge.starter_code(),
            "solution": challenge.solution(),
            "hint": challenge.hint(),
        });
        fs::write(
            dir.join(format!("challenge-{}.json", n + 1)),
            document.to_string(),
        )
        .unwrap();
    }
}

fn ids(registry: &ChallengeRegistry) -> Vec<String> {
    registry
        .all()
        .iter()
        .map(|challenge| challenge.id().to_string())
        .collect()
}

#[tokio::test]
async fn loads_every_document_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin_documents(dir.path());
    let config = CatalogConfig::from_dir(dir.path()).unwrap();

    let registry = ChallengeRegistry::load(&UrlSource::new(), config.locations()).await;

    assert_eq!(registry.report(), &LoadReport::Loaded { count: 5 });
    assert_eq!(ids(&registry), ids(&ChallengeRegistry::builtin()));
}

#[tokio::test]
async fn one_unreadable_document_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin_documents(dir.path());
    fs::write(
        dir.path().join("challenge-3.json"),
        r#"{ "id": "send-xrp", "title": "Renamed", "extra": true }"#,
    )
    .unwrap();
    let config = CatalogConfig::from_dir(dir.path()).unwrap();

    let registry = ChallengeRegistry::load(&UrlSource::new(), config.locations()).await;

    assert!(registry.report().is_fallback());
    assert_eq!(ids(&registry), ids(&ChallengeRegistry::builtin()));
    assert_ne!(registry.all()[2].title(), "Renamed");
}

#[tokio::test]
async fn missing_directory_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let config = CatalogConfig::from_dir(&dir.path().join("absent")).unwrap();

    let registry = ChallengeRegistry::load(&UrlSource::new(), config.locations()).await;

    assert!(matches!(registry.report(), LoadReport::Fallback { .. }));
    assert_eq!(registry.len(), 5);
}

#[tokio::test]
async fn shipped_challenge_files_match_the_builtin_catalog() {
    let dir = fs::canonicalize(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../challenges"))
        .unwrap();
    let config = CatalogConfig::from_dir(&dir).unwrap();

    let registry = ChallengeRegistry::load(&UrlSource::new(), config.locations()).await;

    assert_eq!(registry.report(), &LoadReport::Loaded { count: 5 });
    for (loaded, builtin) in registry.all().iter().zip(builtin_challenges()) {
        assert_eq!(loaded, &builtin);
    }
}
