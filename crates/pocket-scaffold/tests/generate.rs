use pocket_scaffold::generator::summarize;
use pocket_scaffold::templates::{self, PostGenAction, StructureItem, TemplateManifest};
use pocket_scaffold::{ProjectGenerator, Selections};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

fn bundled_templates() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn demo_manifest() -> TemplateManifest {
    TemplateManifest {
        name: "demo".to_string(),
        display_name: "Demo".to_string(),
        description: "End-to-end demo".to_string(),
        python_version: ">=3.11".to_string(),
        tool_choices: BTreeMap::new(),
        features: Vec::new(),
        structure: vec![
            StructureItem::directory("src"),
            StructureItem::file("src/main.py", Some("main.py.j2")),
        ],
        post_generation: Vec::new(),
    }
}

#[test]
fn test_end_to_end_generation() {
    let base = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let set = base.path().join("demo");
    std::fs::create_dir_all(&set).unwrap();
    std::fs::write(set.join("main.py.j2"), "# {{ project_name }}\n").unwrap();

    let output = out.path().join("demo");
    let generator = ProjectGenerator::new(
        demo_manifest(),
        "demo",
        output.clone(),
        Some(base.path().to_path_buf()),
    );
    let results = generator.generate();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert!(output.join("src").is_dir());
    assert_eq!(
        std::fs::read_to_string(output.join("src/main.py")).unwrap(),
        "# demo\n"
    );
}

#[test]
fn test_failures_do_not_stop_generation() {
    let base = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut manifest = demo_manifest();
    manifest.structure.insert(0, StructureItem::file("../outside.txt", None));
    manifest.post_generation = vec![
        PostGenAction::new("display_next_steps"),
        PostGenAction::new("unregistered"),
        PostGenAction::new("display_next_steps"),
    ];

    let generator =
        ProjectGenerator::new(manifest, "demo", out.path(), Some(base.path().to_path_buf()));
    let results = generator.generate();

    assert_eq!(results.len(), 6);
    assert_eq!(summarize(&results), (4, 2));
    assert!(!results[0].success);
    assert!(results[1].success);
    assert!(!results[4].success);
    assert!(results[5].success);
    // Template file absent under this base: empty content, still a success
    assert_eq!(
        std::fs::read_to_string(out.path().join("src/main.py")).unwrap(),
        ""
    );
}

#[test]
fn test_bundled_template_set_is_clean() {
    let manifest = templates::load_template_set(&bundled_templates(), "python-cli").unwrap();

    assert_eq!(manifest.name, "python-cli");
    assert!(templates::validate_manifest(&manifest).is_empty());

    let listed = templates::list_templates(&bundled_templates()).unwrap();
    assert!(listed.iter().any(|(name, _)| name == "python-cli"));
}

#[test]
fn test_bundled_template_set_generates() {
    let out = TempDir::new().unwrap();
    let manifest = templates::load_template_set(&bundled_templates(), "python-cli").unwrap();

    let mut selections = Selections::from_manifest_defaults(&manifest);
    selections.features.insert("git".to_string(), false);
    selections.description = "Says hello".to_string();

    let output = out.path().join("hello-cli");
    let generator = ProjectGenerator::new(manifest, "hello-cli", output.clone(), Some(bundled_templates()))
        .with_selections(selections);
    let results = generator.generate();

    for result in &results {
        assert!(result.success, "{}", result.message);
    }

    let cli = std::fs::read_to_string(output.join("src/hello_cli/cli.py")).unwrap();
    assert!(cli.contains("import click"));

    let pyproject = std::fs::read_to_string(output.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("requires-python = \">=3.11\""));
    assert!(pyproject.contains("description = \"Says hello\""));
    assert!(pyproject.contains("pytest"));

    let readme = std::fs::read_to_string(output.join("README.md")).unwrap();
    assert!(readme.starts_with("# Hello Cli\n"));

    assert!(output.join("tests/test_cli.py").is_file());
    assert!(!output.join("Dockerfile").exists());
    assert_eq!(
        results.last().map(|r| r.message.as_str()),
        Some("Project generated successfully!")
    );
}

#[test]
fn test_bundled_pyproject_escapes_description() {
    let out = TempDir::new().unwrap();
    let manifest = templates::load_template_set(&bundled_templates(), "python-cli").unwrap();

    let mut selections = Selections::from_manifest_defaults(&manifest);
    selections.features.insert("git".to_string(), false);
    selections.description = r#"A "quoted" C:\path"#.to_string();

    let output = out.path().join("quoted");
    ProjectGenerator::new(manifest, "quoted", output.clone(), Some(bundled_templates()))
        .with_selections(selections)
        .generate();

    let pyproject = std::fs::read_to_string(output.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains(r#"description = "A \"quoted\" C:\\path""#));
}
