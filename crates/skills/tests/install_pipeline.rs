#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use skillport_skills::{
    DirSource, EmbeddedSource, Filter, Installer, MemorySource, WritePolicy, WriteResult, Writer,
    fetch::{FetchOptions, SourceLocator},
    install::{self, copilot_agent_name},
};

static BUNDLE: include_dir::Dir = include_dir::include_dir!("$CARGO_MANIFEST_DIR/tests/fixtures/bundle");

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn two_unit_tree(root: &Path) {
    write(
        root,
        "skills/commit/SKILL.md",
        "---\nname: commit\ndescription: Commit helper\ntags: [workflow]\n---\n# commit\n",
    );
    write(root, "skills/commit/references/format.md", "type(scope): subject\n");
    write(root, "skills/commit/scripts/check.sh", "#!/bin/sh\nexit 0\n");
    write(
        root,
        "skills/scratch/SKILL.md",
        "---\nname: scratch\ndescription: Untagged notes\n---\n# scratch\n",
    );
}

#[test]
fn tag_filter_installs_only_matching_unit() {
    let src_dir = tempfile::tempdir().unwrap();
    two_unit_tree(src_dir.path());
    let dest = tempfile::tempdir().unwrap();

    let source = DirSource::new(src_dir.path());
    let filter = Filter::new(vec!["workflow".into()], Vec::new(), Vec::new());
    let results = Installer::new(&source, Writer::default())
        .install_skills(dest.path(), &filter)
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| matches!(r, WriteResult::Created(_))));
    for rel in ["commit/SKILL.md", "commit/references/format.md", "commit/scripts/check.sh"] {
        assert_eq!(
            std::fs::read(dest.path().join(rel)).unwrap(),
            std::fs::read(src_dir.path().join("skills").join(rel)).unwrap(),
            "{rel} copied byte for byte"
        );
    }
    assert!(!dest.path().join("scratch").exists());
}

#[test]
fn reinstall_skips_then_force_updates() {
    let src_dir = tempfile::tempdir().unwrap();
    two_unit_tree(src_dir.path());
    let dest = tempfile::tempdir().unwrap();
    let source = DirSource::new(src_dir.path());

    let first = Installer::new(&source, Writer::default())
        .install_skills(dest.path(), &Filter::default())
        .unwrap();
    assert_eq!(first.len(), 4);

    std::fs::write(dest.path().join("commit/SKILL.md"), "local edit").unwrap();

    let second = Installer::new(&source, Writer::default())
        .install_skills(dest.path(), &Filter::default())
        .unwrap();
    assert!(second.iter().all(|r| matches!(r, WriteResult::Skipped(_))));
    assert_eq!(
        std::fs::read_to_string(dest.path().join("commit/SKILL.md")).unwrap(),
        "local edit"
    );

    let dry = Installer::new(
        &source,
        Writer::new(WritePolicy {
            force: true,
            dry_run: true,
        }),
    )
    .install_skills(dest.path(), &Filter::default())
    .unwrap();
    assert!(dry.iter().all(|r| matches!(r, WriteResult::WouldUpdate(_))));
    assert_eq!(
        std::fs::read_to_string(dest.path().join("commit/SKILL.md")).unwrap(),
        "local edit"
    );

    let forced = Installer::new(
        &source,
        Writer::new(WritePolicy {
            force: true,
            dry_run: false,
        }),
    )
    .install_skills(dest.path(), &Filter::default())
    .unwrap();
    assert!(forced.iter().all(|r| matches!(r, WriteResult::Updated(_))));
    assert!(
        std::fs::read_to_string(dest.path().join("commit/SKILL.md"))
            .unwrap()
            .starts_with("---\nname: commit")
    );
}

#[test]
fn embedded_bundle_end_to_end() {
    let source = EmbeddedSource::new(&BUNDLE);
    let installer = Installer::new(&source, Writer::default());
    let dest = tempfile::tempdir().unwrap();

    let skills = installer.list_skills().unwrap();
    let names: Vec<_> = skills.iter().map(|s| (s.name.as_str(), s.pack_label())).collect();
    assert_eq!(names, vec![("commit-helper", "core"), ("clippy-fix", "rust")]);

    let rust_only = Filter::new(Vec::new(), vec!["rust".into()], Vec::new());
    let results = installer
        .install_skills(&dest.path().join("skills"), &rust_only)
        .unwrap();
    // commit-helper declares `any`, so it passes a language filter too.
    assert_eq!(results.len(), 2);
    assert!(dest.path().join("skills/rust/clippy-fix/SKILL.md").is_file());
    assert!(dest.path().join("skills/commit-helper/SKILL.md").is_file());

    let agents = installer
        .install_agents(&dest.path().join("agents"), &Filter::default(), Some(copilot_agent_name))
        .unwrap();
    assert_eq!(agents, vec![WriteResult::Created(
        dest.path().join("agents/reviewer.agent.md")
    )]);

    let commands = installer
        .install_commands(&dest.path().join("commands"), &Filter::default(), None)
        .unwrap();
    assert_eq!(commands.len(), 1);
}

#[test]
fn memory_source_with_broken_manifest_still_installs() {
    let source = MemorySource::new()
        .with_file("skills/legacy/SKILL.md", "# no frontmatter here\n")
        .with_file("skills/legacy/extra.md", "extra");
    let installer = Installer::new(&source, Writer::default());

    let skills = installer.list_skills().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name, "legacy");
    assert_eq!(skills[0].model, "sonnet");

    let dest = tempfile::tempdir().unwrap();
    let results = installer
        .install_skills(dest.path(), &Filter::default())
        .unwrap();
    assert_eq!(results.len(), 2);

    // An untagged skill never matches a tag request.
    let results = installer
        .install_skills(
            dest.path(),
            &Filter::new(vec!["workflow".into()], Vec::new(), Vec::new()),
        )
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn local_source_is_mirrored_without_filtering() {
    let src_dir = tempfile::tempdir().unwrap();
    two_unit_tree(src_dir.path());
    write(src_dir.path(), ".git/config", "[core]\n");
    let dest = tempfile::tempdir().unwrap();

    let results = install::install_from_source(
        &SourceLocator::parse(&src_dir.path().display().to_string()),
        dest.path(),
        &Writer::default(),
        &FetchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 4);
    assert!(dest.path().join("skills/scratch/SKILL.md").is_file());
    assert!(!dest.path().join(".git").exists());
}
