//! Integration tests for scaffold-dirs
//!
//! These tests create temporary file structures to exercise the store,
//! engine and watcher together with actual filesystem operations.

use std::{collections::BTreeSet, fs, path::Path, time::Duration};

use scaffold_dirs::{
    ScaffoldError,
    engine::{Generator, clone_directory, search_named},
    store::TemplateStore,
    template::{FileEntry, ProjectParams, Template},
    watcher::{
        Clock, DESCRIPTOR_COPY_NAME, DescriptorOutcome, GenerateRequest, Launcher,
        ProcessLauncher, SeenFiles, SystemClock, WaitPolicy, WatchOptions, Watcher,
    },
};
use tempfile::TempDir;

/// Helper function to create a temporary directory structure for testing
fn create_test_directory() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a file with specified content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Helper function to open a store inside a test directory
fn open_store(base_path: &Path) -> TemplateStore {
    TemplateStore::open(base_path.join("templates")).expect("Failed to open store")
}

/// Every path below `root`, relative and `/`-separated, with a trailing `/`
/// on directories.
fn tree_shape(root: &Path) -> BTreeSet<String> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if entry.file_type().is_dir() {
                format!("{relative}/")
            } else {
                relative
            }
        })
        .collect()
}

/// The shape a template declares, in the same form as [`tree_shape`].
fn declared_shape(template: &Template) -> BTreeSet<String> {
    let mut shape = BTreeSet::new();

    for (subdir, contents) in &template.subdirectories {
        let prefix = if subdir.is_empty() {
            String::new()
        } else {
            let mut path = String::new();
            for part in subdir.split('/') {
                path.push_str(part);
                path.push('/');
                shape.insert(path.clone());
            }
            path
        };

        for file in &contents.files {
            shape.insert(format!("{prefix}{}", file.name));
        }
    }

    shape
}

/// A small template resembling a real project layout
fn project_template(letter: &Path) -> Template {
    Template::new("placeholder")
        .with_subdirectory("", vec![FileEntry::empty("xxxxx_README.md")])
        .with_subdirectory(
            "admin",
            vec![
                FileEntry::empty("xxxxx_budget.xlsx"),
                FileEntry::from_source("xxxxx_letter.txt", letter),
            ],
        )
        .with_subdirectory("design/drawings", vec![])
        .with_subdirectory("design", vec![FileEntry::empty("notes.txt")])
}

#[test]
fn test_generated_tree_matches_declared_structure() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let letter = base_path.join("letter.txt");
    create_file(&letter, "Dear client");

    let store = open_store(base_path);
    store
        .save("ace_basic.json", &project_template(&letter), true)
        .unwrap();

    let output = base_path.join("projects");
    let params = ProjectParams::new("Acme", "042");
    let report = Generator::new()
        .with_store(&store)
        .with_quiet(true)
        .generate_named(&store, "defaults/ace_basic.json", &output, Some(&params))
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.root, output.join("Acme-042"));

    let mut expected = project_template(&letter);
    expected.apply_project(&params);

    assert_eq!(tree_shape(&report.root), declared_shape(&expected));
    assert_eq!(
        fs::read_to_string(report.root.join("admin/042_letter.txt")).unwrap(),
        "Dear client"
    );
}

#[test]
fn test_invalid_template_has_no_side_effects() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let store = open_store(base_path);

    create_file(
        &store.user_dir().join("broken.json"),
        r#"{
    "main_directory": "broken",
    "subdirectories": {
        "docs": {"files": [{"name": "brief.docx", "type": "template"}]}
    }
}"#,
    );

    let output = base_path.join("projects");
    fs::create_dir_all(&output).unwrap();

    let err = Generator::new()
        .with_quiet(true)
        .generate_named(&store, "user_created/broken.json", &output, None)
        .unwrap_err();

    match err {
        ScaffoldError::SchemaInvalid { errors, .. } => {
            assert_eq!(
                errors,
                vec!["Template file 'brief.docx' in 'docs' is missing a 'source' key."]
            );
        }
        other => panic!("expected SchemaInvalid, got {other:?}"),
    }
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}

#[test]
fn test_clone_then_generate_reproduces_tree() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let source = base_path.join("existing");

    create_file(&source.join("a/f1.txt"), "one");
    create_file(&source.join("a/nested/f2.txt"), "two");
    create_file(&source.join("root.md"), "root");
    fs::create_dir_all(source.join("b")).unwrap();

    let store = open_store(base_path);
    let template = clone_directory(&store, &source, "existing.json", false).unwrap();

    let keys: Vec<_> = template.subdirectories.keys().cloned().collect();
    assert_eq!(keys, vec!["", "a", "a/nested", "b"]);
    assert_eq!(
        template.subdirectories["a"].files,
        vec![FileEntry::empty("f1.txt")]
    );
    assert!(template.subdirectories["b"].files.is_empty());

    let loaded = store.load("user_created/existing.json").unwrap();
    let output = base_path.join("copy");
    let report = Generator::new()
        .with_quiet(true)
        .generate(&loaded, &output)
        .unwrap();

    assert_eq!(tree_shape(&report.root), tree_shape(&source));
    assert_eq!(fs::metadata(report.root.join("a/f1.txt")).unwrap().len(), 0);
}

#[test]
fn test_search_through_store() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let store = open_store(base_path);

    let template = Template::new("site")
        .with_subdirectory("main", vec![])
        .with_subdirectory("src", vec![FileEntry::empty("main.rs")])
        .with_subdirectory("docs", vec![FileEntry::empty("guide.md")]);
    store.save("site.json", &template, false).unwrap();

    assert_eq!(
        search_named(&store, "site.json", "main").unwrap(),
        vec!["main", "src"]
    );
    assert!(matches!(
        search_named(&store, "missing.json", "main"),
        Err(ScaffoldError::NotFound(_))
    ));
}

/// Launcher that generates in-process instead of spawning a child.
struct InProcessLauncher {
    store: TemplateStore,
}

impl Launcher for InProcessLauncher {
    fn launch(&self, request: &GenerateRequest) -> scaffold_dirs::Result<()> {
        Generator::new()
            .with_store(&self.store)
            .with_quiet(true)
            .generate_named(
                &self.store,
                &request.template,
                &request.output,
                Some(&request.params),
            )
            .map(drop)
    }
}

/// Clock that never blocks.
struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&self, _duration: Duration) {}
}

/// Store holding a one-directory default template used by the watcher tests
fn watcher_store(base_path: &Path) -> TemplateStore {
    let store = open_store(base_path);
    store
        .save(
            "ace_basic.json",
            &Template::new("placeholder")
                .with_subdirectory("admin", vec![FileEntry::empty("xxxxx_budget.xlsx")]),
            true,
        )
        .unwrap();
    store
}

/// Watch options rooted in a test directory
fn watch_options(base_path: &Path) -> WatchOptions {
    WatchOptions {
        watch_dir: base_path.join("incoming"),
        seen_log: base_path.join("logs/seen_files.txt"),
        output_dir: base_path.join("projects"),
        template: "defaults/ace_basic.json".to_string(),
        poll_interval: Duration::from_secs(10),
        wait: WaitPolicy::default(),
    }
}

#[test]
fn test_watcher_generates_project_for_dropped_descriptor() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let store = watcher_store(base_path);

    let options = watch_options(base_path);
    let descriptor = r#"{"project_name": "Acme", "project_number": "042", "client": "ACME Corp"}"#;
    create_file(&options.watch_dir.join("acme.json"), descriptor);
    let project_dir = options.output_dir.join("Acme-042");

    let launcher = InProcessLauncher {
        store: store.clone(),
    };
    let mut watcher = Watcher::new(options.clone(), launcher, InstantClock);
    let outcomes = watcher.poll_once().unwrap();

    assert_eq!(
        outcomes,
        vec![(
            "acme.json".to_string(),
            DescriptorOutcome::Generated {
                project_dir: project_dir.clone()
            }
        )]
    );
    assert!(project_dir.join("admin/042_budget.xlsx").is_file());
    assert_eq!(
        fs::read_to_string(project_dir.join(DESCRIPTOR_COPY_NAME)).unwrap(),
        descriptor
    );

    let seen = SeenFiles::load(&options.seen_log);
    assert!(seen.contains("acme.json"));

    // A new watcher over the same seen log skips the handled descriptor.
    let mut restarted = Watcher::new(options, InProcessLauncher { store }, InstantClock);
    assert!(restarted.seen().contains("acme.json"));
    assert!(restarted.poll_once().unwrap().is_empty());
}

#[test]
fn test_watcher_drives_generate_binary() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();
    let store = watcher_store(base_path);

    let options = watch_options(base_path);
    create_file(
        &options.watch_dir.join("acme.json"),
        r#"{"project_name": "Acme", "project_number": "042"}"#,
    );
    let project_dir = options.output_dir.join("Acme-042");

    let launcher = ProcessLauncher::new(env!("CARGO_BIN_EXE_scaffold-dirs"))
        .with_arg("--templates-dir")
        .with_arg(store.root().as_os_str())
        .with_arg("--config")
        .with_arg(base_path.join("absent.toml").into_os_string())
        .with_arg("--quiet");
    let mut watcher = Watcher::new(options, launcher, SystemClock);
    let outcomes = watcher.poll_once().unwrap();

    assert_eq!(
        outcomes,
        vec![(
            "acme.json".to_string(),
            DescriptorOutcome::Generated {
                project_dir: project_dir.clone()
            }
        )]
    );
    assert!(project_dir.join("admin/042_budget.xlsx").is_file());
    assert!(project_dir.join(DESCRIPTOR_COPY_NAME).is_file());
}
