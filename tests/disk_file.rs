use std::fs::{self, File};
use std::path::{Path, PathBuf};

use inidoc::{ErrorKind, IniDocument, LineEnding, Options, ScannerMode, Value};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const SAMPLE: &str = "[Section1]\nKey1=Value1\nKey2=Value2\n\n[Section2]\nKeyA=1\n";

struct Workspace {
    _dir: TempDir,
    path: PathBuf,
}

impl Workspace {
    fn write(&self, content: &str) {
        fs::write(&self.path, content).expect("failed to write test file");
    }

    fn read(&self) -> String {
        fs::read_to_string(&self.path).expect("failed to read test file")
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("failed to create temporary directory");
    let path = dir.path().join("config.ini");
    let workspace = Workspace { _dir: dir, path };
    workspace.write(SAMPLE);
    workspace
}

fn open(path: &Path, options: Options) -> IniDocument {
    IniDocument::open(path, options).expect("failed to open test file")
}

#[rstest]
fn missing_file_does_not_exist(workspace: Workspace) {
    let path = workspace.path.with_file_name("missing.ini");

    let err = IniDocument::open(&path, Options::new()).expect_err("open should fail");

    assert_eq!(err.kind(), ErrorKind::FileNotExist);
}

#[rstest]
#[case(ScannerMode::Typed, Value::Int(1))]
#[case(ScannerMode::Normal, Value::from("1"))]
#[case(ScannerMode::Raw, Value::from("1"))]
fn scanner_mode_decides_value_types(
    workspace: Workspace,
    #[case] mode: ScannerMode,
    #[case] expected: Value,
) {
    let ini = open(&workspace.path, Options::new().scanner_mode(mode));

    assert_eq!(ini.fetch_entry("Section2", "KeyA"), Some(&expected));
    assert_eq!(ini.fetch_entry("Section1", "Key1"), Some(&Value::from("Value1")));
}

#[rstest]
fn edits_are_written_back(workspace: Workspace) {
    let raw = Options::new().scanner_mode(ScannerMode::Raw);
    let mut ini = open(&workspace.path, raw);

    ini.set_section("Section2", [("KeyB", "2")], true)
        .expect("valid section should be set");
    ini.delete_entry("Section1", "Key2").expect("delete should succeed");
    ini.save().expect("save should succeed");

    assert_eq!(
        workspace.read(),
        "[Section1]\nKey1=Value1\n\n[Section2]\nKeyA=1\nKeyB=2\n\n"
    );

    let reopened = open(&workspace.path, raw);
    assert_eq!(reopened.fetch_all(), ini.fetch_all());
}

#[rstest]
fn save_twice_is_byte_identical(workspace: Workspace) {
    let mut ini = open(&workspace.path, Options::new().line_ending(LineEnding::CrLf));

    ini.save().expect("first save should succeed");
    let first = fs::read(&workspace.path).expect("failed to read test file");
    ini.save().expect("second save should succeed");
    let second = fs::read(&workspace.path).expect("failed to read test file");

    assert_eq!(first, second);
    assert!(first.ends_with(b"KeyA=1\r\n\r\n"));
}

#[rstest]
fn empty_file_opens_and_saves(workspace: Workspace) {
    workspace.write("");
    let mut ini = open(&workspace.path, Options::new());

    assert!(ini.fetch_all().is_empty());
    ini.save().expect("save should succeed");

    assert_eq!(workspace.read(), "");
}

#[rstest]
fn malformed_file_fails_to_parse(workspace: Workspace) {
    workspace.write("[Section1\nKey1=Value1\n");

    let err = IniDocument::open(&workspace.path, Options::new()).expect_err("open should fail");

    assert_eq!(err.kind(), ErrorKind::IniParseFailed);
}

#[rstest]
fn read_only_document_leaves_file_untouched(workspace: Workspace) {
    let mut ini = open(&workspace.path, Options::new().read_only(true));

    let err = ini.set_entry("Section1", "Key1", "changed").expect_err("set should fail");
    assert_eq!(err.kind(), ErrorKind::ReadOnlyMode);
    let err = ini.save().expect_err("save should fail");
    assert_eq!(err.kind(), ErrorKind::ReadOnlyMode);

    assert_eq!(ini.fetch_entry("Section1", "Key1"), Some(&Value::from("Value1")));
    assert_eq!(workspace.read(), SAMPLE);
}

#[rstest]
fn save_fails_while_another_handle_reads(workspace: Workspace) {
    let mut ini = open(&workspace.path, Options::new());
    ini.set_entry("Section1", "Key1", "changed").expect("valid entry should be set");

    let reader = File::open(&workspace.path).expect("failed to open test file");
    reader.lock_shared().expect("failed to take shared lock");

    let err = ini.save().expect_err("save should fail while the file is locked");
    assert_eq!(err.kind(), ErrorKind::FileLockFailed);
    assert_eq!(workspace.read(), SAMPLE);

    reader.unlock().expect("failed to release shared lock");
    ini.save().expect("save should succeed once the lock is released");
    assert!(workspace.read().contains("Key1=changed\n"));
}

#[rstest]
fn open_fails_while_another_handle_writes(workspace: Workspace) {
    let writer = File::options()
        .write(true)
        .open(&workspace.path)
        .expect("failed to open test file");
    writer.lock().expect("failed to take exclusive lock");

    let err = IniDocument::open(&workspace.path, Options::new()).expect_err("open should fail");
    assert_eq!(err.kind(), ErrorKind::FileLockFailed);

    writer.unlock().expect("failed to release exclusive lock");
    let ini = open(&workspace.path, Options::new());
    assert_eq!(ini.fetch_all().len(), 2);
}

#[rstest]
fn document_releases_its_locks(workspace: Workspace) {
    let mut ini = open(&workspace.path, Options::new());
    ini.save().expect("save should succeed");
    ini.reload().expect("reload should succeed");

    let other = File::open(&workspace.path).expect("failed to open test file");
    other
        .try_lock()
        .expect("no lock should be held after reload and save");
}

#[rstest]
fn reload_sees_changes_from_other_writers(workspace: Workspace) {
    let mut ini = open(&workspace.path, Options::new());

    workspace.write("[Other]\nflag=yes\n");
    ini.reload().expect("reload should succeed");

    assert!(ini.fetch_section("Section1").is_none());
    assert_eq!(ini.fetch_entry("Other", "flag"), Some(&Value::Bool(true)));
}
