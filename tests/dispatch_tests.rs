mod support;

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use clpctl::application::Dispatcher;
use clpctl::error::{ConfigError, Error};
use clpctl::testkit::clock::RecordingSleeper;
use clpctl::testkit::runtime::FakeRuntime;

fn hidden_files(dir: &std::path::Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.') && n != ".runtime-config.toml")
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn compress_files_exist_during_exec_and_are_removed_after() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());
    let spec = support::spec("c1", input.path());
    orchestrator.start(&spec).unwrap();

    let config = orchestrator.runtime_config(&spec).unwrap();
    let logs_dir = config.logs_directory.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let observed = Rc::clone(&seen);
    let observed_dir = logs_dir.clone();
    runtime.observe_exec(move |_, _| {
        observed.borrow_mut().extend(hidden_files(&observed_dir));
    });

    let dispatcher = Dispatcher::new(orchestrator.runtime(), &config, orchestrator.layout());
    dispatcher
        .compress(&[input.path().join("app/service.log")])
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2, "path list and db config during exec: {seen:?}");
    let path_list = seen
        .iter()
        .find(|p| p.to_string_lossy().ends_with("-paths.txt"))
        .unwrap();
    assert!(!path_list.exists());
    assert!(hidden_files(&logs_dir).is_empty());

    let (_, request) = runtime.exec_requests().pop().unwrap();
    assert!(request.command[0].ends_with("bin/clp"));
    assert_eq!(request.command[1], "c");
    assert!(request.command.contains(&"--files-from".to_string()));
}

#[test]
fn ephemeral_files_are_removed_when_the_command_fails() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());
    let spec = support::spec("c1", input.path());
    orchestrator.start(&spec).unwrap();
    runtime.fail_exec_always("clg");

    let config = orchestrator.runtime_config(&spec).unwrap();
    let dispatcher = Dispatcher::new(orchestrator.runtime(), &config, orchestrator.layout());
    let result = dispatcher.search("*error*", None);

    assert!(matches!(result, Err(Error::Subprocess(_))));
    assert!(hidden_files(&config.logs_directory).is_empty());
}

#[test]
fn compress_rejects_paths_outside_the_input_directory() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());
    let spec = support::spec("c1", input.path());
    orchestrator.start(&spec).unwrap();
    let execs = runtime.exec_requests().len();

    let config = orchestrator.runtime_config(&spec).unwrap();
    let dispatcher = Dispatcher::new(orchestrator.runtime(), &config, orchestrator.layout());
    let result = dispatcher.compress(&[PathBuf::from("/etc/passwd")]);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue { field: "paths", .. }))
    ));
    assert_eq!(runtime.exec_requests().len(), execs);
}

#[test]
fn dispatch_requires_a_running_cluster() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());
    let spec = support::spec("c1", input.path());
    orchestrator.start(&spec).unwrap();
    orchestrator.stop("c1").unwrap();

    let config = orchestrator.runtime_config(&spec).unwrap();
    let dispatcher = Dispatcher::new(orchestrator.runtime(), &config, orchestrator.layout());
    let result = dispatcher.search("*error*", None);

    assert!(matches!(result, Err(Error::NotProvisioned { .. })));
}

#[test]
fn uninitialized_cluster_has_no_runtime_config() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    let result = orchestrator.runtime_config(&support::spec("c1", input.path()));

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::NotInitialized { .. }))
    ));
}

#[test]
fn out_of_tree_directories_get_one_binding_each() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let archives = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());
    let mut spec = support::spec("c1", input.path());
    spec.archive_output.directory = Some(archives.path().to_path_buf());

    orchestrator.start(&spec).unwrap();

    assert_eq!(
        support::container_mounts(&runtime, "c1"),
        vec![
            PathBuf::from("/opt/clp"),
            PathBuf::from("/mnt/logs"),
            PathBuf::from("/mnt/archives"),
        ]
    );
}

#[test]
fn in_tree_directories_add_no_bindings() {
    let root = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let runtime = FakeRuntime::new();
    let sleeper = RecordingSleeper::default();
    let orchestrator = support::orchestrator(&runtime, &sleeper, root.path());

    orchestrator.start(&support::spec("c1", input.path())).unwrap();

    assert_eq!(
        support::container_mounts(&runtime, "c1"),
        vec![PathBuf::from("/opt/clp"), PathBuf::from("/mnt/logs")]
    );
}
