//! Tests for the command runner service: send, fetch, run_remote, dry-run.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use remote_exec::application::services::runner::{Runner, RunnerOptions};
use remote_exec::domain::{ExecError, RemoteEnv, Target, TransferMap};
use remote_exec::infra::{LocalTransport, SshTransport};

use crate::helpers::argv;
use crate::mocks::{
    Event, Journal, RecordingFs, RecordingReporter, RecordingRunner, UnspawnableRunner,
};

fn ssh() -> SshTransport {
    SshTransport::new(
        Target::parse("ci@builder:2222").expect("valid target"),
        None,
        Vec::new(),
    )
}

fn local() -> LocalTransport {
    LocalTransport::new(PathBuf::from("/usr/lib/openssh/sftp-server"))
}

fn map(entries: &[(&str, &str)]) -> TransferMap {
    let mut map = TransferMap::new();
    for (local, remote) in entries {
        map.insert(*local, *remote).expect("unique keys");
    }
    map
}

fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|c| c.downcast_ref::<ExecError>())
        .and_then(ExecError::exit_code)
}

// ============================================================================
// send
// ============================================================================

#[tokio::test]
async fn test_send_creates_remote_dirs_then_puts_every_entry() {
    let journal = Journal::new();
    let transport = ssh();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let upload = map(&[
        ("/l/in/a.txt", "/r/input/a.txt"),
        ("/l/in/sub/b.txt", "/r/input/sub/b.txt"),
        ("/l/in/c.txt", "/r/input/c.txt"),
    ]);
    runner.send(&upload).await.expect("send succeeds");

    assert_eq!(
        journal.launch_lines(),
        [
            "ssh -n -p 2222 ci@builder -- \"env\" \"mkdir\" \"-p\" \"/r/input\" \"/r/input/sub\"",
            "sftp -b - -q -P 2222 ci@builder",
        ]
    );
    assert_eq!(
        journal.stdin_scripts(),
        [concat!(
            "put \"/l/in/a.txt\" \"/r/input/a.txt\"\n",
            "put \"/l/in/c.txt\" \"/r/input/c.txt\"\n",
            "put \"/l/in/sub/b.txt\" \"/r/input/sub/b.txt\"",
        )]
    );
}

#[tokio::test]
async fn test_send_stops_when_remote_mkdir_fails() {
    let journal = Journal::new();
    let transport = ssh();
    let commands = RecordingRunner::with_exit_codes(&journal, &[255]);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let err = runner
        .send(&map(&[("/l/a", "/r/a")]))
        .await
        .expect_err("mkdir failure must propagate");

    assert_eq!(exit_code(&err), Some(255));
    assert_eq!(journal.launches().len(), 1, "sftp must not start");
}

#[tokio::test]
async fn test_send_propagates_transfer_exit_status() {
    let journal = Journal::new();
    let transport = ssh();
    let commands = RecordingRunner::with_exit_codes(&journal, &[0, 1]);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let err = runner
        .send(&map(&[("/l/a", "/r/a")]))
        .await
        .expect_err("transfer failure must propagate");

    assert_eq!(exit_code(&err), Some(1));
    assert!(format!("{err:#}").contains("uploading files"));
}

// ============================================================================
// fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_creates_local_dirs_then_gets_every_entry() {
    let journal = Journal::new();
    let transport = local();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let download = map(&[
        ("/l/out/x/1.o", "/r/output/x/1.o"),
        ("/l/out/x/2.o", "/r/output/x/2.o"),
    ]);
    runner.fetch(&download).await.expect("fetch succeeds");

    assert_eq!(
        journal.events(),
        [
            Event::CreateDir(PathBuf::from("/l/out/x")),
            Event::Launch {
                program: "sftp".into(),
                args: argv(&["-b", "-", "-q", "-D", "/usr/lib/openssh/sftp-server"]),
                stdin: Some(
                    "get \"/r/output/x/1.o\" \"/l/out/x/1.o\"\n\
                     get \"/r/output/x/2.o\" \"/l/out/x/2.o\""
                        .into()
                ),
            },
        ]
    );
}

#[tokio::test]
async fn test_fetch_local_dir_failure_aborts_before_transfer() {
    let journal = Journal::new();
    let transport = local();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::failing(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let err = runner
        .fetch(&map(&[("/l/out/a", "/r/a")]))
        .await
        .expect_err("mkdir failure must propagate");

    assert!(err.to_string().contains("permission denied"));
    assert_eq!(exit_code(&err), None);
    assert!(journal.launches().is_empty());
}

// ============================================================================
// run_remote
// ============================================================================

#[tokio::test]
async fn test_run_remote_prefixes_sorted_environment() {
    let journal = Journal::new();
    let transport = local();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let env = RemoteEnv::collect([("X_ZED", "z"), ("X_ALPHA", "a b")], "X_");
    runner
        .run_remote(&argv(&["prog", "--flag"]), &env)
        .await
        .expect("remote command succeeds");

    assert_eq!(
        journal.launches(),
        [(
            "env".to_string(),
            argv(&["ALPHA=a b", "ZED=z", "prog", "--flag"]),
            None
        )]
    );
}

#[tokio::test]
async fn test_run_remote_propagates_exit_status() {
    let journal = Journal::new();
    let transport = ssh();
    let commands = RecordingRunner::with_exit_codes(&journal, &[2]);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    let err = runner
        .run_remote(&argv(&["false"]), &RemoteEnv::default())
        .await
        .expect_err("non-zero exit must propagate");

    let exec = err.downcast_ref::<ExecError>().expect("ExecError at the root");
    assert_eq!(
        exec,
        &ExecError::NonZeroExit {
            program: "ssh".into(),
            code: 2
        }
    );
}

#[tokio::test]
async fn test_spawn_failure_is_not_an_exit_status() {
    let journal = Journal::new();
    let transport = ssh();
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(
        &transport,
        &UnspawnableRunner,
        &fs,
        &reporter,
        RunnerOptions::default(),
    );

    let err = runner
        .run_remote(&argv(&["true"]), &RemoteEnv::default())
        .await
        .expect_err("spawn failure must propagate");
    assert!(err.to_string().contains("failed to spawn ssh"));
    assert_eq!(exit_code(&err), None);
}

// ============================================================================
// verbose and dry-run
// ============================================================================

#[tokio::test]
async fn test_verbose_echoes_before_launching() {
    let journal = Journal::new();
    let transport = local();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(
        &transport,
        &commands,
        &fs,
        &reporter,
        RunnerOptions::new(true, false),
    );

    runner
        .run_sftp(&argv(&["put \"a\" \"b\""]))
        .await
        .expect("transfer succeeds");

    let events = journal.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], Event::Echo(argv) if argv[0] == "sftp"));
    assert_eq!(events[1], Event::Script("put \"a\" \"b\"".into()));
    assert!(matches!(&events[2], Event::Launch { program, .. } if program == "sftp"));
}

#[tokio::test]
async fn test_quiet_runner_echoes_nothing() {
    let journal = Journal::new();
    let transport = local();
    let commands = RecordingRunner::new(&journal);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let runner = Runner::new(&transport, &commands, &fs, &reporter, RunnerOptions::default());

    runner
        .fetch(&map(&[("/l/a", "/r/a")]))
        .await
        .expect("fetch succeeds");

    assert!(
        journal
            .events()
            .iter()
            .all(|e| matches!(e, Event::Launch { .. } | Event::CreateDir(_)))
    );
}

#[tokio::test]
async fn test_dry_run_reports_everything_and_launches_nothing() {
    let journal = Journal::new();
    let transport = ssh();
    // A failing code would surface if anything were launched.
    let commands = RecordingRunner::with_exit_codes(&journal, &[9, 9, 9, 9]);
    let fs = RecordingFs::new(&journal);
    let reporter = RecordingReporter::new(&journal);
    let options = RunnerOptions::new(false, true);
    assert!(options.verbose, "dry-run implies verbose");
    let runner = Runner::new(&transport, &commands, &fs, &reporter, options);

    let files = map(&[("/l/out/a", "/r/output/a")]);
    runner.send(&files).await.expect("dry-run send succeeds");
    runner
        .run_remote(&argv(&["prog"]), &RemoteEnv::default())
        .await
        .expect("dry-run remote succeeds");
    runner.fetch(&files).await.expect("dry-run fetch succeeds");

    assert!(journal.launches().is_empty());
    let events = journal.events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::Echo(_)))
            .count(),
        4,
        "mkdir, put session, remote command, get session"
    );
    assert!(events.contains(&Event::EchoDir("/l/out".into())));
    assert!(events.contains(&Event::Script("get \"/r/output/a\" \"/l/out/a\"".into())));
    assert!(!events.iter().any(|e| matches!(e, Event::CreateDir(_))));
}
