use std::io::Write;

use ghost::cli::parse_args;
use ghost::common::{build_sinks, log_config, prepare_worker};
use ghost::workers;
use ghost_core::{GhostError, LogConfig, LogLevel, OutputFormat};
use ghost_worker::Worker;

fn args(extra: &[&str]) -> Vec<String> {
    std::iter::once("ghost")
        .chain(extra.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn test_minimal_invocation() {
    let cli = parse_args(args(&["-w", "speaker"])).unwrap();

    assert_eq!(cli.worker.as_deref(), Some("speaker"));
    assert!(!cli.no_daemon);
    assert!(!cli.flags().interactive);
    assert!(!cli.flags().test);
    assert!(cli.worker_arguments().is_empty());
}

#[test]
fn test_missing_worker_is_missing_argument() {
    let err = parse_args(args(&["--no-daemon"])).unwrap_err();
    assert!(matches!(err, GhostError::MissingArgument(_)));
}

#[test]
fn test_help_only_applies_without_worker() {
    let help = parse_args(args(&["--help"])).unwrap();
    assert!(help.wants_help());

    let short = parse_args(args(&["-h", "--no-daemon"])).unwrap();
    assert!(short.wants_help());

    let run = parse_args(args(&["--help", "--worker", "speaker"])).unwrap();
    assert!(!run.wants_help());
    assert_eq!(run.worker_type().unwrap(), "speaker");
}

#[test]
fn test_list_workers_does_not_need_worker() {
    let cli = parse_args(args(&["--list-workers"])).unwrap();
    assert!(cli.list_workers);
    assert!(cli.worker_type().is_err());
}

#[test]
fn test_interactive_and_test_are_independent() {
    let interactive = parse_args(args(&["-w", "speaker", "-i"])).unwrap();
    assert!(interactive.flags().interactive);
    assert!(!interactive.flags().test);

    let test = parse_args(args(&["--worker", "speaker", "--test"])).unwrap();
    assert!(!test.flags().interactive);
    assert!(test.flags().test);
}

#[test]
fn test_logging_and_worker_arguments() {
    let cli = parse_args(args(&[
        "-w",
        "speaker",
        "--log-level",
        "warning",
        "--log-format",
        "json",
        "-a",
        "phrase=hello",
        "--arg",
        "volume=11",
    ]))
    .unwrap();

    assert_eq!(cli.log_level, Some(LogLevel::Warning));
    assert_eq!(cli.log_format, Some(OutputFormat::Json));
    let arguments = cli.worker_arguments();
    assert_eq!(arguments["phrase"], "hello");
    assert_eq!(arguments["volume"], "11");
}

#[test]
fn test_registry_lists_speaker() {
    assert_eq!(workers::registry().list_workers(), vec!["speaker"]);
}

#[test]
fn test_prepare_worker_applies_config_file_and_arguments() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[worker]\nsleep_time_seconds = 60\nlog_location = \"/tmp/ghost-speaker.log\""
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cli = parse_args(args(&["-w", "speaker", "-c", &path, "-a", "phrase=hi"])).unwrap();
    let worker = prepare_worker(&cli, &workers::registry()).unwrap();

    assert_eq!(worker.name(), "Speaker Worker");
    assert_eq!(worker.sleep_time().as_secs(), 60);
    assert_eq!(worker.base().argument("phrase"), Some("hi"));

    let config = log_config(&cli, worker.as_ref());
    assert_eq!(config.log_file_path.as_deref(), Some("/tmp/ghost-speaker.log"));
}

#[test]
fn test_prepare_unknown_worker() {
    let cli = parse_args(args(&["-w", "poltergeist"])).unwrap();
    let err = prepare_worker(&cli, &workers::registry()).err().unwrap();

    assert!(matches!(
        err.downcast_ref::<GhostError>(),
        Some(GhostError::WorkerNotFound { worker, .. }) if worker == "poltergeist"
    ));
}

#[test]
fn test_console_sink_only_in_foreground() {
    let config = LogConfig::default();
    assert_eq!(build_sinks(&config, true).sink_names(), vec!["console", "daemon"]);
    assert_eq!(build_sinks(&config, false).sink_names(), vec!["daemon"]);
}
