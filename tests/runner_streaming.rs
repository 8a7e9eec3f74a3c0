// tests/runner_streaming.rs
#![cfg(unix)]

use std::error::Error;
use std::sync::Arc;

use ffshell::exec::{CommandLine, ProcessRunner, RunnerOptions};
use ffshell::types::{Channel, RunEvent, TerminationReport};
use ffshell_test_utils::recording_sink::RecordingSink;
use ffshell_test_utils::{argv, init_tracing, sh, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn runner(sink: &Arc<RecordingSink>, buffer_size: usize) -> ProcessRunner<RecordingSink> {
    ProcessRunner::with_shared_sink(Arc::clone(sink), RunnerOptions { buffer_size })
}

/// No event may follow `Finished`, and there is exactly one of it.
fn assert_finished_last(sink: &RecordingSink) {
    let events = sink.events();
    let finished: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, RunEvent::Finished(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(finished, vec![events.len() - 1], "events: {events:?}");
}

#[tokio::test]
async fn silent_success_emits_only_the_final_report() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    let report = with_timeout(runner.execute(CommandLine::new(argv(&["true"]))?)).await?;

    assert_eq!(report, TerminationReport::NormalExit { code: 0 });
    assert_eq!(
        sink.events(),
        vec![RunEvent::Finished(TerminationReport::NormalExit { code: 0 })]
    );
    assert!(!runner.is_running());
    Ok(())
}

#[tokio::test]
async fn stdout_arrives_complete_and_in_order_before_the_report() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    // Small buffer so the output is split over many chunks.
    let runner = runner(&sink, 64);

    let script = "i=0; while [ $i -lt 500 ]; do echo line-$i; i=$((i+1)); done";
    let report = with_timeout(runner.execute(CommandLine::new(sh(script))?)).await?;

    let expected: String = (0..500).map(|i| format!("line-{i}\n")).collect();
    assert_eq!(report, TerminationReport::NormalExit { code: 0 });
    assert_eq!(sink.text(Channel::Stdout), expected);
    assert!(sink.output_count() > 1);
    assert_eq!(sink.text(Channel::Stderr), "");
    assert_finished_last(&sink);
    Ok(())
}

#[tokio::test]
async fn both_channels_are_drained_without_loss() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    // Enough stderr to fill a pipe buffer if it were not drained concurrently.
    let script =
        "i=0; while [ $i -lt 3000 ]; do echo err-$i >&2; echo out-$i; i=$((i+1)); done";
    let report = with_timeout(runner.execute(CommandLine::new(sh(script))?)).await?;

    let out: String = (0..3000).map(|i| format!("out-{i}\n")).collect();
    let err: String = (0..3000).map(|i| format!("err-{i}\n")).collect();
    assert!(report.is_success());
    assert_eq!(sink.text(Channel::Stdout), out);
    assert_eq!(sink.text(Channel::Stderr), err);
    assert_finished_last(&sink);
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_abnormal_with_code() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    let cmd = CommandLine::new(sh("echo oops >&2; exit 3"))?;
    let report = with_timeout(runner.execute(cmd)).await?;

    match &report {
        TerminationReport::AbnormalExit { code, description } => {
            assert_eq!(*code, Some(3));
            assert!(description.contains('3'), "{description}");
        }
        other => panic!("expected AbnormalExit, got {other:?}"),
    }
    assert_eq!(report.exit_code(), 3);
    assert_eq!(sink.text(Channel::Stderr), "oops\n");
    assert_eq!(sink.finished_reports(), vec![report]);
    Ok(())
}

#[tokio::test]
async fn missing_executable_reports_abnormal_exit_without_output() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    let program = "ffshell-test-no-such-program-4f1c";
    let cmd = CommandLine::new(argv(&[program, "-i", "x"]))?;
    let report = with_timeout(runner.execute(cmd)).await?;

    match &report {
        TerminationReport::AbnormalExit { code, description } => {
            assert_eq!(*code, None);
            assert!(description.contains(program), "{description}");
        }
        other => panic!("expected AbnormalExit, got {other:?}"),
    }
    assert_eq!(sink.output_count(), 0);
    assert_eq!(sink.events(), vec![RunEvent::Finished(report)]);
    assert!(!runner.is_running());
    Ok(())
}

#[tokio::test]
async fn arguments_are_passed_verbatim() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    let cmd = CommandLine::new(argv(&["printf", "%s|", "a b", "$HOME", "*", "c;d"]))?;
    let report = with_timeout(runner.execute(cmd)).await?;

    assert!(report.is_success());
    assert_eq!(sink.text(Channel::Stdout), "a b|$HOME|*|c;d|");
    Ok(())
}

#[tokio::test]
async fn multibyte_text_survives_one_byte_reads() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1);

    let cmd = CommandLine::new(argv(&["printf", "帧=42 速度=1.5x"]))?;
    let report = with_timeout(runner.execute(cmd)).await?;

    assert!(report.is_success());
    assert_eq!(sink.text(Channel::Stdout), "帧=42 速度=1.5x");
    Ok(())
}

#[tokio::test]
async fn runner_can_be_reused_for_sequential_runs() -> TestResult {
    init_tracing();
    let sink = RecordingSink::new();
    let runner = runner(&sink, 1024);

    let first = with_timeout(runner.execute(CommandLine::new(sh("echo one"))?)).await?;
    let second = with_timeout(runner.execute(CommandLine::new(sh("echo two; exit 1"))?)).await?;

    assert!(first.is_success());
    assert!(matches!(
        second,
        TerminationReport::AbnormalExit { code: Some(1), .. }
    ));
    assert_eq!(sink.text(Channel::Stdout), "one\ntwo\n");
    assert_eq!(sink.finished_reports(), vec![first, second]);
    Ok(())
}
