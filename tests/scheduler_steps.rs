use std::error::Error;

use stepdag::dag::{Scheduler, StepGraph, StepState};
use stepdag::engine::{build_graph, explain_steps};
use stepdag::errors::StepdagError;
use stepdag_test_utils::builders::JobBuilder;
use stepdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn diamond() -> Result<StepGraph, StepdagError> {
    // top <- left, right <- bottom
    let job = JobBuilder::new()
        .step("top", 1, &[])
        .step("left", 5, &["top"])
        .step("right", 5, &["top"])
        .step("bottom", 9, &["left", "right"])
        .build();
    build_graph(&job)
}

#[test]
fn manual_stepping_walks_the_diamond() -> TestResult {
    init_tracing();
    let mut scheduler = Scheduler::from_graph(diamond()?);

    assert_eq!(scheduler.frontier(), vec!["top"]);
    assert_eq!(scheduler.state_of("bottom"), Some(StepState::Pending));

    let first = scheduler.step().ok_or("frontier unexpectedly empty")?;
    assert_eq!(first.selected, "top");
    assert_eq!(first.newly_ready, vec!["left", "right"]);
    assert_eq!(scheduler.state_of("top"), Some(StepState::Scheduled));
    assert_eq!(scheduler.state_of("left"), Some(StepState::Ready));
    assert_eq!(scheduler.frontier(), vec!["left", "right"]);

    let second = scheduler.step().ok_or("frontier unexpectedly empty")?;
    assert_eq!(second.selected, "left");
    assert!(second.newly_ready.is_empty());
    assert_eq!(scheduler.state_of("bottom"), Some(StepState::Pending));

    let third = scheduler.step().ok_or("frontier unexpectedly empty")?;
    assert_eq!(third.selected, "right");
    assert_eq!(third.newly_ready, vec!["bottom"]);

    let fourth = scheduler.step().ok_or("frontier unexpectedly empty")?;
    assert_eq!(fourth.selected, "bottom");
    assert_eq!(fourth.precedence, 9);

    assert!(scheduler.is_done());
    assert!(scheduler.step().is_none());
    assert_eq!(scheduler.scheduled(), &["top", "left", "right", "bottom"]);
    assert_eq!(scheduler.state_of("missing"), None);

    assert_eq!(scheduler.finish()?, vec!["top", "left", "right", "bottom"]);
    Ok(())
}

#[test]
fn trace_records_the_frontier_before_each_pick() -> TestResult {
    init_tracing();
    let job = JobBuilder::new()
        .step("low", 1, &[])
        .step("high", 9, &[])
        .step("mid", 5, &["high"])
        .build();

    let trace = explain_steps(&job)?;
    let frontiers: Vec<Vec<String>> = trace.entries.iter().map(|e| e.frontier.clone()).collect();

    assert_eq!(
        frontiers,
        vec![
            vec!["high".to_string(), "low".to_string()],
            vec!["mid".to_string(), "low".to_string()],
            vec!["low".to_string()],
        ]
    );
    assert_eq!(trace.ordering(), vec!["high", "mid", "low"]);
    Ok(())
}

#[test]
fn stalled_pass_reports_the_cycle_on_finish() -> TestResult {
    init_tracing();
    let job = JobBuilder::new()
        .step("ok", 3, &[])
        .step("ping", 2, &["pong"])
        .step("pong", 2, &["ping"])
        .build();

    let mut scheduler = Scheduler::from_graph(build_graph(&job)?);
    while scheduler.step().is_some() {}

    assert_eq!(scheduler.scheduled(), &["ok"]);
    assert_eq!(scheduler.state_of("ping"), Some(StepState::Pending));

    match scheduler.finish() {
        Err(StepdagError::CyclicDependency { cycle, blocked }) => {
            assert_eq!(cycle, vec!["ping", "pong"]);
            assert_eq!(blocked, 2);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
    Ok(())
}

#[test]
fn cyclic_error_message_names_the_cycle() {
    let err = StepdagError::CyclicDependency {
        cycle: vec!["a".into(), "b".into()],
        blocked: 3,
    };
    assert_eq!(
        err.to_string(),
        "cyclic dependency between steps [a, b] (3 step(s) left unscheduled)"
    );
}
