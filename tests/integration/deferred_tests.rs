use std::sync::atomic::Ordering;

use futures::FutureExt;
use mockall::predicate::eq;
use mockall::Sequence;

use super::{build_integration_test, left_click, CounterAction, CounterState, MockReducerProbe};

#[test]
fn deferred_action_is_dispatched_when_events_are_processed() {
    let mut probe = MockReducerProbe::new();
    let mut seq = Sequence::new();
    probe
        .expect_reduced()
        .with(eq(CounterAction::AddFiveFromPromise))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    probe
        .expect_reduced()
        .with(eq(CounterAction::Add(5)))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let test = build_integration_test().given_probe(probe).build();

    test.click("addFiveFromPromise", left_click()).unwrap();
    assert_eq!(test.displayed_value(), "0");

    let dispatched = test.runtime.process_events().unwrap();

    assert_eq!(dispatched, 1);
    assert_eq!(test.displayed_value(), "5");
}

#[test]
fn processing_an_empty_queue_dispatches_nothing() {
    let test = build_integration_test().build();

    assert_eq!(test.runtime.process_events().unwrap(), 0);
    assert_eq!(test.renders.count(), 1);
}

#[test]
fn given_initial_actions_they_should_run_after_mount() {
    let test = build_integration_test()
        .given_initial_actions(vec![CounterAction::Add(2), CounterAction::Decrement])
        .build();
    assert_eq!(test.runtime.state(), CounterState { value: 0 });

    assert_eq!(test.runtime.process_events().unwrap(), 2);

    assert_eq!(test.runtime.state(), CounterState { value: 1 });
    assert_eq!(test.renders.count(), 3);
}

#[test]
fn side_effect_runs_without_dispatching() {
    let mut probe = MockReducerProbe::new();
    probe
        .expect_reduced()
        .with(eq(CounterAction::Touch))
        .times(1)
        .return_const(());
    let test = build_integration_test().given_probe(probe).build();

    test.runtime.dispatch(CounterAction::Touch).unwrap();

    assert_eq!(test.side_effects.load(Ordering::SeqCst), 1);
    assert_eq!(test.runtime.process_events().unwrap(), 0);
    assert_eq!(test.renders.count(), 1);
}

#[test]
fn emitted_actions_are_dispatched_by_run() {
    let test = build_integration_test().build();
    let emitter = test.runtime.emitter();

    assert!(emitter.emit(CounterAction::Add(3)));
    // `run` never completes while the runtime is alive; one poll drains the queue.
    assert!(test.runtime.run().now_or_never().is_none());

    assert_eq!(test.displayed_value(), "3");
}

#[test]
fn emitter_can_be_used_from_another_thread() {
    let test = build_integration_test().build();
    let emitter = test.runtime.emitter();

    std::thread::spawn(move || {
        emitter.emit(CounterAction::Add(7));
    })
    .join()
    .unwrap();

    assert_eq!(test.runtime.process_events().unwrap(), 1);
    assert_eq!(test.displayed_value(), "7");
}
