use oxide_component::Error;

use super::{build_integration_test, left_click, Click};

#[test]
fn handlers_keep_their_identity_across_renders() {
    let test = build_integration_test().build();
    let before: Vec<_> = ["decrement", "increment", "addButton", "callOnFinish"]
        .iter()
        .map(|class| test.handler(class, "onClick"))
        .collect();

    test.click("increment", left_click()).unwrap();
    test.click("addButton", Click { button: 2 }).unwrap();

    assert_eq!(test.renders.count(), 3);
    for (class, handler) in ["decrement", "increment", "addButton", "callOnFinish"]
        .iter()
        .zip(before)
    {
        assert!(
            handler.ptr_eq(&test.handler(class, "onClick")),
            "handler of .{class} was recreated"
        );
    }
}

#[test]
fn one_handler_is_cached_per_distinct_binding() {
    let test = build_integration_test().build();
    assert_eq!(test.runtime.cached_handlers(), 5);

    test.click("decrement", left_click()).unwrap();
    test.click("increment", left_click()).unwrap();

    assert_eq!(test.runtime.cached_handlers(), 5);
}

#[test]
fn binding_properties_are_replaced_by_their_untagged_names() {
    let test = build_integration_test().build();

    test.renders
        .with_last(|tree| {
            let button = tree
                .find(|element| element.kind().as_str() == "button")
                .unwrap();
            assert!(button.get("$onClick").is_none());
            assert!(button.handler("onClick").is_some());
        })
        .unwrap();
}

#[test]
fn discarding_binding_ignores_the_event_payload() {
    let test = build_integration_test().build();

    test.click("addFiveFromPromise", Click { button: 42 }).unwrap();
    test.runtime.process_events().unwrap();

    assert_eq!(test.displayed_value(), "5");
}

#[test]
fn given_a_missing_binding_mount_should_fail_before_any_dispatch() {
    let mut probe = super::MockReducerProbe::new();
    probe.expect_reduced().times(0);

    let result = build_integration_test()
        .given_probe(probe)
        .given_a_missing_binding()
        .try_build();

    match result.err() {
        Some(Error::UndefinedBinding {
            component,
            element,
            property,
        }) => {
            assert_eq!(component, "Counter");
            assert_eq!(element, "button");
            assert_eq!(property, "$onClick");
        }
        other => panic!("expected an undefined binding error, got {other:?}"),
    }
}

#[test]
fn handlers_from_a_dropped_runtime_do_nothing() {
    let test = build_integration_test().build();
    let increment = test.handler("increment", "onClick");
    let renders = test.renders.clone();

    drop(test);

    assert!(increment.call(left_click()).is_ok());
    assert_eq!(renders.count(), 1);
}
