use std::cell::RefCell;
use std::rc::Rc;

use mockall::predicate::eq;
use oxide_component::{Callback, Node};

use super::{build_integration_test, CounterAction, CounterProps, MockOwner, MockReducerProbe};

#[test]
fn when_props_change_owner_should_be_told_once() {
    let mut owner = MockOwner::new();
    owner
        .expect_on_prop_change()
        .with(eq(0), eq(10))
        .times(1)
        .return_const(());
    let test = build_integration_test().given_owner(owner).build();

    test.runtime.set_props(test.props_with_initial_value(10)).unwrap();

    assert_eq!(test.runtime.props().initial_value, 10);
    assert_eq!(test.renders.count(), 2);
}

#[test]
fn when_props_change_state_is_left_alone() {
    let mut owner = MockOwner::new();
    owner.expect_on_prop_change().return_const(());
    let test = build_integration_test().given_owner(owner).build();

    test.runtime.set_props(test.props_with_initial_value(10)).unwrap();

    assert_eq!(test.runtime.state().value, 0);
}

#[test]
fn given_equal_props_should_not_dispatch_nor_render() {
    let mut probe = MockReducerProbe::new();
    probe.expect_reduced().times(0);
    let mut owner = MockOwner::new();
    owner.expect_on_prop_change().times(0);
    let test = build_integration_test().given_probe(probe).given_owner(owner).build();

    test.runtime.set_props(test.runtime.props()).unwrap();

    assert_eq!(test.renders.count(), 1);
}

#[test]
fn given_only_a_new_title_node_should_render_without_dispatching() {
    let mut probe = MockReducerProbe::new();
    probe.expect_reduced().times(0);
    let mut owner = MockOwner::new();
    owner.expect_on_prop_change().times(0);
    let test = build_integration_test().given_probe(probe).given_owner(owner).build();

    test.runtime
        .set_props(CounterProps {
            title: Node::text("Another title"),
            ..test.runtime.props()
        })
        .unwrap();

    assert_eq!(test.renders.count(), 2);
    let title = test
        .renders
        .with_last(|tree| tree.as_element().map(|root| root.text()))
        .flatten()
        .unwrap_or_default();
    assert!(title.starts_with("Another title"), "{title}");
}

#[test]
fn given_an_equal_title_node_should_skip_the_render() {
    let test = build_integration_test().build();

    test.runtime
        .set_props(CounterProps {
            title: Node::text("Counter"),
            ..test.runtime.props()
        })
        .unwrap();

    assert_eq!(test.renders.count(), 1);
}

#[test]
fn given_a_new_callback_identity_props_are_considered_changed() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut probe = MockReducerProbe::new();
    probe
        .expect_reduced()
        .with(eq(CounterAction::NewProps { previous: 0 }))
        .times(1)
        .return_const(());
    let test = build_integration_test().given_probe(probe).build();

    test.runtime
        .set_props(CounterProps {
            on_prop_change: Callback::new({
                let calls = calls.clone();
                move |change: (i32, i32)| calls.borrow_mut().push(change)
            }),
            ..test.runtime.props()
        })
        .unwrap();

    assert_eq!(*calls.borrow(), vec![(0, 0)]);
    assert_eq!(test.renders.count(), 2);
}
