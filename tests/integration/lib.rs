mod counter_logic;

use std::rc::Rc;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use oxide_component::{
    create_test_spawner, Callback, ComponentRuntime, Handler, Node, PropValue, Result, TestRenderer,
};
pub(crate) use counter_logic::*;

mod binding_tests;
mod deferred_tests;
mod lifecycle_tests;

pub(crate) type TestSpawner = fn(std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>>);

pub(crate) type CounterRuntime = ComponentRuntime<
    CounterAction,
    CounterState,
    CounterProps,
    Click,
    CounterLogic,
    TestRenderer<CounterAction, Click>,
    TestSpawner,
>;

pub(crate) struct CounterTest {
    pub(crate) runtime: CounterRuntime,
    pub(crate) renders: TestRenderer<CounterAction, Click>,
    pub(crate) side_effects: Arc<AtomicUsize>,
}

impl CounterTest {
    /// Props equal to the current ones except for `initial_value`; callbacks
    /// keep their identity.
    pub(crate) fn props_with_initial_value(&self, initial_value: i32) -> CounterProps {
        CounterProps {
            initial_value,
            ..self.runtime.props()
        }
    }

    pub(crate) fn handler(&self, class: &str, event: &str) -> Handler<Click> {
        self.renders
            .with_last(|tree| find_by_class(tree, class)?.handler(event).cloned())
            .flatten()
            .unwrap_or_else(|| panic!("no {event} handler on .{class}"))
    }

    /// Invoke a handler of the last committed tree, as the host would.
    pub(crate) fn click(&self, class: &str, event: Click) -> Result<()> {
        let handler = self.handler(class, "onClick");
        handler.call(event)
    }

    pub(crate) fn displayed_value(&self) -> String {
        self.renders
            .with_last(|tree| find_by_class(tree, "value").map(|element| element.text()))
            .flatten()
            .unwrap_or_default()
    }
}

fn find_by_class<'a>(
    tree: &'a Node<CounterAction, Click>,
    class: &str,
) -> Option<&'a oxide_component::Element<CounterAction, Click>> {
    tree.find(|element| matches!(element.get("className"), Some(PropValue::Text(c)) if c == class))
}

pub(crate) fn left_click() -> Click {
    Click { button: 0 }
}

pub(crate) struct CounterTestBuilder {
    initial_value: i32,
    owner: MockOwner,
    probe: MockReducerProbe,
    initial_actions: Vec<CounterAction>,
    missing_binding: bool,
}

pub(crate) fn build_integration_test() -> CounterTestBuilder {
    let mut probe = MockReducerProbe::new();
    probe.expect_reduced().return_const(());

    CounterTestBuilder {
        initial_value: 0,
        owner: MockOwner::new(),
        probe,
        initial_actions: Vec::new(),
        missing_binding: false,
    }
}

impl CounterTestBuilder {
    pub(crate) fn given_initial_value(mut self, initial_value: i32) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub(crate) fn given_owner(mut self, owner: MockOwner) -> Self {
        self.owner = owner;
        self
    }

    pub(crate) fn given_probe(mut self, probe: MockReducerProbe) -> Self {
        self.probe = probe;
        self
    }

    pub(crate) fn given_initial_actions(mut self, actions: Vec<CounterAction>) -> Self {
        self.initial_actions = actions;
        self
    }

    pub(crate) fn given_a_missing_binding(mut self) -> Self {
        self.missing_binding = true;
        self
    }

    pub(crate) fn build(self) -> CounterTest {
        self.try_build().unwrap()
    }

    /// Build and mount the component.
    pub(crate) fn try_build(self) -> Result<CounterTest> {
        let renders = TestRenderer::new();
        let owner = Rc::new(self.owner);

        let props = CounterProps {
            initial_value: self.initial_value,
            on_finish: Callback::new({
                let owner = owner.clone();
                move |value| owner.on_finish(value)
            }),
            on_prop_change: Callback::new({
                let owner = owner.clone();
                move |(previous, current): (i32, i32)| owner.on_prop_change(previous, current)
            }),
            title: Node::text("Counter"),
        };

        let mut logic = CounterLogic::new(Box::new(self.probe));
        logic.initial_actions = self.initial_actions;
        logic.missing_binding = self.missing_binding;
        let side_effects = logic.side_effects.clone();

        let runtime = ComponentRuntime::new(logic, props, renders.clone(), create_test_spawner())?;
        runtime.mount()?;

        Ok(CounterTest {
            runtime,
            renders,
            side_effects,
        })
    }
}
