use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oxide_component::{
    impl_shallow_eq, Binding, BindingCache, Callback, Command, Commands, Component, Element,
    Error, Lifecycles, Node, PropValue, Result,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CounterAction {
    Decrement,
    Add(i32),
    AddFiveFromPromise,
    CallOnFinish,
    NewProps { previous: i32 },
    SetThenNotify(i32),
    Touch,
    Reject,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Click {
    pub(crate) button: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CounterState {
    pub(crate) value: i32,
}

impl_shallow_eq!(CounterState { value });

#[derive(Clone)]
pub(crate) struct CounterProps {
    pub(crate) initial_value: i32,
    pub(crate) on_finish: Callback<i32>,
    pub(crate) on_prop_change: Callback<(i32, i32)>,
    pub(crate) title: Node<CounterAction, Click>,
}

impl_shallow_eq!(CounterProps {
    initial_value,
    on_finish,
    on_prop_change,
    title,
});

#[cfg_attr(test, mockall::automock)]
pub(crate) trait Owner {
    fn on_finish(&self, value: i32);
    fn on_prop_change(&self, previous: i32, current: i32);
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait ReducerProbe {
    fn reduced(&self, action: &CounterAction);
}

pub(crate) struct CounterLogic {
    pub(crate) probe: Box<dyn ReducerProbe>,
    pub(crate) initial_actions: Vec<CounterAction>,
    pub(crate) missing_binding: bool,
    pub(crate) side_effects: Arc<AtomicUsize>,
    pub(crate) adders: BindingCache<i32, CounterAction, Click>,
    pub(crate) add_button: Binding<CounterAction, Click>,
}

impl CounterLogic {
    pub(crate) fn new(probe: Box<dyn ReducerProbe>) -> Self {
        CounterLogic {
            probe,
            initial_actions: Vec::new(),
            missing_binding: false,
            side_effects: Arc::new(AtomicUsize::new(0)),
            adders: BindingCache::new(),
            add_button: Binding::with_event(|click: Click| CounterAction::Add(click.button)),
        }
    }

    fn add(&self, value: i32) -> Binding<CounterAction, Click> {
        self.adders
            .get(value, |value| Binding::thunk(move || CounterAction::Add(value)))
    }
}

fn button(
    class: &str,
    event: &str,
    binding: impl Into<PropValue<CounterAction, Click>>,
    label: &str,
) -> Element<CounterAction, Click> {
    Element::new("button")
        .prop("className", class)
        .prop(event, binding)
        .child(label)
}

impl Component<CounterAction, CounterState, CounterProps, Click> for CounterLogic {
    fn name(&self) -> &str {
        "Counter"
    }

    fn init(&self, props: &CounterProps) -> Result<Commands<CounterState, CounterAction>> {
        let initial = Command::state(CounterState {
            value: props.initial_value,
        });
        let deferred = self
            .initial_actions
            .iter()
            .cloned()
            .map(|action| Command::deferred(async move { action }));

        Ok(std::iter::once(initial).chain(deferred).collect())
    }

    fn update(
        &self,
        action: CounterAction,
        state: &CounterState,
        props: &CounterProps,
    ) -> Result<Commands<CounterState, CounterAction>> {
        self.probe.reduced(&action);

        let commands = match action {
            CounterAction::Decrement => Command::state(CounterState {
                value: state.value - 1,
            })
            .into(),
            CounterAction::Add(value) => Command::state(CounterState {
                value: state.value + value,
            })
            .into(),
            CounterAction::AddFiveFromPromise => {
                Command::deferred(async { CounterAction::Add(5) }).into()
            }
            CounterAction::CallOnFinish => Command::notify(&props.on_finish, state.value).into(),
            CounterAction::NewProps { previous } => {
                Command::notify(&props.on_prop_change, (previous, props.initial_value)).into()
            }
            CounterAction::SetThenNotify(value) => Commands::batch(vec![
                Command::state(CounterState { value }),
                Command::notify(&props.on_finish, 5),
            ]),
            CounterAction::Touch => {
                let side_effects = self.side_effects.clone();
                Command::side_effect(move || {
                    side_effects.fetch_add(1, Ordering::SeqCst);
                })
                .into()
            }
            CounterAction::Reject => return Err(Error::unhandled_action(&action)),
        };
        Ok(commands)
    }

    fn render(&self, state: &CounterState, props: &CounterProps) -> Node<CounterAction, Click> {
        let mut root = Element::new("div")
            .child(props.title.clone())
            .child(button("decrement", "$onClick", Binding::action(CounterAction::Decrement), "-1"))
            .child(button("increment", "$onClick", self.add(1), "+1"))
            .child(button("addButton", "$onClick", self.add_button.clone(), "+BUTTON"))
            .child(button(
                "addFiveFromPromise",
                "$$onClick",
                Binding::action(CounterAction::AddFiveFromPromise),
                "+5_FROM_PROMISE",
            ))
            .child(button(
                "callOnFinish",
                "$onClick",
                Binding::action(CounterAction::CallOnFinish),
                "CALL_ON_FINISH",
            ))
            .child(
                Element::new("div")
                    .prop("className", "value")
                    .child(state.value.to_string()),
            );

        if self.missing_binding {
            root = root.child(button("broken", "$onClick", PropValue::Absent, "?"));
        }
        root.into()
    }

    fn lifecycles(&self) -> Lifecycles<CounterAction, CounterProps> {
        Lifecycles::new().on_props_changed(|prev: &CounterProps| CounterAction::NewProps {
            previous: prev.initial_value,
        })
    }
}
