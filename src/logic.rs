//! Component logic trait defining the reducer contract.

use crate::{Commands, Node, Result};

/// Component logic trait defining the init/update/render contract.
///
/// Implementations provide three pure functions:
/// - [`init`](Self::init): derive the initial state (and mount-time commands)
///   from the initial properties
/// - [`update`](Self::update): reduce (Action, State, Props) to [`Commands`]
/// - [`render`](Self::render): describe the element tree for a state, with
///   `$`-prefixed event bindings the runtime turns into live handlers
///
/// Match actions exhaustively in `update`; an enum action type makes an
/// unhandled action a compile error rather than a runtime one.
///
/// See the [crate-level documentation](crate) for a complete example.
pub trait Component<Action, State, Props, Event> {
    /// Component name used in diagnostics.
    fn name(&self) -> &str;

    /// Produce the initial commands from the initial properties.
    ///
    /// The commands must contain a [`Command::State`](crate::Command::State);
    /// the first one becomes the initial state and any later one is ignored.
    /// Every other command runs once on mount.
    fn init(&self, props: &Props) -> Result<Commands<State, Action>>;

    /// Reduce an action to commands.
    ///
    /// All state changes must happen through the returned commands.
    fn update(&self, action: Action, state: &State, props: &Props) -> Result<Commands<State, Action>>;

    /// Describe the element tree for the current state and properties.
    fn render(&self, state: &State, props: &Props) -> Node<Action, Event>;

    /// Lifecycle hooks; read once when the runtime is built.
    fn lifecycles(&self) -> Lifecycles<Action, Props> {
        Lifecycles::new()
    }
}

type PropsChangedHook<Action, Props> = Box<dyn Fn(&Props) -> Option<Action>>;

/// Optional lifecycle hooks of a component.
///
/// ```rust
/// use oxide_component::Lifecycles;
///
/// #[derive(Clone)]
/// struct Props { initial_value: i32 }
///
/// enum Action { NewProps { previous: i32 } }
///
/// let lifecycles: Lifecycles<Action, Props> = Lifecycles::new()
///     .on_props_changed(|prev: &Props| Action::NewProps { previous: prev.initial_value });
/// assert!(lifecycles.has_props_changed());
/// ```
pub struct Lifecycles<Action, Props> {
    props_changed: Option<PropsChangedHook<Action, Props>>,
}

impl<Action, Props> Default for Lifecycles<Action, Props> {
    fn default() -> Self {
        Self { props_changed: None }
    }
}

impl<Action, Props> Lifecycles<Action, Props> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an action from the previous properties whenever the host
    /// commits properties that differ shallowly from them.
    pub fn on_props_changed<F, T>(mut self, hook: F) -> Self
    where
        F: Fn(&Props) -> T + 'static,
        T: Into<Option<Action>>,
    {
        self.props_changed = Some(Box::new(move |prev| hook(prev).into()));
        self
    }

    pub fn has_props_changed(&self) -> bool {
        self.props_changed.is_some()
    }

    pub(crate) fn props_changed_action(&self, prev: &Props) -> Option<Action> {
        self.props_changed.as_ref().and_then(|hook| hook(prev))
    }
}
