//! Declarative command vocabulary returned by reducers.

use core::fmt;
use core::future::Future;
use core::pin::Pin;

use crate::{Callback, Error, Result};

/// A pending computation whose success value is dispatched as a new action.
///
/// Resolving to `None` dispatches nothing. The future must own its failure
/// handling: map errors into an action (or `None`) before wrapping it, the
/// runtime never observes them.
pub struct Deferred<Action>(Pin<Box<dyn Future<Output = Option<Action>> + Send + 'static>>);

impl<Action: 'static> Deferred<Action> {
    /// Wrap a future that always resolves to an action.
    pub fn new(future: impl Future<Output = Action> + Send + 'static) -> Self {
        Self(Box::pin(async move { Some(future.await) }))
    }

    /// Wrap a future that may resolve to no action at all.
    pub fn optional(future: impl Future<Output = Option<Action>> + Send + 'static) -> Self {
        Self(Box::pin(future))
    }

    pub(crate) fn into_future(self) -> Pin<Box<dyn Future<Output = Option<Action>> + Send>> {
        self.0
    }
}

/// A request to invoke an owner [`Callback`] with a fixed argument tuple.
pub struct Notification(Box<dyn FnOnce()>);

impl Notification {
    pub fn new<T: 'static>(callback: &Callback<T>, args: T) -> Self {
        let callback = callback.clone();
        Self(Box::new(move || callback.call(args)))
    }

    pub(crate) fn invoke(self) {
        (self.0)()
    }
}

/// A single instruction for the command interpreter.
///
/// # Example
///
/// ```rust
/// use oxide_component::{Callback, Command, Commands};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Model { value: i32 }
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Action { Add(i32) }
///
/// let on_finish = Callback::new(|_value: i32| {});
///
/// let commands: Commands<Model, Action> = Commands::batch(vec![
///     Command::state(Model { value: 1 }),
///     Command::deferred(async { Action::Add(5) }),
///     Command::notify(&on_finish, 1),
/// ]);
/// assert_eq!(commands.len(), 3);
/// ```
pub enum Command<State, Action> {
    /// Replace the logical state wholesale.
    State(State),
    /// Dispatch the eventual result of a computation.
    Deferred(Deferred<Action>),
    /// Invoke an owner callback synchronously.
    Notify(Notification),
}

impl<State, Action: 'static> Command<State, Action> {
    pub fn state(state: State) -> Self {
        Command::State(state)
    }

    pub fn deferred(future: impl Future<Output = Action> + Send + 'static) -> Self {
        Command::Deferred(Deferred::new(future))
    }

    pub fn deferred_optional(future: impl Future<Output = Option<Action>> + Send + 'static) -> Self {
        Command::Deferred(Deferred::optional(future))
    }

    pub fn notify<T: 'static>(callback: &Callback<T>, args: T) -> Self {
        Command::Notify(Notification::new(callback, args))
    }

    /// Run `f` as a deferred computation that resolves to no action.
    pub fn side_effect(f: impl FnOnce() + Send + 'static) -> Self {
        Command::Deferred(Deferred::optional(async move {
            f();
            None
        }))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Command::State(_) => "state",
            Command::Deferred(_) => "deferred",
            Command::Notify(_) => "notify",
        }
    }
}

impl<State: fmt::Debug, Action> fmt::Debug for Command<State, Action> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::State(state) => f.debug_tuple("State").field(state).finish(),
            Command::Deferred(_) => f.write_str("Deferred(..)"),
            Command::Notify(_) => f.write_str("Notify(..)"),
        }
    }
}

/// A named field of an untyped command record, see [`Commands::from_record`].
pub enum CommandField<State, Action> {
    State(State),
    Deferred(Vec<Deferred<Action>>),
    Notify(Vec<Notification>),
}

/// The ordered command list produced by one reducer invocation.
///
/// Zero, one or many commands normalize into this type through the `From`
/// conversions, so reducers can return `Command::state(..).into()`.
pub struct Commands<State, Action>(Vec<Command<State, Action>>);

impl<State, Action: 'static> Commands<State, Action> {
    /// No commands at all.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Commands applied in the given order.
    pub fn batch(commands: Vec<Command<State, Action>>) -> Self {
        Self(commands)
    }

    /// Append a command and return the list.
    pub fn and(mut self, command: Command<State, Action>) -> Self {
        self.0.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Command<State, Action>> {
        self.0.iter()
    }

    /// Build commands from named fields.
    ///
    /// Recognized fields are `"state"`, `"deferred"` and `"notify"`, applied in
    /// that order whatever order they are given in. Unknown, repeated or
    /// mistyped fields fail with [`Error::InvalidCommandShape`].
    ///
    /// ```rust
    /// use oxide_component::{CommandField, Commands, Error};
    ///
    /// let commands = Commands::<i32, ()>::from_record([("state", CommandField::State(1))]);
    /// assert!(commands.is_ok());
    ///
    /// let typo = Commands::<i32, ()>::from_record([("sate", CommandField::State(1))]);
    /// assert!(matches!(typo, Err(Error::InvalidCommandShape { .. })));
    /// ```
    pub fn from_record<'a>(
        fields: impl IntoIterator<Item = (&'a str, CommandField<State, Action>)>,
    ) -> Result<Self> {
        let mut state = None;
        let mut deferred = None;
        let mut notify = None;

        for (field, value) in fields {
            match (field, value) {
                ("state", CommandField::State(value)) => fill(&mut state, field, value)?,
                ("deferred", CommandField::Deferred(value)) => fill(&mut deferred, field, value)?,
                ("notify", CommandField::Notify(value)) => fill(&mut notify, field, value)?,
                ("state" | "deferred" | "notify", _) => {
                    return Err(shape_error(field, "holds a value of the wrong kind"))
                }
                _ => return Err(shape_error(field, "is not a recognized command field")),
            }
        }

        let commands = state
            .map(Command::State)
            .into_iter()
            .chain(deferred.into_iter().flatten().map(Command::Deferred))
            .chain(notify.into_iter().flatten().map(Command::Notify))
            .collect();
        Ok(Self(commands))
    }
}

fn fill<T>(slot: &mut Option<T>, field: &str, value: T) -> Result<()> {
    match slot.replace(value) {
        Some(_) => Err(shape_error(field, "is given more than once")),
        None => Ok(()),
    }
}

fn shape_error(field: &str, reason: &'static str) -> Error {
    Error::InvalidCommandShape {
        field: field.to_string(),
        reason,
    }
}

impl<State, Action> Default for Commands<State, Action> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<State: fmt::Debug, Action> fmt::Debug for Commands<State, Action> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<State, Action> From<Command<State, Action>> for Commands<State, Action> {
    fn from(command: Command<State, Action>) -> Self {
        Self(vec![command])
    }
}

impl<State, Action> From<Vec<Command<State, Action>>> for Commands<State, Action> {
    fn from(commands: Vec<Command<State, Action>>) -> Self {
        Self(commands)
    }
}

impl<State, Action> From<Option<Command<State, Action>>> for Commands<State, Action> {
    fn from(command: Option<Command<State, Action>>) -> Self {
        Self(command.into_iter().collect())
    }
}

impl<State, Action> FromIterator<Command<State, Action>> for Commands<State, Action> {
    fn from_iter<I: IntoIterator<Item = Command<State, Action>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<State, Action> Extend<Command<State, Action>> for Commands<State, Action> {
    fn extend<I: IntoIterator<Item = Command<State, Action>>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<State, Action> IntoIterator for Commands<State, Action> {
    type Item = Command<State, Action>;
    type IntoIter = std::vec::IntoIter<Command<State, Action>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Reduce several actions against the same state and props and concatenate
/// their commands in action order.
///
/// Each action sees the state passed to the enclosing `update`, not the state
/// produced by the previous action.
///
/// ```rust
/// use oxide_component::{compose, Command, Commands, Result};
///
/// fn update(add: i32, state: &i32) -> Result<Commands<i32, i32>> {
///     Ok(Command::state(state + add).into())
/// }
///
/// let commands = compose([1, 2], |add| update(add, &10)).unwrap();
/// assert_eq!(commands.len(), 2);
/// ```
pub fn compose<State, Action, I, F>(actions: I, mut update: F) -> Result<Commands<State, Action>>
where
    I: IntoIterator<Item = Action>,
    F: FnMut(Action) -> Result<Commands<State, Action>>,
{
    actions
        .into_iter()
        .try_fold(Commands(Vec::new()), |mut commands, action| {
            commands.extend(update(action)?);
            Ok(commands)
        })
}
