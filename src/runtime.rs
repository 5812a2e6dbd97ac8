//! The component runtime: dispatch loop and command interpreter.

use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::Pin;
use std::rc::{Rc, Weak};

use flume::Receiver;
use tracing::{debug, trace};

use crate::binding::{self, Dispatch, DispatcherCache};
use crate::compare::props_changed;
use crate::{
    Command, Commands, Component, Deferred, Emitter, Error, Lifecycles, Node, Renderer, Result,
    ShallowEq,
};

/// A spawner trait for executing futures on an async runtime.
///
/// This abstraction allows you to use whatever concurrency model you want (tokio, async-std, embassy, etc.).
///
/// Function pointers and closures automatically implement this trait via the blanket implementation.
pub trait Spawner {
    /// Spawn a future on the async runtime.
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>);
}

impl<F> Spawner for F
where
    F: Fn(Pin<Box<dyn Future<Output = ()> + Send>>),
{
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
        self(future)
    }
}

/// A stateful component instance driven by a rendering host.
///
/// The runtime:
/// 1. Derives the initial state via [`Component::init`]
/// 2. Reduces dispatched actions through [`Component::update`]
/// 3. Applies the resulting [`Commands`] in order: commits state, spawns
///    deferred actions, notifies owner callbacks
/// 4. Re-renders via [`Component::render`], rewrites `$` bindings into live
///    handlers and commits the tree to the [`Renderer`], unless the
///    re-render-skip predicate finds nothing changed
///
/// Everything runs on the thread that owns the runtime. Deferred actions may
/// resolve anywhere; they are queued and dispatched when the host calls
/// [`process_events`](Self::process_events) or drives [`run`](Self::run).
///
/// Dropping the runtime destroys the instance: handlers still held by the
/// host and deferred actions still in flight become silent no-ops.
///
/// See the [crate-level documentation](crate) for a complete example.
///
/// # Type Parameters
///
/// * `Action` - The action type reduced by the component
/// * `State` - The logical state type
/// * `Props` - The properties passed by the owner
/// * `Event` - The host event payload handed to handlers
/// * `Logic` - The component implementation (implements [`Component`])
/// * `Render` - The host commit implementation (implements [`Renderer`])
/// * `Spawn` - The spawner implementation (implements [`Spawner`])
pub struct ComponentRuntime<Action, State, Props, Event, Logic, Render, Spawn>
where
    Action: Send,
{
    shared: Rc<Shared<Action, State, Props, Event, Logic, Render, Spawn>>,
}

struct Shared<Action, State, Props, Event, Logic, Render, Spawn>
where
    Action: Send,
{
    this: Weak<Self>,
    name: String,
    logic: Logic,
    lifecycles: Lifecycles<Action, Props>,
    renderer: RefCell<Render>,
    spawner: Spawn,
    emitter: Emitter<Action>,
    receiver: Receiver<Action>,
    state: RefCell<State>,
    props: RefCell<Props>,
    rendered: RefCell<Option<(Props, State)>>,
    cache: RefCell<DispatcherCache<Action, Event>>,
    mount_commands: RefCell<Option<Commands<State, Action>>>,
    mounted: Cell<bool>,
}

impl<Action, State, Props, Event, Logic, Render, Spawn>
    ComponentRuntime<Action, State, Props, Event, Logic, Render, Spawn>
where
    Action: Clone + PartialEq + Send + 'static,
    State: Clone + ShallowEq + 'static,
    Props: Clone + ShallowEq + 'static,
    Event: 'static,
    Logic: Component<Action, State, Props, Event> + 'static,
    Render: Renderer<Action, Event> + 'static,
    Spawn: Spawner + 'static,
{
    /// Create a new runtime.
    ///
    /// Runs [`Component::init`] with the initial properties. Nothing is rendered
    /// until [`mount`](Self::mount) is called.
    ///
    /// # Arguments
    ///
    /// * `logic` - Component logic implementing [`Component`]
    /// * `props` - The initial properties
    /// * `renderer` - Host implementation committing rendered trees
    /// * `spawner` - Spawner to execute deferred actions on your chosen runtime
    ///
    /// # Errors
    ///
    /// [`Error::MissingInitialState`] when `init` returns no state command, or
    /// whatever error `init` itself returns.
    pub fn new(logic: Logic, props: Props, renderer: Render, spawner: Spawn) -> Result<Self> {
        let name = logic.name().to_string();

        let mut initial_state = None;
        let mut mount_commands = Commands::none();
        for command in logic.init(&props)? {
            match command {
                Command::State(state) if initial_state.is_none() => initial_state = Some(state),
                Command::State(_) => debug!(component = %name, "ignoring extra initial state"),
                other => mount_commands.extend([other]),
            }
        }
        let state = initial_state.ok_or_else(|| Error::MissingInitialState {
            component: name.clone(),
        })?;

        let lifecycles = logic.lifecycles();
        let (event_sender, event_receiver) = flume::unbounded();
        debug!(component = %name, mount_commands = mount_commands.len(), "component created");

        let shared = Rc::new_cyclic(|this| Shared {
            this: this.clone(),
            name,
            logic,
            lifecycles,
            renderer: RefCell::new(renderer),
            spawner,
            emitter: Emitter::new(event_sender),
            receiver: event_receiver,
            state: RefCell::new(state),
            props: RefCell::new(props),
            rendered: RefCell::new(None),
            cache: RefCell::new(DispatcherCache::new()),
            mount_commands: RefCell::new(Some(mount_commands)),
            mounted: Cell::new(false),
        });

        Ok(ComponentRuntime { shared })
    }

    /// Host mount hook.
    ///
    /// Renders and commits the initial tree, then runs the non-state commands
    /// returned by [`Component::init`]. Only the first call has any effect.
    pub fn mount(&self) -> Result<()> {
        let commands = self.shared.mount_commands.borrow_mut().take();
        let Some(commands) = commands else {
            trace!(component = %self.shared.name, "already mounted");
            return Ok(());
        };

        self.shared.mounted.set(true);
        self.shared.commit()?;
        self.shared.interpret(commands)
    }

    /// Feed an action through the reducer and apply its commands.
    ///
    /// `None` is a no-op, which lets handlers suppress a dispatch. May be
    /// called re-entrantly, e.g. from an owner callback run by a notify
    /// command. Before [`mount`](Self::mount) the state is updated but nothing
    /// is committed to the renderer.
    pub fn dispatch(&self, action: impl Into<Option<Action>>) -> Result<()> {
        self.shared.dispatch(action.into())
    }

    /// Host property-update hook.
    ///
    /// Commits the new properties and re-renders (subject to the skip
    /// predicate). If a properties-changed hook is registered and the
    /// properties differ shallowly from the previous ones, dispatches the
    /// hook's action afterwards. Before [`mount`](Self::mount) only the
    /// properties are stored.
    pub fn set_props(&self, props: Props) -> Result<()> {
        self.shared.set_props(props)
    }

    /// Render entry point: the current tree with bindings replaced by live
    /// handlers. Does not commit it to the renderer.
    pub fn render(&self) -> Result<Node<Action, Event>> {
        let state = self.shared.state.borrow();
        let props = self.shared.props.borrow();
        self.shared.render_tree(&state, &props)
    }

    /// Re-render-skip predicate: `false` when `props` and `state` are equal,
    /// under [`ShallowEq::render_eq`], to those of the last committed render.
    pub fn should_update(&self, props: &Props, state: &State) -> bool {
        self.shared.should_update(props, state)
    }

    /// Dispatch every deferred action resolved so far.
    ///
    /// Returns how many actions were dispatched. Stops at the first dispatch
    /// error, leaving the remaining actions queued.
    pub fn process_events(&self) -> Result<usize> {
        let mut dispatched = 0;
        while let Ok(action) = self.shared.receiver.try_recv() {
            self.shared.dispatch(Some(action))?;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    /// Dispatch deferred actions as they resolve.
    ///
    /// Poll this on the thread that owns the runtime, alongside the host's
    /// own event loop. Runs until a dispatch fails or the future is dropped.
    pub async fn run(&self) -> Result<()> {
        while let Ok(action) = self.shared.receiver.recv_async().await {
            self.shared.dispatch(Some(action))?;
        }
        Ok(())
    }

    /// A handle that queues actions for dispatch from any thread.
    pub fn emitter(&self) -> Emitter<Action> {
        self.shared.emitter.clone()
    }

    /// A copy of the current logical state.
    pub fn state(&self) -> State {
        self.shared.state.borrow().clone()
    }

    /// A copy of the current properties.
    pub fn props(&self) -> Props {
        self.shared.props.borrow().clone()
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Number of memoized binding handlers.
    pub fn cached_handlers(&self) -> usize {
        self.shared.cache.borrow().len()
    }
}

impl<Action, State, Props, Event, Logic, Render, Spawn> Shared<Action, State, Props, Event, Logic, Render, Spawn>
where
    Action: Clone + PartialEq + Send + 'static,
    State: Clone + ShallowEq + 'static,
    Props: Clone + ShallowEq + 'static,
    Event: 'static,
    Logic: Component<Action, State, Props, Event> + 'static,
    Render: Renderer<Action, Event> + 'static,
    Spawn: Spawner + 'static,
{
    fn interpret(&self, commands: Commands<State, Action>) -> Result<()> {
        let mut committed = false;

        for command in commands {
            trace!(component = %self.name, command = command.kind(), "applying command");
            match command {
                Command::State(state) => {
                    *self.state.borrow_mut() = state;
                    committed = true;
                }
                Command::Deferred(deferred) => self.schedule(deferred),
                // No borrow is held here: the callback may dispatch again.
                Command::Notify(notification) => notification.invoke(),
            }
        }

        if committed {
            self.commit()?;
        }
        Ok(())
    }

    fn schedule(&self, deferred: Deferred<Action>) {
        let emitter = self.emitter.clone();
        let future = deferred.into_future();
        self.spawner.spawn(Box::pin(async move {
            if let Some(action) = future.await {
                emitter.emit(action);
            }
        }));
    }

    fn set_props(&self, props: Props) -> Result<()> {
        let prev = self.props.replace(props);
        if !self.mounted.get() {
            trace!(component = %self.name, "properties stored before mount");
            return Ok(());
        }
        self.commit()?;

        if self.lifecycles.has_props_changed() {
            let changed = props_changed(&prev, &self.props.borrow());
            if changed {
                debug!(component = %self.name, "properties changed");
                self.dispatch(self.lifecycles.props_changed_action(&prev))?;
            }
        }
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if !self.mounted.get() {
            trace!(component = %self.name, "not mounted, render deferred");
            return Ok(());
        }
        let tree = {
            let state = self.state.borrow();
            let props = self.props.borrow();
            if !self.should_update(&props, &state) {
                trace!(component = %self.name, "render skipped");
                return Ok(());
            }
            let tree = self.render_tree(&state, &props)?;
            *self.rendered.borrow_mut() = Some((props.clone(), state.clone()));
            tree
        };

        debug!(component = %self.name, "committing render");
        self.renderer.borrow_mut().render(tree);
        Ok(())
    }

    fn should_update(&self, props: &Props, state: &State) -> bool {
        match &*self.rendered.borrow() {
            Some((rendered_props, rendered_state)) => {
                !(rendered_props.render_eq(props) && rendered_state.render_eq(state))
            }
            None => true,
        }
    }

    fn render_tree(&self, state: &State, props: &Props) -> Result<Node<Action, Event>> {
        let tree = self.logic.render(state, props);
        let dispatcher = WeakDispatch(self.this.clone());
        binding::transform(tree, &self.name, &mut self.cache.borrow_mut(), &dispatcher)
    }
}

impl<Action, State, Props, Event, Logic, Render, Spawn> Dispatch<Action>
    for Shared<Action, State, Props, Event, Logic, Render, Spawn>
where
    Action: Clone + PartialEq + Send + 'static,
    State: Clone + ShallowEq + 'static,
    Props: Clone + ShallowEq + 'static,
    Event: 'static,
    Logic: Component<Action, State, Props, Event> + 'static,
    Render: Renderer<Action, Event> + 'static,
    Spawn: Spawner + 'static,
{
    fn dispatch(&self, action: Option<Action>) -> Result<()> {
        let Some(action) = action else {
            trace!(component = %self.name, "empty dispatch ignored");
            return Ok(());
        };

        let commands = {
            let state = self.state.borrow();
            let props = self.props.borrow();
            self.logic.update(action, &state, &props)?
        };
        debug!(component = %self.name, commands = commands.len(), "action reduced");
        self.interpret(commands)
    }
}

/// Dispatch target held by rendered handlers; does not keep the runtime alive.
struct WeakDispatch<T>(Weak<T>);

impl<T> Clone for WeakDispatch<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Action, T: Dispatch<Action>> Dispatch<Action> for WeakDispatch<T> {
    fn dispatch(&self, action: Option<Action>) -> Result<()> {
        match self.0.upgrade() {
            Some(target) => target.dispatch(action),
            None => {
                debug!("dropping dispatch: runtime no longer alive");
                Ok(())
            }
        }
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test spawner function that executes futures synchronously.
///
/// This blocks on the future immediately rather than spawning it on an async runtime.
pub fn test_spawner_fn(fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
    futures::executor::block_on(fut);
}

#[cfg(any(test, feature = "testing"))]
/// Creates a test spawner that executes futures synchronously.
///
/// Deferred actions resolve while the command is interpreted and wait in the
/// queue until [`ComponentRuntime::process_events`] is called, which keeps
/// tests deterministic.
///
/// Returns a function pointer that can be passed directly to runtime constructors
/// without heap allocation.
pub fn create_test_spawner() -> fn(Pin<Box<dyn Future<Output = ()> + Send>>) {
    test_spawner_fn
}
