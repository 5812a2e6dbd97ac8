//! A small Elm-architecture component runtime for retained-mode UI hosts.
//!
//! A component is three pure functions: `init` derives the first state from
//! the initial properties, `update` reduces an action into [`Commands`], and
//! `render` describes an element tree. The [`ComponentRuntime`] applies the
//! commands (commit a new state, resolve a deferred action, notify the owner)
//! and commits re-rendered trees to the host.
//!
//! Render functions bind events declaratively: a property named `$onClick`
//! holding a [`Binding`] is rewritten into a live `onClick` [`Handler`] that
//! dispatches into the runtime. Handlers are memoized per element type,
//! property and bound value, so an unchanged binding keeps its identity across
//! renders and the host's skip logic sees unchanged props.
//!
//! ## Example
//!
//! ```rust
//! use oxide_component::{
//!     create_test_spawner, impl_shallow_eq, Binding, Callback, Command, Commands, Component,
//!     ComponentRuntime, Element, Node, Result, TestRenderer,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Action {
//!     Increment,
//!     Finish,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Model {
//!     value: i32,
//! }
//! impl_shallow_eq!(Model { value });
//!
//! #[derive(Clone)]
//! struct Props {
//!     on_finish: Callback<i32>,
//! }
//! impl_shallow_eq!(Props { on_finish });
//!
//! struct Counter;
//!
//! impl Component<Action, Model, Props, ()> for Counter {
//!     fn name(&self) -> &str {
//!         "Counter"
//!     }
//!
//!     fn init(&self, _props: &Props) -> Result<Commands<Model, Action>> {
//!         Ok(Command::state(Model { value: 0 }).into())
//!     }
//!
//!     fn update(&self, action: Action, model: &Model, props: &Props) -> Result<Commands<Model, Action>> {
//!         Ok(match action {
//!             Action::Increment => Command::state(Model { value: model.value + 1 }).into(),
//!             Action::Finish => Command::notify(&props.on_finish, model.value).into(),
//!         })
//!     }
//!
//!     fn render(&self, model: &Model, _props: &Props) -> Node<Action, ()> {
//!         Element::new("div")
//!             .child(Element::new("button").prop("$onClick", Binding::action(Action::Increment)).child("+1"))
//!             .child(Element::new("button").prop("$$onDoubleClick", Binding::action(Action::Finish)))
//!             .child(Element::new("span").child(model.value.to_string()))
//!             .into()
//!     }
//! }
//!
//! let renderer = TestRenderer::new();
//! let props = Props { on_finish: Callback::new(|value| println!("finished at {value}")) };
//! let runtime = ComponentRuntime::new(Counter, props, renderer.clone(), create_test_spawner()).unwrap();
//! runtime.mount().unwrap();
//!
//! // The host calls handlers from the committed tree.
//! let on_click = renderer
//!     .with_last(|tree| tree.find(|el| el.handler("onClick").is_some())?.handler("onClick").cloned())
//!     .flatten()
//!     .unwrap();
//! on_click.call(()).unwrap();
//!
//! assert_eq!(runtime.state(), Model { value: 1 });
//! assert_eq!(renderer.count(), 2);
//! ```

// Module declarations
mod binding;
mod callback;
mod command;
mod compare;
mod element;
mod emitter;
mod error;
mod logic;
mod renderer;
mod runtime;

// Public re-exports
pub use binding::{transform, Binding, BindingCache, BindingForm, Dispatch, DispatcherCache};
pub use callback::{Callback, Handler};
pub use command::{compose, Command, CommandField, Commands, Deferred, Notification};
pub use compare::{props_changed, ShallowEq};
pub use element::{Element, ElementType, Node, Prop, PropValue};
pub use emitter::Emitter;
pub use error::{Error, Result};
pub use logic::{Component, Lifecycles};
pub use renderer::Renderer;
pub use runtime::{ComponentRuntime, Spawner};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use renderer::TestRenderer;
#[cfg(any(test, feature = "testing"))]
pub use runtime::{create_test_spawner, test_spawner_fn};
