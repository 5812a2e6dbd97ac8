//! Declarative event bindings and the transformer that turns them into live
//! dispatch handlers.
//!
//! A render function marks an event property as a binding by prefixing its
//! name with `$`:
//!
//! - `$onClick` forwards the host event into the bound constructor, or
//!   dispatches a constant action as is.
//! - `$$onClick` discards the host event and dispatches the bound value.
//!
//! [`transform`] rewrites such properties to their unprefixed name holding a
//! [`Handler`]. Handlers are memoized in a [`DispatcherCache`] so unchanged
//! bindings yield the very same handler on every render.

use core::fmt;
use core::hash::Hash;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Element, ElementType, Error, Handler, Node, Prop, PropValue, Result};

/// The value bound to a `$`-prefixed property.
pub enum Binding<Action, Event> {
    /// A constant action, dispatched as is.
    Action(Action),
    /// A constructor called without the event.
    Thunk(Rc<dyn Fn() -> Option<Action>>),
    /// A constructor receiving the host event.
    WithEvent(Rc<dyn Fn(Event) -> Option<Action>>),
}

impl<Action, Event> Binding<Action, Event> {
    pub fn action(action: Action) -> Self {
        Binding::Action(action)
    }

    pub fn thunk<T>(f: impl Fn() -> T + 'static) -> Self
    where
        T: Into<Option<Action>>,
    {
        Binding::Thunk(Rc::new(move || f().into()))
    }

    /// Returning `None` from `f` suppresses the dispatch.
    pub fn with_event<T>(f: impl Fn(Event) -> T + 'static) -> Self
    where
        T: Into<Option<Action>>,
    {
        Binding::WithEvent(Rc::new(move |event| f(event).into()))
    }

    /// Bound-value identity: constant actions by value, constructors by
    /// pointer.
    pub fn same_as(&self, other: &Self) -> bool
    where
        Action: PartialEq,
    {
        match (self, other) {
            (Binding::Action(a), Binding::Action(b)) => a == b,
            (Binding::Thunk(a), Binding::Thunk(b)) => address(a) == address(b),
            (Binding::WithEvent(a), Binding::WithEvent(b)) => address(a) == address(b),
            _ => false,
        }
    }
}

fn address<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

impl<Action: Clone, Event> Clone for Binding<Action, Event> {
    fn clone(&self) -> Self {
        match self {
            Binding::Action(action) => Binding::Action(action.clone()),
            Binding::Thunk(f) => Binding::Thunk(f.clone()),
            Binding::WithEvent(f) => Binding::WithEvent(f.clone()),
        }
    }
}

impl<Action: fmt::Debug, Event> fmt::Debug for Binding<Action, Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Binding::Thunk(_) => f.write_str("Thunk(..)"),
            Binding::WithEvent(_) => f.write_str("WithEvent(..)"),
        }
    }
}

/// How a tagged property treats the host event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingForm {
    /// `$name`
    Forward,
    /// `$$name`
    Discard,
}

impl BindingForm {
    pub const PREFIX: char = '$';

    /// Classify a property name.
    ///
    /// `Ok(None)` for an untagged name, the form and unprefixed name for a
    /// tagged one, and `Err` with the prefix length for any other number of
    /// prefix characters or a prefix with nothing after it.
    ///
    /// ```rust
    /// use oxide_component::BindingForm;
    ///
    /// assert_eq!(BindingForm::parse("onClick"), Ok(None));
    /// assert_eq!(BindingForm::parse("$onClick"), Ok(Some((BindingForm::Forward, "onClick"))));
    /// assert_eq!(BindingForm::parse("$$onClick"), Ok(Some((BindingForm::Discard, "onClick"))));
    /// assert_eq!(BindingForm::parse("$$$onClick"), Err(3));
    /// assert_eq!(BindingForm::parse("$"), Err(1));
    /// ```
    pub fn parse(name: &str) -> core::result::Result<Option<(Self, &str)>, usize> {
        let stripped = name.trim_start_matches(Self::PREFIX);
        match name.len() - stripped.len() {
            0 => Ok(None),
            n if stripped.is_empty() => Err(n),
            1 => Ok(Some((BindingForm::Forward, stripped))),
            2 => Ok(Some((BindingForm::Discard, stripped))),
            n => Err(n),
        }
    }
}

/// Target of the handlers built by [`transform`].
pub trait Dispatch<Action> {
    /// Dispatch an action; `None` is a no-op.
    fn dispatch(&self, action: Option<Action>) -> Result<()>;
}

/// Handler memo keyed by (element type, declared property name, bound value).
///
/// Constant actions are matched by value and constructors by pointer. Every
/// [`transform`] pass evicts the handlers it did not use, so the cache only
/// ever holds the bindings of the last rendered tree. Constructors built once
/// (see [`BindingCache`]) keep their handler across renders; a closure
/// allocated inside `render` gets a fresh handler every time.
pub struct DispatcherCache<Action, Event> {
    slots: HashMap<ElementType, HashMap<String, Slot<Action, Event>>>,
    pass: u64,
}

struct Slot<Action, Event> {
    constants: Vec<(Action, Cached<Event>)>,
    constructors: HashMap<usize, (Binding<Action, Event>, Cached<Event>)>,
}

struct Cached<Event> {
    handler: Handler<Event>,
    pass: u64,
}

impl<Event> Cached<Event> {
    fn touch(&mut self, pass: u64) -> Handler<Event> {
        self.pass = pass;
        self.handler.clone()
    }
}

impl<Action, Event> Default for Slot<Action, Event> {
    fn default() -> Self {
        Self {
            constants: Vec::new(),
            constructors: HashMap::new(),
        }
    }
}

impl<Action, Event> Slot<Action, Event> {
    fn len(&self) -> usize {
        self.constants.len() + self.constructors.len()
    }

    fn retain_pass(&mut self, pass: u64) {
        self.constants.retain(|(_, cached)| cached.pass == pass);
        self.constructors.retain(|_, (_, cached)| cached.pass == pass);
    }
}

impl<Action, Event> Default for DispatcherCache<Action, Event> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            pass: 0,
        }
    }
}

impl<Action: Clone + PartialEq, Event> DispatcherCache<Action, Event> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handler cached for this key, creating it with `create` on a
    /// miss.
    pub fn get_or_insert_with<F>(
        &mut self,
        element: &ElementType,
        property: &str,
        binding: &Binding<Action, Event>,
        create: F,
    ) -> Handler<Event>
    where
        F: FnOnce() -> Handler<Event>,
    {
        let pass = self.pass;
        let slot = self
            .slots
            .entry(element.clone())
            .or_default()
            .entry(property.to_string())
            .or_default();

        let fresh = |create: F| Cached {
            handler: create(),
            pass,
        };
        match binding {
            Binding::Action(action) => {
                let index = match slot.constants.iter().position(|(bound, _)| bound == action) {
                    Some(index) => index,
                    None => {
                        slot.constants.push((action.clone(), fresh(create)));
                        slot.constants.len() - 1
                    }
                };
                slot.constants[index].1.touch(pass)
            }
            Binding::Thunk(f) => slot.constructor(address(f), binding, pass, || fresh(create)),
            Binding::WithEvent(f) => slot.constructor(address(f), binding, pass, || fresh(create)),
        }
    }

    /// Start a transform pass.
    fn begin_pass(&mut self) {
        self.pass += 1;
    }

    /// Drop every handler the current pass did not use.
    fn sweep(&mut self) {
        let pass = self.pass;
        self.slots.retain(|_, properties| {
            properties.retain(|_, slot| {
                slot.retain_pass(pass);
                slot.len() > 0
            });
            !properties.is_empty()
        });
    }

    /// Number of cached handlers.
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .flat_map(HashMap::values)
            .map(Slot::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<Action: Clone, Event> Slot<Action, Event> {
    // The cached binding keeps the closure alive, so its address cannot be
    // reused by another closure while the entry exists.
    fn constructor<F>(&mut self, address: usize, binding: &Binding<Action, Event>, pass: u64, fresh: F) -> Handler<Event>
    where
        F: FnOnce() -> Cached<Event>,
    {
        self.constructors
            .entry(address)
            .or_insert_with(|| (binding.clone(), fresh()))
            .1
            .touch(pass)
    }
}

/// Memoized action constructors, keyed by constructor argument.
///
/// Returns the same [`Binding`] for the same key, so a render such as
/// `actions.add(1)` keeps a stable handler identity across renders. Owned by
/// the component; entries live as long as it does.
///
/// ```rust
/// use oxide_component::{Binding, BindingCache};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Action { Add(i32) }
///
/// let add: BindingCache<i32, Action, ()> = BindingCache::new();
/// let first = add.get(1, |value| Binding::thunk(move || Action::Add(value)));
/// let again = add.get(1, |value| Binding::thunk(move || Action::Add(value)));
/// assert!(first.same_as(&again));
/// ```
pub struct BindingCache<K, Action, Event> {
    entries: RefCell<HashMap<K, Binding<Action, Event>>>,
}

impl<K, Action, Event> Default for BindingCache<K, Action, Event> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq + Clone, Action: Clone, Event> BindingCache<K, Action, Event> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<F>(&self, key: K, make: F) -> Binding<Action, Event>
    where
        F: FnOnce(K) -> Binding<Action, Event>,
    {
        if let Some(binding) = self.entries.borrow().get(&key) {
            return binding.clone();
        }
        let binding = make(key.clone());
        self.entries.borrow_mut().insert(key, binding.clone());
        binding
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Rewrite every binding in `node` into a live handler dispatching to
/// `dispatcher`.
///
/// Pre-order walk: an element's properties are rewritten before its children.
/// Untagged properties and text nodes pass through unchanged. `component`
/// names the owning component in error messages.
///
/// # Errors
///
/// [`Error::InvalidBindingSyntax`], [`Error::UndefinedBinding`] or
/// [`Error::InvalidBindingValue`] for the first offending property. Nothing is
/// dispatched while transforming.
pub fn transform<Action, Event, D>(
    node: Node<Action, Event>,
    component: &str,
    cache: &mut DispatcherCache<Action, Event>,
    dispatcher: &D,
) -> Result<Node<Action, Event>>
where
    Action: Clone + PartialEq + 'static,
    Event: 'static,
    D: Dispatch<Action> + Clone + 'static,
{
    cache.begin_pass();
    let tree = transform_node(node, component, cache, dispatcher)?;
    cache.sweep();
    Ok(tree)
}

fn transform_node<Action, Event, D>(
    node: Node<Action, Event>,
    component: &str,
    cache: &mut DispatcherCache<Action, Event>,
    dispatcher: &D,
) -> Result<Node<Action, Event>>
where
    Action: Clone + PartialEq + 'static,
    Event: 'static,
    D: Dispatch<Action> + Clone + 'static,
{
    match node {
        Node::Text(_) => Ok(node),
        Node::Element(element) => {
            let element = transform_element(element, component, cache, dispatcher)?;
            Ok(Node::Element(element))
        }
    }
}

fn transform_element<Action, Event, D>(
    element: Element<Action, Event>,
    component: &str,
    cache: &mut DispatcherCache<Action, Event>,
    dispatcher: &D,
) -> Result<Element<Action, Event>>
where
    Action: Clone + PartialEq + 'static,
    Event: 'static,
    D: Dispatch<Action> + Clone + 'static,
{
    let kind = element.kind().clone();
    let element = if element.has_properties() {
        element.try_map_props(|prop| bind_prop(prop, &kind, component, cache, dispatcher))?
    } else {
        element
    };

    if element.has_children() {
        element.try_map_children(|child| transform_node(child, component, cache, dispatcher))
    } else {
        Ok(element)
    }
}

fn bind_prop<Action, Event, D>(
    prop: Prop<Action, Event>,
    element: &ElementType,
    component: &str,
    cache: &mut DispatcherCache<Action, Event>,
    dispatcher: &D,
) -> Result<Prop<Action, Event>>
where
    Action: Clone + PartialEq + 'static,
    Event: 'static,
    D: Dispatch<Action> + Clone + 'static,
{
    let (form, name) = match BindingForm::parse(&prop.name) {
        Ok(None) => return Ok(prop),
        Ok(Some((form, name))) => (form, name.to_string()),
        Err(_) => {
            return Err(Error::InvalidBindingSyntax {
                component: component.to_string(),
                element: element.to_string(),
                property: prop.name,
            })
        }
    };

    let invalid_value = |reason| Error::InvalidBindingValue {
        component: component.to_string(),
        element: element.to_string(),
        property: prop.name.clone(),
        reason,
    };

    let binding = match &prop.value {
        PropValue::Bind(binding) => binding,
        PropValue::Absent => {
            return Err(Error::UndefinedBinding {
                component: component.to_string(),
                element: element.to_string(),
                property: prop.name.clone(),
            })
        }
        _ => return Err(invalid_value("is tagged as a binding but holds no binding")),
    };

    if form == BindingForm::Discard && matches!(binding, Binding::WithEvent(_)) {
        return Err(invalid_value("discards the event but its constructor needs it"));
    }

    let handler = cache.get_or_insert_with(element, &prop.name, binding, || {
        bound_handler(form, binding.clone(), dispatcher.clone())
    });

    Ok(Prop {
        name,
        value: PropValue::Handler(handler),
    })
}

fn bound_handler<Action, Event, D>(
    form: BindingForm,
    binding: Binding<Action, Event>,
    dispatcher: D,
) -> Handler<Event>
where
    Action: Clone + 'static,
    Event: 'static,
    D: Dispatch<Action> + 'static,
{
    Handler::new(move |event: Event| {
        let action = match (&binding, form) {
            (Binding::Action(action), _) => Some(action.clone()),
            (Binding::Thunk(f), _) => f(),
            (Binding::WithEvent(f), BindingForm::Forward) => f(event),
            // rejected by bind_prop
            (Binding::WithEvent(_), BindingForm::Discard) => None,
        };
        dispatcher.dispatch(action)
    })
}
