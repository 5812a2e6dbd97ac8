//! Typed element tree exchanged with the rendering host.
//!
//! The host owns reconciliation and commit; this module only describes a
//! tree of named element types with ordered properties and children, which
//! [`Component::render`](crate::Component::render) produces and the binding
//! transformer rewrites.

use core::fmt;
use std::borrow::Cow;

use crate::{Binding, Handler};

/// Type identity of an element, e.g. `"button"` or a host component name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementType(Cow<'static, str>);

impl ElementType {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ElementType {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Value of a single element property.
pub enum PropValue<Action, Event> {
    /// A declared property with no value.
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A declarative binding, only meaningful under a `$`-prefixed name.
    Bind(Binding<Action, Event>),
    /// A live handler, produced by the binding transformer or set directly.
    Handler(Handler<Event>),
    /// A rendered subtree passed as a property.
    Node(Box<Node<Action, Event>>),
}

impl<Action: Clone, Event> Clone for PropValue<Action, Event> {
    fn clone(&self) -> Self {
        match self {
            PropValue::Absent => PropValue::Absent,
            PropValue::Bool(value) => PropValue::Bool(*value),
            PropValue::Number(value) => PropValue::Number(*value),
            PropValue::Text(value) => PropValue::Text(value.clone()),
            PropValue::Bind(binding) => PropValue::Bind(binding.clone()),
            PropValue::Handler(handler) => PropValue::Handler(handler.clone()),
            PropValue::Node(node) => PropValue::Node(node.clone()),
        }
    }
}

/// Values compare by value; bindings and handlers by identity.
impl<Action: PartialEq, Event> PartialEq for PropValue<Action, Event> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Absent, PropValue::Absent) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Bind(a), PropValue::Bind(b)) => a.same_as(b),
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            (PropValue::Node(a), PropValue::Node(b)) => a == b,
            _ => false,
        }
    }
}

impl<Action: fmt::Debug, Event> fmt::Debug for PropValue<Action, Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Absent => f.write_str("Absent"),
            PropValue::Bool(value) => write!(f, "{value:?}"),
            PropValue::Number(value) => write!(f, "{value:?}"),
            PropValue::Text(value) => write!(f, "{value:?}"),
            PropValue::Bind(binding) => binding.fmt(f),
            PropValue::Handler(handler) => handler.fmt(f),
            PropValue::Node(node) => node.fmt(f),
        }
    }
}

impl<Action, Event> From<bool> for PropValue<Action, Event> {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl<Action, Event> From<f64> for PropValue<Action, Event> {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl<Action, Event> From<i32> for PropValue<Action, Event> {
    fn from(value: i32) -> Self {
        PropValue::Number(value.into())
    }
}

impl<Action, Event> From<&str> for PropValue<Action, Event> {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl<Action, Event> From<String> for PropValue<Action, Event> {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl<Action, Event> From<Binding<Action, Event>> for PropValue<Action, Event> {
    fn from(binding: Binding<Action, Event>) -> Self {
        PropValue::Bind(binding)
    }
}

impl<Action, Event> From<Option<Binding<Action, Event>>> for PropValue<Action, Event> {
    fn from(binding: Option<Binding<Action, Event>>) -> Self {
        binding.map_or(PropValue::Absent, PropValue::Bind)
    }
}

impl<Action, Event> From<Handler<Event>> for PropValue<Action, Event> {
    fn from(handler: Handler<Event>) -> Self {
        PropValue::Handler(handler)
    }
}

impl<Action, Event> From<Element<Action, Event>> for PropValue<Action, Event> {
    fn from(element: Element<Action, Event>) -> Self {
        PropValue::Node(Box::new(Node::Element(element)))
    }
}

/// A named property.
pub struct Prop<Action, Event> {
    pub name: String,
    pub value: PropValue<Action, Event>,
}

impl<Action: Clone, Event> Clone for Prop<Action, Event> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

impl<Action: PartialEq, Event> PartialEq for Prop<Action, Event> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl<Action: fmt::Debug, Event> fmt::Debug for Prop<Action, Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

/// An element node: a type, optional properties and optional children.
///
/// Properties keep their declaration order. An element built without any
/// property reports [`has_properties`](Self::has_properties) `false`; one built
/// without any child reports [`has_children`](Self::has_children) `false`.
///
/// ```rust
/// use oxide_component::{Binding, Element, Node};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Action { Increment }
///
/// let tree: Node<Action, ()> = Element::new("div")
///     .child(
///         Element::new("button")
///             .prop("className", "increment")
///             .prop("$onClick", Binding::action(Action::Increment))
///             .child("+1"),
///     )
///     .into();
///
/// let button = tree.find(|element| element.kind().as_str() == "button").unwrap();
/// assert_eq!(button.text(), "+1");
/// ```
pub struct Element<Action, Event> {
    kind: ElementType,
    props: Option<Vec<Prop<Action, Event>>>,
    children: Option<Vec<Node<Action, Event>>>,
}

impl<Action, Event> Element<Action, Event> {
    pub fn new(kind: impl Into<ElementType>) -> Self {
        Self {
            kind: kind.into(),
            props: None,
            children: None,
        }
    }

    /// Append a property.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue<Action, Event>>) -> Self {
        self.props.get_or_insert_with(Vec::new).push(Prop {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: impl Into<Node<Action, Event>>) -> Self {
        self.children.get_or_insert_with(Vec::new).push(node.into());
        self
    }

    /// Append several child nodes.
    pub fn children<N>(mut self, nodes: impl IntoIterator<Item = N>) -> Self
    where
        N: Into<Node<Action, Event>>,
    {
        self.children
            .get_or_insert_with(Vec::new)
            .extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> &ElementType {
        &self.kind
    }

    pub fn has_properties(&self) -> bool {
        self.props.is_some()
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn props(&self) -> &[Prop<Action, Event>] {
        self.props.as_deref().unwrap_or_default()
    }

    pub fn child_nodes(&self) -> &[Node<Action, Event>] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropValue<Action, Event>> {
        self.props()
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| &prop.value)
    }

    /// Look up a live handler by property name.
    pub fn handler(&self, name: &str) -> Option<&Handler<Event>> {
        match self.get(name) {
            Some(PropValue::Handler(handler)) => Some(handler),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in self.child_nodes() {
            child.collect_text(&mut text);
        }
        text
    }

    /// Rewrite every property in order, keeping the element's shape.
    pub fn try_map_props<F, Err>(mut self, f: F) -> Result<Self, Err>
    where
        F: FnMut(Prop<Action, Event>) -> Result<Prop<Action, Event>, Err>,
    {
        if let Some(props) = self.props.take() {
            self.props = Some(props.into_iter().map(f).collect::<Result<_, _>>()?);
        }
        Ok(self)
    }

    /// Replace each child positionally with the result of `f`.
    pub fn try_map_children<F, Err>(mut self, f: F) -> Result<Self, Err>
    where
        F: FnMut(Node<Action, Event>) -> Result<Node<Action, Event>, Err>,
    {
        if let Some(children) = self.children.take() {
            self.children = Some(children.into_iter().map(f).collect::<Result<_, _>>()?);
        }
        Ok(self)
    }

    /// Infallible form of [`try_map_children`](Self::try_map_children).
    pub fn map_children<F>(self, mut f: F) -> Self
    where
        F: FnMut(Node<Action, Event>) -> Node<Action, Event>,
    {
        match self.try_map_children(|node| Ok::<_, core::convert::Infallible>(f(node))) {
            Ok(element) => element,
            Err(never) => match never {},
        }
    }
}

impl<Action: Clone, Event> Clone for Element<Action, Event> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
        }
    }
}

impl<Action: PartialEq, Event> PartialEq for Element<Action, Event> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.props == other.props && self.children == other.children
    }
}

impl<Action: fmt::Debug, Event> fmt::Debug for Element<Action, Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind.as_str())
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

/// A node of a rendered tree.
pub enum Node<Action, Event> {
    Text(String),
    Element(Element<Action, Event>),
}

impl<Action, Event> Node<Action, Event> {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element<Action, Event>> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// First element, in pre-order, matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<&Element<Action, Event>>
    where
        P: Fn(&Element<Action, Event>) -> bool,
    {
        self.find_by(&predicate)
    }

    fn find_by<P>(&self, predicate: &P) -> Option<&Element<Action, Event>>
    where
        P: Fn(&Element<Action, Event>) -> bool,
    {
        let element = self.as_element()?;
        if predicate(element) {
            return Some(element);
        }
        element
            .child_nodes()
            .iter()
            .find_map(|child| child.find_by(predicate))
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in element.child_nodes() {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl<Action: Clone, Event> Clone for Node<Action, Event> {
    fn clone(&self) -> Self {
        match self {
            Node::Text(text) => Node::Text(text.clone()),
            Node::Element(element) => Node::Element(element.clone()),
        }
    }
}

impl<Action: PartialEq, Event> PartialEq for Node<Action, Event> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Text(a), Node::Text(b)) => a == b,
            (Node::Element(a), Node::Element(b)) => a == b,
            _ => false,
        }
    }
}

impl<Action: fmt::Debug, Event> fmt::Debug for Node<Action, Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => write!(f, "{text:?}"),
            Node::Element(element) => element.fmt(f),
        }
    }
}

impl<Action, Event> From<Element<Action, Event>> for Node<Action, Event> {
    fn from(element: Element<Action, Event>) -> Self {
        Node::Element(element)
    }
}

impl<Action, Event> From<&str> for Node<Action, Event> {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl<Action, Event> From<String> for Node<Action, Event> {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}
