//! Host commit abstraction for rendered element trees.

#[cfg(any(test, feature = "testing"))]
use portable_atomic_util::Arc;
#[cfg(any(test, feature = "testing"))]
use spin::Mutex;

use crate::Node;

/// Host commit abstraction for rendered element trees.
///
/// Implement this trait to hand trees to your rendering system (a retained
/// UI toolkit, a terminal, a test harness). [`render`](Self::render) receives
/// trees whose bindings have already been replaced by live
/// [`Handler`](crate::Handler)s; diffing and committing them is the host's job.
///
/// # Example
///
/// ```rust
/// use oxide_component::{Node, Renderer};
///
/// struct ConsoleRenderer;
///
/// impl<Action, Event> Renderer<Action, Event> for ConsoleRenderer {
///     fn render(&mut self, tree: Node<Action, Event>) {
///         if let Some(root) = tree.as_element() {
///             println!("{}", root.text());
///         }
///     }
/// }
/// ```
pub trait Renderer<Action, Event> {
    /// Commit a rendered tree.
    ///
    /// Must not dispatch synchronously into the runtime that is rendering.
    fn render(&mut self, tree: Node<Action, Event>);
}

#[cfg(any(test, feature = "testing"))]
/// Test renderer that captures every committed tree for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same capture storage, so keep one clone for assertions
/// and hand the other to the runtime.
///
/// # Example
///
/// ```rust
/// use oxide_component::{Element, Node, Renderer, TestRenderer};
///
/// let renderer = TestRenderer::<(), ()>::new();
/// let mut host = renderer.clone();
///
/// host.render(Element::new("div").child("0").into());
///
/// assert_eq!(renderer.count(), 1);
/// renderer.with_renders(|renders| {
///     assert_eq!(renders[0].as_element().unwrap().text(), "0");
/// });
/// ```
pub struct TestRenderer<Action, Event> {
    renders: Arc<Mutex<Vec<Node<Action, Event>>>>,
}

#[cfg(any(test, feature = "testing"))]
impl<Action, Event> Clone for TestRenderer<Action, Event> {
    fn clone(&self) -> Self {
        Self {
            renders: self.renders.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Action, Event> Renderer<Action, Event> for TestRenderer<Action, Event> {
    fn render(&mut self, tree: Node<Action, Event>) {
        self.renders.lock().push(tree);
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Action, Event> Default for TestRenderer<Action, Event> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Action, Event> TestRenderer<Action, Event> {
    pub fn new() -> Self {
        Self {
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of committed trees.
    pub fn count(&self) -> usize {
        self.renders.lock().len()
    }

    /// Access the captured trees with a closure.
    ///
    /// Do not call handlers from inside the closure: a handler that re-renders
    /// would need the capture lock. Clone the handler out first.
    pub fn with_renders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<Node<Action, Event>>) -> R,
    {
        let renders = self.renders.lock();
        f(&renders)
    }

    /// Apply `f` to the most recent tree.
    pub fn with_last<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Node<Action, Event>) -> R,
    {
        let renders = self.renders.lock();
        renders.last().map(f)
    }
}
