//! Reference-identity callbacks: owner callbacks carried in properties and the
//! live handlers the binding transformer installs in rendered trees.

use core::fmt;
use std::rc::Rc;

use crate::Result;

/// A callback owned by the component's parent, typically a field of `Props`.
///
/// Equality is pointer identity, so an unchanged callback compares equal across
/// property updates and never triggers a re-render by itself.
///
/// # Example
///
/// ```rust
/// use oxide_component::Callback;
///
/// let on_finish = Callback::new(|value: i32| println!("finished at {value}"));
/// assert_eq!(on_finish, on_finish.clone());
/// assert_ne!(on_finish, Callback::new(|_: i32| {}));
/// ```
pub struct Callback<T>(Rc<dyn Fn(T)>);

impl<T> Callback<T> {
    pub fn new(f: impl Fn(T) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, args: T) {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Callback<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A live event handler installed in a rendered tree.
///
/// The host calls [`Handler::call`] with its event payload. Handlers produced
/// by the runtime dispatch into it; errors from that dispatch are returned to
/// the host.
pub struct Handler<E>(Rc<dyn Fn(E) -> Result<()>>);

impl<E> Handler<E> {
    pub fn new(f: impl Fn(E) -> Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: E) -> Result<()> {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E> PartialEq for Handler<E> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
