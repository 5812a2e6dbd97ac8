//! Shallow comparison used by the re-render-skip predicate and the
//! properties-changed lifecycle.

use std::rc::Rc;

use crate::{Callback, Element, Handler, Node};

/// Shallow equality over a component's props or state.
///
/// Values compare by value, reference-counted and callback fields by pointer
/// identity.
///
/// Two comparisons are offered. [`shallow_eq`](Self::shallow_eq) drives the
/// properties-changed lifecycle and treats rendered subtrees ([`Node`],
/// [`Element`]) as always equal. [`render_eq`](Self::render_eq) drives the
/// re-render-skip predicate and compares subtrees structurally, so a replaced
/// child tree still reaches the host.
///
/// Implement it for your own props and state with [`impl_shallow_eq!`](crate::impl_shallow_eq).
pub trait ShallowEq {
    fn shallow_eq(&self, other: &Self) -> bool;

    /// Equality used to decide whether a render can be skipped.
    fn render_eq(&self, other: &Self) -> bool {
        self.shallow_eq(other)
    }
}

/// `true` when `next` differs shallowly from `prev`.
pub fn props_changed<P: ShallowEq>(prev: &P, next: &P) -> bool {
    !prev.shallow_eq(next)
}

/// Implement [`ShallowEq`] for a struct by comparing the listed fields.
///
/// Fields left out of the list are excluded from the comparison.
///
/// ```rust
/// use oxide_component::{impl_shallow_eq, Callback, ShallowEq};
///
/// struct Props {
///     initial_value: i32,
///     on_finish: Callback<i32>,
/// }
///
/// impl_shallow_eq!(Props { initial_value, on_finish });
///
/// let on_finish = Callback::new(|_: i32| {});
/// let a = Props { initial_value: 0, on_finish: on_finish.clone() };
/// let b = Props { initial_value: 0, on_finish };
/// assert!(a.shallow_eq(&b));
/// ```
#[macro_export]
macro_rules! impl_shallow_eq {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::ShallowEq for $ty {
            fn shallow_eq(&self, other: &Self) -> bool {
                true $(&& $crate::ShallowEq::shallow_eq(&self.$field, &other.$field))*
            }

            fn render_eq(&self, other: &Self) -> bool {
                true $(&& $crate::ShallowEq::render_eq(&self.$field, &other.$field))*
            }
        }
    };
}

macro_rules! shallow_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShallowEq for $ty {
                fn shallow_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

shallow_eq_by_value!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl<T: ShallowEq> ShallowEq for Option<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.shallow_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn render_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.render_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ShallowEq> ShallowEq for Vec<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.shallow_eq(b))
    }

    fn render_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.render_eq(b))
    }
}

impl<T: ?Sized> ShallowEq for Rc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T> ShallowEq for Callback<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<E> ShallowEq for Handler<E> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A: PartialEq, E> ShallowEq for Node<A, E> {
    fn shallow_eq(&self, _other: &Self) -> bool {
        true
    }

    fn render_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<A: PartialEq, E> ShallowEq for Element<A, E> {
    fn shallow_eq(&self, _other: &Self) -> bool {
        true
    }

    fn render_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<A: ShallowEq, B: ShallowEq> ShallowEq for (A, B) {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.0.shallow_eq(&other.0) && self.1.shallow_eq(&other.1)
    }

    fn render_eq(&self, other: &Self) -> bool {
        self.0.render_eq(&other.0) && self.1.render_eq(&other.1)
    }
}

impl<A: ShallowEq, B: ShallowEq, C: ShallowEq> ShallowEq for (A, B, C) {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.0.shallow_eq(&other.0) && self.1.shallow_eq(&other.1) && self.2.shallow_eq(&other.2)
    }

    fn render_eq(&self, other: &Self) -> bool {
        self.0.render_eq(&other.0) && self.1.render_eq(&other.1) && self.2.render_eq(&other.2)
    }
}
