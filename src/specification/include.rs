//! Typed include paths built from navigation handles.

use std::fmt;
use std::marker::PhantomData;

/// A named relationship from entity `T` to related data `R`.
///
/// Declared once per relationship, typically as an associated constant:
///
/// ```ignore
/// impl Order {
///     pub const LINES: Navigation<Order, OrderLine> = Navigation::new("lines");
/// }
/// ```
pub struct Navigation<T, R> {
    name: &'static str,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T, R> Navigation<T, R> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Continue the path into a navigation of the related type.
    pub fn then<S>(self, next: Navigation<R, S>) -> IncludeChain<T, S> {
        IncludeChain {
            segments: vec![self.name, next.name],
            _marker: PhantomData,
        }
    }
}

impl<T, R> Clone for Navigation<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, R> Copy for Navigation<T, R> {}

impl<T, R> fmt::Debug for Navigation<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Navigation").field(&self.name).finish()
    }
}

/// A multi-level typed path rooted at `T` and currently ending at `R`.
pub struct IncludeChain<T, R> {
    segments: Vec<&'static str>,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T, R> IncludeChain<T, R> {
    pub fn then<S>(mut self, next: Navigation<R, S>) -> IncludeChain<T, S> {
        self.segments.push(next.name);
        IncludeChain {
            segments: self.segments,
            _marker: PhantomData,
        }
    }
}

/// A typed include rooted at `T`: an ordered list of navigation names.
pub struct Include<T> {
    segments: Vec<&'static str>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> Include<T> {
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// The dotted form engines resolve, e.g. `"lines.product"`.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }
}

impl<T> Clone for Include<T> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Include<T> {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl<T> Eq for Include<T> {}

impl<T> fmt::Debug for Include<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Include").field(&self.path()).finish()
    }
}

impl<T> fmt::Display for Include<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl<T, R> From<Navigation<T, R>> for Include<T> {
    fn from(navigation: Navigation<T, R>) -> Self {
        Include {
            segments: vec![navigation.name],
            _marker: PhantomData,
        }
    }
}

impl<T, R> From<IncludeChain<T, R>> for Include<T> {
    fn from(chain: IncludeChain<T, R>) -> Self {
        Include {
            segments: chain.segments,
            _marker: PhantomData,
        }
    }
}
