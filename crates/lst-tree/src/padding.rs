//! Structural wrappers that attach formatting around an element without
//! polluting its semantic fields.

use crate::markers::Markers;
use crate::space::Space;

/// Space that precedes an element, e.g. the space before `=` in an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftPadded<T> {
    pub before: Space,
    pub element: T,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, element: T) -> Self {
        Self { before, element }
    }

    pub fn bare(element: T) -> Self {
        Self::new(Space::empty(), element)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LeftPadded<U> {
        LeftPadded {
            before: self.before,
            element: f(self.element),
        }
    }
}

/// Space and markers that follow an element, e.g. the space before a comma.
#[derive(Debug, Clone, PartialEq)]
pub struct RightPadded<T> {
    pub element: T,
    pub after: Space,
    pub markers: Markers,
}

impl<T> RightPadded<T> {
    pub fn new(element: T, after: Space) -> Self {
        Self {
            element,
            after,
            markers: Markers::empty(),
        }
    }

    pub fn bare(element: T) -> Self {
        Self::new(element, Space::empty())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RightPadded<U> {
        RightPadded {
            element: f(self.element),
            after: self.after,
            markers: self.markers,
        }
    }
}

/// A bracketed, delimited sequence such as an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub before: Space,
    pub elements: Vec<RightPadded<T>>,
    pub markers: Markers,
}

impl<T> Container<T> {
    pub fn new(before: Space, elements: Vec<RightPadded<T>>) -> Self {
        Self {
            before,
            elements,
            markers: Markers::empty(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Space::empty(), Vec::new())
    }

    /// The unwrapped elements, in order.
    pub fn elements(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().map(|rp| &rp.element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_padding() {
        let lp = LeftPadded::new(Space::format(" "), 1).map(|n| n + 1);
        assert_eq!(lp.element, 2);
        assert_eq!(lp.before, Space::format(" "));

        let rp = RightPadded::new("a", Space::format("  ")).map(str::len);
        assert_eq!(rp.element, 1);
        assert_eq!(rp.after.whitespace, "  ");
    }

    #[test]
    fn container_elements_unwrap_padding() {
        let c = Container::new(
            Space::empty(),
            vec![RightPadded::new(1, Space::format(" ")), RightPadded::bare(2)],
        );
        assert_eq!(c.elements().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(c.len(), 2);
        assert!(Container::<i32>::empty().is_empty());
    }
}
