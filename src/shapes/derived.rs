use std::cell::OnceCell;

/// A lazily computed value that is thrown away whenever its inputs change.
///
/// An empty cell is the dirty state: mutators call [`Derived::invalidate`],
/// readers call [`Derived::get_or_compute`], and the value is rebuilt on the
/// first read after a mutation. Reads between mutations return the same
/// cached value.
#[derive(Debug, Clone, Default)]
pub struct Derived<T> {
    cell: OnceCell<T>,
}

impl<T> Derived<T> {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_dirty(&self) -> bool {
        self.cell.get().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_derived_computes_once_until_invalidated() {
        let calls = Cell::new(0);
        let mut value: Derived<u32> = Derived::new();
        assert!(value.is_dirty());

        let compute = || {
            calls.set(calls.get() + 1);
            42
        };
        assert_eq!(*value.get_or_compute(compute), 42);
        assert_eq!(*value.get_or_compute(compute), 42);
        assert_eq!(calls.get(), 1);
        assert!(!value.is_dirty());

        value.invalidate();
        assert!(value.is_dirty());
        assert_eq!(*value.get_or_compute(compute), 42);
        assert_eq!(calls.get(), 2);
    }
}
