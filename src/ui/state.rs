use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Coalesces re-render requests for one view.
///
/// Any number of [`request`](Self::request) calls between two
/// [`take`](Self::take) calls result in a single pending render.
#[derive(Default)]
pub struct Invalidation {
    dirty: Cell<bool>,
    requests: Cell<u64>,
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.dirty.set(true);
        self.requests.set(self.requests.get() + 1);
    }

    pub fn is_pending(&self) -> bool {
        self.dirty.get()
    }

    /// Clears the pending flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Total requests seen, coalesced or not.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }
}

impl fmt::Debug for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invalidation")
            .field("dirty", &self.dirty.get())
            .field("requests", &self.requests.get())
            .finish()
    }
}

/// Mutable access to a view's state from inside a handler.
///
/// The first mutable dereference requests a re-render; later ones within
/// the same handle do not request again.
pub struct StateMut<'a, V> {
    view: &'a mut V,
    invalidation: &'a Invalidation,
    touched: bool,
}

impl<'a, V> StateMut<'a, V> {
    pub fn new(view: &'a mut V, invalidation: &'a Invalidation) -> Self {
        Self {
            view,
            invalidation,
            touched: false,
        }
    }

    /// Requests a re-render without touching state.
    pub fn invalidate(&mut self) {
        self.mark();
    }

    /// Mutable access that does not request a re-render.
    pub fn get_mut_untracked(&mut self) -> &mut V {
        &mut *self.view
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    fn mark(&mut self) {
        if !self.touched {
            self.touched = true;
            self.invalidation.request();
        }
    }
}

impl<V> Deref for StateMut<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &*self.view
    }
}

impl<V> DerefMut for StateMut<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.mark();
        &mut *self.view
    }
}

impl<V: fmt::Debug> fmt::Debug for StateMut<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMut")
            .field("view", &self.view)
            .field("touched", &self.touched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Invalidation, StateMut};

    #[derive(Debug, Default)]
    struct Form {
        name: String,
        age: u32,
    }

    #[test]
    fn reading_does_not_invalidate() {
        let invalidation = Invalidation::new();
        let mut form = Form::default();
        let state = StateMut::new(&mut form, &invalidation);
        assert_eq!(state.age, 0);
        assert!(!invalidation.is_pending());
    }

    #[test]
    fn many_field_writes_request_once() {
        let invalidation = Invalidation::new();
        let mut form = Form::default();
        {
            let mut state = StateMut::new(&mut form, &invalidation);
            state.name.push_str("ada");
            state.age += 1;
            state.age += 1;
        }
        assert_eq!(form.age, 2);
        assert_eq!(invalidation.requests(), 1);
        assert!(invalidation.take());
        assert!(!invalidation.take());
    }

    #[test]
    fn untracked_access_leaves_view_clean() {
        let invalidation = Invalidation::new();
        let mut form = Form::default();
        let mut state = StateMut::new(&mut form, &invalidation);
        state.get_mut_untracked().age = 9;
        assert!(!state.is_touched());
        state.invalidate();
        assert!(invalidation.is_pending());
    }

    #[test]
    fn separate_handles_coalesce_into_one_pending_render() {
        let invalidation = Invalidation::new();
        let mut form = Form::default();
        for _ in 0..3 {
            StateMut::new(&mut form, &invalidation).age += 1;
        }
        assert_eq!(invalidation.requests(), 3);
        assert!(invalidation.take());
        assert!(!invalidation.is_pending());
    }
}
