//! sync::navigation
//!
//! The navigation boundary between the map screen and the editor screen.
//!
//! The only thing that crosses it is an optional record id: `Some(id)` opens
//! the editor on an existing point, `None` opens it to create one.

use std::cell::RefCell;

use crate::core::types::RecordId;

/// Host router.
pub trait Navigator {
    /// Open the editor screen.
    fn open_editor(&self, id: Option<RecordId>);

    /// Leave the current screen.
    fn back(&self);
}

/// A navigation request, as recorded by [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    OpenEditor(Option<RecordId>),
    Back,
}

/// Navigator that only remembers what it was asked to do.
///
/// Used by the command-line front end, where screens are sequential, and by
/// tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: RefCell<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.borrow().clone()
    }

    /// Take and clear the recorded events.
    pub fn drain(&self) -> Vec<NavigationEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl Navigator for RecordingNavigator {
    fn open_editor(&self, id: Option<RecordId>) {
        self.events
            .borrow_mut()
            .push(NavigationEvent::OpenEditor(id));
    }

    fn back(&self) {
        self.events.borrow_mut().push(NavigationEvent::Back);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_drains() {
        let nav = RecordingNavigator::new();
        let id = RecordId::new("p1").unwrap();

        nav.open_editor(Some(id.clone()));
        nav.back();

        assert_eq!(
            nav.drain(),
            vec![NavigationEvent::OpenEditor(Some(id)), NavigationEvent::Back]
        );
        assert!(nav.events().is_empty());
    }
}
