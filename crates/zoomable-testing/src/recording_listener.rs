//! Listener capturing engine output for assertions.

use std::cell::RefCell;

use zoomable::ZoomListener;
use zoomable_graphics::Matrix;

/// One recorded engine notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    Update(Matrix),
    Idle,
}

/// Records every transform update and idle notification in arrival order.
#[derive(Default)]
pub struct RecordingListener {
    events: RefCell<Vec<RecordedEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn update_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, RecordedEvent::Update(_)))
            .count()
    }

    pub fn idle_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, RecordedEvent::Idle))
            .count()
    }

    pub fn last_matrix(&self) -> Option<Matrix> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find_map(|event| match event {
                RecordedEvent::Update(matrix) => Some(*matrix),
                RecordedEvent::Idle => None,
            })
    }

    /// True when the last recorded event is an idle notification.
    pub fn ended_idle(&self) -> bool {
        matches!(self.events.borrow().last(), Some(RecordedEvent::Idle))
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ZoomListener for RecordingListener {
    fn on_update(&self, matrix: &Matrix) {
        self.events.borrow_mut().push(RecordedEvent::Update(*matrix));
    }

    fn on_idle(&self) {
        self.events.borrow_mut().push(RecordedEvent::Idle);
    }
}
