//! Frame callback queue and its owner/handle pair.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

/// Notifies the host that at least one frame callback is pending and a
/// display frame should be produced.
pub trait FrameScheduler {
    fn schedule_frame(&self);
}

/// Scheduler that does nothing. Suitable for hosts that render
/// unconditionally every frame, and for tests.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn schedule_frame(&self) {}
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct FrameLoopInner {
    scheduler: Rc<dyn FrameScheduler>,
    callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_callback_id: Cell<u64>,
    needs_frame: Cell<bool>,
}

impl FrameLoopInner {
    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);
        self.callbacks.borrow_mut().push_back(FrameCallbackEntry {
            id,
            callback: Some(callback),
        });
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        // Pop everything first: callbacks registered while running are new
        // work for the NEXT frame, not this one.
        let mut callbacks = self.callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        if !pending.is_empty() {
            log::trace!("draining {} frame callback(s)", pending.len());
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
        if self.callbacks.borrow().is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.callbacks.borrow().is_empty()
    }
}

/// Owner of the frame callback queue. The host keeps this alive and calls
/// [`FrameLoop::drain_frame_callbacks`] once per display frame with a
/// monotonic timestamp.
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(FrameLoopInner {
                scheduler,
                callbacks: RefCell::new(VecDeque::new()),
                next_callback_id: Cell::new(1),
                needs_frame: Cell::new(false),
            }),
        }
    }

    /// Returns a weak handle engines and drivers can hold without keeping
    /// the loop alive.
    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Runs every callback registered before this call, in registration
    /// order, passing the frame timestamp in nanoseconds.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    /// Whether a frame has been requested and not yet fully drained.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }
}

/// Cheap cloneable handle to a [`FrameLoop`]. All operations become no-ops
/// once the owning loop is dropped.
#[derive(Clone)]
pub struct FrameLoopHandle {
    inner: Weak<FrameLoopInner>,
}

impl FrameLoopHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Registers a callback and wraps it in a guard that cancels the
    /// callback when dropped.
    pub fn frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        match self.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(self.clone(), id),
            None => FrameCallbackRegistration::inactive(self.clone()),
        }
    }
}

/// RAII guard for a registered frame callback.
pub struct FrameCallbackRegistration {
    handle: FrameLoopHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(handle: FrameLoopHandle, id: FrameCallbackId) -> Self {
        Self {
            handle,
            id: Some(id),
        }
    }

    fn inactive(handle: FrameLoopHandle) -> Self {
        Self { handle, id: None }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.handle.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn frame_loop() -> FrameLoop {
        FrameLoop::new(Rc::new(NoopScheduler))
    }

    #[test]
    fn callbacks_run_in_registration_order_with_frame_time() {
        let frame_loop = frame_loop();
        let handle = frame_loop.handle();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            handle.register_frame_callback(move |time| {
                seen.borrow_mut().push((tag, time));
            });
        }

        frame_loop.drain_frame_callbacks(42);
        assert_eq!(*seen.borrow(), vec![("a", 42), ("b", 42), ("c", 42)]);
        assert!(!frame_loop.needs_frame());
    }

    #[test]
    fn reregistration_during_drain_waits_for_next_frame() {
        let frame_loop = frame_loop();
        let handle = frame_loop.handle();
        let times = Rc::new(RefCell::new(Vec::new()));

        {
            let handle = handle.clone();
            let times = Rc::clone(&times);
            handle.clone().register_frame_callback(move |time| {
                times.borrow_mut().push(time);
                let times = Rc::clone(&times);
                handle.register_frame_callback(move |time| {
                    times.borrow_mut().push(time);
                });
            });
        }

        frame_loop.drain_frame_callbacks(1);
        assert_eq!(*times.borrow(), vec![1]);
        assert!(frame_loop.needs_frame());
        frame_loop.drain_frame_callbacks(2);
        assert_eq!(*times.borrow(), vec![1, 2]);
    }

    #[test]
    fn cancelled_callbacks_never_run() {
        let frame_loop = frame_loop();
        let handle = frame_loop.handle();
        let ran = Rc::new(RefCell::new(false));

        let ran_flag = Rc::clone(&ran);
        let id = handle
            .register_frame_callback(move |_| *ran_flag.borrow_mut() = true)
            .expect("loop is alive");
        handle.cancel_frame_callback(id);

        frame_loop.drain_frame_callbacks(0);
        assert!(!*ran.borrow());
    }

    #[test]
    fn dropping_registration_cancels() {
        let frame_loop = frame_loop();
        let handle = frame_loop.handle();
        let ran = Rc::new(RefCell::new(false));

        let ran_flag = Rc::clone(&ran);
        let registration = handle.frame_callback(move |_| *ran_flag.borrow_mut() = true);
        drop(registration);

        frame_loop.drain_frame_callbacks(0);
        assert!(!*ran.borrow());
    }

    #[test]
    fn handle_outliving_loop_is_inert() {
        let frame_loop = frame_loop();
        let handle = frame_loop.handle();
        drop(frame_loop);
        assert!(handle.register_frame_callback(|_| {}).is_none());
    }
}
