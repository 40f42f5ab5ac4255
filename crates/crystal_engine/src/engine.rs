//! Frame loop driving every animated part of a scene
//!
//! The host calls [`FrameLoop::step`] (or [`FrameLoop::tick`]) once per display
//! refresh. Each step advances the shared animation clock and dispatches the
//! resulting [`FrameState`] to every registered per-frame callback.

use std::cell::{Cell, RefCell};

use crate::{
    events::{CallbackRegistry, Subscription},
    foundation::time::{AnimationClock, Timer},
    input::PointerState,
};

/// Snapshot of one frame handed to per-frame callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the loop started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    /// Frame number, starting at 1 for the first step
    pub frame: u64,
    /// Pointer position at the time of the frame
    pub pointer: PointerState,
}

/// Single-threaded frame loop
///
/// All methods take `&self` so callbacks and input handlers can share one loop
/// without threading mutable borrows through the host.
pub struct FrameLoop {
    clock: RefCell<AnimationClock>,
    timer: RefCell<Timer>,
    pointer: Cell<PointerState>,
    callbacks: CallbackRegistry<FrameState>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    /// Create a loop at time zero
    pub fn new() -> Self {
        Self {
            clock: RefCell::new(AnimationClock::new()),
            timer: RefCell::new(Timer::new()),
            pointer: Cell::new(PointerState::CENTER),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Run `callback` on every frame until the subscription is released
    #[must_use = "dropping the subscription unregisters the frame callback"]
    pub fn on_frame<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&FrameState) + 'static,
    {
        self.callbacks.register(callback)
    }

    /// Advance by `delta` seconds and run one frame
    pub fn step(&self, delta: f32) -> FrameState {
        let state = {
            let mut clock = self.clock.borrow_mut();
            clock.advance(delta);
            FrameState {
                elapsed: clock.elapsed(),
                delta: clock.delta(),
                frame: clock.frame_count(),
                pointer: self.pointer.get(),
            }
        };

        let invoked = self.callbacks.dispatch(&state);
        log::trace!("Frame {} at {:.3}s ran {} callbacks", state.frame, state.elapsed, invoked);
        state
    }

    /// Run one frame using the wall-clock time since the previous tick
    pub fn tick(&self) -> FrameState {
        let delta = {
            let mut timer = self.timer.borrow_mut();
            timer.update();
            timer.delta_time()
        };
        self.step(delta)
    }

    /// Update the pointer position used by subsequent frames
    pub fn set_pointer(&self, pointer: PointerState) {
        self.pointer.set(pointer);
    }

    /// Current pointer position
    pub fn pointer(&self) -> PointerState {
        self.pointer.get()
    }

    /// Number of registered per-frame callbacks
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Copy of the animation clock
    pub fn clock(&self) -> AnimationClock {
        self.clock.borrow().clone()
    }

    /// Wall-clock frame rate measured by [`tick`](Self::tick)
    pub fn average_fps(&self) -> f32 {
        self.timer.borrow().average_fps()
    }
}
