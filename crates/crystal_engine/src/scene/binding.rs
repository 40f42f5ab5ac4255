//! Wiring a scene context into the frame loop and the scroll source
//!
//! Both bindings capture only a weak reference to the context. If the context
//! is gone or retired by the time a callback fires, the callback does nothing.

use crate::engine::FrameLoop;
use crate::events::Subscription;
use crate::input::ScrollSource;

use super::context::SceneContext;

/// Render `ctx` on every frame of `frames`
#[must_use = "dropping the subscription stops rendering the scene"]
pub fn bind_render_loop(ctx: &SceneContext, frames: &FrameLoop) -> Subscription {
    let state = ctx.downgrade();
    frames.on_frame(move |frame| {
        if let Some(ctx) = SceneContext::from_weak(&state) {
            ctx.render_frame(frame);
        }
    })
}

/// Retarget the camera of `ctx` on every scroll update of `scroll`
#[must_use = "dropping the subscription stops following the scroll position"]
pub fn bind_scroll(ctx: &SceneContext, scroll: &ScrollSource) -> Subscription {
    let state = ctx.downgrade();
    scroll.observe(move |progress| match SceneContext::from_weak(&state) {
        Some(ctx) => {
            ctx.set_scroll_progress(progress);
        }
        None => log::debug!("Scroll progress {} arrived after scene teardown", progress),
    })
}
