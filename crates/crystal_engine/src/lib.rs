//! # Crystal Engine
//!
//! The animated hero scene of the portfolio site, written against no particular
//! graphics API: a morphing glass crystal hovering above a reflective floor, a
//! rotating particle field with sparkles, and a camera that spirals outward as
//! the visitor scrolls the page.
//!
//! ## Features
//!
//! - **Shader Module**: GLSL sources for the crystal material plus a CPU reference
//!   of the same vertex displacement and fragment shading
//! - **Scroll-Driven Camera**: scroll progress mapped onto a spiral path with
//!   damped interpolation, pointer look offset and low-frequency shake
//! - **Scoped Registrations**: frame and scroll callbacks are held by RAII
//!   subscriptions that are released when the scene is unmounted
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crystal_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let frames = FrameLoop::new();
//!     let scroll = ScrollSource::new();
//!     let mut scene = CrystalScene::new(&SceneConfig::default())?.mount(&frames, &scroll);
//!
//!     scroll.emit_progress(0.25);
//!     frames.step(1.0 / 60.0);
//!     let output = scene.snapshot();
//!     println!("camera at {:?}", output.camera.position);
//!
//!     scene.unmount();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod events;
pub mod input;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{FrameLoop, FrameState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        FrameLoop, FrameState,
        core::config::SceneConfig,
        config::{Config, ConfigError},
        events::{CallbackRegistry, Subscription},
        foundation::{
            math::{Vec2, Vec3, Mat4, Transform},
            time::{AnimationClock, Timer},
        },
        input::{PointerState, ScrollMetrics, ScrollSource},
        render::{
            Camera, Color,
            shader::{MaterialParams, ShaderUniforms},
        },
        scene::{CrystalScene, FrameOutput, MountedScene, SceneContext, SceneError},
    };
}
