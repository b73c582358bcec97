//! # STARBURST Rendering
//!
//! Drives the show one frame at a time and hands the results to a GPU
//! backend through the [`Renderer`] trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FRAME DRIVER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Clock → Camera spin → SparkPool::step → Instance buffers   │
//! │                                              ↓               │
//! │  Renderer: upload → instanced draw → bloom passes → composite│
//! │                                              ↓               │
//! │                       maybe launch a rocket                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`HeadlessRenderer`] records what a real backend would be asked to do,
//! which is what the tests and the headless binary run against.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bloom;
pub mod camera;
pub mod driver;
pub mod error;
pub mod layout;
pub mod renderer;

pub use bloom::{BloomPlan, BlurDirection, BlurPass, BlurTarget, GAUSSIAN_WEIGHTS};
pub use camera::{Camera, CameraConfig};
pub use driver::{DriverSettings, DriverStats, FrameDriver, FrameResult, TickOutcome};
pub use error::{RendererError, ShowError};
pub use layout::{AttributeSource, InstanceLayout, VertexAttribute};
pub use renderer::{HeadlessRenderer, HeadlessStats, RenderCall, Renderer, Viewport};
