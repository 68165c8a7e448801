//! Cinescroll Core Library
//!
//! Scroll-driven cinematic camera: an authored keyframe path is sampled at a
//! timeline position that the reader moves with the wheel or touch.
//!
//! This library provides two modes of operation:
//! - Engine mode: `CameraEngine` ticked directly by the host (no ECS)
//! - Bevy mode: `CinescrollPlugin` drives the engine and the main camera entity

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod bus;
pub mod catalog;
pub mod chapter;
pub mod clip;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod mouse_look;
pub mod pose;
pub mod sampler;
pub mod store;
pub mod timeline;
pub mod transition;

// Bevy integration
pub mod bevy;

pub use bus::{CameraEvent, MessageBus, SubscriptionId, Topic};
pub use catalog::Catalog;
pub use chapter::{Chapter, ChapterTable};
pub use clip::{AnimationClip, CameraRig, KeyframeTrack};
pub use config::EngineConfig;
pub use engine::{CameraEngine, CameraFrame};
pub use error::CameraError;
pub use gate::{GestureKind, InteractionGate, InteractionPoint, InterfaceKind, TriggerFired};
pub use mouse_look::{LookOffset, MouseLookOverlay};
pub use pose::Pose;
pub use sampler::{AnimationFrame, FrameSampler};
pub use store::{InteractionStore, PlaybackStore, PlaybackSummary, StateStores};
pub use timeline::{ControlMode, DeltaMode, ScrollInput, TimelineController, TimelineState};
pub use transition::{TransitionQueue, TransitionRequest};
