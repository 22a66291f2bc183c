mod audio;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod world;

pub use audio::{AudioSink, NullAudioSink};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use world::{
    BoundsAxis, GameObject, HudSnapshot, InputSnapshot, ObjectId, ObjectKind, ObjectWorld,
    Playfield, Scene, SceneCommand, SceneHost, SoundCommand, SpriteDesc, Vec2,
};
