use engine::{
    BoundsAxis, GameObject, HudSnapshot, InputAction, InputSnapshot, ObjectId, ObjectKind,
    ObjectWorld, Playfield, Scene, SceneCommand, SoundCommand, SpriteDesc, Vec2,
};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Deserialize;
use tracing::{debug, info};

const AVATAR_SPAWN_POS: Vec2 = Vec2 { x: 115.0, y: 0.0 };
const AVATAR_RADIUS: f32 = 50.0;
const APPEAR_VELOCITY: Vec2 = Vec2 { x: 0.0, y: 12.0 };
const APPEAR_ACCELERATION: Vec2 = Vec2 { x: 0.0, y: 0.5 };
const CLIMB_VELOCITY: Vec2 = Vec2 { x: 0.0, y: -4.0 };
const DIVE_ACCELERATION: Vec2 = Vec2 { x: 0.0, y: 1.0 };
const HALT_ENTRY_FALL_SPEED: f32 = 5.0;
const HALT_VELOCITY_DAMPING: f32 = 0.9;
const HOVER_VELOCITY_DAMPING: f32 = 0.5;
const DEAD_ACCELERATION: Vec2 = Vec2 { x: -0.3, y: 0.5 };
const DEAD_SPIN_STEP: f32 = 0.25;
// Fixed-step decrement; the frame driver pins the simulation to 60 ticks/s.
const INVINCIBILITY_TICK_SECONDS: f32 = 1.0 / 60.0;

const FAN_SPAWN_POS: Vec2 = Vec2 { x: 1140.0, y: 217.0 };
const FAN_DRIFT_VELOCITY: Vec2 = Vec2 { x: 0.0, y: 3.0 };
const FAN_ANIM_SPEED: f32 = 1.0;

const TOOL_RADIUS: f32 = 50.0;
const HEAVY_TOOL_RADIUS: f32 = 100.0;
const TOOL_THROW_SPEED_X: f32 = -8.0;
const HEAVY_TOOL_THROW_SPEED_X: f32 = -4.0;
const TOOL_VERTICAL_STEP: f32 = 6.0;
const SPAWN_SPIN_SPEED: f32 = 0.1;

const COIN_RADIUS: f32 = 40.0;
const COIN_DRIFT_VELOCITY: Vec2 = Vec2 { x: -3.0, y: 0.0 };
const BONUS_COIN_THROW_SPEED_X: f32 = -4.0;

const STAR_LAUNCH_SPEED: f32 = 16.0;
const STAR_ACCELERATION: Vec2 = Vec2 { x: 0.0, y: 0.5 };
const STAR_BURST_ANGLES: [f32; 4] = [
    0.25 * std::f32::consts::PI,
    0.75 * std::f32::consts::PI,
    1.25 * std::f32::consts::PI,
    1.75 * std::f32::consts::PI,
];

const LASER_MUZZLE_OFFSET: Vec2 = Vec2 { x: 155.0, y: -75.0 };
const LASER_VELOCITY: Vec2 = Vec2 { x: 32.0, y: 0.0 };
const LASER_RADIUS: f32 = 30.0;

const FADE_FRAME_LIMIT: u32 = 10;
// One frame per tick keeps the fade-out bounded by FADE_FRAME_LIMIT ticks.
const FADING_ANIM_SPEED: f32 = 1.0;

const FALL_ANIM_SPEED: f32 = 0.0;
const CLIMB_ANIM_SPEED: f32 = 0.25;
const HALT_ANIM_SPEED: f32 = 0.333;
const HANG_ANIM_SPEED: f32 = 0.02;

const SPRITE_RIGGER_FALL: SpriteDesc = SpriteDesc::new("rigger_fall", 0);
const SPRITE_RIGGER_CLIMB: SpriteDesc = SpriteDesc::new("rigger_climb", 4);
const SPRITE_RIGGER_HALT: SpriteDesc = SpriteDesc::new("rigger_halt", 8);
const SPRITE_RIGGER_HANG: SpriteDesc = SpriteDesc::new("rigger_hang", 6);
const SPRITE_FAN: SpriteDesc = SpriteDesc::new("fan", 4);
const SPRITE_DRIVER: SpriteDesc = SpriteDesc::new("driver", 0);
const SPRITE_SPANNER: SpriteDesc = SpriteDesc::new("spanner", 0);
const SPRITE_COIN: SpriteDesc = SpriteDesc::new("coin", 0);
const SPRITE_BONUS_COIN: SpriteDesc = SpriteDesc::new("coin_bonus", 0);
const SPRITE_STAR: SpriteDesc = SpriteDesc::new("star", 0);
const SPRITE_LASER: SpriteDesc = SpriteDesc::new("laser", 0);

const SOUND_MUSIC: &str = "music";
const SOUND_SHOOT: &str = "shoot";
const SOUND_TOOL: &str = "tool";
const SOUND_COLLECT: &str = "collect";
const SOUND_ERROR: &str = "error";
const SOUND_HIT: &str = "hit";
const SOUND_DIE: &str = "die";
const SOUND_EXTRA_LIFE: &str = "extra_life";
const SOUND_BONUS: &str = "bonus";

const BANNER_EXTRA_LIFE: &str = "EXTRA LIFE!";
const BANNER_BONUS_ROUND: &str = "BONUS ROUND!";

const RULE_ORDER_TEXT: &str = "Avatar>Fan>Tools>CoinsStars>Lasers>Fading";

include!("types.rs");
include!("systems.rs");
include!("scene_state.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_scene(tuning: Tuning, rng_seed: u64) -> Box<dyn Scene> {
    Box::new(GameScene::new(tuning, rng_seed))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
