use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn scale(self, factor: f32) -> Vec2 {
        Vec2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// The fixed set of object kinds the simulation knows about. `Fading` is the
/// terminal pre-destruction kind; retyping a live Tool or Coin to `Fading` is
/// the only legal kind mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Avatar,
    Fan,
    Tool,
    Coin,
    Star,
    Laser,
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteDesc {
    pub key: &'static str,
    pub frame_count: u32,
}

impl SpriteDesc {
    pub const fn new(key: &'static str, frame_count: u32) -> Self {
        Self { key, frame_count }
    }
}

#[derive(Debug, Clone)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub old_pos: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub rotation: f32,
    pub rot_speed: f32,
    pub radius: f32,
    pub frame: u32,
    pub anim_cursor: f32,
    pub anim_speed: f32,
    pub sprite: SpriteDesc,
    pub fade_alpha: Option<f32>,
    pub hidden: bool,
}

impl GameObject {
    /// One integration step: record the previous position, apply
    /// acceleration and velocity, advance rotation and the animation
    /// counter. Per-frame draw overrides reset here and are re-applied by
    /// whichever rule owns the object this tick.
    pub fn step(&mut self) {
        self.old_pos = self.pos;
        self.velocity = self.velocity.add(self.acceleration);
        self.pos = self.pos.add(self.velocity);
        self.rotation += self.rot_speed;
        self.anim_cursor += self.anim_speed;
        while self.anim_cursor >= 1.0 {
            self.frame = self.frame.saturating_add(1);
            self.anim_cursor -= 1.0;
        }
        self.fade_alpha = None;
        self.hidden = false;
    }

    /// Swap the sprite and animation speed. The frame counter restarts only
    /// when the sprite actually changes, so a rule may reassert the current
    /// sprite every tick without stalling its animation.
    pub fn set_sprite(&mut self, sprite: SpriteDesc, anim_speed: f32) {
        if self.sprite.key != sprite.key {
            self.frame = 0;
            self.anim_cursor = 0.0;
        }
        self.sprite = sprite;
        self.anim_speed = anim_speed;
    }

    pub fn is_animation_complete(&self) -> bool {
        self.sprite.frame_count > 0 && self.frame >= self.sprite.frame_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsAxis {
    Both,
    Horizontal,
    Vertical,
}

/// Collision and bounds oracle for the fixed-size playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn overlaps(&self, a: &GameObject, b: &GameObject) -> bool {
        let dx = a.pos.x - b.pos.x;
        let dy = a.pos.y - b.pos.y;
        let reach = a.radius + b.radius;
        dx * dx + dy * dy <= reach * reach
    }

    /// Centre-point containment. Objects spawned flush with an edge are
    /// inside; an object is "leaving" only once its centre crosses out.
    pub fn is_leaving(&self, obj: &GameObject) -> bool {
        self.is_leaving_axis(obj, BoundsAxis::Both)
    }

    pub fn is_leaving_axis(&self, obj: &GameObject, axis: BoundsAxis) -> bool {
        let out_horizontal = obj.pos.x < 0.0 || obj.pos.x > self.width;
        let out_vertical = obj.pos.y < 0.0 || obj.pos.y > self.height;
        match axis {
            BoundsAxis::Both => out_horizontal || out_vertical,
            BoundsAxis::Horizontal => out_horizontal,
            BoundsAxis::Vertical => out_vertical,
        }
    }

    /// Visible while the object's collision circle still intersects the
    /// playfield rectangle.
    pub fn is_visible(&self, obj: &GameObject) -> bool {
        obj.pos.x + obj.radius >= 0.0
            && obj.pos.x - obj.radius <= self.width
            && obj.pos.y + obj.radius >= 0.0
            && obj.pos.y - obj.radius <= self.height
    }
}

/// Audio request queued on the world by the simulation and drained once per
/// frame by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    PlayOnce(&'static str),
    StartLoop(&'static str),
    StopLoop(&'static str),
}

#[derive(Debug, Default)]
pub struct ObjectIdAllocator {
    next: u64,
}

impl ObjectIdAllocator {
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Owns every live game object. Spawns and despawns are two-phase: queued
/// by the rules and flushed at explicit safe points via `apply_pending`, so
/// an id collected at the start of a pass stays resolvable for the rest of
/// that pass.
#[derive(Debug, Default)]
pub struct ObjectWorld {
    allocator: ObjectIdAllocator,
    objects: Vec<GameObject>,
    pending_spawns: Vec<GameObject>,
    pending_despawns: Vec<ObjectId>,
    playfield: Playfield,
    sound_queue: Vec<SoundCommand>,
}

impl ObjectWorld {
    pub fn with_playfield(playfield: Playfield) -> Self {
        Self {
            playfield,
            ..Self::default()
        }
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Queue a new object and hand back the pending entry so the caller can
    /// finish configuring velocity, spin and animation before the next
    /// `apply_pending` makes it live.
    pub fn spawn(
        &mut self,
        kind: ObjectKind,
        pos: Vec2,
        radius: f32,
        sprite: SpriteDesc,
    ) -> &mut GameObject {
        let id = self.allocator.allocate();
        self.pending_spawns.push(GameObject {
            id,
            kind,
            pos,
            old_pos: pos,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            rotation: 0.0,
            rot_speed: 0.0,
            radius,
            frame: 0,
            anim_cursor: 0.0,
            anim_speed: 0.0,
            sprite,
            fade_alpha: None,
            hidden: false,
        });
        self.pending_spawns.last_mut().expect("just pushed")
    }

    pub fn despawn(&mut self, id: ObjectId) -> bool {
        let exists_now = self.objects.iter().any(|obj| obj.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|obj| obj.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.objects
                .retain(|obj| pending.binary_search_by_key(&obj.id.0, |id| id.0).is_err());
            self.pending_spawns
                .retain(|obj| pending.binary_search_by_key(&obj.id.0, |id| id.0).is_err());
            self.pending_despawns.clear();
        }

        if !self.pending_spawns.is_empty() {
            self.objects.append(&mut self.pending_spawns);
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.sound_queue.clear();
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [GameObject] {
        &mut self.objects
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|obj| obj.id == id)
    }

    pub fn collect_ids_by_kind(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|obj| obj.kind == kind)
            .map(|obj| obj.id)
            .collect()
    }

    pub fn first_id_of_kind(&self, kind: ObjectKind) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|obj| obj.kind == kind)
            .map(|obj| obj.id)
    }

    pub fn count_of_kind(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|obj| obj.kind == kind).count()
    }

    pub fn push_sound(&mut self, command: SoundCommand) {
        self.sound_queue.push(command);
    }

    pub fn queued_sounds(&self) -> &[SoundCommand] {
        &self.sound_queue
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundCommand> {
        std::mem::take(&mut self.sound_queue)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    fire_pressed: bool,
    restart_pressed: bool,
    actions: ActionStates,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        fire_pressed: bool,
        restart_pressed: bool,
        actions: ActionStates,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            fire_pressed,
            restart_pressed,
            actions,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn fire_pressed(&self) -> bool {
        self.fire_pressed
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_fire_pressed(mut self, fire_pressed: bool) -> Self {
        self.fire_pressed = fire_pressed;
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Everything the renderer needs to draw the text layer for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub show_score: bool,
    pub score: u32,
    pub lives: u32,
    pub banner: Option<String>,
    pub headline: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardReset,
}

pub trait Scene {
    fn load(&mut self, world: &mut ObjectWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut ObjectWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut ObjectWorld);
    fn hud_snapshot(&self, _world: &ObjectWorld) -> Option<HudSnapshot> {
        None
    }
    fn window_title(&self, _world: &ObjectWorld) -> Option<String> {
        None
    }
}

/// Owns the single scene runtime and its world. `hard_reset` rebuilds the
/// scene from scratch through unload/clear/load.
pub struct SceneHost {
    scene: Box<dyn Scene>,
    world: ObjectWorld,
    is_loaded: bool,
}

impl SceneHost {
    pub fn new(scene: Box<dyn Scene>, playfield: Playfield) -> Self {
        Self {
            scene,
            world: ObjectWorld::with_playfield(playfield),
            is_loaded: false,
        }
    }

    pub fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.scene.update(fixed_dt_seconds, input, &mut self.world)
    }

    pub fn apply_pending(&mut self) {
        self.world.apply_pending();
    }

    pub fn hard_reset(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
        }
        self.world.clear();
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
            self.world.clear();
            self.is_loaded = false;
        }
    }

    pub fn world(&self) -> &ObjectWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ObjectWorld {
        &mut self.world
    }

    pub fn hud_snapshot(&self) -> Option<HudSnapshot> {
        self.scene.hud_snapshot(&self.world)
    }

    pub fn window_title(&self) -> Option<String> {
        self.scene.window_title(&self.world)
    }
}
