#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerState {
    Appearing,
    Halted,
    Playing,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Title,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Banner {
    text: &'static str,
    seconds_remaining: f32,
}

/// All mutable round state. Passed by reference into every rule; nothing in
/// the simulation lives in module-level statics.
#[derive(Debug, Clone, PartialEq)]
struct RoundState {
    screen: Screen,
    score: u32,
    lives: u32,
    next_extra_life_score: u32,
    next_bonus_round_score: u32,
    player_state: PlayerState,
    invincibility_seconds_remaining: f32,
    bonus_seconds_remaining: f32,
    banner: Option<Banner>,
    elapsed_seconds: f32,
    tick_counter: u64,
}

impl RoundState {
    fn at_title(tuning: &Tuning) -> Self {
        Self {
            screen: Screen::Title,
            score: 0,
            lives: tuning.starting_lives,
            next_extra_life_score: tuning.extra_life_score_base,
            next_bonus_round_score: tuning.bonus_round_score_base,
            player_state: PlayerState::Appearing,
            invincibility_seconds_remaining: 0.0,
            bonus_seconds_remaining: 0.0,
            banner: None,
            elapsed_seconds: 0.0,
            tick_counter: 0,
        }
    }

    fn fresh_round(tuning: &Tuning) -> Self {
        Self {
            screen: Screen::Playing,
            ..Self::at_title(tuning)
        }
    }

    fn is_invincible(&self) -> bool {
        self.invincibility_seconds_remaining > 0.0
    }

    fn bonus_round_active(&self) -> bool {
        self.bonus_seconds_remaining > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    pub(crate) tool_spawn_roll_sides: u32,
    pub(crate) heavy_tool_roll_sides: u32,
    pub(crate) coin_drop_roll_sides: u32,
    pub(crate) coin_reward: u32,
    pub(crate) tool_zap_bonus: u32,
    pub(crate) coin_zap_penalty: u32,
    pub(crate) starting_lives: u32,
    pub(crate) extra_life_score_base: u32,
    pub(crate) extra_life_score_step: u32,
    pub(crate) bonus_round_score_base: u32,
    pub(crate) bonus_round_score_step: u32,
    pub(crate) bonus_round_seconds: f32,
    pub(crate) invincibility_seconds: f32,
    pub(crate) banner_seconds: f32,
    pub(crate) rng_seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tool_spawn_roll_sides: 50,
            heavy_tool_roll_sides: 2,
            coin_drop_roll_sides: 150,
            coin_reward: 500,
            tool_zap_bonus: 100,
            coin_zap_penalty: 300,
            starting_lives: 3,
            extra_life_score_base: 9000,
            extra_life_score_step: 9000,
            bonus_round_score_base: 5000,
            bonus_round_score_step: 5000,
            bonus_round_seconds: 8.0,
            invincibility_seconds: 2.0,
            banner_seconds: 2.0,
            rng_seed: None,
        }
    }
}

/// Deterministic dice for the spawn rolls. `roll` mirrors a physical die:
/// inclusive 1..=sides.
#[derive(Debug, Clone)]
struct DiceRoller {
    rng: Pcg32,
}

impl DiceRoller {
    fn from_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        self.rng.random_range(1..=sides)
    }

    fn roll_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GameplayEvent {
    ToolThrown {
        tool_id: ObjectId,
        heavy: bool,
    },
    CoinDropped {
        coin_id: ObjectId,
        bonus: bool,
    },
    LaserFired {
        laser_id: ObjectId,
    },
    CoinCollected {
        coin_id: ObjectId,
    },
    ToolZapped {
        tool_id: ObjectId,
    },
    CoinZapped {
        coin_id: ObjectId,
    },
    AvatarHit {
        lives_remaining: u32,
    },
    AvatarDied,
    ExtraLifeAwarded {
        next_threshold: u32,
    },
    BonusRoundStarted {
        next_threshold: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayEventKind {
    ToolThrown,
    CoinDropped,
    LaserFired,
    CoinCollected,
    ToolZapped,
    CoinZapped,
    AvatarHit,
    AvatarDied,
    ExtraLifeAwarded,
    BonusRoundStarted,
}

impl GameplayEvent {
    fn kind(self) -> GameplayEventKind {
        match self {
            Self::ToolThrown { .. } => GameplayEventKind::ToolThrown,
            Self::CoinDropped { .. } => GameplayEventKind::CoinDropped,
            Self::LaserFired { .. } => GameplayEventKind::LaserFired,
            Self::CoinCollected { .. } => GameplayEventKind::CoinCollected,
            Self::ToolZapped { .. } => GameplayEventKind::ToolZapped,
            Self::CoinZapped { .. } => GameplayEventKind::CoinZapped,
            Self::AvatarHit { .. } => GameplayEventKind::AvatarHit,
            Self::AvatarDied => GameplayEventKind::AvatarDied,
            Self::ExtraLifeAwarded { .. } => GameplayEventKind::ExtraLifeAwarded,
            Self::BonusRoundStarted { .. } => GameplayEventKind::BonusRoundStarted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GameplayEventCounts {
    total: u32,
    tool_thrown: u32,
    coin_dropped: u32,
    laser_fired: u32,
    coin_collected: u32,
    tool_zapped: u32,
    coin_zapped: u32,
    avatar_hit: u32,
    avatar_died: u32,
    extra_life_awarded: u32,
    bonus_round_started: u32,
}

impl GameplayEventCounts {
    fn record(&mut self, kind: GameplayEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            GameplayEventKind::ToolThrown => self.tool_thrown = self.tool_thrown.saturating_add(1),
            GameplayEventKind::CoinDropped => {
                self.coin_dropped = self.coin_dropped.saturating_add(1)
            }
            GameplayEventKind::LaserFired => self.laser_fired = self.laser_fired.saturating_add(1),
            GameplayEventKind::CoinCollected => {
                self.coin_collected = self.coin_collected.saturating_add(1)
            }
            GameplayEventKind::ToolZapped => self.tool_zapped = self.tool_zapped.saturating_add(1),
            GameplayEventKind::CoinZapped => self.coin_zapped = self.coin_zapped.saturating_add(1),
            GameplayEventKind::AvatarHit => self.avatar_hit = self.avatar_hit.saturating_add(1),
            GameplayEventKind::AvatarDied => self.avatar_died = self.avatar_died.saturating_add(1),
            GameplayEventKind::ExtraLifeAwarded => {
                self.extra_life_awarded = self.extra_life_awarded.saturating_add(1)
            }
            GameplayEventKind::BonusRoundStarted => {
                self.bonus_round_started = self.bonus_round_started.saturating_add(1)
            }
        }
    }
}

#[derive(Default)]
struct GameplayEventBus {
    current_tick_events: Vec<GameplayEvent>,
    last_tick_counts: GameplayEventCounts,
}

impl GameplayEventBus {
    fn emit(&mut self, event: GameplayEvent) {
        self.current_tick_events.push(event);
    }

    fn iter_emitted_so_far(&self) -> impl Iterator<Item = &GameplayEvent> {
        self.current_tick_events.iter()
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = GameplayEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    fn last_tick_counts(&self) -> GameplayEventCounts {
        self.last_tick_counts
    }
}
