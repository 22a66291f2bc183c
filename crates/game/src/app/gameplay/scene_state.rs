pub(crate) struct GameScene {
    tuning: Tuning,
    round: RoundState,
    rng: DiceRoller,
    rules: RuleHost,
    events: GameplayEventBus,
}

impl GameScene {
    pub(crate) fn new(tuning: Tuning, rng_seed: u64) -> Self {
        let round = RoundState::at_title(&tuning);
        Self {
            tuning,
            round,
            rng: DiceRoller::from_seed(rng_seed),
            rules: RuleHost::default(),
            events: GameplayEventBus::default(),
        }
    }

    fn start_round(&mut self, world: &mut ObjectWorld) {
        world.clear();
        self.round = RoundState::fresh_round(&self.tuning);
        self.events = GameplayEventBus::default();

        world.spawn(
            ObjectKind::Avatar,
            AVATAR_SPAWN_POS,
            AVATAR_RADIUS,
            SPRITE_RIGGER_FALL,
        );
        let fan = world.spawn(ObjectKind::Fan, FAN_SPAWN_POS, 0.0, SPRITE_FAN);
        fan.velocity = FAN_DRIFT_VELOCITY;
        fan.anim_speed = FAN_ANIM_SPEED;
        world.apply_pending();

        world.push_sound(SoundCommand::StartLoop(SOUND_MUSIC));
        info!(
            object_count = world.object_count(),
            lives = self.round.lives,
            "round_started"
        );
    }

    fn run_simulation_tick(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut ObjectWorld,
    ) {
        self.rules.run_once_per_tick(
            input,
            world,
            &mut self.round,
            &mut self.rng,
            &mut self.events,
            &self.tuning,
        );
        self.tick_round_timers(fixed_dt_seconds, world);
        self.events.finish_tick_rollover();
    }

    fn tick_round_timers(&mut self, fixed_dt_seconds: f32, world: &mut ObjectWorld) {
        self.round.elapsed_seconds += fixed_dt_seconds;
        self.round.tick_counter = self.round.tick_counter.saturating_add(1);

        if let Some(banner) = &mut self.round.banner {
            banner.seconds_remaining -= fixed_dt_seconds;
        }
        if self
            .round
            .banner
            .is_some_and(|banner| banner.seconds_remaining <= 0.0)
        {
            self.round.banner = None;
        }

        if self.round.bonus_seconds_remaining > 0.0 {
            self.round.bonus_seconds_remaining =
                (self.round.bonus_seconds_remaining - fixed_dt_seconds).max(0.0);
        }

        // Laser bonuses can cross a threshold outside the coin pass; the
        // escalation makes this second check idempotent.
        check_score_thresholds(&mut self.round, world, &mut self.events, &self.tuning);
    }

    fn hud_for_screen(&self) -> HudSnapshot {
        match self.round.screen {
            Screen::Title => HudSnapshot {
                show_score: false,
                score: 0,
                lives: 0,
                banner: None,
                headline: Some("WINCHLINE".to_string()),
                prompt: Some("PRESS SPACE TO START".to_string()),
            },
            Screen::Playing => HudSnapshot {
                show_score: true,
                score: self.round.score,
                lives: self.round.lives,
                banner: self.round.banner.map(|banner| banner.text.to_string()),
                headline: None,
                prompt: Some("ARROWS TO MOVE - SPACE TO FIRE".to_string()),
            },
            Screen::GameOver => HudSnapshot {
                show_score: true,
                score: self.round.score,
                lives: self.round.lives,
                banner: None,
                headline: Some("GAME OVER".to_string()),
                prompt: Some("PRESS SPACE TO RELAUNCH".to_string()),
            },
        }
    }
}
