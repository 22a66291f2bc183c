impl Scene for GameScene {
    fn load(&mut self, world: &mut ObjectWorld) {
        self.round = RoundState::at_title(&self.tuning);
        self.events = GameplayEventBus::default();
        world.apply_pending();
        info!(
            object_count = world.object_count(),
            rules = RULE_ORDER_TEXT,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut ObjectWorld,
    ) -> SceneCommand {
        if input.restart_pressed() {
            info!("restart_requested");
            return SceneCommand::HardReset;
        }

        match self.round.screen {
            Screen::Title => {
                if input.fire_pressed() {
                    self.start_round(world);
                }
            }
            Screen::Playing => self.run_simulation_tick(fixed_dt_seconds, input, world),
            Screen::GameOver => {
                if input.fire_pressed() {
                    self.start_round(world);
                } else {
                    // The field keeps winding down behind the game-over text.
                    self.run_simulation_tick(fixed_dt_seconds, input, world);
                }
            }
        }

        SceneCommand::None
    }

    fn unload(&mut self, world: &mut ObjectWorld) {
        info!(object_count = world.object_count(), "scene_unload");
        self.round = RoundState::at_title(&self.tuning);
        self.events = GameplayEventBus::default();
        self.rules = RuleHost::default();
    }

    fn hud_snapshot(&self, _world: &ObjectWorld) -> Option<HudSnapshot> {
        Some(self.hud_for_screen())
    }

    fn window_title(&self, world: &ObjectWorld) -> Option<String> {
        if self.round.screen != Screen::Playing {
            return None;
        }
        Some(format!(
            "Winchline | score {} | lives {} | objects {}",
            self.round.score,
            self.round.lives,
            world.object_count()
        ))
    }
}
