#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleId {
    Avatar,
    Fan,
    Tools,
    CoinsStars,
    Lasers,
    Fading,
}

impl RuleId {
    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Self::Avatar => "Avatar",
            Self::Fan => "Fan",
            Self::Tools => "Tools",
            Self::CoinsStars => "CoinsStars",
            Self::Lasers => "Lasers",
            Self::Fading => "Fading",
        }
    }
}

const RULE_ORDER: [RuleId; 6] = [
    RuleId::Avatar,
    RuleId::Fan,
    RuleId::Tools,
    RuleId::CoinsStars,
    RuleId::Lasers,
    RuleId::Fading,
];

struct RuleContext<'a> {
    input: &'a InputSnapshot,
    world: &'a mut ObjectWorld,
    round: &'a mut RoundState,
    rng: &'a mut DiceRoller,
    events: &'a mut GameplayEventBus,
    tuning: &'a Tuning,
}

#[derive(Default)]
struct RuleHost {
    last_tick_order: Vec<RuleId>,
}

impl RuleHost {
    /// One simulation tick: every rule runs exactly once in RULE_ORDER, and
    /// pending spawns/despawns flush after each pass. Retypes made by the
    /// laser pass therefore reach the tool and coin passes one tick later,
    /// while the fading pass in the same tick already sees them.
    fn run_once_per_tick(
        &mut self,
        input: &InputSnapshot,
        world: &mut ObjectWorld,
        round: &mut RoundState,
        rng: &mut DiceRoller,
        events: &mut GameplayEventBus,
        tuning: &Tuning,
    ) {
        self.last_tick_order.clear();
        for rule_id in RULE_ORDER {
            self.last_tick_order.push(rule_id);
            let mut context = RuleContext {
                input,
                world: &mut *world,
                round: &mut *round,
                rng: &mut *rng,
                events: &mut *events,
                tuning,
            };
            self.run_rule(rule_id, &mut context);
            context.world.apply_pending();
        }
    }

    fn run_rule(&self, rule_id: RuleId, context: &mut RuleContext<'_>) {
        match rule_id {
            RuleId::Avatar => self.run_avatar_rule(context),
            RuleId::Fan => self.run_fan_rule(context),
            RuleId::Tools => self.run_tools_rule(context),
            RuleId::CoinsStars => self.run_coins_and_stars_rule(context),
            RuleId::Lasers => self.run_lasers_rule(context),
            RuleId::Fading => self.run_fading_rule(context),
        }
    }

    fn run_avatar_rule(&self, context: &mut RuleContext<'_>) {
        let Some(avatar_id) = context.world.first_id_of_kind(ObjectKind::Avatar) else {
            return;
        };
        let playfield = context.world.playfield();

        match context.round.player_state {
            PlayerState::Appearing => {
                if let Some(avatar) = context.world.find_object_mut(avatar_id) {
                    avatar.velocity = APPEAR_VELOCITY;
                    avatar.acceleration = APPEAR_ACCELERATION;
                    avatar.rotation = 0.0;
                    avatar.set_sprite(SPRITE_RIGGER_FALL, FALL_ANIM_SPEED);
                    if avatar.pos.y >= playfield.height / 3.0 {
                        context.round.player_state = PlayerState::Playing;
                    }
                }
            }
            PlayerState::Halted => {
                if let Some(avatar) = context.world.find_object_mut(avatar_id) {
                    avatar.velocity = avatar.velocity.scale(HALT_VELOCITY_DAMPING);
                    if avatar.is_animation_complete() {
                        context.round.player_state = PlayerState::Playing;
                    }
                }
            }
            PlayerState::Playing => self.run_player_controls(context, avatar_id),
            PlayerState::Dead => self.run_death_tumble(context, avatar_id),
        }

        if let Some(avatar) = context.world.find_object_mut(avatar_id) {
            avatar.step();
            // The death tumble is allowed to leave the playfield downward.
            if context.round.player_state != PlayerState::Dead && playfield.is_leaving(avatar) {
                avatar.pos = avatar.old_pos;
            }
        }
    }

    fn run_player_controls(&self, context: &mut RuleContext<'_>, avatar_id: ObjectId) {
        let mut muzzle_pos = None;
        if let Some(avatar) = context.world.find_object_mut(avatar_id) {
            if context.input.is_down(InputAction::MoveUp) {
                avatar.velocity = CLIMB_VELOCITY;
                avatar.set_sprite(SPRITE_RIGGER_CLIMB, CLIMB_ANIM_SPEED);
            } else if context.input.is_down(InputAction::MoveDown) {
                avatar.acceleration = DIVE_ACCELERATION;
                avatar.set_sprite(SPRITE_RIGGER_FALL, FALL_ANIM_SPEED);
            } else if avatar.velocity.y > HALT_ENTRY_FALL_SPEED {
                context.round.player_state = PlayerState::Halted;
                avatar.set_sprite(SPRITE_RIGGER_HALT, HALT_ANIM_SPEED);
                avatar.acceleration = Vec2::ZERO;
            } else {
                avatar.set_sprite(SPRITE_RIGGER_HANG, HANG_ANIM_SPEED);
                avatar.velocity = avatar.velocity.scale(HOVER_VELOCITY_DAMPING);
                avatar.acceleration = Vec2::ZERO;
            }

            if context.input.fire_pressed() {
                muzzle_pos = Some(avatar.pos.add(LASER_MUZZLE_OFFSET));
            }
        }

        if let Some(pos) = muzzle_pos {
            let laser = context
                .world
                .spawn(ObjectKind::Laser, pos, LASER_RADIUS, SPRITE_LASER);
            laser.velocity = LASER_VELOCITY;
            let laser_id = laser.id;
            context.world.push_sound(SoundCommand::PlayOnce(SOUND_SHOOT));
            context.events.emit(GameplayEvent::LaserFired { laser_id });
        }

        if context.round.invincibility_seconds_remaining > 0.0 {
            context.round.invincibility_seconds_remaining =
                (context.round.invincibility_seconds_remaining - INVINCIBILITY_TICK_SECONDS)
                    .max(0.0);
        }
    }

    fn run_death_tumble(&self, context: &mut RuleContext<'_>, avatar_id: ObjectId) {
        if let Some(avatar) = context.world.find_object_mut(avatar_id) {
            avatar.acceleration = DEAD_ACCELERATION;
            avatar.rotation += DEAD_SPIN_STEP;
        }

        if context.input.fire_pressed() && context.round.lives > 0 {
            if let Some(avatar) = context.world.find_object_mut(avatar_id) {
                reset_avatar_at_rig(avatar);
            }
            context.round.player_state = PlayerState::Appearing;
            // Clear the field so the relaunch is survivable.
            for tool_id in context.world.collect_ids_by_kind(ObjectKind::Tool) {
                if let Some(tool) = context.world.find_object_mut(tool_id) {
                    tool.kind = ObjectKind::Fading;
                }
            }
            context
                .world
                .push_sound(SoundCommand::StartLoop(SOUND_MUSIC));
        }
    }

    fn run_fan_rule(&self, context: &mut RuleContext<'_>) {
        let Some(fan_id) = context.world.first_id_of_kind(ObjectKind::Fan) else {
            return;
        };
        let playfield = context.world.playfield();
        let Some(fan_pos) = context.world.find_object(fan_id).map(|fan| fan.pos) else {
            return;
        };

        let throw_sides = context.tuning.tool_spawn_roll_sides;
        if context.rng.roll(throw_sides) == throw_sides {
            let vertical = context.rng.roll_range(-1, 1) as f32 * TOOL_VERTICAL_STEP;
            if context.round.bonus_round_active() {
                let coin =
                    context
                        .world
                        .spawn(ObjectKind::Coin, fan_pos, COIN_RADIUS, SPRITE_BONUS_COIN);
                coin.velocity = Vec2::new(BONUS_COIN_THROW_SPEED_X, vertical);
                coin.rot_speed = SPAWN_SPIN_SPEED;
                let coin_id = coin.id;
                context
                    .events
                    .emit(GameplayEvent::CoinDropped { coin_id, bonus: true });
            } else {
                let heavy = context.rng.roll(context.tuning.heavy_tool_roll_sides) == 1;
                let tool = context
                    .world
                    .spawn(ObjectKind::Tool, fan_pos, TOOL_RADIUS, SPRITE_DRIVER);
                tool.velocity = Vec2::new(TOOL_THROW_SPEED_X, vertical);
                if heavy {
                    tool.set_sprite(SPRITE_SPANNER, 0.0);
                    tool.radius = HEAVY_TOOL_RADIUS;
                    tool.velocity.x = HEAVY_TOOL_THROW_SPEED_X;
                    tool.rot_speed = SPAWN_SPIN_SPEED;
                }
                let tool_id = tool.id;
                debug!(tool_id = tool_id.0, heavy, "tool_thrown");
                context
                    .events
                    .emit(GameplayEvent::ToolThrown { tool_id, heavy });
            }
            context.world.push_sound(SoundCommand::PlayOnce(SOUND_TOOL));
        }

        if context.rng.roll(context.tuning.coin_drop_roll_sides) == 1 {
            let coin = context
                .world
                .spawn(ObjectKind::Coin, fan_pos, COIN_RADIUS, SPRITE_COIN);
            coin.velocity = COIN_DRIFT_VELOCITY;
            coin.rot_speed = SPAWN_SPIN_SPEED;
            let coin_id = coin.id;
            context
                .events
                .emit(GameplayEvent::CoinDropped { coin_id, bonus: false });
        }

        if let Some(fan) = context.world.find_object_mut(fan_id) {
            fan.step();
            if playfield.is_leaving(fan) {
                fan.pos = fan.old_pos;
                fan.velocity.y = -fan.velocity.y;
            }
        }
    }

    fn run_tools_rule(&self, context: &mut RuleContext<'_>) {
        let playfield = context.world.playfield();
        let avatar_id = context.world.first_id_of_kind(ObjectKind::Avatar);

        for tool_id in context.world.collect_ids_by_kind(ObjectKind::Tool) {
            let avatar_struck = context.round.player_state != PlayerState::Dead
                && !context.round.is_invincible()
                && avatar_overlaps(context.world, avatar_id, tool_id, playfield);
            if avatar_struck {
                self.process_avatar_hit(context, avatar_id);
            }

            let mut still_visible = true;
            if let Some(tool) = context.world.find_object_mut(tool_id) {
                tool.step();
                // Bounce off top and bottom; horizontal exit lets the tool
                // leave the world for good.
                if playfield.is_leaving_axis(tool, BoundsAxis::Vertical) {
                    tool.pos = tool.old_pos;
                    tool.velocity.y = -tool.velocity.y;
                }
                still_visible = playfield.is_visible(tool);
            }
            if !still_visible {
                context.world.despawn(tool_id);
            }
        }
    }

    fn process_avatar_hit(&self, context: &mut RuleContext<'_>, avatar_id: Option<ObjectId>) {
        let Some(avatar_id) = avatar_id else {
            return;
        };

        context.round.lives = context.round.lives.saturating_sub(1);
        if context.round.lives > 0 {
            context.round.invincibility_seconds_remaining = context.tuning.invincibility_seconds;
            context.round.player_state = PlayerState::Appearing;
            if let Some(avatar) = context.world.find_object_mut(avatar_id) {
                reset_avatar_at_rig(avatar);
            }
            context.world.push_sound(SoundCommand::PlayOnce(SOUND_HIT));
            context.events.emit(GameplayEvent::AvatarHit {
                lives_remaining: context.round.lives,
            });
            info!(lives = context.round.lives, "avatar_hit");
        } else {
            context.round.player_state = PlayerState::Dead;
            context.round.screen = Screen::GameOver;
            context
                .world
                .push_sound(SoundCommand::StopLoop(SOUND_MUSIC));
            context.world.push_sound(SoundCommand::PlayOnce(SOUND_DIE));
            context.events.emit(GameplayEvent::AvatarDied);
            info!(score = context.round.score, "game_over");
        }
    }

    fn run_coins_and_stars_rule(&self, context: &mut RuleContext<'_>) {
        let playfield = context.world.playfield();
        let avatar_id = context.world.first_id_of_kind(ObjectKind::Avatar);
        let avatar_pos = avatar_id
            .and_then(|id| context.world.find_object(id))
            .map(|avatar| avatar.pos);

        for coin_id in context.world.collect_ids_by_kind(ObjectKind::Coin) {
            let mut has_collided = false;
            if avatar_overlaps(context.world, avatar_id, coin_id, playfield) {
                if let Some(origin) = avatar_pos {
                    spawn_star_burst(context.world, origin);
                }
                // The coin is only marked here; it still gets its own
                // advance below before the end-of-iteration despawn.
                has_collided = true;
                context.round.score = context
                    .round
                    .score
                    .saturating_add(context.tuning.coin_reward);
                context
                    .world
                    .push_sound(SoundCommand::PlayOnce(SOUND_COLLECT));
                context.events.emit(GameplayEvent::CoinCollected { coin_id });
                check_score_thresholds(context.round, context.world, context.events, context.tuning);
            }

            let mut still_visible = true;
            if let Some(coin) = context.world.find_object_mut(coin_id) {
                coin.step();
                still_visible = playfield.is_visible(coin);
            }
            if !still_visible || has_collided {
                context.world.despawn(coin_id);
            }
        }

        // Stars launched this tick join the sweep immediately.
        context.world.apply_pending();

        for star_id in context.world.collect_ids_by_kind(ObjectKind::Star) {
            let mut still_visible = true;
            if let Some(star) = context.world.find_object_mut(star_id) {
                star.step();
                still_visible = playfield.is_visible(star);
            }
            if !still_visible {
                context.world.despawn(star_id);
            }
        }
    }

    fn run_lasers_rule(&self, context: &mut RuleContext<'_>) {
        let playfield = context.world.playfield();
        let laser_ids = context.world.collect_ids_by_kind(ObjectKind::Laser);
        let tool_ids = context.world.collect_ids_by_kind(ObjectKind::Tool);
        let coin_ids = context.world.collect_ids_by_kind(ObjectKind::Coin);

        for laser_id in laser_ids {
            let mut has_hit = false;

            for &tool_id in &tool_ids {
                if !laser_strikes(context.world, laser_id, tool_id, ObjectKind::Tool, playfield) {
                    continue;
                }
                if let Some(tool) = context.world.find_object_mut(tool_id) {
                    tool.kind = ObjectKind::Fading;
                }
                has_hit = true;
                context.round.score = context
                    .round
                    .score
                    .saturating_add(context.tuning.tool_zap_bonus);
                context.events.emit(GameplayEvent::ToolZapped { tool_id });
            }

            for &coin_id in &coin_ids {
                if !laser_strikes(context.world, laser_id, coin_id, ObjectKind::Coin, playfield) {
                    continue;
                }
                if let Some(coin) = context.world.find_object_mut(coin_id) {
                    coin.kind = ObjectKind::Fading;
                }
                has_hit = true;
                context.round.score = context
                    .round
                    .score
                    .saturating_sub(context.tuning.coin_zap_penalty);
                context.world.push_sound(SoundCommand::PlayOnce(SOUND_ERROR));
                context.events.emit(GameplayEvent::CoinZapped { coin_id });
            }

            let mut still_visible = true;
            if let Some(laser) = context.world.find_object_mut(laser_id) {
                laser.step();
                still_visible = playfield.is_visible(laser);
            }
            if !still_visible || has_hit {
                context.world.despawn(laser_id);
            }
        }
    }

    fn run_fading_rule(&self, context: &mut RuleContext<'_>) {
        let playfield = context.world.playfield();

        for fading_id in context.world.collect_ids_by_kind(ObjectKind::Fading) {
            let mut done = false;
            if let Some(obj) = context.world.find_object_mut(fading_id) {
                obj.anim_speed = FADING_ANIM_SPEED;
                obj.step();
                if obj.frame % 2 == 1 {
                    obj.fade_alpha = Some(
                        FADE_FRAME_LIMIT.saturating_sub(obj.frame) as f32 / FADE_FRAME_LIMIT as f32,
                    );
                } else {
                    obj.hidden = true;
                }
                done = !playfield.is_visible(obj) || obj.frame >= FADE_FRAME_LIMIT;
            }
            if done {
                context.world.despawn(fading_id);
            }
        }
    }
}

/// Threshold side effects fire exactly once per crossing: each award
/// escalates its threshold before the next comparison, so a score plateau
/// cannot retrigger and one large award can cross several levels.
fn check_score_thresholds(
    round: &mut RoundState,
    world: &mut ObjectWorld,
    events: &mut GameplayEventBus,
    tuning: &Tuning,
) {
    while round.score >= round.next_extra_life_score {
        round.lives = round.lives.saturating_add(1);
        let next = round
            .next_extra_life_score
            .saturating_add(tuning.extra_life_score_step.max(1));
        round.next_extra_life_score = next;
        round.banner = Some(Banner {
            text: BANNER_EXTRA_LIFE,
            seconds_remaining: tuning.banner_seconds,
        });
        world.push_sound(SoundCommand::PlayOnce(SOUND_EXTRA_LIFE));
        events.emit(GameplayEvent::ExtraLifeAwarded {
            next_threshold: next,
        });
        info!(
            score = round.score,
            lives = round.lives,
            next_threshold = next,
            "extra_life"
        );
    }

    while round.score >= round.next_bonus_round_score {
        let next = round
            .next_bonus_round_score
            .saturating_add(tuning.bonus_round_score_step.max(1));
        round.next_bonus_round_score = next;
        round.bonus_seconds_remaining = tuning.bonus_round_seconds;
        round.banner = Some(Banner {
            text: BANNER_BONUS_ROUND,
            seconds_remaining: tuning.banner_seconds,
        });
        world.push_sound(SoundCommand::PlayOnce(SOUND_BONUS));
        events.emit(GameplayEvent::BonusRoundStarted {
            next_threshold: next,
        });
        info!(
            score = round.score,
            next_threshold = next,
            "bonus_round"
        );
    }
}
