fn polar_velocity(speed: f32, angle_radians: f32) -> Vec2 {
    Vec2::new(speed * angle_radians.cos(), speed * angle_radians.sin())
}

fn spawn_star_burst(world: &mut ObjectWorld, origin: Vec2) {
    for angle in STAR_BURST_ANGLES {
        let star = world.spawn(ObjectKind::Star, origin, 0.0, SPRITE_STAR);
        star.velocity = polar_velocity(STAR_LAUNCH_SPEED, angle);
        star.acceleration = STAR_ACCELERATION;
        star.rot_speed = SPAWN_SPIN_SPEED;
    }
}

fn reset_avatar_at_rig(avatar: &mut GameObject) {
    avatar.pos = AVATAR_SPAWN_POS;
    avatar.old_pos = AVATAR_SPAWN_POS;
    avatar.velocity = Vec2::ZERO;
    avatar.acceleration = Vec2::ZERO;
    avatar.rotation = 0.0;
    avatar.frame = 0;
    avatar.anim_cursor = 0.0;
    avatar.set_sprite(SPRITE_RIGGER_FALL, FALL_ANIM_SPEED);
}

fn avatar_overlaps(
    world: &ObjectWorld,
    avatar_id: Option<ObjectId>,
    other_id: ObjectId,
    playfield: Playfield,
) -> bool {
    let Some(avatar_id) = avatar_id else {
        return false;
    };
    match (world.find_object(avatar_id), world.find_object(other_id)) {
        (Some(avatar), Some(other)) => playfield.overlaps(other, avatar),
        _ => false,
    }
}

fn laser_strikes(
    world: &ObjectWorld,
    laser_id: ObjectId,
    target_id: ObjectId,
    expected_kind: ObjectKind,
    playfield: Playfield,
) -> bool {
    match (world.find_object(laser_id), world.find_object(target_id)) {
        // The kind check keeps a target another laser already retyped this
        // tick from being counted twice.
        (Some(laser), Some(target)) => {
            target.kind == expected_kind && playfield.overlaps(laser, target)
        }
        _ => false,
    }
}
