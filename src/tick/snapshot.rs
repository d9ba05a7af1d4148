use std::fmt::Write;

use crate::state::world::World;

/// Render the world into the wire snapshot text.
///
/// Four groups separated by `|`: players, terrain segments, projectiles,
/// powerups. Entries within a group are separated by `;` and fields within
/// an entry by a single space. Dead players are included (clients grey them
/// out); dead projectiles never reach this point because the simulation
/// sweeps them before broadcast.
pub fn render_snapshot(world: &World) -> String {
    let mut out = String::with_capacity(1024);

    let mut players = Vec::with_capacity(world.players.len());
    for p in &world.players {
        players.push(format!(
            "{} {} {} {} {} {} {} {} {} {} {} {} {} {}",
            p.name,
            p.position.x,
            p.position.y,
            p.facing_angle,
            p.armor.max_health,
            p.armor.health,
            p.weapon.clip,
            p.weapon.spare_ammo,
            p.alive,
            p.is_moving(),
            p.firing,
            p.weapon.reloading,
            p.kill_count,
            p.death_count,
        ));
    }
    out.push_str(&players.join(";"));
    out.push('|');

    let mut first = true;
    for (a, b) in world.arena.segments() {
        if !first {
            out.push(';');
        }
        first = false;
        let _ = write!(out, "{} {} {} {}", a.x, a.y, b.x, b.y);
    }
    out.push('|');

    first = true;
    for proj in &world.projectiles {
        if !first {
            out.push(';');
        }
        first = false;
        let _ = write!(
            out,
            "{} {} {} {}",
            proj.owner_id, proj.position.x, proj.position.y, proj.radius
        );
    }
    out.push('|');

    first = true;
    for powerup in &world.arena.powerups {
        if !first {
            out.push(';');
        }
        first = false;
        let _ = write!(
            out,
            "{} {} {} {}",
            powerup.kind.as_str(),
            powerup.position.x,
            powerup.position.y,
            powerup.alive
        );
    }

    out
}
