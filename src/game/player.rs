//! Player state, movement physics, and drawing.
//!
//! The player is an axis-aligned box with position and velocity. Horizontal
//! movement is command-driven (`move_left` / `move_right` / `stop`, issued
//! once per frame from the input snapshot); vertical movement is gravity
//! plus a jump impulse that is only available while standing on a platform.
//! Positive Y points down, so gravity is positive and a jump impulse is
//! negative.

use std::time::Duration;

use crate::error::GameError;
use crate::game::camera::Camera;
use crate::game::level::Level;
use crate::math::{Rect, Vec2};
use crate::renderer::DrawTarget;

/// Downward acceleration in world units per second squared.
const GRAVITY: f32 = 2500.0;
/// Horizontal run speed in world units per second.
const RUN_SPEED: f32 = 420.0;
/// Upward jump impulse in world units per second.
const JUMP_SPEED: f32 = 1000.0;
/// Player hitbox size.
const PLAYER_SIZE: (f32, f32) = (50.0, 50.0);
/// Fill color for the player box (RGBA).
const PLAYER_COLOR: [f32; 4] = [0.96, 0.35, 0.30, 1.0];

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    grounded: bool,
}

impl Player {
    /// Creates a player with its top-left corner at `(x, y)`, at rest and
    /// airborne (gravity pulls it onto the ground on the first updates).
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::zero(),
            grounded: false,
        }
    }

    /// Top-left corner of the hitbox in world space.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity in world units per second.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// The player's world-space hitbox.
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.position.x(),
            self.position.y(),
            PLAYER_SIZE.0,
            PLAYER_SIZE.1,
        )
    }

    /// Whether the player is standing on a platform.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Runs left at full speed until the next movement command.
    pub fn move_left(&mut self) {
        self.velocity.set_x(-RUN_SPEED);
    }

    /// Runs right at full speed until the next movement command.
    pub fn move_right(&mut self) {
        self.velocity.set_x(RUN_SPEED);
    }

    /// Stops horizontal movement.
    pub fn stop(&mut self) {
        self.velocity.set_x(0.0);
    }

    /// Applies the jump impulse, but only while standing on a platform.
    pub fn jump(&mut self) {
        if self.grounded {
            self.velocity.set_y(-JUMP_SPEED);
            self.grounded = false;
        }
    }

    /// Advances the simulation by `delta` against the level geometry.
    ///
    /// Integrates gravity and velocity, then resolves collisions against
    /// platform tops: falling onto a platform snaps the player to its top
    /// edge, zeroes vertical velocity, and grounds the player.
    pub fn update(&mut self, level: &Level, delta: Duration) {
        let dt = delta.as_secs_f32();

        self.velocity.set_y(self.velocity.y() + GRAVITY * dt);
        self.position = self.position + self.velocity * dt;

        self.grounded = false;
        for platform in level.platforms() {
            let hitbox = self.hitbox();
            if !hitbox.overlaps(platform) {
                continue;
            }

            // Only resolve against the top face, and only while moving
            // down; sideways or upward contact passes through, like the
            // one-way platforms of the original game.
            let penetration = hitbox.bottom() - platform.top();
            let step = (self.velocity.y() * dt).max(1.0);
            if self.velocity.y() >= 0.0 && penetration > 0.0 && penetration <= step + 1.0 {
                self.position.set_y(platform.top() - PLAYER_SIZE.1);
                self.velocity.set_y(0.0);
                self.grounded = true;
            }
        }
    }

    /// Re-centers `camera` on the player.
    pub fn focus_camera(&self, camera: &mut Camera) {
        camera.center_on(self.hitbox().center());
    }

    /// Draws the player box through the camera transform.
    pub fn render(&self, target: &mut dyn DrawTarget, camera: &Camera) -> Result<(), GameError> {
        let viewport = target.size();
        target.fill_rect(camera.to_screen(self.hitbox(), viewport), PLAYER_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FRAME: Duration = Duration::from_millis(16);

    fn level_with_floor() -> Level {
        let mut file = NamedTempFile::new().expect("temp file");
        // Wide floor at y = 300.
        writeln!(file, "-1000 300 2000 40").expect("write level");
        Level::load(file.path()).expect("load level")
    }

    fn settle(player: &mut Player, level: &Level) {
        for _ in 0..240 {
            player.update(level, FRAME);
        }
    }

    #[test]
    fn gravity_lands_the_player_on_a_platform() {
        let level = level_with_floor();
        let mut player = Player::new(0.0, 0.0);

        settle(&mut player, &level);

        assert!(player.is_grounded());
        assert_eq!(player.hitbox().bottom(), 300.0);
        assert_eq!(player.velocity().y(), 0.0);
    }

    #[test]
    fn jump_only_works_while_grounded() {
        let level = level_with_floor();
        let mut player = Player::new(0.0, 0.0);

        // Airborne jump is ignored.
        let falling = player.velocity().y();
        player.jump();
        assert_eq!(player.velocity().y(), falling);

        settle(&mut player, &level);
        player.jump();
        assert!(player.velocity().y() < 0.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn movement_commands_set_horizontal_velocity() {
        let mut player = Player::new(0.0, 0.0);

        player.move_left();
        assert!(player.velocity().x() < 0.0);

        player.move_right();
        assert!(player.velocity().x() > 0.0);

        player.stop();
        assert_eq!(player.velocity().x(), 0.0);
    }

    #[test]
    fn grounded_player_runs_along_the_platform() {
        let level = level_with_floor();
        let mut player = Player::new(0.0, 0.0);
        settle(&mut player, &level);

        let start_x = player.position().x();
        player.move_right();
        for _ in 0..30 {
            player.update(&level, FRAME);
        }

        assert!(player.position().x() > start_x);
        assert!(player.is_grounded());
        assert_eq!(player.hitbox().bottom(), 300.0);
    }
}
