//! Game session core.
//!
//! This module defines the [`Session`], which owns one running game bound
//! to exactly one level at a time. Every long-lived resource — player,
//! level geometry, camera, and the level file path — lives in a
//! [`ledger::Ledger`], so teardown always runs in reverse acquisition
//! order and the level geometry can be hot-swapped in place while the
//! rest of the resource graph stays untouched.
//!
//! The session is a three-state machine (Running, Paused, Terminated;
//! Terminated is absorbing) and exposes the four per-frame entry points
//! the application loop drives in order: [`Session::input`],
//! [`Session::handle_event`], [`Session::update`], [`Session::render`].

pub mod camera;
pub mod keys;
pub mod ledger;
pub mod level;
pub mod player;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{self, GameError};
use crate::math::Vec2;
use crate::renderer::DrawTarget;

use self::camera::Camera;
use self::keys::{GameKey, InputSnapshot, PadButton, SessionEvent};
use self::ledger::{Ledger, Slot};
use self::level::Level;
use self::player::Player;

/// Fixed background clear color (RGBA).
const BACKGROUND_COLOR: [f32; 4] = [0.06, 0.06, 0.08, 1.0];
/// Analog stick values inside this band are treated as neutral.
const AXIS_DEAD_ZONE: f32 = 0.2;
/// Where the player spawns in a fresh session.
const PLAYER_SPAWN: (f32, f32) = (100.0, 0.0);

/// Runtime state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Simulation and input are live.
    Running,
    /// Simulation and continuous input are suppressed; only the pause
    /// toggle and window close are honored.
    Paused,
    /// The session is over. Absorbing: no event leaves this state.
    Terminated,
}

/// One running game session.
///
/// The ledger owns the resources; the session itself holds only typed
/// slots into it for convenient access.
#[derive(Debug)]
pub struct Session {
    ledger: Ledger,
    state: SessionState,
    player: Slot<Player>,
    level: Slot<Level>,
    camera: Slot<Camera>,
    level_path: Slot<PathBuf>,
}

impl Session {
    /// Creates a session for the level at `level_path`, starting in
    /// [`SessionState::Running`].
    ///
    /// Resources are registered in strict order: player, level geometry,
    /// camera, level path. If any step fails — a bad level file is the
    /// dominant case — everything registered so far is released in
    /// reverse order and the error is recorded and returned.
    pub fn new(level_path: impl AsRef<Path>) -> Result<Self, GameError> {
        let level_path = level_path.as_ref();
        let mut ledger = Ledger::new();

        match Self::populate(&mut ledger, level_path) {
            Ok((player, level, camera, level_path)) => Ok(Self {
                ledger,
                state: SessionState::Running,
                player,
                level,
                camera,
                level_path,
            }),
            Err(err) => {
                // The partially populated ledger unwinds on drop.
                error::record(&err);
                Err(err)
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn populate(
        ledger: &mut Ledger,
        path: &Path,
    ) -> Result<(Slot<Player>, Slot<Level>, Slot<Camera>, Slot<PathBuf>), GameError> {
        let player = ledger.register(Player::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1), |_player| {
            log::debug!("released player")
        })?;

        let level = ledger.register(Level::load(path)?, |_level| {
            log::debug!("released level geometry")
        })?;

        let camera = ledger.register(Camera::new(Vec2::zero()), |_camera| {
            log::debug!("released camera")
        })?;

        let level_path = ledger.register(path.to_path_buf(), |_path| {
            log::debug!("released level path")
        })?;

        Ok((player, level, camera, level_path))
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session has reached its absorbing final state.
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// The player, read-only.
    pub fn player(&self) -> &Player {
        self.ledger.get(self.player)
    }

    /// The camera, read-only.
    pub fn camera(&self) -> &Camera {
        self.ledger.get(self.camera)
    }

    /// The current level geometry, read-only.
    pub fn level(&self) -> &Level {
        self.ledger.get(self.level)
    }

    /// The path the current level geometry was loaded from.
    pub fn level_path(&self) -> &Path {
        self.ledger.get(self.level_path).as_path()
    }

    /// Applies the frame's continuous input snapshot.
    ///
    /// Only meaningful while Running; Paused and Terminated suppress it
    /// entirely so no movement commands are issued. When several sources
    /// are active at once the precedence is: keyboard left, keyboard
    /// right, axis left, axis right, stop — exactly one command per call.
    pub fn input(&mut self, snapshot: &InputSnapshot) {
        if self.state != SessionState::Running {
            return;
        }

        let player = self.ledger.get_mut(self.player);
        if snapshot.left {
            player.move_left();
        } else if snapshot.right {
            player.move_right();
        } else if snapshot.axis < -AXIS_DEAD_ZONE {
            player.move_left();
        } else if snapshot.axis > AXIS_DEAD_ZONE {
            player.move_right();
        } else {
            player.stop();
        }
    }

    /// Handles one discrete input event.
    ///
    /// Returns an error only when a level reload fails, after the session
    /// has already transitioned to Terminated and recorded the error.
    pub fn handle_event(&mut self, event: &SessionEvent) -> Result<(), GameError> {
        match self.state {
            SessionState::Running => self.event_running(event),
            SessionState::Paused => {
                self.event_paused(event);
                Ok(())
            }
            SessionState::Terminated => Ok(()),
        }
    }

    fn event_running(&mut self, event: &SessionEvent) -> Result<(), GameError> {
        match event {
            SessionEvent::WindowClose => self.state = SessionState::Terminated,

            SessionEvent::KeyDown(GameKey::Jump)
            | SessionEvent::ControllerButtonDown(PadButton::Primary) => {
                self.ledger.get_mut(self.player).jump()
            }

            SessionEvent::KeyDown(GameKey::Reload) => return self.reload_level(),

            SessionEvent::KeyDown(GameKey::Pause) => self.state = SessionState::Paused,

            _ => {}
        }

        Ok(())
    }

    fn event_paused(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::WindowClose => self.state = SessionState::Terminated,
            SessionEvent::KeyDown(GameKey::Pause) => self.state = SessionState::Running,
            _ => {}
        }
    }

    /// Reloads the level geometry from the stored path, in place.
    ///
    /// On success the old geometry is released exactly once and the new
    /// geometry takes its slot; the player and camera are untouched. On
    /// failure the session cannot safely keep simulating against unknown
    /// geometry, so it transitions to Terminated and returns the error
    /// after recording it.
    fn reload_level(&mut self) -> Result<(), GameError> {
        let path = self.ledger.get(self.level_path).clone();
        log::info!("reloading the level from '{}'", path.display());

        match self.ledger.replace(self.level, || Level::load(&path)) {
            Ok(()) => Ok(()),
            Err(err) => {
                error::record(&err);
                error::report_last("could not reload the level");
                self.state = SessionState::Terminated;
                Err(err)
            }
        }
    }

    /// Advances the simulation by `delta` and re-centers the camera on
    /// the player. No-op unless Running.
    ///
    /// Callers must supply positive, monotonic frame deltas.
    pub fn update(&mut self, delta: Duration) {
        debug_assert!(!delta.is_zero(), "frame delta must be positive");

        if self.state != SessionState::Running {
            return;
        }

        let (player, level, camera) = self.ledger.get3_mut(self.player, self.level, self.camera);
        player.update(level, delta);
        player.focus_camera(camera);
    }

    /// Renders one frame into `target`.
    ///
    /// No-op success once Terminated. Otherwise clears to the background
    /// color, draws the player and the level geometry through the camera
    /// transform, and presents. A backend failure aborts the frame and
    /// propagates after being recorded; the session state is unchanged.
    pub fn render(&self, target: &mut dyn DrawTarget) -> Result<(), GameError> {
        if self.state == SessionState::Terminated {
            return Ok(());
        }

        match self.draw(target) {
            Ok(()) => Ok(()),
            Err(err) => {
                error::record(&err);
                Err(err)
            }
        }
    }

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), GameError> {
        target.clear(BACKGROUND_COLOR)?;

        let camera = self.ledger.get(self.camera);
        self.ledger.get(self.player).render(target, camera)?;
        self.ledger.get(self.level).render(target, camera)?;

        target.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::Rect;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FRAME: Duration = Duration::from_millis(16);

    fn level_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write level");
        file.flush().expect("flush level");
        file
    }

    fn session_with_floor() -> (Session, NamedTempFile) {
        let file = level_file("-1000 300 2000 40\n");
        let session = Session::new(file.path()).expect("session should construct");
        (session, file)
    }

    /// In-memory draw target that records every call, used instead of the
    /// WGPU backend.
    #[derive(Default)]
    struct RecordingTarget {
        cleared: usize,
        rects: Vec<(Rect, [f32; 4])>,
        presented: usize,
    }

    impl DrawTarget for RecordingTarget {
        fn size(&self) -> (f32, f32) {
            (800.0, 600.0)
        }

        fn clear(&mut self, _color: [f32; 4]) -> Result<(), GameError> {
            self.cleared += 1;
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect, color: [f32; 4]) -> Result<(), GameError> {
            self.rects.push((rect, color));
            Ok(())
        }

        fn present(&mut self) -> Result<(), GameError> {
            self.presented += 1;
            Ok(())
        }
    }

    /// Draw target whose present always fails, to exercise the render
    /// error path.
    struct FailingTarget;

    impl DrawTarget for FailingTarget {
        fn size(&self) -> (f32, f32) {
            (800.0, 600.0)
        }

        fn clear(&mut self, _color: [f32; 4]) -> Result<(), GameError> {
            Ok(())
        }

        fn fill_rect(&mut self, _rect: Rect, _color: [f32; 4]) -> Result<(), GameError> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), GameError> {
            Err(GameError::Render("surface lost".into()))
        }
    }

    #[test]
    fn construction_fails_cleanly_on_a_bad_level() {
        let err = Session::new("no/such/level.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn fresh_session_is_running_with_stored_path() {
        let (session, file) = session_with_floor();
        assert_eq!(session.state(), SessionState::Running);
        assert!(!session.is_terminated());
        assert_eq!(session.level_path(), file.path());
        assert_eq!(session.level().platforms().len(), 1);
    }

    #[test]
    fn keyboard_left_beats_every_other_source() {
        let (mut session, _file) = session_with_floor();

        session.input(&InputSnapshot {
            left: true,
            right: true,
            axis: 1.0,
        });
        assert!(session.player().velocity().x() < 0.0);

        session.input(&InputSnapshot {
            left: false,
            right: true,
            axis: -1.0,
        });
        assert!(session.player().velocity().x() > 0.0);

        session.input(&InputSnapshot {
            left: false,
            right: false,
            axis: -1.0,
        });
        assert!(session.player().velocity().x() < 0.0);

        session.input(&InputSnapshot::default());
        assert_eq!(session.player().velocity().x(), 0.0);
    }

    #[test]
    fn axis_dead_zone_maps_to_stop() {
        let (mut session, _file) = session_with_floor();
        session.input(&InputSnapshot {
            left: false,
            right: false,
            axis: 0.1,
        });
        assert_eq!(session.player().velocity().x(), 0.0);
    }

    #[test]
    fn pause_suppresses_simulation_and_input() {
        let (mut session, _file) = session_with_floor();
        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Pause))
            .unwrap();
        assert_eq!(session.state(), SessionState::Paused);

        let position = session.player().position();
        let camera = session.camera().position();

        session.input(&InputSnapshot {
            left: true,
            ..Default::default()
        });
        session.update(Duration::from_secs(10));

        assert_eq!(session.player().position(), position);
        assert_eq!(session.camera().position(), camera);
    }

    #[test]
    fn update_advances_player_and_recenters_camera() {
        let (mut session, _file) = session_with_floor();

        for _ in 0..240 {
            session.update(FRAME);
        }

        assert!(session.player().is_grounded());
        assert_eq!(
            session.camera().position(),
            session.player().hitbox().center()
        );
    }

    #[test]
    fn reload_success_keeps_the_session_running() {
        let (mut session, file) = session_with_floor();
        std::fs::write(file.path(), "-1000 300 2000 40\n0 200 100 20\n")
            .expect("rewrite level");

        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Reload))
            .unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.level().platforms().len(), 2);
        assert_eq!(session.level_path(), file.path());
    }

    #[test]
    fn reload_failure_terminates_the_session() {
        let (mut session, file) = session_with_floor();
        std::fs::write(file.path(), "not a platform\n").expect("corrupt level");

        let err = session
            .handle_event(&SessionEvent::KeyDown(GameKey::Reload))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(session.is_terminated());
    }

    #[test]
    fn terminated_state_absorbs_everything() {
        let (mut session, _file) = session_with_floor();
        session.handle_event(&SessionEvent::WindowClose).unwrap();
        assert!(session.is_terminated());

        let position = session.player().position();
        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Jump))
            .unwrap();
        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Pause))
            .unwrap();
        session.input(&InputSnapshot {
            left: true,
            ..Default::default()
        });
        session.update(FRAME);
        assert!(session.is_terminated());
        assert_eq!(session.player().position(), position);

        // Render is a no-op success: no clear, no draws, no present.
        let mut target = RecordingTarget::default();
        session.render(&mut target).unwrap();
        assert_eq!(target.cleared, 0);
        assert!(target.rects.is_empty());
        assert_eq!(target.presented, 0);
    }

    #[test]
    fn render_draws_player_and_platforms_once_each() {
        let (session, _file) = session_with_floor();
        let mut target = RecordingTarget::default();

        session.render(&mut target).unwrap();

        assert_eq!(target.cleared, 1);
        assert_eq!(target.rects.len(), 2); // player + one platform
        assert_eq!(target.presented, 1);
    }

    #[test]
    fn render_failure_leaves_state_unchanged() {
        let (session, _file) = session_with_floor();

        let err = session.render(&mut FailingTarget).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn pause_toggles_and_close_terminates() {
        let (mut session, _file) = session_with_floor();

        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Pause))
            .unwrap();
        assert_eq!(session.state(), SessionState::Paused);

        // Everything but pause and close is ignored while paused.
        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Jump))
            .unwrap();
        session
            .handle_event(&SessionEvent::ControllerButtonDown(PadButton::Primary))
            .unwrap();
        assert_eq!(session.state(), SessionState::Paused);

        session
            .handle_event(&SessionEvent::KeyDown(GameKey::Pause))
            .unwrap();
        assert_eq!(session.state(), SessionState::Running);

        session.handle_event(&SessionEvent::WindowClose).unwrap();
        assert!(session.is_terminated());

        let mut target = RecordingTarget::default();
        session.render(&mut target).unwrap();
        assert_eq!(target.presented, 0);
    }
}
