use bevy::prelude::*;
use std::time::Duration;

/// Delay between reaching the goal and the next maze appearing.
pub const DEFAULT_REGENERATE_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Playing,
    GoalReached,
}

/// Identifies one scheduled regeneration. A cancelled token never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegenerationToken(u64);

#[derive(Debug, Clone)]
struct PendingRegeneration {
    token: RegenerationToken,
    timer: Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    Scored { score: u32 },
    Ignored,
}

/// Timer, score and player gating for one play session.
///
/// Time is read from a monotonic clock passed in as `now`; the deferred
/// regeneration advances with `tick`.
#[derive(Resource, Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    score: u32,
    goal_reached: bool,
    player_enabled: bool,
    started_at: Duration,
    time_offset: i64,
    regenerate_delay: Duration,
    pending: Option<PendingRegeneration>,
    next_token: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_REGENERATE_DELAY)
    }
}

impl Session {
    pub fn new(regenerate_delay: Duration) -> Self {
        Self {
            phase: SessionPhase::Playing,
            score: 0,
            goal_reached: false,
            player_enabled: false,
            started_at: Duration::ZERO,
            time_offset: 0,
            regenerate_delay,
            pending: None,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    pub fn player_enabled(&self) -> bool {
        self.player_enabled
    }

    pub fn time_offset(&self) -> i64 {
        self.time_offset
    }

    pub fn has_pending_regeneration(&self) -> bool {
        self.pending.is_some()
    }

    /// Reset score and timer. Any pending regeneration is cancelled and returned.
    ///
    /// The caller builds the first maze and then calls [`Session::maze_ready`].
    pub fn start_new_game(&mut self, now: Duration) -> Option<RegenerationToken> {
        let cancelled = self.cancel_pending();
        self.time_offset = 0;
        self.started_at = now;
        self.score = 0;
        self.goal_reached = false;
        self.player_enabled = false;
        self.phase = SessionPhase::Playing;
        cancelled
    }

    /// A new maze is installed and the player has been moved to its start.
    pub fn maze_ready(&mut self) {
        self.goal_reached = false;
        self.player_enabled = true;
        self.phase = SessionPhase::Playing;
    }

    /// The player entered the goal marker. Scores once per maze.
    pub fn on_goal_entered(&mut self) -> GoalOutcome {
        if self.goal_reached || !self.player_enabled {
            return GoalOutcome::Ignored;
        }
        self.goal_reached = true;
        self.score += 1;
        self.player_enabled = false;
        self.phase = SessionPhase::GoalReached;
        self.schedule_regeneration();
        GoalOutcome::Scored { score: self.score }
    }

    /// The player entered the start marker. Only closes the loop after the goal was reached.
    pub fn on_start_entered(&mut self) -> bool {
        if !self.goal_reached {
            return false;
        }
        self.player_enabled = false;
        self.schedule_regeneration();
        true
    }

    /// Advance the deferred regeneration; returns its token once it is due.
    pub fn tick(&mut self, delta: Duration) -> Option<RegenerationToken> {
        let pending = self.pending.as_mut()?;
        pending.timer.tick(delta);
        if pending.timer.finished() {
            self.pending.take().map(|pending| pending.token)
        } else {
            None
        }
    }

    pub fn cancel_pending(&mut self) -> Option<RegenerationToken> {
        let cancelled = self.pending.take().map(|pending| pending.token);
        if let Some(token) = cancelled {
            debug!("Cancelled pending regeneration {token:?}");
        }
        cancelled
    }

    /// Replaces any pending regeneration so at most one is ever queued.
    fn schedule_regeneration(&mut self) -> RegenerationToken {
        self.cancel_pending();
        let token = RegenerationToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingRegeneration {
            token,
            timer: Timer::new(self.regenerate_delay, TimerMode::Once),
        });
        debug!(
            "Scheduled regeneration {token:?} in {:.1}s",
            self.regenerate_delay.as_secs_f32()
        );
        token
    }

    /// Stored offset plus whole seconds since the session started.
    pub fn elapsed_seconds(&self, now: Duration) -> i64 {
        self.time_offset + now.saturating_sub(self.started_at).as_secs() as i64
    }

    pub fn time_label(&self, now: Duration) -> String {
        self.elapsed_seconds(now).to_string()
    }

    pub fn score_label(&self) -> String {
        self.score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::testing::RecordingHost;
    use crate::maze::{ConstructionSettings, MarkerKind, MazeConstructor};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    fn playing_session() -> Session {
        let mut session = Session::default();
        session.start_new_game(Duration::ZERO);
        session.maze_ready();
        session
    }

    #[test]
    fn test_new_game_resets_state() {
        let mut session = playing_session();
        session.on_goal_entered();

        session.start_new_game(secs(30.0));
        assert_eq!(session.score(), 0);
        assert_eq!(session.score_label(), "0");
        assert_eq!(session.time_offset(), 0);
        assert!(!session.player_enabled());

        session.maze_ready();
        assert!(session.player_enabled());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.time_label(secs(35.5)), "5");
    }

    #[test]
    fn test_goal_scores_exactly_once() {
        let mut session = playing_session();

        assert_eq!(session.on_goal_entered(), GoalOutcome::Scored { score: 1 });
        assert_eq!(session.on_goal_entered(), GoalOutcome::Ignored);
        assert_eq!(session.score(), 1);
        assert!(session.goal_reached());
        assert!(!session.player_enabled());
        assert_eq!(session.phase(), SessionPhase::GoalReached);
        assert!(session.has_pending_regeneration());
    }

    #[test]
    fn test_goal_ignored_while_player_disabled() {
        let mut session = Session::default();
        session.start_new_game(Duration::ZERO);
        assert_eq!(session.on_goal_entered(), GoalOutcome::Ignored);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_regeneration_fires_after_delay() {
        let mut session = playing_session();
        session.on_goal_entered();

        assert_eq!(session.tick(secs(3.9)), None);
        assert!(session.tick(secs(0.2)).is_some());
        assert!(!session.has_pending_regeneration());
        assert_eq!(session.tick(secs(10.0)), None);
    }

    #[test]
    fn test_start_trigger_is_inert_before_goal() {
        let mut session = playing_session();

        assert!(!session.on_start_entered());
        assert!(session.player_enabled());
        assert!(!session.has_pending_regeneration());
    }

    #[test]
    fn test_start_trigger_after_goal_keeps_single_pending() {
        let mut session = playing_session();
        session.on_goal_entered();
        session.tick(secs(2.0));

        assert!(session.on_start_entered());
        assert_eq!(session.tick(secs(3.0)), None);
        assert!(session.tick(secs(1.5)).is_some());
        assert_eq!(session.tick(secs(10.0)), None);
    }

    #[test]
    fn test_new_game_cancels_pending_regeneration() {
        let mut session = playing_session();
        session.on_goal_entered();

        let cancelled = session.start_new_game(secs(1.0));
        assert!(cancelled.is_some());
        assert!(!session.has_pending_regeneration());
        assert_eq!(session.tick(secs(10.0)), None);
    }

    #[test]
    fn test_timer_carries_over_regenerations() {
        let mut session = playing_session();
        assert_eq!(session.time_label(secs(65.7)), "65");

        session.on_goal_entered();
        session.tick(secs(4.0));
        session.maze_ready();
        assert_eq!(session.elapsed_seconds(secs(80.2)), 80);
    }

    #[test]
    fn test_goal_to_regeneration_scenario() {
        let mut host = RecordingHost::default();
        let mut rng = Pcg64::seed_from_u64(21);
        let mut constructor: MazeConstructor<u32> =
            MazeConstructor::new(ConstructionSettings::default());
        let mut session = Session::default();

        session.start_new_game(Duration::ZERO);
        constructor
            .generate(&mut host, 10, 10, &mut rng, Some("start"), "goal")
            .unwrap();
        session.maze_ready();
        assert_eq!(session.score(), 0);

        // Goal trigger fires: score, disable the player, destroy the marker.
        assert_eq!(session.on_goal_entered(), GoalOutcome::Scored { score: 1 });
        assert!(constructor.destroy_marker(&mut host, MarkerKind::Goal));
        assert!(!session.player_enabled());
        assert_eq!(host.live_markers().len(), 0);

        assert_eq!(session.tick(DEFAULT_REGENERATE_DELAY / 2), None);
        assert!(session.tick(DEFAULT_REGENERATE_DELAY).is_some());

        constructor
            .generate(&mut host, 12, 14, &mut rng, Some("start"), "goal")
            .unwrap();
        let spawn = constructor.start_position(1.0);
        session.maze_ready();

        assert!(session.player_enabled());
        assert_eq!(session.score(), 1);
        assert_eq!(session.score_label(), "1");
        assert_eq!(host.live_count(), 2);
        assert!(constructor.layout().is_open(constructor.start()));
        assert_eq!(
            spawn,
            constructor
                .start()
                .world_position(ConstructionSettings::default().cell_pitch, 1.0)
        );
    }
}
