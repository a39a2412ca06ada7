pub mod audio;
pub mod game_trait;
pub mod geometry;
pub mod input;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{Game, GameEvent};
    use crate::input::InputSnapshot;

    /// Input holding right for the whole tick.
    pub fn hold_right() -> InputSnapshot {
        InputSnapshot {
            right: true,
            ..InputSnapshot::IDLE
        }
    }

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_game_ticks(
        game: &mut dyn Game,
        n: usize,
        input: &InputSnapshot,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every Game implementation must pass. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// update() must advance the tick counter by exactly one.
    pub fn contract_update_advances_ticks(game: &mut dyn Game) {
        let before = game.ticks();
        game.update(&InputSnapshot::IDLE);
        assert_eq!(
            game.ticks(),
            before + 1,
            "update() must advance the tick counter by one"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn Game) {
        game.pause();
        let before = game.ticks();
        let events = game.update(&hold_right());
        assert_eq!(before, game.ticks(), "ticks must not advance while paused");
        assert!(events.is_empty(), "no events while paused");

        game.resume();
        game.update(&hold_right());
        assert_eq!(before + 1, game.ticks(), "ticks must advance after resume");
    }

    /// reset() must clear the score, tick counter and completion flag.
    pub fn contract_reset_restarts_run(game: &mut dyn Game) {
        run_game_ticks(game, 5, &hold_right());
        game.reset();
        assert_eq!(game.ticks(), 0, "reset must zero the tick counter");
        assert_eq!(game.score(), 0, "reset must zero the score");
        assert!(!game.is_round_complete(), "reset must reopen the round");
    }

    /// Once complete, update() is a no-op until reset().
    pub fn contract_update_after_completion_is_noop(game: &mut dyn Game) {
        assert!(
            game.is_round_complete(),
            "precondition: round must already be complete"
        );
        let ticks = game.ticks();
        let score = game.score();
        let events = run_game_ticks(game, 3, &hold_right());
        assert!(events.is_empty(), "no events after round complete");
        assert_eq!(game.ticks(), ticks, "ticks frozen after round complete");
        assert_eq!(game.score(), score, "score frozen after round complete");
    }
}
