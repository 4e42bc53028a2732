//! Round engine — spin, evaluate, settle, game over

use sm_core::{GameConfig, REEL_COUNT, SmError, SmResult};
use sm_stage::{Cue, CueEvent, FeedbackSink};
use sm_state::ScoreStore;

use crate::rng::RandomSource;
use crate::session::{RoundPhase, RoundReport, Session, SessionStats, SessionView, Settlement};
use crate::symbols::{ReelOutcome, Symbol};

/// Round engine
///
/// Owns the session and is its only mutator. One intent runs to completion
/// before the next is accepted, so a round is never interleaved with
/// another round's evaluation.
pub struct RoundEngine {
    /// Economy settings
    config: GameConfig,
    /// Live session state
    session: Session,
    /// Statistics since start or last reset
    stats: SessionStats,
    /// Position in the round protocol
    phase: RoundPhase,
    /// High-score persistence
    store: Box<dyn ScoreStore>,
    /// Reel stop source
    rng: Box<dyn RandomSource>,
    /// Sound/haptic cues
    feedback: Box<dyn FeedbackSink>,
}

impl RoundEngine {
    /// Create an engine, loading the high score from `store`
    ///
    /// An absent or unreadable high score starts the session at 0.
    pub fn new(
        config: GameConfig,
        store: Box<dyn ScoreStore>,
        rng: Box<dyn RandomSource>,
        feedback: Box<dyn FeedbackSink>,
    ) -> SmResult<Self> {
        config.validate()?;

        let high_score = match store.read(&config.high_score_key) {
            Ok(Some(score)) => score.max(0),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("High score unavailable, starting from 0: {}", e);
                0
            }
        };
        log::info!(
            "Slot machine ready: {} coins, high score {}",
            config.starting_coins,
            high_score
        );

        Ok(Self {
            session: Session::new(&config, high_score),
            stats: SessionStats::starting_at(config.starting_coins),
            phase: RoundPhase::Idle,
            config,
            store,
            rng,
            feedback,
        })
    }

    /// Resume with a carried coin balance instead of the starting stack
    pub fn with_coins(mut self, coins: i64) -> Self {
        self.session.coins = coins;
        self.stats = SessionStats::starting_at(coins);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.session.game_over
    }

    /// Snapshot for the presentation surface
    pub fn view(&self) -> SessionView {
        let symbols = *self.session.reels.symbols();
        SessionView {
            coins: self.session.coins,
            high_score: self.session.high_score,
            bet: self.session.bet,
            allowed_bets: self.config.allowed_bets.clone(),
            reels: self.session.reels.indices(),
            symbols: symbols.map(|s| s.name().to_string()),
            game_over: self.session.game_over,
            phase: self.phase,
            round: self.session.round,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTENTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin intent: spin, evaluate and check for game over in one step
    pub fn play_round(&mut self) -> SmResult<RoundReport> {
        if self.session.game_over {
            return Err(SmError::GameOver);
        }
        self.expect_phase(RoundPhase::Idle)?;

        let reels = self.spin();
        let settlement = self.evaluate()?;
        let game_over = self.check_game_over()?;

        Ok(RoundReport {
            round: self.session.round,
            reels,
            settlement,
            coins: self.session.coins,
            high_score: self.session.high_score,
            game_over,
        })
    }

    /// Choose the stake for following spins
    pub fn set_bet(&mut self, amount: i64) -> SmResult<()> {
        if !self.config.is_allowed_bet(amount) {
            log::debug!(
                "Rejected bet {} (allowed: {:?})",
                amount,
                self.config.allowed_bets
            );
            return Err(SmError::InvalidBet(amount));
        }

        self.session.bet = amount;
        log::debug!("Bet set to {}", amount);
        self.emit(Cue::BetChanged);
        Ok(())
    }

    /// Start over with the starting stack
    ///
    /// `clear_high_score` is the "restart from scratch" intent; "play again"
    /// after a game over keeps the high score.
    pub fn reset_game(&mut self, clear_high_score: bool) {
        self.session.coins = self.config.starting_coins;
        self.session.bet = self.config.default_bet;
        self.session.game_over = false;
        self.session.round = 0;
        self.stats = SessionStats::starting_at(self.config.starting_coins);
        self.phase = RoundPhase::Idle;

        if clear_high_score {
            self.session.high_score = 0;
            self.persist_high_score();
        }

        log::info!(
            "Game reset ({})",
            if clear_high_score {
                "high score cleared"
            } else {
                "high score kept"
            }
        );
        self.emit(Cue::Reset);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUND STEPS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw a fresh symbol for every reel
    ///
    /// A settled round that was never checked is checked first, so a
    /// depleted balance is flagged before the next round starts.
    pub fn spin(&mut self) -> ReelOutcome {
        if self.phase == RoundPhase::Settled {
            log::debug!("Round {} spun before its game-over check", self.session.round);
            self.flag_game_over();
        }

        let mut symbols = [Symbol::Bell; REEL_COUNT];
        for symbol in symbols.iter_mut() {
            *symbol = Symbol::from_index(self.rng.next_index(Symbol::COUNT));
        }
        let reels = ReelOutcome::new(symbols);

        self.session.reels = reels;
        self.session.round += 1;
        self.stats.spins += 1;
        self.phase = if self.session.game_over {
            RoundPhase::GameOver
        } else {
            RoundPhase::Spun
        };

        log::debug!("Round {} spun {:?}", self.session.round, reels.indices());
        self.emit(Cue::Spin);
        reels
    }

    /// Settle the reels from the preceding `spin`
    ///
    /// A loss subtracts the stake with no floor; the game-over check runs
    /// afterwards. Nothing settles once the game is over.
    pub fn evaluate(&mut self) -> SmResult<Settlement> {
        if self.session.game_over {
            return Err(SmError::GameOver);
        }
        self.expect_phase(RoundPhase::Spun)?;

        let bet = self.session.bet;
        let settlement = if self.session.reels.is_three_of_a_kind() {
            let payout = bet.saturating_mul(self.config.payout_multiplier);
            self.session.coins = self.session.coins.saturating_add(payout);

            let new_high_score = self.session.coins > self.session.high_score;
            if new_high_score {
                self.session.high_score = self.session.coins;
                self.persist_high_score();
                log::info!("New high score: {}", self.session.high_score);
                self.emit(Cue::HighScore);
            } else {
                self.emit(Cue::Win);
            }

            Settlement::Win {
                payout,
                new_high_score,
            }
        } else {
            self.session.coins = self.session.coins.saturating_sub(bet);
            Settlement::Loss { stake: bet }
        };

        self.stats.record(&settlement, self.session.coins);
        self.phase = RoundPhase::Settled;
        log::debug!(
            "Round {} settled {:+} -> {} coins",
            self.session.round,
            settlement.delta(),
            self.session.coins
        );
        Ok(settlement)
    }

    /// Flag game over once the balance is gone
    ///
    /// Never clears the flag; only `reset_game` does.
    pub fn check_game_over(&mut self) -> SmResult<bool> {
        self.expect_phase(RoundPhase::Settled)?;
        Ok(self.flag_game_over())
    }

    fn flag_game_over(&mut self) -> bool {
        if self.session.coins <= 0 {
            self.session.game_over = true;
            log::info!(
                "Game over after {} rounds (balance {})",
                self.session.round,
                self.session.coins
            );
            self.emit(Cue::GameOver);
        }

        self.phase = if self.session.game_over {
            RoundPhase::GameOver
        } else {
            RoundPhase::Idle
        };
        self.session.game_over
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SURFACES
    // ═══════════════════════════════════════════════════════════════════════════

    fn expect_phase(&self, expected: RoundPhase) -> SmResult<()> {
        if self.phase != expected {
            return Err(SmError::OutOfSequence {
                expected: expected.name(),
                found: self.phase.name(),
            });
        }
        Ok(())
    }

    fn persist_high_score(&mut self) {
        if let Err(e) = self
            .store
            .write(&self.config.high_score_key, self.session.high_score)
        {
            log::warn!(
                "Could not persist high score {}: {}",
                self.session.high_score,
                e
            );
        }
    }

    fn emit(&mut self, cue: Cue) {
        let event = CueEvent::new(cue, self.session.round, self.session.coins);
        if let Err(e) = self.feedback.play(&event) {
            log::trace!("Cue {} dropped: {}", cue, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use sm_stage::{NullSink, RecordingSink};
    use sm_state::MemoryStore;

    struct BrokenSpeaker;

    impl FeedbackSink for BrokenSpeaker {
        fn play(&mut self, _event: &CueEvent) -> SmResult<()> {
            Err(SmError::Feedback("speaker unplugged".into()))
        }
    }

    fn engine_with(store: MemoryStore, spins: &[[usize; 3]]) -> RoundEngine {
        RoundEngine::new(
            GameConfig::classic(),
            Box::new(store),
            Box::new(ScriptedRandom::spins(spins)),
            Box::new(NullSink),
        )
        .unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]);
        assert_eq!(engine.session().coins, 100);
        assert_eq!(engine.session().bet, 10);
        assert_eq!(engine.session().high_score, 0);
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert_eq!(engine.stats().spins, 0);
    }

    #[test]
    fn test_loads_high_score() {
        let engine = engine_with(MemoryStore::with_value("HighScore", 430), &[[0, 1, 2]]);
        assert_eq!(engine.session().high_score, 430);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            default_bet: 5,
            ..GameConfig::classic()
        };
        let result = RoundEngine::new(
            config,
            Box::new(MemoryStore::new()),
            Box::new(ScriptedRandom::default()),
            Box::new(NullSink),
        );
        assert!(matches!(result, Err(SmError::InvalidConfig(_))));
    }

    #[test]
    fn test_storage_read_failure_starts_at_zero() {
        let engine = engine_with(MemoryStore::failing(), &[[1, 1, 1]]);
        assert_eq!(engine.session().high_score, 0);
    }

    #[test]
    fn test_storage_write_failure_keeps_playing() {
        let mut engine = engine_with(MemoryStore::failing(), &[[1, 1, 1]]);
        let report = engine.play_round().unwrap();
        assert_eq!(report.coins, 200);
        assert_eq!(engine.session().high_score, 200);

        engine.reset_game(true);
        assert_eq!(engine.session().high_score, 0);
    }

    #[test]
    fn test_feedback_failure_is_ignored() {
        let mut engine = RoundEngine::new(
            GameConfig::classic(),
            Box::new(MemoryStore::new()),
            Box::new(ScriptedRandom::spins(&[[3, 3, 3], [0, 1, 2]])),
            Box::new(BrokenSpeaker),
        )
        .unwrap();

        engine.set_bet(20).unwrap();
        let win = engine.play_round().unwrap();
        let loss = engine.play_round().unwrap();
        assert_eq!(win.coins, 300);
        assert_eq!(loss.coins, 280);
    }

    #[test]
    fn test_evaluate_requires_spin() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]);
        assert!(matches!(
            engine.evaluate(),
            Err(SmError::OutOfSequence {
                expected: "spun",
                found: "idle"
            })
        ));

        engine.spin();
        engine.evaluate().unwrap();
        // Same spin cannot be settled twice
        assert!(engine.evaluate().is_err());
    }

    #[test]
    fn test_check_requires_evaluate() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]);
        assert!(engine.check_game_over().is_err());

        engine.spin();
        assert!(engine.check_game_over().is_err());
        engine.evaluate().unwrap();
        assert!(!engine.check_game_over().unwrap());
        assert_eq!(engine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_round_not_interleaved() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]);
        engine.spin();
        assert!(matches!(
            engine.play_round(),
            Err(SmError::OutOfSequence { .. })
        ));
    }

    #[test]
    fn test_game_over_blocks_play() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]).with_coins(10);
        let report = engine.play_round().unwrap();
        assert!(report.game_over);
        assert_eq!(engine.phase(), RoundPhase::GameOver);
        assert!(matches!(engine.play_round(), Err(SmError::GameOver)));

        engine.reset_game(false);
        assert!(engine.play_round().is_ok());
    }

    #[test]
    fn test_game_over_blocks_round_steps() {
        let mut engine =
            engine_with(MemoryStore::new(), &[[0, 1, 2], [5, 5, 5]]).with_coins(10);
        engine.play_round().unwrap();
        assert!(engine.is_game_over());

        let reels = engine.spin();
        assert!(reels.is_three_of_a_kind());
        assert_eq!(engine.phase(), RoundPhase::GameOver);
        assert!(matches!(engine.evaluate(), Err(SmError::GameOver)));
        assert!(engine.check_game_over().is_err());

        assert_eq!(engine.session().coins, 0);
        assert_eq!(engine.session().high_score, 0);
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_spin_runs_pending_game_over_check() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]).with_coins(10);
        engine.spin();
        engine.evaluate().unwrap();
        assert_eq!(engine.session().coins, 0);
        assert_eq!(engine.phase(), RoundPhase::Settled);

        engine.spin();
        assert!(engine.is_game_over());
        assert!(matches!(engine.evaluate(), Err(SmError::GameOver)));
        assert_eq!(engine.session().coins, 0);
    }

    #[test]
    fn test_spin_after_unchecked_solvent_round() {
        let mut engine = engine_with(MemoryStore::new(), &[[0, 1, 2]]);
        engine.spin();
        engine.evaluate().unwrap();

        engine.spin();
        assert_eq!(engine.phase(), RoundPhase::Spun);
        engine.evaluate().unwrap();
        assert!(!engine.check_game_over().unwrap());
        assert_eq!(engine.session().coins, 80);
    }

    #[test]
    fn test_cue_carries_session_context() {
        let cues = RecordingSink::new();
        let mut engine = RoundEngine::new(
            GameConfig::classic(),
            Box::new(MemoryStore::new()),
            Box::new(ScriptedRandom::spins(&[[5, 5, 5]])),
            Box::new(cues.clone()),
        )
        .unwrap();

        engine.play_round().unwrap();
        let events = cues.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], CueEvent::new(Cue::Spin, 1, 100));
        assert_eq!(events[1], CueEvent::new(Cue::HighScore, 1, 200));
    }

    #[test]
    fn test_view_snapshot() {
        let mut engine = engine_with(MemoryStore::new(), &[[3, 4, 5]]);
        engine.play_round().unwrap();

        let view = engine.view();
        assert_eq!(view.coins, 90);
        assert_eq!(view.reels, [3, 4, 5]);
        assert_eq!(view.symbols, ["seven", "cherry", "strawberry"]);
        assert_eq!(view.allowed_bets, vec![10, 20]);
        assert_eq!(view.phase, RoundPhase::Idle);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "idle");
    }
}
