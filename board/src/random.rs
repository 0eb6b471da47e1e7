//! Random playout for demos and smoke tests.

use chess::PositionStatus;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::controller::BoardController;

impl BoardController {
    /// Reset, then play up to `max_plies` uniformly random legal moves.
    /// Stops early when the game ends. Returns the number of plies played.
    /// A view-only board is left untouched.
    pub fn play_random_game<R: Rng + ?Sized>(&mut self, rng: &mut R, max_plies: usize) -> usize {
        if !self.config.allow_moves {
            debug!("Random playout skipped: moves are disabled");
            return 0;
        }
        self.reset();

        for _ in 0..max_plies {
            let position = self.live_position();
            if position.status() != PositionStatus::Ongoing {
                break;
            }
            let moves = position.all_legal_moves();
            let Some(mv) = moves.choose(rng).copied() else {
                break;
            };
            if self.commit(mv.from, mv.to, mv.promotion).is_none() {
                break;
            }
        }

        info!("Random playout finished after {} plies", self.len());
        self.len()
    }

    /// Random playout using the configured length.
    pub fn play_random_default<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let plies = self.config.random_plies;
        self.play_random_game(rng, plies)
    }
}
