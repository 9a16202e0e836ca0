//! Premoves: moves entered while it is not the local player's turn.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::chess::moves::{Move, MoveDraft};
use crate::chess::piece::Player;
use crate::error::{GameError, GameResult};
use crate::game::Game;

/// Receives committed moves for the authoritative counterpart (usually a network peer).
pub trait PeerLike {
    fn transmit(&mut self, mv: &Move);
}

/// Local play with nobody to notify.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPeer;

impl PeerLike for NoPeer {
    #[inline]
    fn transmit(&mut self, _mv: &Move) {}
}

impl PeerLike for Vec<Move> {
    fn transmit(&mut self, mv: &Move) {
        self.push(mv.clone());
    }
}

/// Result of one replay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub applied: usize,
    /// Set when a premove was rejected and the rest of the queue dropped.
    pub rejected: Option<(MoveDraft, GameError)>,
    pub discarded: usize,
}

/// FIFO of drafts owned by one player.
#[derive(Debug, Clone)]
pub struct PremoveQueue {
    player: Player,
    queue: VecDeque<MoveDraft>,
}

impl PremoveQueue {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            queue: VecDeque::new(),
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn push(&mut self, draft: MoveDraft) {
        self.queue.push_back(draft);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveDraft> + '_ {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Plays queued drafts while it is this player's turn.
    ///
    /// Each draft is validated against the game as it stands now. The first rejection drops
    /// the whole remaining queue. Accepted moves are transmitted to `peer` in order.
    pub fn replay(&mut self, game: &mut Game, peer: &mut impl PeerLike) -> GameResult<ReplayReport> {
        let mut report = ReplayReport::default();
        while game.current_player() == self.player && !game.is_over() {
            let Some(draft) = self.queue.pop_front() else {
                break;
            };
            match game.make_move(draft) {
                Ok(mv) => {
                    peer.transmit(mv);
                    report.applied += 1;
                    debug!(start = %draft.start, end = %draft.end, "premove applied");
                }
                Err(err @ (GameError::Move(_) | GameError::Cancelled)) => {
                    report.discarded = self.queue.len();
                    warn!(
                        start = %draft.start,
                        end = %draft.end,
                        error = %err,
                        discarded = report.discarded,
                        "premove rejected, queue cleared"
                    );
                    self.queue.clear();
                    report.rejected = Some((draft, err));
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}
