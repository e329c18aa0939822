//! The duel aggregate: two seats, a deck, and the round state machine.
//!
//! A [`Duel`] owns everything for one match — hands, health, the turn
//! pointer, the round counter, and the lifecycle phase. Operations
//! validate legality first, mutate, then return the events to deliver;
//! the room actor owns the only reference and dispatches each batch, so
//! no two mutations of the same duel ever overlap.
//!
//! Round resolution runs at most once per round: it is modeled as the
//! `Running → RoundResolving` phase transition, so a second trigger for
//! the same round (a bust racing a duplicate stand, say) finds the duel
//! already out of `Running` and becomes a no-op.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use pontoon_protocol::{
    Card, PlayerId, PlayerRef, Recipient, RoomId, RoomPhase, RoundSnapshot,
    ServerMessage,
};

use crate::{hand_value, Deck, DuelConfig, GameError, BUST_LIMIT};

/// Events produced by one duel operation, each tagged with its recipient.
pub type Outbox = Vec<(Recipient, ServerMessage)>;

/// One player's slot in a duel.
#[derive(Debug)]
struct Seat {
    id: PlayerId,
    name: String,
    hand: Vec<Card>,
    stood: bool,
    health: u32,
}

/// The full state of one two-player match.
#[derive(Debug)]
pub struct Duel {
    room_id: RoomId,
    config: DuelConfig,
    seats: Vec<Seat>,
    phase: RoomPhase,
    deck: Deck,
    /// Index into `seats` of the current turn holder.
    turn: usize,
    round: u32,
    rematch_votes: HashSet<PlayerId>,
}

impl Duel {
    /// Creates an empty duel in the `Waiting` phase.
    pub fn new(room_id: RoomId, config: DuelConfig) -> Self {
        Self {
            room_id,
            config,
            seats: Vec::with_capacity(2),
            phase: RoomPhase::Waiting,
            deck: Deck::stacked(Vec::new()),
            turn: 0,
            round: 1,
            rematch_votes: HashSet::new(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Damage the loser of the current round takes: `min(round, cap)`.
    pub fn damage(&self) -> u32 {
        self.round.min(self.config.damage_cap)
    }

    /// Ids of the current occupants, in seat order.
    pub fn players(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.id).collect()
    }

    /// Display names of the current occupants, in seat order.
    pub fn player_names(&self) -> Vec<String> {
        self.seats.iter().map(|s| s.name.clone()).collect()
    }

    // -----------------------------------------------------------------
    // Seating
    // -----------------------------------------------------------------

    /// Seats a player. Returns `true` when the duel just reached two
    /// occupants and is ready to start.
    ///
    /// The display name defaults to `Player {id}` if absent.
    pub fn join(
        &mut self,
        id: PlayerId,
        name: Option<String>,
    ) -> Result<bool, GameError> {
        if !self.phase.is_joinable() {
            return Err(GameError::WrongPhase(self.phase));
        }
        if self.seat_index(id).is_some() {
            return Err(GameError::AlreadySeated(id));
        }
        if self.seats.len() >= 2 {
            return Err(GameError::DuelFull);
        }
        let name = name.unwrap_or_else(|| format!("Player {}", id.0));
        self.seats.push(Seat {
            id,
            name,
            hand: Vec::new(),
            stood: false,
            health: self.config.starting_health,
        });
        Ok(self.seats.len() == 2)
    }

    /// Removes a player and returns the remaining occupant, if any.
    /// The caller tears the room down when this happens mid-match.
    pub fn remove(&mut self, player: PlayerId) -> Option<PlayerId> {
        let idx = self.seat_index(player)?;
        self.seats.remove(idx);
        self.seats.first().map(|s| s.id)
    }

    // -----------------------------------------------------------------
    // Match lifecycle
    // -----------------------------------------------------------------

    /// Starts a fresh match: full health, round 1, new deal.
    ///
    /// Called once when the second occupant is seated, and again when
    /// both occupants vote for a rematch (health and round reset — the
    /// rematch is a whole new match).
    pub fn start(&mut self) -> Outbox {
        if self.seats.len() != 2 {
            return Vec::new();
        }
        for seat in &mut self.seats {
            seat.health = self.config.starting_health;
        }
        self.round = 1;
        self.rematch_votes.clear();
        self.deal(true)
    }

    /// Deals the next round. Only valid while `RoundResolving`; any
    /// other phase (a rematch already restarted, the room shutting
    /// down) makes this a no-op.
    pub fn next_round(&mut self) -> Outbox {
        if self.phase != RoomPhase::RoundResolving {
            return Vec::new();
        }
        self.round += 1;
        self.deal(false)
    }

    /// Records a rematch vote. When both occupants have voted the match
    /// restarts and `game_start` events are returned.
    pub fn rematch(&mut self, player: PlayerId) -> Result<Outbox, GameError> {
        if self.phase != RoomPhase::GameOver {
            return Err(GameError::WrongPhase(self.phase));
        }
        if self.seat_index(player).is_none() {
            return Err(GameError::NotSeated(player));
        }
        self.rematch_votes.insert(player);
        if self.rematch_votes.len() == self.seats.len() {
            Ok(self.start())
        } else {
            Ok(Vec::new())
        }
    }

    // -----------------------------------------------------------------
    // Turn actions
    // -----------------------------------------------------------------

    /// Draws one card for the turn holder.
    ///
    /// Going over the limit transitions straight into round resolution
    /// with the player marked busted; otherwise the turn passes. An
    /// exhausted deck rejects the action without touching any state.
    pub fn hit(&mut self, player: PlayerId) -> Result<Outbox, GameError> {
        let idx = self.turn_check(player)?;
        let card = self.deck.draw()?;
        self.seats[idx].hand.push(card);
        let new_value = hand_value(&self.seats[idx].hand);

        let mut out: Outbox = vec![(
            Recipient::All,
            ServerMessage::HitResult {
                player_id: player,
                card,
                new_value,
            },
        )];
        if new_value > BUST_LIMIT {
            out.extend(self.resolve(Some(idx)));
        } else {
            self.pass_turn(&mut out);
        }
        Ok(out)
    }

    /// Marks the turn holder as stood. When both occupants have stood
    /// the round resolves; otherwise the turn passes.
    pub fn stand(&mut self, player: PlayerId) -> Result<Outbox, GameError> {
        let idx = self.turn_check(player)?;
        self.seats[idx].stood = true;

        let mut out: Outbox = vec![(
            Recipient::All,
            ServerMessage::StandResult { player_id: player },
        )];
        if self.seats[1 - idx].stood {
            out.extend(self.resolve(None));
        } else {
            self.pass_turn(&mut out);
        }
        Ok(out)
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn seat_index(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.id == player)
    }

    /// Validates that the duel is running and `player` holds the turn.
    fn turn_check(&self, player: PlayerId) -> Result<usize, GameError> {
        if !self.phase.is_running() {
            return Err(GameError::WrongPhase(self.phase));
        }
        let idx = self
            .seat_index(player)
            .ok_or(GameError::NotSeated(player))?;
        if self.turn != idx {
            return Err(GameError::NotYourTurn(player));
        }
        Ok(idx)
    }

    fn pass_turn(&mut self, out: &mut Outbox) {
        self.turn = 1 - self.turn;
        out.push((
            Recipient::All,
            ServerMessage::TurnChange {
                current_turn_player_id: self.seats[self.turn].id,
            },
        ));
    }

    /// Resolves the current round.
    ///
    /// Entry requires the `Running` phase — that transition IS the
    /// exactly-once guard, so a concurrent duplicate trigger returns an
    /// empty outbox. On elimination the duel terminates here; otherwise
    /// it stays `RoundResolving` until the actor deals the next round.
    fn resolve(&mut self, busted: Option<usize>) -> Outbox {
        if !self.phase.is_running() {
            return Vec::new();
        }
        self.phase = RoomPhase::RoundResolving;

        let values = [
            hand_value(&self.seats[0].hand),
            hand_value(&self.seats[1].hand),
        ];
        let winner = match busted {
            Some(idx) => Some(1 - idx),
            None => match values[0].cmp(&values[1]) {
                Ordering::Greater => Some(0),
                Ordering::Less => Some(1),
                Ordering::Equal => None,
            },
        };

        let mut applied = 0;
        if let Some(w) = winner {
            applied = self.damage();
            let loser = &mut self.seats[1 - w];
            loser.health = loser.health.saturating_sub(applied);
        }

        let mut value_map = HashMap::new();
        for (i, seat) in self.seats.iter().enumerate() {
            value_map.insert(seat.id, values[i]);
        }

        let mut out: Outbox = Vec::new();
        for i in 0..2 {
            out.push((
                Recipient::Player(self.seats[i].id),
                ServerMessage::RoundEnd {
                    winner_id: winner.map(|w| self.seats[w].id),
                    values: value_map.clone(),
                    your_health: self.seats[i].health,
                    opponent_health: self.seats[1 - i].health,
                    damage: applied,
                    round: self.round,
                },
            ));
        }

        if let Some(w) = winner {
            if self.seats[1 - w].health == 0 {
                self.phase = RoomPhase::GameOver;
                out.push((
                    Recipient::All,
                    ServerMessage::GameOver {
                        winner_id: self.seats[w].id,
                    },
                ));
            }
        }
        out
    }

    /// Deals a round: fresh deck, fresh two-card hands, cleared stood
    /// flags, turn back to the first seat (fixed-first policy, applied
    /// every round).
    fn deal(&mut self, opening: bool) -> Outbox {
        self.deck = Deck::shuffled();
        for seat in &mut self.seats {
            seat.hand.clear();
            seat.stood = false;
        }
        for i in 0..self.seats.len() {
            for _ in 0..self.config.opening_hand {
                // A fresh deck cannot run out on the opening deal, but
                // fail soft rather than panic if the config says otherwise.
                match self.deck.draw() {
                    Ok(card) => self.seats[i].hand.push(card),
                    Err(_) => break,
                }
            }
        }
        self.turn = 0;
        self.phase = RoomPhase::Running;

        (0..self.seats.len())
            .map(|i| {
                let snapshot = self.snapshot_for(i);
                let msg = if opening {
                    ServerMessage::GameStart(snapshot)
                } else {
                    ServerMessage::RoundStart(snapshot)
                };
                (Recipient::Player(self.seats[i].id), msg)
            })
            .collect()
    }

    fn snapshot_for(&self, idx: usize) -> RoundSnapshot {
        let me = &self.seats[idx];
        let opp = &self.seats[1 - idx];
        RoundSnapshot {
            you: PlayerRef {
                id: me.id,
                name: me.name.clone(),
            },
            opponent: PlayerRef {
                id: opp.id,
                name: opp.name.clone(),
            },
            your_hand: me.hand.clone(),
            your_value: hand_value(&me.hand),
            opponent_card_count: opp.hand.len(),
            your_health: me.health,
            opponent_health: opp.health,
            round: self.round,
            damage: self.damage(),
            current_turn_player_id: self.seats[self.turn].id,
        }
    }
}
