use crate::range::HandRange;
use cfr_cards::{Board, Card, Hole};
use cfr_core::{Chips, Probability, SolverError};

/// Bet-size multipliers for one role (OOP or IP) across the three betting
/// contexts the river tree distinguishes. Each entry is a fraction of the
/// pot, e.g. `0.5` means "bet half pot".
#[derive(Debug, Clone)]
pub struct BetSizing {
    pub first_bets: Vec<f64>,
    pub first_raises: Vec<f64>,
    pub next_raises: Vec<f64>,
}

/// A fully resolved, immutable river subgame: board, stacks, bet sizing,
/// and both players' ranges. Constructed only through
/// [`RiverConfigBuilder::build`], so by the time trainer code sees one
/// it is already validated: a five-card unique board, a positive pot and
/// stack, and non-empty, positively-weighted ranges for both players.
#[derive(Debug, Clone)]
pub struct RiverConfig {
    pub board: Board,
    pub pot: Chips,
    pub stack: Chips,
    pub sizing: [BetSizing; 2],
    pub include_all_in: bool,
    pub max_raises: u8,
    pub ranges: [HandRange; 2],
}

#[derive(Debug, Clone, Default)]
pub struct RiverConfigBuilder {
    board: Vec<Card>,
    pot: Chips,
    stack: Chips,
    bet_sizes: Vec<f64>,
    oop_first_bets: Option<Vec<f64>>,
    ip_first_bets: Option<Vec<f64>>,
    oop_first_raises: Option<Vec<f64>>,
    ip_first_raises: Option<Vec<f64>>,
    oop_next_raises: Option<Vec<f64>>,
    ip_next_raises: Option<Vec<f64>>,
    include_all_in: bool,
    max_raises: u8,
    ranges: [Vec<(Hole, Probability)>; 2],
}

impl RiverConfigBuilder {
    pub fn new() -> Self {
        Self {
            max_raises: 4,
            ..Default::default()
        }
    }

    pub fn board(mut self, cards: Vec<Card>) -> Self {
        self.board = cards;
        self
    }

    pub fn pot(mut self, pot: Chips) -> Self {
        self.pot = pot;
        self
    }

    pub fn stack(mut self, stack: Chips) -> Self {
        self.stack = stack;
        self
    }

    pub fn bet_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.bet_sizes = sizes;
        self
    }

    pub fn oop_first_bets(mut self, sizes: Vec<f64>) -> Self {
        self.oop_first_bets = Some(sizes);
        self
    }
    pub fn ip_first_bets(mut self, sizes: Vec<f64>) -> Self {
        self.ip_first_bets = Some(sizes);
        self
    }
    pub fn oop_first_raises(mut self, sizes: Vec<f64>) -> Self {
        self.oop_first_raises = Some(sizes);
        self
    }
    pub fn ip_first_raises(mut self, sizes: Vec<f64>) -> Self {
        self.ip_first_raises = Some(sizes);
        self
    }
    pub fn oop_next_raises(mut self, sizes: Vec<f64>) -> Self {
        self.oop_next_raises = Some(sizes);
        self
    }
    pub fn ip_next_raises(mut self, sizes: Vec<f64>) -> Self {
        self.ip_next_raises = Some(sizes);
        self
    }

    pub fn include_all_in(mut self, yes: bool) -> Self {
        self.include_all_in = yes;
        self
    }

    pub fn max_raises(mut self, n: u8) -> Self {
        self.max_raises = n;
        self
    }

    pub fn range(mut self, player: usize, combos: Vec<(Hole, Probability)>) -> Self {
        self.ranges[player] = combos;
        self
    }

    pub fn build(self) -> Result<RiverConfig, SolverError> {
        if self.board.len() != 5 {
            return Err(SolverError::InvalidBoard {
                len: self.board.len(),
                expected: 5,
            });
        }
        let board = Board::new(self.board);
        if board.has_duplicates() {
            return Err(SolverError::DuplicateBoardCard);
        }
        if self.pot <= 0 {
            return Err(SolverError::NonPositivePot { pot: self.pot as i64 });
        }
        if self.stack <= 0 {
            return Err(SolverError::NonPositiveStack {
                stack: self.stack as i64,
            });
        }

        let oop = BetSizing {
            first_bets: self.oop_first_bets.unwrap_or_else(|| self.bet_sizes.clone()),
            first_raises: self.oop_first_raises.unwrap_or_else(|| self.bet_sizes.clone()),
            next_raises: self.oop_next_raises.unwrap_or_else(|| self.bet_sizes.clone()),
        };
        let ip = BetSizing {
            first_bets: self.ip_first_bets.unwrap_or_else(|| self.bet_sizes.clone()),
            first_raises: self.ip_first_raises.unwrap_or_else(|| self.bet_sizes.clone()),
            next_raises: self.ip_next_raises.unwrap_or_else(|| self.bet_sizes.clone()),
        };

        let [oop_combos, ip_combos] = self.ranges;
        let mut oop_range = HandRange::new(&board, oop_combos);
        let mut ip_range = HandRange::new(&board, ip_combos);

        if oop_range.is_empty() {
            return Err(SolverError::EmptyRange { player: 0 });
        }
        if ip_range.is_empty() {
            return Err(SolverError::EmptyRange { player: 1 });
        }
        if oop_range.weight_sum() <= 0.0 {
            return Err(SolverError::NonPositiveWeight { player: 0 });
        }
        if ip_range.weight_sum() <= 0.0 {
            return Err(SolverError::NonPositiveWeight { player: 1 });
        }

        oop_range.index_blocking_against(&ip_range);
        ip_range.index_blocking_against(&oop_range);

        Ok(RiverConfig {
            board,
            pot: self.pot,
            stack: self.stack,
            sizing: [oop, ip],
            include_all_in: self.include_all_in,
            max_raises: self.max_raises,
            ranges: [oop_range, ip_range],
        })
    }
}
