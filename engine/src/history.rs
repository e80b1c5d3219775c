use super::board::Board;
use super::location::{Loc, Player};
use super::rules::Rules;

/// A move of a stone from one location to another. A pass has `to_loc == Loc::PASS`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Move {
    pub pla: Player,
    pub from_loc: Loc,
    pub to_loc: Loc,
}

impl Move {
    pub fn new(pla: Player, from_loc: Loc, to_loc: Loc) -> Self {
        Self {
            pla,
            from_loc,
            to_loc,
        }
    }

    pub fn pass(pla: Player) -> Self {
        Self::new(pla, Loc::NULL, Loc::PASS)
    }

    pub fn is_pass(&self) -> bool {
        self.to_loc.is_pass()
    }
}

#[derive(Clone, Debug)]
pub struct BoardHistory {
    pub rules: Rules,
    pub move_history: Vec<Move>,
    pub is_game_finished: bool,
    /// 0 during normal play, 1 or 2 during the cleanup phases.
    pub encore_phase: usize,
}

impl BoardHistory {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            move_history: Vec::new(),
            is_game_finished: false,
            encore_phase: 0,
        }
    }

    /// Records a move, applying it to `board` unless it is a pass.
    pub fn make_move(&mut self, board: &mut Board, mv: Move) {
        assert!(!self.is_game_finished, "Cannot play {:?}, the game is over", mv);

        let ends_game = mv.is_pass() && self.pass_would_end_game(board, mv.pla);
        if !mv.is_pass() {
            board.move_stone(mv.from_loc, mv.to_loc);
        }

        self.move_history.push(mv);
        self.is_game_finished = ends_game;
    }

    /// A pass by `pla` ends the game when it follows a pass by the opponent.
    pub fn pass_would_end_game(&self, _board: &Board, pla: Player) -> bool {
        if self.is_game_finished {
            return false;
        }

        matches!(self.move_history.last(), Some(last) if last.pla == pla.opp() && last.is_pass())
    }

    pub fn current_self_komi(&self, pla: Player) -> f32 {
        self.rules.self_komi(pla)
    }
}
