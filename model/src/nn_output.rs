use common::Hash128;
use engine::Board;
use log::debug;
use std::borrow::Borrow;
use std::io::{self, Write};

use super::nn_pos::NNPos;

/// Raw evaluation of one position by the network, from White's perspective.
///
/// Each record owns its buffers; cloning copies them.
#[derive(Clone, Debug, PartialEq)]
pub struct NNOutput {
    /// Identity hash of the position and parameters this output was produced for.
    pub nn_hash: Hash128,

    pub white_win_prob: f32,
    pub white_loss_prob: f32,
    pub white_no_result_prob: f32,
    pub white_score_mean: f32,
    pub white_score_mean_sq: f32,
    pub white_lead: f32,
    pub var_time_left: f32,
    pub shortterm_winloss_error: f32,
    pub shortterm_score_error: f32,

    pub nn_x_len: usize,
    pub nn_y_len: usize,
    /// Ownership per lane cell in [-1, 1], positive for White.
    pub white_owner_map: Option<Vec<f32>>,
    /// Policy after root noise was applied, if any.
    pub noised_policy_probs: Option<Vec<f32>>,
    /// Indexed by paired policy position. Negative entries mark illegal moves.
    pub policy_probs: Vec<f32>,
}

impl NNOutput {
    pub fn new(nn_hash: Hash128, nn_x_len: usize, nn_y_len: usize) -> Self {
        Self {
            nn_hash,
            white_win_prob: 0.0,
            white_loss_prob: 0.0,
            white_no_result_prob: 0.0,
            white_score_mean: 0.0,
            white_score_mean_sq: 0.0,
            white_lead: 0.0,
            var_time_left: 0.0,
            shortterm_winloss_error: 0.0,
            shortterm_score_error: 0.0,
            nn_x_len,
            nn_y_len,
            white_owner_map: None,
            noised_policy_probs: None,
            policy_probs: vec![0.0; NNPos::get_policy_size(nn_x_len, nn_y_len)],
        }
    }

    /// Merges outputs of the same position, e.g. evaluated under different symmetries.
    ///
    /// Scalars and policies are averaged. Ownership is averaged over the outputs that have one.
    /// If the outputs disagree on which moves are legal the first output's policy is kept as is,
    /// which can only happen on a hash collision.
    pub fn average<B: Borrow<NNOutput>>(others: &[B]) -> Self {
        assert!(!others.is_empty(), "Cannot average an empty set of outputs");

        let first = others[0].borrow();
        for other in &others[1..] {
            let other = other.borrow();
            assert_eq!(
                other.nn_hash, first.nn_hash,
                "Cannot average outputs of different positions"
            );
            assert_eq!(
                (other.nn_x_len, other.nn_y_len, other.policy_probs.len()),
                (first.nn_x_len, first.nn_y_len, first.policy_probs.len()),
                "Cannot average outputs of different shapes"
            );
        }

        let len = others.len() as f32;
        let mean = |field: fn(&NNOutput) -> f32| {
            others.iter().map(|o| field(o.borrow())).sum::<f32>() / len
        };

        Self {
            nn_hash: first.nn_hash,
            white_win_prob: mean(|o| o.white_win_prob),
            white_loss_prob: mean(|o| o.white_loss_prob),
            white_no_result_prob: mean(|o| o.white_no_result_prob),
            white_score_mean: mean(|o| o.white_score_mean),
            white_score_mean_sq: mean(|o| o.white_score_mean_sq),
            white_lead: mean(|o| o.white_lead),
            var_time_left: mean(|o| o.var_time_left),
            shortterm_winloss_error: mean(|o| o.shortterm_winloss_error),
            shortterm_score_error: mean(|o| o.shortterm_score_error),
            nn_x_len: first.nn_x_len,
            nn_y_len: first.nn_y_len,
            white_owner_map: average_owner_maps(others),
            noised_policy_probs: None,
            policy_probs: average_policies(others),
        }
    }

    pub fn debug_print(&self, out: &mut impl Write, board: &Board) -> io::Result<()> {
        writeln!(out, "Win {:.2}c", self.white_win_prob * 100.0)?;
        writeln!(out, "Loss {:.2}c", self.white_loss_prob * 100.0)?;
        writeln!(out, "NoResult {:.2}c", self.white_no_result_prob * 100.0)?;
        writeln!(out, "ScoreMean {:.1}", self.white_score_mean)?;
        writeln!(out, "ScoreMeanSq {:.1}", self.white_score_mean_sq)?;
        writeln!(out, "Lead {:.1}", self.white_lead)?;
        writeln!(out, "VarTimeLeft {:.1}", self.var_time_left)?;
        writeln!(out, "STWinlossError {:.1}", self.shortterm_winloss_error)?;
        writeln!(out, "STScoreError {:.1}", self.shortterm_score_error)?;

        // Policy mass of all legal moves landing on each cell.
        writeln!(out, "Policy")?;
        let area = self.nn_x_len * self.nn_y_len;
        for y in 0..board.y_size {
            for x in 0..board.x_size {
                let to = NNPos::xy_to_pos(x, y, self.nn_x_len);
                let legal = (0..area)
                    .map(|from| self.policy_probs[from * area + to])
                    .filter(|&p| p >= 0.0)
                    .collect::<Vec<_>>();

                if legal.is_empty() {
                    write!(out, "   - ")?;
                } else {
                    let prob = legal.iter().sum::<f32>();
                    write!(out, "{:4} ", (prob * 1000.0).round() as i32)?;
                }
            }
            writeln!(out)?;
        }

        if let Some(owner_map) = &self.white_owner_map {
            for y in 0..board.y_size {
                for x in 0..board.x_size {
                    let pos = NNPos::xy_to_pos(x, y, self.nn_x_len);
                    write!(out, "{:5} ", (owner_map[pos] * 1000.0).round() as i32)?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

fn average_owner_maps<B: Borrow<NNOutput>>(others: &[B]) -> Option<Vec<f32>> {
    let mut sum: Option<Vec<f32>> = None;
    let mut count = 0.0f32;

    for owner_map in others.iter().filter_map(|o| o.borrow().white_owner_map.as_ref()) {
        let sum = sum.get_or_insert_with(|| vec![0.0; owner_map.len()]);
        for (s, v) in sum.iter_mut().zip(owner_map) {
            *s += v;
        }
        count += 1.0;
    }

    sum.map(|mut sum| {
        sum.iter_mut().for_each(|s| *s /= count);
        sum
    })
}

fn average_policies<B: Borrow<NNOutput>>(others: &[B]) -> Vec<f32> {
    let first = &others[0].borrow().policy_probs;
    let mut sum = first.clone();
    let mut mismatch = false;

    for other in &others[1..] {
        for ((s, &p), &f) in sum.iter_mut().zip(&other.borrow().policy_probs).zip(first) {
            if (f < 0.0) != (p < 0.0) {
                mismatch = true;
            }
            *s += p;
        }
    }

    if mismatch {
        debug!("Outputs disagree on move legality, keeping the first policy");
        return first.clone();
    }

    let len = others.len() as f32;
    sum.iter_mut().for_each(|s| *s /= len);
    sum
}
