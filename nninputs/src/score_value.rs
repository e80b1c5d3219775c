use engine::{Board, BoardHistory, Player};
use log::{debug, info};
use model::NNPos;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::f64::consts::{FRAC_2_PI, FRAC_PI_2};
use std::sync::Arc;

const ASSUMED_BOARD_LEN: usize = NNPos::MAX_BOARD_LEN;
const MEAN_RADIUS: i64 =
    (ASSUMED_BOARD_LEN * ASSUMED_BOARD_LEN + NNPos::EXTRA_SCORE_DISTR_RADIUS) as i64;
const MEAN_LEN: usize = MEAN_RADIUS as usize * 2;
const STDEV_LEN: usize = ASSUMED_BOARD_LEN * ASSUMED_BOARD_LEN + NNPos::EXTRA_SCORE_DISTR_RADIUS;
/// Resolution of the integration, in both points and standard deviations. Must be even.
const STEPS_PER_UNIT: i64 = 10;
const BOUND_STDEVS: i64 = 5;

/// Largest magnitude the inverse mapping returns near the asymptotes.
const MAX_UNSCALED_SCORE: f64 = 1e6;

static SCORE_VALUE_TABLES: Lazy<RwLock<Option<Arc<ScoreValueTables>>>> =
    Lazy::new(|| RwLock::new(None));

/// Conversions between final scores and utilities in [-1, 1], from White's perspective.
pub struct ScoreValue;

impl ScoreValue {
    pub fn white_wins_of_winner(
        winner: Option<Player>,
        draw_equivalent_wins_for_white: f64,
    ) -> f64 {
        match winner {
            Some(Player::White) => 1.0,
            Some(Player::Black) => 0.0,
            None => draw_equivalent_wins_for_white,
        }
    }

    /// Drawn games cannot be scored differently from any other result, so the score is kept
    /// as is.
    pub fn white_score_draw_adjust(
        final_white_minus_black_score: f64,
        _draw_equivalent_wins_for_white: f64,
        _hist: &BoardHistory,
    ) -> f64 {
        final_white_minus_black_score
    }

    pub fn white_score_value_of_score_smooth(
        final_white_minus_black_score: f64,
        center: f64,
        scale: f64,
        draw_equivalent_wins_for_white: f64,
        board: &Board,
        hist: &BoardHistory,
    ) -> f64 {
        let adjusted = Self::white_score_draw_adjust(
            final_white_minus_black_score,
            draw_equivalent_wins_for_white,
            hist,
        );

        Self::white_score_value_of_score_smooth_no_draw_adjust(adjusted, center, scale, board)
    }

    pub fn white_score_value_of_score_smooth_no_draw_adjust(
        final_white_minus_black_score: f64,
        center: f64,
        scale: f64,
        board: &Board,
    ) -> f64 {
        value_of_score(
            final_white_minus_black_score,
            center,
            scale,
            board.x_size,
            board.y_size,
        )
    }

    /// Inverse of [`Self::white_score_value_of_score_smooth_no_draw_adjust`]. Values at the ends
    /// of the range map to a large finite score rather than infinity.
    pub fn approx_white_score_of_score_value_smooth(
        score_value: f64,
        center: f64,
        scale: f64,
        board: &Board,
    ) -> f64 {
        assert!(
            (-1.0..=1.0).contains(&score_value),
            "Score value {} is outside of [-1, 1]",
            score_value
        );

        let unscaled = inverse_atan(score_value * FRAC_PI_2);
        unscaled * (scale * normalized_side(board.x_size, board.y_size)) + center
    }

    /// Expected square of the score, assuming the score is gridded to half points and
    /// a drawn game is split between the two neighbouring half point results.
    pub fn white_score_mean_sq_of_score_gridded(
        final_white_minus_black_score: f64,
        draw_equivalent_wins_for_white: f64,
    ) -> f64 {
        let score = final_white_minus_black_score;
        assert!(
            (score * 2.0).fract() == 0.0,
            "Score {} is not a multiple of a half point",
            score
        );

        if score.fract() != 0.0 {
            return score * score;
        }

        let lower_sq = (score - 0.5) * (score - 0.5);
        let upper_sq = (score + 0.5) * (score + 0.5);
        lower_sq + (upper_sq - lower_sq) * draw_equivalent_wins_for_white
    }

    /// Builds the process wide table. Panics if it is already built.
    pub fn init_tables() {
        let mut global = SCORE_VALUE_TABLES.write();
        assert!(
            global.is_none(),
            "Score value tables are already initialized"
        );

        let mut tables = ScoreValueTables::default();
        tables.init_tables();
        *global = Some(Arc::new(tables));
    }

    /// Releases the process wide table. Does nothing if it is not built. Handles taken from
    /// [`Self::shared_tables`] keep their table alive until dropped.
    pub fn free_tables() {
        if SCORE_VALUE_TABLES.write().take().is_some() {
            debug!("Released process wide score value tables");
        }
    }

    pub fn tables_initialized() -> bool {
        SCORE_VALUE_TABLES.read().is_some()
    }

    /// Handle to the process wide table. Queries through it take no lock.
    pub fn shared_tables() -> Option<Arc<ScoreValueTables>> {
        SCORE_VALUE_TABLES.read().clone()
    }

    /// Queries the process wide table under its read lock. Panics if it is not built.
    ///
    /// Callers on a hot path should hold the handle from [`Self::shared_tables`] instead.
    pub fn expected_white_score_value(
        white_score_mean: f64,
        white_score_stdev: f64,
        center: f64,
        scale: f64,
        board: &Board,
    ) -> f64 {
        let global = SCORE_VALUE_TABLES.read();
        match global.as_deref() {
            Some(tables) => tables.expected_white_score_value(
                white_score_mean,
                white_score_stdev,
                center,
                scale,
                board,
            ),
            None => panic!("Score value tables are not initialized"),
        }
    }
}

/// Expected smooth score value of a normally distributed score, over a grid of means and
/// standard deviations.
///
/// Cells are `mean_idx * STDEV_LEN + stdev_idx`. The cell for `mean_idx` is centered on a mean
/// of `mean_idx - MEAN_RADIUS - 0.5` points on the largest board.
#[derive(Default)]
pub struct ScoreValueTables {
    expected_sv: Option<Box<[f64]>>,
}

impl ScoreValueTables {
    pub fn is_initialized(&self) -> bool {
        self.expected_sv.is_some()
    }

    pub fn init_tables(&mut self) {
        assert!(
            !self.is_initialized(),
            "Score value tables are already initialized"
        );

        self.expected_sv = Some(build_expected_sv_table());

        info!(
            "Built score value tables of {} means by {} stdevs",
            MEAN_LEN, STDEV_LEN
        );
    }

    pub fn free_tables(&mut self) {
        if self.expected_sv.take().is_some() {
            debug!("Freed score value tables");
        }
    }

    /// Bilinear interpolation of the table, with indices clamped at its edges.
    pub fn expected_white_score_value(
        &self,
        white_score_mean: f64,
        white_score_stdev: f64,
        center: f64,
        scale: f64,
        board: &Board,
    ) -> f64 {
        let table = match &self.expected_sv {
            Some(table) => table,
            None => panic!("Score value tables are not initialized"),
        };

        let scale_factor =
            ASSUMED_BOARD_LEN as f64 / (scale * normalized_side(board.x_size, board.y_size));

        let mean_scaled = (white_score_mean - center) * scale_factor;
        let stdev_scaled = white_score_stdev * scale_factor;

        let mean_rounded = mean_scaled.round();
        let stdev_floored = stdev_scaled.floor();
        assert!(
            stdev_floored >= 0.0,
            "Score stdev {} must not be negative",
            white_score_stdev
        );

        let (mean_idx0, mean_idx1) =
            edge_clamped_indices(mean_rounded + MEAN_RADIUS as f64, MEAN_LEN);
        let (stdev_idx0, stdev_idx1) = edge_clamped_indices(stdev_floored, STDEV_LEN);

        let lambda_mean = mean_scaled - mean_rounded + 0.5;
        let lambda_stdev = stdev_scaled - stdev_floored;

        let cell = |mean_idx: usize, stdev_idx: usize| table[mean_idx * STDEV_LEN + stdev_idx];
        let a00 = cell(mean_idx0, stdev_idx0);
        let a01 = cell(mean_idx0, stdev_idx1);
        let a10 = cell(mean_idx1, stdev_idx0);
        let a11 = cell(mean_idx1, stdev_idx1);

        let b0 = a00 + lambda_stdev * (a01 - a00);
        let b1 = a10 + lambda_stdev * (a11 - a10);
        b0 + lambda_mean * (b1 - b0)
    }
}

/// Lower and upper grid neighbours of `idx`, both pinned to the nearest edge once `idx` leaves
/// `[0, len - 1)`. Clamps before converting to an index.
fn edge_clamped_indices(idx: f64, len: usize) -> (usize, usize) {
    let last = len - 1;
    if idx < 0.0 {
        (0, 0)
    } else if idx >= last as f64 {
        (last, last)
    } else {
        let idx0 = idx as usize;
        (idx0, idx0 + 1)
    }
}

/// Numerically integrates the smooth score value against a discretized normal distribution
/// for every cell of the grid.
fn build_expected_sv_table() -> Box<[f64]> {
    let min_stdev_steps = -BOUND_STDEVS * STEPS_PER_UNIT;
    let max_stdev_steps = BOUND_STDEVS * STEPS_PER_UNIT;
    let normal_pdf = (min_stdev_steps..=max_stdev_steps)
        .map(|i| {
            let x_in_stdevs = i as f64 / STEPS_PER_UNIT as f64;
            (-0.5 * x_in_stdevs * x_in_stdevs).exp()
        })
        .collect::<Vec<_>>();
    let w_sum = normal_pdf.iter().sum::<f64>();

    let min_sv_steps = -(MEAN_RADIUS * STEPS_PER_UNIT
        + STEPS_PER_UNIT / 2
        + BOUND_STDEVS * STDEV_LEN as i64 * STEPS_PER_UNIT);
    let max_sv_steps = -min_sv_steps;
    let sv_precomp = (min_sv_steps..=max_sv_steps)
        .map(|i| {
            let mean = i as f64 / STEPS_PER_UNIT as f64;
            value_of_score(mean, 0.0, 1.0, ASSUMED_BOARD_LEN, ASSUMED_BOARD_LEN)
        })
        .collect::<Vec<_>>();

    let mut table = vec![0.0; MEAN_LEN * STDEV_LEN];
    for (mean_idx, row) in table.chunks_exact_mut(STDEV_LEN).enumerate() {
        let mean_steps = (mean_idx as i64 - MEAN_RADIUS) * STEPS_PER_UNIT - STEPS_PER_UNIT / 2;
        for (stdev_idx, entry) in row.iter_mut().enumerate() {
            let wsv_sum = normal_pdf
                .iter()
                .zip(min_stdev_steps..)
                .map(|(w, i)| {
                    let x_steps = mean_steps + stdev_idx as i64 * i;
                    w * sv_precomp[(x_steps - min_sv_steps) as usize]
                })
                .sum::<f64>();

            *entry = wsv_sum / w_sum;
        }
    }

    table.into_boxed_slice()
}

fn normalized_side(x_size: usize, y_size: usize) -> f64 {
    if x_size == y_size {
        x_size as f64
    } else {
        ((x_size * y_size) as f64).sqrt()
    }
}

fn value_of_score(score: f64, center: f64, scale: f64, x_size: usize, y_size: usize) -> f64 {
    let adjusted = score - center;
    (adjusted / (scale * normalized_side(x_size, y_size))).atan() * FRAC_2_PI
}

fn inverse_atan(x: f64) -> f64 {
    if x >= FRAC_PI_2 - 1e-6 {
        return MAX_UNSCALED_SCORE;
    }
    if x <= -FRAC_PI_2 + 1e-6 {
        return -MAX_UNSCALED_SCORE;
    }
    x.tan()
}
