use engine::{Board, BoardHistory, Color, Player};
use model::{ConvInputBuilder, InputValue, Layout, NNPos};

use super::input_params::{MiscNNInputParams, NNInputsOptions};
use super::inputs_version::{BoundaryTable, ExtraChannel, InputsVersion};
use super::symmetry::SymmetryHelpers;

const ON_BOARD_CHANNEL: usize = 0;
const PLA_STONE_CHANNEL: usize = 1;
const OPP_STONE_CHANNEL: usize = 2;
/// Moves back from the current position, each marking a (from, to) pair of channels.
const HISTORY_CHANNELS: [(usize, usize); 3] = [(3, 4), (5, 6), (7, 8)];

/// Encoders from a position to the network's input buffers.
pub struct NNInputs;

impl NNInputs {
    /// Fills the spatial and global rows for `next_player` to move.
    ///
    /// Writes the on-board, stone and history channels of every version. Only the leading
    /// `version.row_bin_len(nn_x_len, nn_y_len)` elements of `row_bin` and
    /// `version.num_features_global()` elements of `row_global` are written. Global features
    /// are left at zero for the caller to fill.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_row<T: InputValue>(
        version: InputsVersion,
        board: &Board,
        hist: &BoardHistory,
        next_player: Player,
        params: &MiscNNInputParams,
        nn_x_len: usize,
        nn_y_len: usize,
        layout: Layout,
        row_bin: &mut [T],
        row_global: &mut [T],
    ) {
        assert_fits_lane(board, nn_x_len, nn_y_len);

        let num_global = version.num_features_global();
        row_global[..num_global].fill(T::ZERO);

        let mut builder = ConvInputBuilder::new(
            nn_x_len * nn_y_len,
            layout,
            &mut row_bin[..version.row_bin_len(nn_x_len, nn_y_len)],
        );
        builder.clear();

        let pla = next_player.color();
        let opp = next_player.opp().color();

        builder
            .channel(ON_BOARD_CHANNEL)
            .set_bits_at_indexes(board_positions(board, nn_x_len));

        for y in 0..board.y_size {
            for x in 0..board.x_size {
                let pos = NNPos::xy_to_pos(x, y, nn_x_len);
                let stone_channel = match board.color_at(board.get_loc(x, y)) {
                    c if c == pla => PLA_STONE_CHANNEL,
                    c if c == opp => OPP_STONE_CHANNEL,
                    _ => continue,
                };

                builder.channel(stone_channel).write_at_idx(pos, T::ONE);
            }
        }

        let hide_history = hist.is_game_finished
            || (params.conservative_pass && hist.pass_would_end_game(board, next_player));
        if hide_history {
            return;
        }

        let expected_players = [next_player.opp(), next_player, next_player.opp()];
        let recent = hist
            .move_history
            .iter()
            .rev()
            .zip(expected_players)
            .take_while(|(mv, expected)| mv.pla == *expected)
            .map(|(mv, _)| mv);

        for (mv, (from_channel, to_channel)) in recent.zip(HISTORY_CHANNELS) {
            for (loc, channel) in [(mv.from_loc, from_channel), (mv.to_loc, to_channel)] {
                if board.is_on_board(loc) {
                    let pos = NNPos::loc_to_pos(loc, board.x_size, nn_x_len, nn_y_len);
                    builder.channel(channel).write_at_idx(pos, T::ONE);
                }
            }
        }
    }

    /// Writes the liberty and boundary channels of `version` onto a row filled by
    /// [`Self::fill_row`]. Other channels are left as they are.
    pub fn fill_extra_channels<T: InputValue>(
        version: InputsVersion,
        board: &Board,
        nn_x_len: usize,
        nn_y_len: usize,
        layout: Layout,
        row_bin: &mut [T],
    ) {
        let extra_channels = version.extra_channels();
        if extra_channels.is_empty() {
            return;
        }

        assert_fits_lane(board, nn_x_len, nn_y_len);

        let mut builder = ConvInputBuilder::new(
            nn_x_len * nn_y_len,
            layout,
            &mut row_bin[..version.row_bin_len(nn_x_len, nn_y_len)],
        );

        let boundary = BoundaryTable::get(board.x_size, board.y_size);
        for y in 0..board.y_size {
            for x in 0..board.x_size {
                let pos = NNPos::xy_to_pos(x, y, nn_x_len);
                let loc = board.get_loc(x, y);
                let has_stone = board.color_at(loc) != Color::Empty;
                let mut liberties = None;

                for &extra in extra_channels {
                    let is_set = match extra {
                        ExtraChannel::Liberties(libs) => {
                            has_stone
                                && *liberties.get_or_insert_with(|| board.num_liberties(loc))
                                    == libs
                        }
                        ExtraChannel::OuterBoundary => boundary.is_outer(x, y),
                        ExtraChannel::InnerBoundary => boundary.is_inner(x, y),
                    };

                    if is_set {
                        builder.channel(extra.channel()).write_at_idx(pos, T::ONE);
                    }
                }
            }
        }
    }

    /// Fills the rows with the version, lane and layout of `options`, adds the extra channels
    /// when they are enabled, then moves the spatial row under `params.symmetry`.
    pub fn fill_row_with_options<T: InputValue>(
        options: &NNInputsOptions,
        board: &Board,
        hist: &BoardHistory,
        next_player: Player,
        params: &MiscNNInputParams,
        row_bin: &mut [T],
        row_global: &mut [T],
    ) {
        let version = options.inputs_version;
        let layout = options.layout();
        let (nn_x_len, nn_y_len) = (options.nn_x_len, options.nn_y_len);

        Self::fill_row(
            version,
            board,
            hist,
            next_player,
            params,
            nn_x_len,
            nn_y_len,
            layout,
            row_bin,
            row_global,
        );

        if options.extra_channels {
            Self::fill_extra_channels(version, board, nn_x_len, nn_y_len, layout, row_bin);
        }

        if params.symmetry != 0 {
            let len = options.row_bin_len();
            let filled = row_bin[..len].to_vec();
            SymmetryHelpers::copy_inputs_with_symmetry(
                &filled,
                &mut row_bin[..len],
                1,
                nn_y_len,
                nn_x_len,
                version.num_features_spatial(),
                layout,
                params.symmetry,
            );
        }
    }
}

fn assert_fits_lane(board: &Board, nn_x_len: usize, nn_y_len: usize) {
    assert!(
        nn_x_len <= NNPos::MAX_BOARD_LEN && nn_y_len <= NNPos::MAX_BOARD_LEN,
        "Lane {}x{} is larger than the maximum board",
        nn_x_len,
        nn_y_len
    );
    assert!(
        board.x_size <= nn_x_len && board.y_size <= nn_y_len,
        "Board {}x{} does not fit in lane {}x{}",
        board.x_size,
        board.y_size,
        nn_x_len,
        nn_y_len
    );
}

fn board_positions(board: &Board, nn_x_len: usize) -> impl Iterator<Item = usize> {
    let x_size = board.x_size;
    (0..board.y_size).flat_map(move |y| (0..x_size).map(move |x| NNPos::xy_to_pos(x, y, nn_x_len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Move, Rules};
    use half::f16;

    const NHWC: Layout = Layout::ChannelLast;
    const NCHW: Layout = Layout::ChannelFirst;

    struct Row {
        version: InputsVersion,
        nn_x_len: usize,
        nn_y_len: usize,
        layout: Layout,
        bin: Vec<f32>,
    }

    impl Row {
        fn at(&self, channel: usize, x: usize, y: usize) -> f32 {
            let pos = NNPos::xy_to_pos(x, y, self.nn_x_len);
            self.bin[self.layout.index(
                channel,
                pos,
                self.nn_x_len * self.nn_y_len,
                self.version.num_features_spatial(),
            )]
        }

        fn count(&self, channel: usize) -> usize {
            (0..self.nn_y_len)
                .flat_map(|y| (0..self.nn_x_len).map(move |x| (x, y)))
                .filter(|&(x, y)| self.at(channel, x, y) == 1.0)
                .count()
        }

        fn with_extra_channels(mut self, board: &Board) -> Self {
            NNInputs::fill_extra_channels(
                self.version,
                board,
                self.nn_x_len,
                self.nn_y_len,
                self.layout,
                &mut self.bin,
            );
            self
        }
    }

    fn fill_with_params(
        version: InputsVersion,
        (board, hist): &(Board, BoardHistory),
        pla: Player,
        params: &MiscNNInputParams,
        (nn_x_len, nn_y_len): (usize, usize),
        layout: Layout,
    ) -> Row {
        let mut bin = vec![0.5; version.row_bin_len(nn_x_len, nn_y_len)];
        let mut global = vec![0.5; version.num_features_global()];
        NNInputs::fill_row(
            version,
            board,
            hist,
            pla,
            params,
            nn_x_len,
            nn_y_len,
            layout,
            &mut bin,
            &mut global,
        );

        assert!(global.iter().all(|&v| v == 0.0));
        Row {
            version,
            nn_x_len,
            nn_y_len,
            layout,
            bin,
        }
    }

    fn fill(
        version: InputsVersion,
        position: &(Board, BoardHistory),
        pla: Player,
        lane: (usize, usize),
        layout: Layout,
    ) -> Row {
        let params = MiscNNInputParams::default();
        fill_with_params(version, position, pla, &params, lane, layout)
    }

    fn history_position() -> (Board, BoardHistory) {
        let mut board = Board::new(5, 5);
        board.set_stone(board.get_loc(0, 0), Color::Black);
        board.set_stone(board.get_loc(4, 4), Color::White);
        let mut hist = BoardHistory::new(Rules::default());

        let moves = [
            (Player::Black, (0, 0), (1, 1)),
            (Player::White, (4, 4), (3, 3)),
            (Player::Black, (1, 1), (2, 1)),
        ];
        for (pla, from, to) in moves {
            let from = board.get_loc(from.0, from.1);
            let to = board.get_loc(to.0, to.1);
            hist.make_move(&mut board, Move::new(pla, from, to));
        }

        (board, hist)
    }

    fn passed_position() -> (Board, BoardHistory) {
        let mut board = Board::new(5, 5);
        board.set_stone(board.get_loc(2, 2), Color::Black);
        let mut hist = BoardHistory::new(Rules::default());
        let (from, to) = (board.get_loc(2, 2), board.get_loc(2, 3));
        hist.make_move(&mut board, Move::new(Player::Black, from, to));
        hist.make_move(&mut board, Move::pass(Player::White));

        (board, hist)
    }

    fn liberty_position() -> (Board, BoardHistory) {
        let mut board = Board::new(5, 5);
        board.set_stone(board.get_loc(0, 0), Color::White);
        board.set_stone(board.get_loc(4, 0), Color::Black);
        board.set_stone(board.get_loc(3, 0), Color::White);
        board.set_stone(board.get_loc(2, 4), Color::Black);
        board.set_stone(board.get_loc(2, 2), Color::Black);

        (board, BoardHistory::new(Rules::default()))
    }

    #[test]
    fn test_stones_from_the_movers_perspective() {
        let position = history_position();

        let white = fill(InputsVersion::V5, &position, Player::White, (5, 5), NHWC);
        assert_eq!(white.at(PLA_STONE_CHANNEL, 3, 3), 1.0);
        assert_eq!(white.at(OPP_STONE_CHANNEL, 2, 1), 1.0);
        assert_eq!(white.count(PLA_STONE_CHANNEL), 1);
        assert_eq!(white.count(OPP_STONE_CHANNEL), 1);

        let black = fill(InputsVersion::V5, &position, Player::Black, (5, 5), NHWC);
        assert_eq!(black.at(PLA_STONE_CHANNEL, 2, 1), 1.0);
        assert_eq!(black.at(OPP_STONE_CHANNEL, 3, 3), 1.0);
    }

    #[test]
    fn test_on_board_channel_covers_only_the_board() {
        let position = (Board::new(4, 3), BoardHistory::new(Rules::default()));
        let row = fill(InputsVersion::V3, &position, Player::Black, (6, 5), NCHW);

        assert_eq!(row.count(ON_BOARD_CHANNEL), 12);
        assert_eq!(row.at(ON_BOARD_CHANNEL, 3, 2), 1.0);
        assert_eq!(row.at(ON_BOARD_CHANNEL, 4, 2), 0.0);
        assert_eq!(row.at(ON_BOARD_CHANNEL, 3, 3), 0.0);
    }

    #[test]
    fn test_history_channels() {
        let position = history_position();

        let row = fill(InputsVersion::V3, &position, Player::White, (6, 6), NCHW);

        assert_eq!(row.at(3, 1, 1), 1.0);
        assert_eq!(row.at(4, 2, 1), 1.0);
        assert_eq!(row.at(5, 4, 4), 1.0);
        assert_eq!(row.at(6, 3, 3), 1.0);
        assert_eq!(row.at(7, 0, 0), 1.0);
        assert_eq!(row.at(8, 1, 1), 1.0);
        for channel in 3..=8 {
            assert_eq!(row.count(channel), 1, "channel {}", channel);
        }
    }

    #[test]
    fn test_history_stops_at_unexpected_player() {
        let position = history_position();

        // The last move was by Black, so it is not the opponent's move when Black is to play.
        let row = fill(InputsVersion::V3, &position, Player::Black, (5, 5), NHWC);

        for channel in 3..=8 {
            assert_eq!(row.count(channel), 0, "channel {}", channel);
        }
    }

    #[test]
    fn test_history_skips_pass_locations() {
        let position = passed_position();

        let row = fill(InputsVersion::V7, &position, Player::Black, (5, 5), NHWC);

        assert_eq!(row.count(3), 0);
        assert_eq!(row.count(4), 0);
        assert_eq!(row.at(5, 2, 2), 1.0);
        assert_eq!(row.at(6, 2, 3), 1.0);
    }

    #[test]
    fn test_history_hidden_by_conservative_pass() {
        let position = passed_position();
        let conservative = MiscNNInputParams {
            conservative_pass: true,
            ..MiscNNInputParams::default()
        };

        let row = fill_with_params(
            InputsVersion::V7,
            &position,
            Player::Black,
            &conservative,
            (5, 5),
            NHWC,
        );

        for channel in 3..=8 {
            assert_eq!(row.count(channel), 0, "channel {}", channel);
        }
        assert_eq!(row.at(PLA_STONE_CHANNEL, 2, 3), 1.0);
    }

    #[test]
    fn test_history_hidden_when_game_finished() {
        let (board, mut hist) = history_position();
        hist.is_game_finished = true;
        let position = (board, hist);

        let row = fill(InputsVersion::V3, &position, Player::White, (5, 5), NHWC);

        for channel in 3..=8 {
            assert_eq!(row.count(channel), 0, "channel {}", channel);
        }
    }

    #[test]
    fn test_channels_past_history_stay_zero() {
        let position = liberty_position();

        for version in InputsVersion::ALL {
            for layout in [NHWC, NCHW] {
                let row = fill(version, &position, Player::Black, (5, 5), layout);
                for channel in 9..version.num_features_spatial() {
                    assert_eq!(row.count(channel), 0, "{} channel {}", version, channel);
                }
            }
        }
    }

    #[test]
    fn test_liberty_channels() {
        let position = liberty_position();
        let board = &position.0;

        let row = fill(InputsVersion::V4, &position, Player::Black, (5, 5), NCHW)
            .with_extra_channels(board);

        assert_eq!(row.at(9, 4, 0), 1.0);
        assert_eq!(row.at(10, 0, 0), 1.0);
        assert_eq!(row.at(10, 3, 0), 1.0);
        assert_eq!(row.at(11, 2, 4), 1.0);
        assert_eq!(row.count(9), 1);
        assert_eq!(row.count(10), 2);
        assert_eq!(row.count(11), 1);
        for channel in 9..=11 {
            assert_eq!(row.at(channel, 2, 2), 0.0);
        }
        assert_eq!(row.count(12), 0);

        let v3 = fill(InputsVersion::V3, &position, Player::Black, (5, 5), NCHW)
            .with_extra_channels(board);
        for channel in 9..22 {
            assert_eq!(v3.count(channel), 0, "channel {}", channel);
        }
    }

    #[test]
    fn test_boundary_channels() {
        let position = (Board::new(5, 4), BoardHistory::new(Rules::default()));
        let board = &position.0;

        let v6 = fill(InputsVersion::V6, &position, Player::Black, (7, 7), NHWC)
            .with_extra_channels(board);
        assert_eq!(v6.count(12), 14);
        assert_eq!(v6.count(13), 0);
        assert_eq!(v6.at(12, 0, 0), 1.0);
        assert_eq!(v6.at(12, 5, 0), 0.0);

        let v7 = fill(InputsVersion::V7, &position, Player::Black, (7, 7), NHWC)
            .with_extra_channels(board);
        assert_eq!(v7.count(12), 14);
        assert_eq!(v7.count(13), 6);
        assert_eq!(v7.at(13, 2, 2), 1.0);
    }

    #[test]
    fn test_extra_channels_keep_base_channels() {
        let position = history_position();
        let plain = fill(InputsVersion::V7, &position, Player::White, (5, 5), NHWC);
        let extended = fill(InputsVersion::V7, &position, Player::White, (5, 5), NHWC)
            .with_extra_channels(&position.0);

        for channel in 0..=8 {
            for y in 0..5 {
                for x in 0..5 {
                    assert_eq!(plain.at(channel, x, y), extended.at(channel, x, y));
                }
            }
        }
        assert_eq!(extended.count(12), 16);
    }

    #[test]
    fn test_layouts_hold_the_same_features() {
        let position = history_position();
        for version in InputsVersion::ALL {
            let nhwc = fill(version, &position, Player::White, (7, 6), NHWC)
                .with_extra_channels(&position.0);
            let nchw = fill(version, &position, Player::White, (7, 6), NCHW)
                .with_extra_channels(&position.0);

            for channel in 0..version.num_features_spatial() {
                for y in 0..6 {
                    for x in 0..7 {
                        assert_eq!(nhwc.at(channel, x, y), nchw.at(channel, x, y));
                    }
                }
            }
        }
    }

    #[test]
    fn test_fill_with_options_applies_extras_and_symmetry() {
        let (board, hist) = liberty_position();
        let options = NNInputsOptions {
            inputs_version: InputsVersion::V6,
            nn_x_len: 5,
            nn_y_len: 5,
            use_nhwc: false,
            extra_channels: true,
        };
        let params = MiscNNInputParams {
            symmetry: 6,
            ..MiscNNInputParams::default()
        };

        let mut bin = vec![0.0f32; options.row_bin_len()];
        let mut global = vec![0.0f32; options.row_global_len()];
        NNInputs::fill_row_with_options(
            &options,
            &board,
            &hist,
            Player::Black,
            &params,
            &mut bin,
            &mut global,
        );

        let plain = fill(InputsVersion::V6, &(board.clone(), hist), Player::Black, (5, 5), NCHW)
            .with_extra_channels(&board);
        let mut expected = vec![0.0f32; plain.bin.len()];
        SymmetryHelpers::copy_inputs_with_symmetry(
            &plain.bin,
            &mut expected,
            1,
            5,
            5,
            InputsVersion::V6.num_features_spatial(),
            NCHW,
            6,
        );

        assert_eq!(bin, expected);
        assert_ne!(bin, plain.bin);
    }

    #[test]
    fn test_fill_with_default_options_matches_fill_row() {
        let position = history_position();
        let options = NNInputsOptions {
            nn_x_len: 7,
            nn_y_len: 7,
            ..NNInputsOptions::default()
        };

        let mut bin = vec![0.0f32; options.row_bin_len()];
        let mut global = vec![0.0f32; options.row_global_len()];
        NNInputs::fill_row_with_options(
            &options,
            &position.0,
            &position.1,
            Player::White,
            &MiscNNInputParams::default(),
            &mut bin,
            &mut global,
        );

        let expected = fill(options.inputs_version, &position, Player::White, (7, 7), NHWC);
        assert_eq!(bin, expected.bin);
    }

    #[test]
    fn test_only_leading_part_of_buffers_written() {
        let board = Board::new(5, 5);
        let hist = BoardHistory::new(Rules::default());
        let version = InputsVersion::V5;
        let mut bin = vec![f16::from_f32(0.5); version.row_bin_len(5, 5) + 3];
        let mut global = vec![f16::from_f32(0.5); version.num_features_global() + 2];

        NNInputs::fill_row(
            version,
            &board,
            &hist,
            Player::Black,
            &MiscNNInputParams::default(),
            5,
            5,
            NHWC,
            &mut bin,
            &mut global,
        );

        assert_eq!(&bin[bin.len() - 3..], &[f16::from_f32(0.5); 3]);
        assert_eq!(&global[global.len() - 2..], &[f16::from_f32(0.5); 2]);
        assert_eq!(bin.iter().filter(|&&v| v == f16::ONE).count(), 25);
    }

    #[test]
    #[should_panic(expected = "does not fit in lane")]
    fn test_board_larger_than_lane_panics() {
        let board = Board::new(9, 9);
        let hist = BoardHistory::new(Rules::default());
        let version = InputsVersion::V7;
        let mut bin = vec![0.0f32; version.row_bin_len(7, 7)];
        let mut global = vec![0.0f32; version.num_features_global()];

        NNInputs::fill_row(
            version,
            &board,
            &hist,
            Player::Black,
            &MiscNNInputParams::default(),
            7,
            7,
            NHWC,
            &mut bin,
            &mut global,
        );
    }
}
