use engine::{Loc, LocKind, Location, MAX_LEN};

/// Conversions between board locations and positions in the network's padded lane.
///
/// A lane is `nn_x_len * nn_y_len` cells, at least as large as the board it holds. The policy is
/// over (from, to) pairs of lane cells, so there is no dedicated pass slot.
pub struct NNPos;

impl NNPos {
    pub const MAX_BOARD_LEN: usize = MAX_LEN;
    pub const MAX_BOARD_AREA: usize = Self::MAX_BOARD_LEN * Self::MAX_BOARD_LEN;
    pub const MAX_NN_POLICY_SIZE: usize = Self::MAX_BOARD_AREA * Self::MAX_BOARD_AREA;
    /// Slack added around the largest board's score range in the score distribution.
    pub const EXTRA_SCORE_DISTR_RADIUS: usize = 60;

    pub fn xy_to_pos(x: usize, y: usize, nn_x_len: usize) -> usize {
        y * nn_x_len + x
    }

    pub fn loc_to_pos(loc: Loc, board_x_size: usize, nn_x_len: usize, nn_y_len: usize) -> usize {
        match loc.kind() {
            LocKind::Pass => nn_x_len * nn_y_len,
            LocKind::Null => nn_x_len * (nn_y_len + 1),
            LocKind::Point => Self::xy_to_pos(
                Location::get_x(loc, board_x_size),
                Location::get_y(loc, board_x_size),
                nn_x_len,
            ),
        }
    }

    pub fn loc_to_double_pos(
        from_loc: Loc,
        to_loc: Loc,
        board_x_size: usize,
        nn_x_len: usize,
        nn_y_len: usize,
    ) -> usize {
        assert!(
            from_loc.kind() == LocKind::Point && to_loc.kind() == LocKind::Point,
            "A paired policy index needs two board points, got {:?} -> {:?}",
            from_loc,
            to_loc
        );

        let from = Self::loc_to_pos(from_loc, board_x_size, nn_x_len, nn_y_len);
        let to = Self::loc_to_pos(to_loc, board_x_size, nn_x_len, nn_y_len);
        from * (nn_x_len * nn_y_len) + to
    }

    pub fn pos_to_loc(
        pos: usize,
        board_x_size: usize,
        board_y_size: usize,
        nn_x_len: usize,
        nn_y_len: usize,
    ) -> Loc {
        if pos == nn_x_len * nn_y_len {
            return Loc::PASS;
        }

        Self::lane_pos_to_loc(pos, board_x_size, board_y_size, nn_x_len)
    }

    pub fn pos_to_from_loc(
        pos: usize,
        board_x_size: usize,
        board_y_size: usize,
        nn_x_len: usize,
        nn_y_len: usize,
    ) -> Loc {
        let from = pos / (nn_x_len * nn_y_len);
        Self::lane_pos_to_loc(from, board_x_size, board_y_size, nn_x_len)
    }

    pub fn pos_to_to_loc(
        pos: usize,
        board_x_size: usize,
        board_y_size: usize,
        nn_x_len: usize,
        nn_y_len: usize,
    ) -> Loc {
        let to = pos % (nn_x_len * nn_y_len);
        Self::lane_pos_to_loc(to, board_x_size, board_y_size, nn_x_len)
    }

    pub fn is_pass_pos(_pos: usize, _nn_x_len: usize, _nn_y_len: usize) -> bool {
        false
    }

    pub fn get_policy_size(nn_x_len: usize, nn_y_len: usize) -> usize {
        let area = nn_x_len * nn_y_len;
        area * area
    }

    // Cells of the lane that fall outside the true board are NULL.
    fn lane_pos_to_loc(
        pos: usize,
        board_x_size: usize,
        board_y_size: usize,
        nn_x_len: usize,
    ) -> Loc {
        let x = pos % nn_x_len;
        let y = pos / nn_x_len;
        if x >= board_x_size || y >= board_y_size {
            return Loc::NULL;
        }

        Location::get_loc(x, y, board_x_size)
    }
}
