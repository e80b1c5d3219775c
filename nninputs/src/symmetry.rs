use engine::{Board, Loc, LocKind, Location};
use model::Layout;

/// The eight dihedral symmetries of a board, numbered by three flags.
///
/// Bit 0 flips y, bit 1 flips x, bit 2 transposes. Coordinates are flipped first and transposed
/// after.
pub struct SymmetryHelpers;

impl SymmetryHelpers {
    pub const NUM_SYMMETRIES: usize = 8;

    /// Copies a batch of `n` inputs of `h * w` cells and `c` channels, moving every cell to where
    /// [`Self::get_sym_loc`] sends it. Transposing is skipped when `h != w`.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_inputs_with_symmetry<T: Copy>(
        src: &[T],
        dst: &mut [T],
        n: usize,
        h: usize,
        w: usize,
        c: usize,
        layout: Layout,
        symmetry: usize,
    ) {
        copy_with_symmetry(src, dst, n, h, w, c, layout, symmetry, false);
    }

    /// Copies a batch of single channel outputs produced under `symmetry` back to the orientation
    /// of the original board.
    pub fn copy_outputs_with_symmetry<T: Copy>(
        src: &[T],
        dst: &mut [T],
        n: usize,
        h: usize,
        w: usize,
        symmetry: usize,
    ) {
        copy_with_symmetry(src, dst, n, h, w, 1, Layout::ChannelFirst, symmetry, true);
    }

    /// Location of `(x, y)` on the symmetric board. Flips use the true board dimensions.
    pub fn get_sym_loc(x: usize, y: usize, board: &Board, symmetry: usize) -> Loc {
        let (transpose, flip_x, flip_y) = flags(symmetry);

        let x = if flip_x { board.x_size - x - 1 } else { x };
        let y = if flip_y { board.y_size - y - 1 } else { y };

        if transpose {
            Location::get_loc(y, x, board.y_size)
        } else {
            Location::get_loc(x, y, board.x_size)
        }
    }

    /// As [`Self::get_sym_loc`], passing the pass and null sentinels through unchanged.
    pub fn get_sym_loc_of(loc: Loc, board: &Board, symmetry: usize) -> Loc {
        match loc.kind() {
            LocKind::Pass | LocKind::Null => loc,
            LocKind::Point => Self::get_sym_loc(
                Location::get_x(loc, board.x_size),
                Location::get_y(loc, board.x_size),
                board,
                symmetry,
            ),
        }
    }

    pub fn get_sym_board(board: &Board, symmetry: usize) -> Board {
        let (transpose, _, _) = flags(symmetry);
        let mut sym_board = if transpose {
            Board::new(board.y_size, board.x_size)
        } else {
            Board::new(board.x_size, board.y_size)
        };

        for y in 0..board.y_size {
            for x in 0..board.x_size {
                let color = board.color_at(board.get_loc(x, y));
                if color.as_player().is_some() {
                    sym_board.set_stone(Self::get_sym_loc(x, y, board, symmetry), color);
                }
            }
        }

        sym_board
    }

    /// The symmetry that undoes `symmetry`.
    pub fn invert(symmetry: usize) -> usize {
        let (transpose, flip_x, flip_y) = flags(symmetry);
        if transpose {
            to_symmetry(true, flip_y, flip_x)
        } else {
            symmetry
        }
    }

    /// The symmetry equivalent to applying `first` and then `second`.
    pub fn compose(first: usize, second: usize) -> usize {
        let (t1, x1, y1) = flags(first);
        let (t2, x2, y2) = flags(second);

        // Flips applied after a transpose act on the swapped axes.
        let (x2, y2) = if t1 { (y2, x2) } else { (x2, y2) };

        to_symmetry(t1 != t2, x1 != x2, y1 != y2)
    }
}

fn flags(symmetry: usize) -> (bool, bool, bool) {
    assert!(
        symmetry < SymmetryHelpers::NUM_SYMMETRIES,
        "Symmetry {} is out of range",
        symmetry
    );

    (symmetry & 0x4 != 0, symmetry & 0x2 != 0, symmetry & 0x1 != 0)
}

fn to_symmetry(transpose: bool, flip_x: bool, flip_y: bool) -> usize {
    (transpose as usize) << 2 | (flip_x as usize) << 1 | flip_y as usize
}

#[allow(clippy::too_many_arguments)]
fn copy_with_symmetry<T: Copy>(
    src: &[T],
    dst: &mut [T],
    n: usize,
    h: usize,
    w: usize,
    c: usize,
    layout: Layout,
    symmetry: usize,
    reverse: bool,
) {
    let len = n * h * w * c;
    assert!(
        src.len() >= len && dst.len() >= len,
        "Buffers of {} and {} elements cannot hold {}x{}x{}x{}",
        src.len(),
        dst.len(),
        n,
        h,
        w,
        c
    );

    let (transpose, flip_x, flip_y) = flags(symmetry);
    let transpose = transpose && h == w;
    let (flip_x, flip_y) = if transpose && !reverse {
        (flip_y, flip_x)
    } else {
        (flip_x, flip_y)
    };

    // Channel last copies whole channel blocks per cell. Channel first treats every
    // (batch, channel) plane as its own single channel image.
    let (num_planes, plane_stride, h_stride, w_stride, block) = if layout.is_nhwc() {
        (n, h * w * c, w * c, c, c)
    } else {
        (n * c, h * w, w, 1, 1)
    };

    let (h_stride, w_stride) = (h_stride as isize, w_stride as isize);
    let (mut h_base_new, mut h_stride_new) = (0, h_stride);
    let (mut w_base_new, mut w_stride_new) = (0, w_stride);

    if flip_y {
        h_base_new = (h as isize - 1) * h_stride_new;
        h_stride_new = -h_stride_new;
    }
    if flip_x {
        w_base_new = (w as isize - 1) * w_stride_new;
        w_stride_new = -w_stride_new;
    }
    if transpose {
        std::mem::swap(&mut h_stride_new, &mut w_stride_new);
    }

    for plane in 0..num_planes {
        let plane_start = (plane * plane_stride) as isize;
        for y in 0..h as isize {
            let row_old = plane_start + y * h_stride;
            let row_new = plane_start + h_base_new + y * h_stride_new;
            for x in 0..w as isize {
                let old = (row_old + x * w_stride) as usize;
                let new = (row_new + w_base_new + x * w_stride_new) as usize;
                dst[new..new + block].copy_from_slice(&src[old..old + block]);
            }
        }
    }
}
