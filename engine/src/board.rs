use common::Hash128;
use std::fmt;

use super::location::{Color, Loc, LocKind, Location, MAX_ARR_SIZE, MAX_LEN};
use super::zobrist::ZOBRIST;

/// Stone placement of a rectangular board, together with an incrementally maintained hash.
///
/// Holds no rules. Legality, captures and scoring belong to the caller.
#[derive(Clone)]
pub struct Board {
    pub x_size: usize,
    pub y_size: usize,
    /// Indexed by [`Loc::index`]. Cells outside the board are [`Color::Wall`].
    pub colors: [Color; MAX_ARR_SIZE],
    /// Hash of the stones and the board dimensions.
    pub pos_hash: Hash128,
    /// Offsets to the north, west, east and south neighbours of a location.
    pub adj_offsets: [isize; 4],
}

impl Board {
    pub fn new(x_size: usize, y_size: usize) -> Self {
        assert!(
            (1..=MAX_LEN).contains(&x_size) && (1..=MAX_LEN).contains(&y_size),
            "Board size {}x{} must be between 1 and {}",
            x_size,
            y_size,
            MAX_LEN
        );

        let mut colors = [Color::Wall; MAX_ARR_SIZE];
        for y in 0..y_size {
            for x in 0..x_size {
                colors[Location::get_loc(x, y, x_size).index()] = Color::Empty;
            }
        }

        let stride = (x_size + 1) as isize;

        Self {
            x_size,
            y_size,
            colors,
            pos_hash: ZOBRIST.size_x[x_size] ^ ZOBRIST.size_y[y_size],
            adj_offsets: [-stride, -1, 1, stride],
        }
    }

    pub fn get_loc(&self, x: usize, y: usize) -> Loc {
        Location::get_loc(x, y, self.x_size)
    }

    pub fn is_on_board(&self, loc: Loc) -> bool {
        Location::is_on_board(loc, self.x_size, self.y_size)
    }

    pub fn color_at(&self, loc: Loc) -> Color {
        self.colors[loc.index()]
    }

    pub fn set_stone(&mut self, loc: Loc, color: Color) {
        assert!(
            self.is_on_board(loc),
            "Cannot set {:?} at {:?}, it is not on the board",
            color,
            loc
        );
        assert_ne!(color, Color::Wall, "Cannot place a wall on the board");

        let old = self.colors[loc.index()];
        self.pos_hash ^= ZOBRIST.board[loc.index()][old.index()];
        self.pos_hash ^= ZOBRIST.board[loc.index()][color.index()];
        self.colors[loc.index()] = color;
    }

    /// Moves the stone at `from_loc` to the empty `to_loc`.
    pub fn move_stone(&mut self, from_loc: Loc, to_loc: Loc) {
        let color = self.color_at(from_loc);
        assert!(
            color.as_player().is_some(),
            "There is no stone to move at {:?}",
            from_loc
        );
        assert_eq!(
            self.color_at(to_loc),
            Color::Empty,
            "Destination {:?} is occupied",
            to_loc
        );

        self.set_stone(from_loc, Color::Empty);
        self.set_stone(to_loc, color);
    }

    /// Number of distinct empty points adjacent to the chain containing `loc`. Zero when `loc`
    /// holds no stone.
    pub fn num_liberties(&self, loc: Loc) -> usize {
        if loc.kind() != LocKind::Point {
            return 0;
        }

        let color = self.color_at(loc);
        if color.as_player().is_none() {
            return 0;
        }

        let mut in_chain = [false; MAX_ARR_SIZE];
        let mut is_liberty = [false; MAX_ARR_SIZE];
        let mut stack = vec![loc];
        let mut liberties = 0;
        in_chain[loc.index()] = true;

        while let Some(next) = stack.pop() {
            for offset in self.adj_offsets {
                let adj = next.offset(offset);
                match self.color_at(adj) {
                    Color::Empty if !is_liberty[adj.index()] => {
                        is_liberty[adj.index()] = true;
                        liberties += 1;
                    }
                    c if c == color && !in_chain[adj.index()] => {
                        in_chain[adj.index()] = true;
                        stack.push(adj);
                    }
                    _ => {}
                }
            }
        }

        liberties
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.y_size {
            for x in 0..self.x_size {
                let c = match self.color_at(self.get_loc(x, y)) {
                    Color::Black => 'X',
                    Color::White => 'O',
                    _ => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Board {}x{} {}", self.x_size, self.y_size, self.pos_hash)?;
        write!(f, "{}", self)
    }
}
