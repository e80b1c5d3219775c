use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported board side.
pub const MAX_LEN: usize = 19;
/// Size of a board array with a one cell wall border, plus room for the sentinels.
pub const MAX_ARR_SIZE: usize = (MAX_LEN + 1) * (MAX_LEN + 2) + 1;

/// A location in a board array.
///
/// Board points are laid out as `(x + 1) + (y + 1) * (x_size + 1)` so that every point
/// is surrounded by walls. The two lowest values are reserved as sentinels and can never
/// collide with a point.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Loc(pub u16);

/// What a [`Loc`] stands for, once the integer encoding is no longer needed.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum LocKind {
    Pass,
    Null,
    Point,
}

impl Loc {
    pub const PASS: Loc = Loc(0);
    pub const NULL: Loc = Loc(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn kind(self) -> LocKind {
        match self {
            Loc::PASS => LocKind::Pass,
            Loc::NULL => LocKind::Null,
            _ => LocKind::Point,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Loc::PASS
    }

    pub fn is_null(self) -> bool {
        self == Loc::NULL
    }

    pub fn offset(self, delta: isize) -> Loc {
        let idx = self.0 as isize + delta;
        assert!(
            idx >= 0 && (idx as usize) < MAX_ARR_SIZE,
            "Offset {} from {:?} leaves the board array",
            delta,
            self
        );

        Loc(idx as u16)
    }
}

impl fmt::Debug for Loc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            LocKind::Pass => write!(f, "pass"),
            LocKind::Null => write!(f, "null"),
            LocKind::Point => write!(f, "Loc({})", self.0),
        }
    }
}

pub struct Location;

impl Location {
    pub fn get_loc(x: usize, y: usize, x_size: usize) -> Loc {
        Loc(((x + 1) + (y + 1) * (x_size + 1)) as u16)
    }

    pub fn get_x(loc: Loc, x_size: usize) -> usize {
        let col = loc.index() % (x_size + 1);
        assert!(
            loc.kind() == LocKind::Point && col > 0,
            "{:?} is not a point on a board of width {}",
            loc,
            x_size
        );
        col - 1
    }

    pub fn get_y(loc: Loc, x_size: usize) -> usize {
        let row = loc.index() / (x_size + 1);
        assert!(
            loc.kind() == LocKind::Point && row > 0,
            "{:?} is not a point on a board of width {}",
            loc,
            x_size
        );
        row - 1
    }

    pub fn is_on_board(loc: Loc, x_size: usize, y_size: usize) -> bool {
        if loc.kind() != LocKind::Point {
            return false;
        }

        let col = loc.index() % (x_size + 1);
        let row = loc.index() / (x_size + 1);
        col >= 1 && col <= x_size && row >= 1 && row <= y_size
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Empty = 0,
    Black = 1,
    White = 2,
    Wall = 3,
}

impl Color {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_player(self) -> Option<Player> {
        match self {
            Color::Black => Some(Player::Black),
            Color::White => Some(Player::White),
            Color::Empty | Color::Wall => None,
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opp(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn color(self) -> Color {
        self.into()
    }
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Color::Black,
            Player::White => Color::White,
        }
    }
}
