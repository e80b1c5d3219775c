use anyhow::{anyhow, Result};
use engine::MAX_LEN;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Versions of the feature encoding understood by the networks.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum InputsVersion {
    V3,
    V4,
    V5,
    V6,
    V7,
}

/// An optional spatial channel of some versions, past the on-board, stone and history channels.
/// Written only when requested through [`crate::NNInputs::fill_extra_channels`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ExtraChannel {
    /// Stones whose chain has exactly this many liberties.
    Liberties(usize),
    /// The outermost ring of the board.
    OuterBoundary,
    /// The ring just inside the outermost one.
    InnerBoundary,
}

impl ExtraChannel {
    pub fn channel(self) -> usize {
        match self {
            ExtraChannel::Liberties(libs) => 8 + libs,
            ExtraChannel::OuterBoundary => 12,
            ExtraChannel::InnerBoundary => 13,
        }
    }
}

const LIBERTIES: [ExtraChannel; 3] = [
    ExtraChannel::Liberties(1),
    ExtraChannel::Liberties(2),
    ExtraChannel::Liberties(3),
];

const V6_EXTRA_CHANNELS: [ExtraChannel; 4] = [
    LIBERTIES[0],
    LIBERTIES[1],
    LIBERTIES[2],
    ExtraChannel::OuterBoundary,
];

const V7_EXTRA_CHANNELS: [ExtraChannel; 5] = [
    LIBERTIES[0],
    LIBERTIES[1],
    LIBERTIES[2],
    ExtraChannel::OuterBoundary,
    ExtraChannel::InnerBoundary,
];

impl InputsVersion {
    pub const ALL: [InputsVersion; 5] = [
        InputsVersion::V3,
        InputsVersion::V4,
        InputsVersion::V5,
        InputsVersion::V6,
        InputsVersion::V7,
    ];

    pub fn number(self) -> usize {
        match self {
            InputsVersion::V3 => 3,
            InputsVersion::V4 => 4,
            InputsVersion::V5 => 5,
            InputsVersion::V6 => 6,
            InputsVersion::V7 => 7,
        }
    }

    pub fn from_number(number: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.number() == number)
            .ok_or_else(|| anyhow!("Inputs version {} is not supported", number))
    }

    pub fn num_features_spatial(self) -> usize {
        match self {
            InputsVersion::V5 => 13,
            _ => 22,
        }
    }

    pub fn num_features_global(self) -> usize {
        match self {
            InputsVersion::V3 | InputsVersion::V4 => 14,
            InputsVersion::V5 => 12,
            InputsVersion::V6 => 16,
            InputsVersion::V7 => 19,
        }
    }

    pub fn extra_channels(self) -> &'static [ExtraChannel] {
        match self {
            InputsVersion::V3 | InputsVersion::V5 => &[],
            InputsVersion::V4 => &LIBERTIES,
            InputsVersion::V6 => &V6_EXTRA_CHANNELS,
            InputsVersion::V7 => &V7_EXTRA_CHANNELS,
        }
    }

    /// Length of the spatial buffer for a lane of `nn_x_len * nn_y_len` cells.
    pub fn row_bin_len(self, nn_x_len: usize, nn_y_len: usize) -> usize {
        self.num_features_spatial() * nn_x_len * nn_y_len
    }
}

impl FromStr for InputsVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches(['v', 'V']);
        let number = digits
            .parse::<usize>()
            .map_err(|_| anyhow!("Inputs version {:?} is not a number", s))?;

        Self::from_number(number)
    }
}

impl fmt::Display for InputsVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Ring membership of every point of a board, counted inwards from the edge.
pub struct BoundaryTable {
    x_size: usize,
    ring: Vec<u8>,
}

static BOUNDARY_TABLES: Lazy<Vec<BoundaryTable>> = Lazy::new(|| {
    (1..=MAX_LEN)
        .flat_map(|y_size| (1..=MAX_LEN).map(move |x_size| BoundaryTable::new(x_size, y_size)))
        .collect()
});

impl BoundaryTable {
    fn new(x_size: usize, y_size: usize) -> Self {
        let ring = (0..y_size)
            .flat_map(|y| {
                (0..x_size).map(move |x| x.min(y).min(x_size - 1 - x).min(y_size - 1 - y) as u8)
            })
            .collect();

        Self { x_size, ring }
    }

    /// The precomputed table for a board size.
    pub fn get(x_size: usize, y_size: usize) -> &'static BoundaryTable {
        assert!(
            (1..=MAX_LEN).contains(&x_size) && (1..=MAX_LEN).contains(&y_size),
            "No boundary table for a {}x{} board",
            x_size,
            y_size
        );

        &BOUNDARY_TABLES[(y_size - 1) * MAX_LEN + (x_size - 1)]
    }

    pub fn is_outer(&self, x: usize, y: usize) -> bool {
        self.ring[y * self.x_size + x] == 0
    }

    pub fn is_inner(&self, x: usize, y: usize) -> bool {
        self.ring[y * self.x_size + x] == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        let counts = InputsVersion::ALL
            .iter()
            .map(|v| (v.number(), v.num_features_spatial(), v.num_features_global()))
            .collect::<Vec<_>>();

        assert_eq!(
            counts,
            vec![(3, 22, 14), (4, 22, 14), (5, 13, 12), (6, 22, 16), (7, 22, 19)]
        );
    }

    #[test]
    fn test_extra_channels_fit_in_version() {
        for version in InputsVersion::ALL {
            for extra in version.extra_channels() {
                assert!(extra.channel() > 8);
                assert!(extra.channel() < version.num_features_spatial());
            }
        }

        assert!(InputsVersion::V3.extra_channels().is_empty());
        assert_eq!(ExtraChannel::Liberties(1).channel(), 9);
        assert_eq!(ExtraChannel::Liberties(3).channel(), 11);
        assert_eq!(
            InputsVersion::V7.extra_channels().last(),
            Some(&ExtraChannel::InnerBoundary)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("7".parse::<InputsVersion>().unwrap(), InputsVersion::V7);
        assert_eq!("v4".parse::<InputsVersion>().unwrap(), InputsVersion::V4);
        assert_eq!(InputsVersion::V5.to_string(), "v5");
        assert!("8".parse::<InputsVersion>().is_err());
        assert!("seven".parse::<InputsVersion>().is_err());
        assert!(InputsVersion::from_number(2).is_err());
    }

    #[test]
    fn test_row_bin_len() {
        assert_eq!(InputsVersion::V5.row_bin_len(7, 7), 13 * 49);
        assert_eq!(InputsVersion::V7.row_bin_len(19, 19), 22 * 361);
    }

    #[test]
    fn test_boundary_rings() {
        let table = BoundaryTable::get(5, 4);

        assert!(table.is_outer(0, 0));
        assert!(table.is_outer(4, 2));
        assert!(table.is_outer(2, 3));
        assert!(table.is_inner(1, 1));
        assert!(table.is_inner(3, 2));
        assert!(!table.is_outer(2, 1) && table.is_inner(2, 1));

        let big = BoundaryTable::get(7, 7);
        assert!(!big.is_outer(3, 3) && !big.is_inner(3, 3));
    }

    #[test]
    fn test_one_by_one_board_is_all_edge() {
        assert!(BoundaryTable::get(1, 1).is_outer(0, 0));
    }
}
