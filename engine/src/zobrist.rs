use common::{create_rng_from_seed, Hash128};
use once_cell::sync::Lazy;

use super::location::{Color, Player, MAX_ARR_SIZE, MAX_LEN};

const ZOBRIST_SEED: u64 = 0x5A0B_8157_0E1D_C0DE;

/// Random constants the board collaborator hashes positions with.
pub struct ZobristTables {
    /// Indexed by `[loc][color]`.
    pub board: Vec<[Hash128; 4]>,
    pub size_x: [Hash128; MAX_LEN + 1],
    pub size_y: [Hash128; MAX_LEN + 1],
    /// Indexed by [`Color::index`] of the player to move.
    pub player: [Hash128; 4],
    pub encore: [Hash128; 3],
    pub game_is_over: Hash128,
}

impl ZobristTables {
    fn generate() -> Self {
        let mut rng = create_rng_from_seed(ZOBRIST_SEED);

        let board = (0..MAX_ARR_SIZE)
            .map(|_| {
                // Empty and wall cells never contribute to a position hash.
                let black = Hash128::random(&mut rng);
                let white = Hash128::random(&mut rng);
                [Hash128::default(), black, white, Hash128::default()]
            })
            .collect();

        let size_x = std::array::from_fn(|_| Hash128::random(&mut rng));
        let size_y = std::array::from_fn(|_| Hash128::random(&mut rng));
        let player = std::array::from_fn(|_| Hash128::random(&mut rng));
        let encore = std::array::from_fn(|_| Hash128::random(&mut rng));
        let game_is_over = Hash128::random(&mut rng);

        Self {
            board,
            size_x,
            size_y,
            player,
            encore,
            game_is_over,
        }
    }

    pub fn player_hash(&self, player: Player) -> Hash128 {
        self.player[Color::from(player).index()]
    }
}

pub static ZOBRIST: Lazy<ZobristTables> = Lazy::new(ZobristTables::generate);
