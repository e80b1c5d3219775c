use common::Hash128;
use serde::{Deserialize, Serialize};

use super::location::Player;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum KoRule {
    Simple,
    Positional,
    Situational,
    Spight,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum ScoringRule {
    Area,
    Territory,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TaxRule {
    None,
    Seki,
    All,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rules {
    pub ko_rule: KoRule,
    pub scoring_rule: ScoringRule,
    pub tax_rule: TaxRule,
    /// Points added to White's final score.
    pub komi: f32,
}

impl Rules {
    pub const ZOBRIST_KO_RULE_HASH: [Hash128; 4] = [
        Hash128::new(0x3cc7_e0bf_8468_20f6, 0x1fb7_fbde_5fc6_ba4e),
        Hash128::new(0xcc18_f5d4_7188_554a, 0x3a63_152c_23e4_128d),
        Hash128::new(0x3bc1_d3c6_ebd3_da48, 0x1ab5_2def_4a98_f8a0),
        Hash128::new(0x5f2b_cf5e_1b0e_2bfb, 0x11eb_6ff3_d36e_9b6e),
    ];

    pub const ZOBRIST_SCORING_RULE_HASH: [Hash128; 2] = [
        Hash128::new(0x1c80_64ea_f3c9_a2e4, 0xd0a1_b6c3_22f4_7e15),
        Hash128::new(0x8b3e_d3a2_6b77_f49e, 0x6ad2_4315_2fcb_8e2c),
    ];

    pub const ZOBRIST_TAX_RULE_HASH: [Hash128; 3] = [
        Hash128::new(0x72eb_0bd1_8a5d_f8dc, 0x0521_8e4d_c5bc_9c2f),
        Hash128::new(0x9409_b9d5_7bd0_2f0b, 0x2e7a_53b4_ad30_9d31),
        Hash128::new(0xbd7a_1a84_a3d0_40e3, 0x5c25_57c3_2b23_9f8f),
    ];

    pub fn ko_rule_hash(&self) -> Hash128 {
        Self::ZOBRIST_KO_RULE_HASH[self.ko_rule as usize]
    }

    pub fn scoring_rule_hash(&self) -> Hash128 {
        Self::ZOBRIST_SCORING_RULE_HASH[self.scoring_rule as usize]
    }

    pub fn tax_rule_hash(&self) -> Hash128 {
        Self::ZOBRIST_TAX_RULE_HASH[self.tax_rule as usize]
    }

    /// Komi as seen by `player`, positive when it favours them.
    pub fn self_komi(&self, player: Player) -> f32 {
        match player {
            Player::White => self.komi,
            Player::Black => -self.komi,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            ko_rule: KoRule::Simple,
            scoring_rule: ScoringRule::Area,
            tax_rule: TaxRule::None,
            komi: 0.0,
        }
    }
}
