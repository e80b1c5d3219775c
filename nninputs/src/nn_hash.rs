use common::{basic_lcong, basic_lcong2, murmur_mix, Hash128};
use engine::{Board, BoardHistory, Player, ZOBRIST};

use super::fill_row::NNInputs;
use super::input_params::MiscNNInputParams;

impl NNInputs {
    /// Cache key of a network evaluation. Covers everything the encoder and the evaluation
    /// parameters make visible to the network.
    pub fn compute_identity_hash(
        board: &Board,
        hist: &BoardHistory,
        next_player: Player,
        params: &MiscNNInputParams,
    ) -> Hash128 {
        let mut hash = board.pos_hash;
        hash ^= ZOBRIST.player_hash(next_player);

        assert!(
            hist.encore_phase < ZOBRIST.encore.len(),
            "Encore phase {} is out of range",
            hist.encore_phase
        );
        hash ^= ZOBRIST.encore[hist.encore_phase];

        let self_komi = hist.current_self_komi(next_player);
        let komi_discretized = (self_komi * 256.0) as i64;
        let komi_hash = murmur_mix(komi_discretized as u64);
        hash.hash0 ^= komi_hash;
        hash.hash1 ^= basic_lcong(komi_hash);

        hash ^= hist.rules.ko_rule_hash();
        hash ^= hist.rules.scoring_rule_hash();
        hash ^= hist.rules.tax_rule_hash();

        if hist.is_game_finished {
            hash ^= ZOBRIST.game_is_over;
        }

        // Matches the condition under which the encoder hides the history.
        if params.conservative_pass && hist.pass_would_end_game(board, next_player) {
            hash ^= MiscNNInputParams::ZOBRIST_CONSERVATIVE_PASS;
        }

        if params.nn_policy_temperature != 1.0 {
            let temp_discretized = (params.nn_policy_temperature * 2048.0) as i64;
            let temp_hash = murmur_mix(temp_discretized as u64);
            hash.hash0 ^= temp_hash;
            hash.hash1 ^= basic_lcong2(temp_hash);
            hash ^= MiscNNInputParams::ZOBRIST_NN_POLICY_TEMP;
        }

        hash
    }
}
