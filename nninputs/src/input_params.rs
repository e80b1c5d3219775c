use anyhow::{bail, Result};
use common::{Config, ConfigLoader, Hash128};
use model::{Layout, NNPos};
use serde::{Deserialize, Serialize};

use super::inputs_version::InputsVersion;
use super::symmetry::SymmetryHelpers;

/// Evaluation parameters that change what the network is asked, and so take part in the
/// identity hash.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct MiscNNInputParams {
    /// Share of a win a drawn game is worth to White.
    pub draw_equivalent_wins_for_white: f64,
    /// Play as if a pass that would end the game does not, hiding the history that shows it.
    pub conservative_pass: bool,
    pub nn_policy_temperature: f32,
    /// Symmetry the spatial row is moved under by [`crate::NNInputs::fill_row_with_options`].
    pub symmetry: usize,
}

impl MiscNNInputParams {
    pub const ZOBRIST_CONSERVATIVE_PASS: Hash128 =
        Hash128::new(0x0c2b_96f4_b8ae_2da9, 0x5a14_dee2_08fe_c0ed);
    pub const ZOBRIST_NN_POLICY_TEMP: Hash128 =
        Hash128::new(0xebcb_dfee_c6f4_334b, 0xb85e_43ee_243b_5ad2);
}

impl Default for MiscNNInputParams {
    fn default() -> Self {
        Self {
            draw_equivalent_wins_for_white: 0.5,
            conservative_pass: false,
            nn_policy_temperature: 1.0,
            symmetry: 0,
        }
    }
}

impl Config for MiscNNInputParams {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();
        let params = Self {
            draw_equivalent_wins_for_white: config.get_f32_or(
                "draw_equivalent_wins_for_white",
                defaults.draw_equivalent_wins_for_white as f32,
            ) as f64,
            conservative_pass: config
                .get_bool_or("conservative_pass", defaults.conservative_pass),
            nn_policy_temperature: config
                .get_f32_or("nn_policy_temperature", defaults.nn_policy_temperature),
            symmetry: config.get_usize_or("symmetry", defaults.symmetry),
        };

        if !(0.0..=1.0).contains(&params.draw_equivalent_wins_for_white) {
            bail!(
                "draw_equivalent_wins_for_white must be within [0, 1], got {}",
                params.draw_equivalent_wins_for_white
            );
        }
        if params.nn_policy_temperature <= 0.0 || !params.nn_policy_temperature.is_finite() {
            bail!(
                "nn_policy_temperature must be positive, got {}",
                params.nn_policy_temperature
            );
        }
        if params.symmetry >= SymmetryHelpers::NUM_SYMMETRIES {
            bail!(
                "symmetry must be below {}, got {}",
                SymmetryHelpers::NUM_SYMMETRIES,
                params.symmetry
            );
        }

        Ok(params)
    }
}

/// Shape and layout of the buffers the encoder fills.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NNInputsOptions {
    pub inputs_version: InputsVersion,
    pub nn_x_len: usize,
    pub nn_y_len: usize,
    pub use_nhwc: bool,
    /// Also write the liberty and boundary channels of the version. Off by default, which
    /// leaves every channel past the history at zero.
    pub extra_channels: bool,
}

impl NNInputsOptions {
    pub fn layout(&self) -> Layout {
        Layout::from_use_nhwc(self.use_nhwc)
    }

    pub fn row_bin_len(&self) -> usize {
        self.inputs_version.row_bin_len(self.nn_x_len, self.nn_y_len)
    }

    pub fn row_global_len(&self) -> usize {
        self.inputs_version.num_features_global()
    }
}

impl Default for NNInputsOptions {
    fn default() -> Self {
        Self {
            inputs_version: InputsVersion::V7,
            nn_x_len: NNPos::MAX_BOARD_LEN,
            nn_y_len: NNPos::MAX_BOARD_LEN,
            use_nhwc: true,
            extra_channels: false,
        }
    }
}

impl Config for NNInputsOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();
        let inputs_version = match config.get("inputs_version") {
            Some(value) => match value.as_usize() {
                Some(number) => InputsVersion::from_number(number)?,
                None => bail!("inputs_version must be a number, got {:?}", value),
            },
            None => defaults.inputs_version,
        };

        let options = Self {
            inputs_version,
            nn_x_len: config.get_usize_or("nn_x_len", defaults.nn_x_len),
            nn_y_len: config.get_usize_or("nn_y_len", defaults.nn_y_len),
            use_nhwc: config.get_bool_or("use_nhwc", defaults.use_nhwc),
            extra_channels: config.get_bool_or("extra_channels", defaults.extra_channels),
        };

        for (name, len) in [("nn_x_len", options.nn_x_len), ("nn_y_len", options.nn_y_len)] {
            if !(1..=NNPos::MAX_BOARD_LEN).contains(&len) {
                bail!(
                    "{} must be between 1 and {}, got {}",
                    name,
                    NNPos::MAX_BOARD_LEN,
                    len
                );
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn loader(contents: &str) -> ConfigLoader {
        ConfigLoader::from_str(contents, "nn_inputs".to_string()).unwrap()
    }

    #[test]
    fn test_misc_params_defaults() {
        let params = loader("nn_inputs {}").load::<MiscNNInputParams>().unwrap();

        assert_eq!(params, MiscNNInputParams::default());
    }

    #[test]
    fn test_misc_params_from_config() {
        let params = loader(
            r#"
            nn_inputs {
                draw_equivalent_wins_for_white = 0.25
                conservative_pass = true
                nn_policy_temperature = 0.8
                symmetry = 5
            }
            "#,
        )
        .load::<MiscNNInputParams>()
        .unwrap();

        assert_approx_eq!(params.draw_equivalent_wins_for_white, 0.25);
        assert!(params.conservative_pass);
        assert_approx_eq!(params.nn_policy_temperature, 0.8);
        assert_eq!(params.symmetry, 5);
    }

    #[test]
    fn test_misc_params_rejects_bad_values() {
        assert!(loader("symmetry = 8").load::<MiscNNInputParams>().is_err());
        assert!(loader("nn_policy_temperature = 0").load::<MiscNNInputParams>().is_err());
        assert!(loader("draw_equivalent_wins_for_white = 1.5")
            .load::<MiscNNInputParams>()
            .is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = loader("nn_inputs {}").load::<NNInputsOptions>().unwrap();

        assert_eq!(options, NNInputsOptions::default());
        assert_eq!(options.layout(), Layout::ChannelLast);
        assert_eq!(options.row_bin_len(), 22 * 19 * 19);
        assert_eq!(options.row_global_len(), 19);
        assert!(!options.extra_channels);
    }

    #[test]
    fn test_options_from_config() {
        let options = loader(
            r#"
            nn_inputs {
                inputs_version = 5
                nn_x_len = 7
                nn_y_len = 9
                use_nhwc = false
                extra_channels = true
            }
            "#,
        )
        .load::<NNInputsOptions>()
        .unwrap();

        assert_eq!(options.inputs_version, InputsVersion::V5);
        assert_eq!((options.nn_x_len, options.nn_y_len), (7, 9));
        assert_eq!(options.layout(), Layout::ChannelFirst);
        assert_eq!(options.row_bin_len(), 13 * 63);
        assert!(options.extra_channels);
    }

    #[test]
    fn test_options_rejects_bad_values() {
        assert!(loader("inputs_version = 9").load::<NNInputsOptions>().is_err());
        assert!(loader("inputs_version = true").load::<NNInputsOptions>().is_err());
        assert!(loader("nn_x_len = 20").load::<NNInputsOptions>().is_err());
        assert!(loader("nn_y_len = 0").load::<NNInputsOptions>().is_err());
    }

    #[test]
    fn test_zobrist_constants_are_distinct() {
        let all = [
            MiscNNInputParams::ZOBRIST_CONSERVATIVE_PASS,
            MiscNNInputParams::ZOBRIST_NN_POLICY_TEMP,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
