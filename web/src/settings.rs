use crate::utils::*;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use whacabol_core as game;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub cadence: game::Cadence,
}

impl StorageKey for Settings {
    const KEY: &'static str = "whacabol:settings:v1";
}

/// `--cadence` values accepted in the location hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum CadenceArg {
    Fixed,
    TimeScaled,
}

impl From<CadenceArg> for game::Cadence {
    fn from(arg: CadenceArg) -> Self {
        match arg {
            CadenceArg::Fixed => Self::Fixed,
            CadenceArg::TimeScaled => Self::TimeScaled,
        }
    }
}

impl Settings {
    /// Stored settings, overridden by whatever the location hash asked for. Overrides are persisted.
    pub(crate) fn load(cadence: Option<CadenceArg>) -> Self {
        let mut settings = Self::local_or_default();
        if let Some(cadence) = cadence {
            settings.cadence = cadence.into();
            settings.local_save();
        }
        log::debug!("settings: {:?}", settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_arg_maps_to_core_cadence() {
        assert_eq!(game::Cadence::from(CadenceArg::Fixed), game::Cadence::Fixed);
        assert_eq!(
            game::Cadence::from(CadenceArg::TimeScaled),
            game::Cadence::TimeScaled
        );
    }

    #[test]
    fn cadence_arg_uses_kebab_case() {
        assert_eq!(
            CadenceArg::from_str("time-scaled", false),
            Ok(CadenceArg::TimeScaled)
        );
    }

    #[test]
    fn storage_key_uses_versioned_namespace() {
        assert_eq!(<Settings as StorageKey>::KEY, "whacabol:settings:v1");
    }
}
