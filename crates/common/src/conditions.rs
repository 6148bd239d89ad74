//! Display-side classification of sea state and wind direction.

use crate::types::Measurement;

/// Human-readable sea state derived from wave height and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeaState {
    VeryCalm,
    Calm,
    GentleSwells,
    Choppy,
    Moderate,
    ModerateWaves,
    RollingSwells,
    RoughAndChoppy,
    Rough,
    LargeSwells,
    VeryRough,
    Unknown,
}

impl SeaState {
    pub fn label(&self) -> &'static str {
        match self {
            SeaState::VeryCalm => "Very Calm",
            SeaState::Calm => "Calm",
            SeaState::GentleSwells => "Gentle Swells",
            SeaState::Choppy => "Choppy",
            SeaState::Moderate => "Moderate",
            SeaState::ModerateWaves => "Moderate Waves",
            SeaState::RollingSwells => "Rolling Swells",
            SeaState::RoughAndChoppy => "Rough & Choppy",
            SeaState::Rough => "Rough",
            SeaState::LargeSwells => "Large Swells",
            SeaState::VeryRough => "Very Rough",
            SeaState::Unknown => "N/A",
        }
    }
}

/// Classify wave height (m) and period (s) into a sea state.
///
/// Short-period waves of a given height read rougher than long-period
/// swells of the same height.
pub fn sea_state(wave_height: Measurement, wave_period: Measurement) -> SeaState {
    let (Some(height), Some(period)) = (wave_height.value(), wave_period.value()) else {
        return SeaState::Unknown;
    };

    if height < 0.5 {
        if period < 6.0 {
            SeaState::Calm
        } else {
            SeaState::VeryCalm
        }
    } else if height < 1.0 {
        if period < 6.0 {
            SeaState::Choppy
        } else if period < 10.0 {
            SeaState::Moderate
        } else {
            SeaState::GentleSwells
        }
    } else if height < 1.5 {
        if period < 6.0 {
            SeaState::RoughAndChoppy
        } else if period < 10.0 {
            SeaState::ModerateWaves
        } else {
            SeaState::RollingSwells
        }
    } else if height < 2.5 {
        if period < 8.0 {
            SeaState::Rough
        } else {
            SeaState::LargeSwells
        }
    } else {
        SeaState::VeryRough
    }
}

/// Arrow glyph showing where the wind blows toward, from a
/// meteorological "coming from" direction in degrees.
pub fn wind_arrow(direction: Measurement) -> Option<&'static str> {
    const ARROWS: [&str; 8] = ["↓", "↙", "←", "↖", "↑", "↗", "→", "↘"];
    let degrees = direction.value()?;
    let index = (((degrees + 22.5) / 45.0).floor() as i64).rem_euclid(8) as usize;
    Some(ARROWS[index])
}
