//! Ordinal bucketing of continuous measurements.
//!
//! Bands are checked in ascending order with strict `<` comparisons, so a
//! value sitting exactly on a breakpoint lands in the higher band. Every
//! function is total: anything past the last breakpoint (including NaN)
//! falls through to the top band.

use crate::models::{CloudCoverLevel, PrecipitationLevel, TemperatureLevel, TimeOfDay, WindLevel};

const WIND_BREAKPOINTS: [(f64, WindLevel); 9] = [
    (1.6, WindLevel::Calm),
    (5.5, WindLevel::Light),
    (11.1, WindLevel::Moderate),
    (19.8, WindLevel::Fresh),
    (28.5, WindLevel::Strong),
    (38.9, WindLevel::NearGale),
    (49.6, WindLevel::Gale),
    (61.2, WindLevel::StrongGale),
    (74.2, WindLevel::Storm),
];

const TEMPERATURE_BREAKPOINTS: [(f64, TemperatureLevel); 7] = [
    (-20.0, TemperatureLevel::ExtremeCold),
    (-10.0, TemperatureLevel::VeryCold),
    (0.0, TemperatureLevel::Cold),
    (10.0, TemperatureLevel::Cool),
    (20.0, TemperatureLevel::Mild),
    (30.0, TemperatureLevel::Warm),
    (40.0, TemperatureLevel::Hot),
];

fn first_band_below<T: Copy>(value: f64, bands: &[(f64, T)], top: T) -> T {
    bands
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|(_, level)| *level)
        .unwrap_or(top)
}

/// Hour of day (0-23) to part of day
pub fn time_of_day(hour: u32) -> TimeOfDay {
    match hour {
        5..=11 => TimeOfDay::Morning,
        12..=17 => TimeOfDay::Afternoon,
        18..=21 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

/// Millimetres per hour
pub fn precipitation_level(mm: f64) -> PrecipitationLevel {
    if mm == 0.0 {
        PrecipitationLevel::No
    } else if mm < 2.5 {
        PrecipitationLevel::Light
    } else if mm < 7.6 {
        PrecipitationLevel::Moderate
    } else if mm < 50.8 {
        PrecipitationLevel::Heavy
    } else {
        PrecipitationLevel::Violent
    }
}

/// Kilometres per hour at 10 m
pub fn wind_level(kmh: f64) -> WindLevel {
    first_band_below(kmh, &WIND_BREAKPOINTS, WindLevel::ViolentStorm)
}

/// Degrees Celsius at 2 m
pub fn temperature_level(celsius: f64) -> TemperatureLevel {
    first_band_below(celsius, &TEMPERATURE_BREAKPOINTS, TemperatureLevel::VeryHot)
}

/// Percentage of sky covered
pub fn cloud_cover_level(percent: f64) -> CloudCoverLevel {
    if percent == 0.0 {
        CloudCoverLevel::No
    } else if percent > 0.0 && percent < 10.0 {
        CloudCoverLevel::Few
    } else if (10.0..25.0).contains(&percent) {
        CloudCoverLevel::Isolated
    } else if (25.0..50.0).contains(&percent) {
        CloudCoverLevel::Scattered
    } else if (50.0..90.0).contains(&percent) {
        CloudCoverLevel::Broken
    } else {
        CloudCoverLevel::Overcast
    }
}
