//! Procedural weather for the dashboard header.
//!
//! The condition and the current temperature depend only on the date and the
//! hour, so every call within the same hour agrees on them. Humidity, wind and
//! the forecast jitter come from the caller's random source and change on
//! every call.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use rand::Rng;
use serde::Serialize;

const PEAK_HOUR: f64 = 14.0;
const FORECAST_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub name: &'static str,
    pub icon: &'static str,
    pub min_temp: i32,
    pub max_temp: i32,
}

pub const CONDITIONS: [Condition; 5] = [
    Condition {
        name: "Sunny",
        icon: "sun",
        min_temp: 22,
        max_temp: 32,
    },
    Condition {
        name: "Partly Cloudy",
        icon: "cloud-sun",
        min_temp: 20,
        max_temp: 28,
    },
    Condition {
        name: "Cloudy",
        icon: "cloud",
        min_temp: 18,
        max_temp: 25,
    },
    Condition {
        name: "Light Rain",
        icon: "cloud-rain",
        min_temp: 16,
        max_temp: 22,
    },
    Condition {
        name: "Clear",
        icon: "moon-stars",
        min_temp: 18,
        max_temp: 26,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub day: String,
    pub high: i32,
    pub low: i32,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature: i32,
    pub condition: &'static str,
    pub icon: &'static str,
    pub humidity: u32,
    pub wind: u32,
    pub forecast: Vec<ForecastDay>,
}

fn condition_index(day_of_month: u32) -> usize {
    day_of_month as usize % CONDITIONS.len()
}

/// The condition assigned to the whole calendar day of `now`.
pub fn condition_for(now: NaiveDateTime) -> &'static Condition {
    &CONDITIONS[condition_index(now.day())]
}

/// Temperature for `hour`, highest at 14:00 and falling off linearly toward
/// midnight. Halves round to the even neighbour.
pub fn temperature_at(condition: &Condition, hour: u32) -> i32 {
    let min = f64::from(condition.min_temp);
    let spread = f64::from(condition.max_temp - condition.min_temp);
    let distance = (PEAK_HOUR - f64::from(hour)).abs();
    let temp = min + spread * (0.5 + 0.5 * (1.0 - distance / PEAK_HOUR));
    temp.round_ties_even() as i32
}

pub fn generate_weather<R>(now: NaiveDateTime, location: &str, rng: &mut R) -> WeatherSnapshot
where
    R: Rng + ?Sized,
{
    let day_index = condition_index(now.day());
    let today = &CONDITIONS[day_index];

    let forecast = (0..FORECAST_DAYS)
        .map(|offset| {
            let condition = &CONDITIONS[(day_index + offset as usize) % CONDITIONS.len()];
            ForecastDay {
                day: (now + Duration::days(offset)).format("%a").to_string(),
                high: condition.max_temp + rng.gen_range(-2..=2),
                low: condition.min_temp + rng.gen_range(-2..=2),
                icon: condition.icon,
            }
        })
        .collect();

    WeatherSnapshot {
        location: location.to_string(),
        temperature: temperature_at(today, now.hour()),
        condition: today.name,
        icon: today.icon,
        humidity: 50 + rng.gen_range(0..=30),
        wind: 5 + rng.gen_range(0..=15),
        forecast,
    }
}
