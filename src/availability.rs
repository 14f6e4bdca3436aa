//! Parsing of teacher availability tokens.
//!
//! A token is a day name (`Monday`), an hour range (`8-14`) or a negated token (`!Physics`).
//! Negated tokens are kept verbatim and only consulted by the soft preference check.

use crate::data::{Day, Interval};
use crate::error::AvailabilityError;
use log::warn;

const NEGATION: char = '!';
const WINDOW_HOURS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Day(String),
    Hours(Vec<Interval>),
    Exclusion(String),
}

pub fn parse_token(token: &str) -> Result<Token, AvailabilityError> {
    let token = token.trim();
    if let Some(excluded) = token.strip_prefix(NEGATION) {
        return Ok(Token::Exclusion(excluded.to_owned()));
    }
    if !token.chars().any(|c| c.is_ascii_digit()) {
        return Ok(Token::Day(token.to_owned()));
    }

    let (lo, hi) = token
        .split_once('-')
        .ok_or_else(|| AvailabilityError::MalformedRange(token.to_owned()))?;
    let bound = |text: &str| {
        text.trim()
            .parse::<u32>()
            .map_err(|_| AvailabilityError::NonNumericBound {
                token: token.to_owned(),
                bound: text.trim().to_owned(),
            })
    };
    let (lo, hi) = (bound(lo)?, bound(hi)?);

    let windows = two_hour_windows(lo, hi);
    if windows.is_empty() {
        warn!("hour range '{token}' has no {WINDOW_HOURS}-hour windows and admits nothing");
    }
    Ok(Token::Hours(windows))
}

/// Back-to-back two hour windows covering `[lo, hi]`. Ranges whose width is not a positive
/// multiple of two yield no windows.
pub fn two_hour_windows(lo: u32, hi: u32) -> Vec<Interval> {
    match hi.checked_sub(lo) {
        Some(width) if width >= WINDOW_HOURS && width % WINDOW_HOURS == 0 => (lo..hi)
            .step_by(WINDOW_HOURS as usize)
            .map(|start| Interval {
                start,
                end: start + WINDOW_HOURS,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// The parsed token list of one teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    days: Vec<String>,
    windows: Vec<Interval>,
    exclusions: Vec<String>,
}

impl Availability {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, AvailabilityError> {
        let mut availability = Availability::default();
        for token in tokens {
            match parse_token(token.as_ref())? {
                Token::Day(day) => availability.days.push(day),
                Token::Hours(windows) => availability.windows.extend(windows),
                Token::Exclusion(name) => availability.exclusions.push(name),
            }
        }
        Ok(availability)
    }

    /// Needs both a day token naming `day` and an hour window equal to `interval`.
    pub fn admits(&self, day: Day, interval: Interval) -> bool {
        self.days.iter().any(|d| d == day.name()) && self.windows.contains(&interval)
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.exclusions.iter().any(|excluded| excluded == name)
    }
}
