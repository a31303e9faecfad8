//! Which slice of the year the grid shows.

use super::types::Month;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewRange {
    #[default]
    FirstHalf,
    SecondHalf,
    FullYear,
}

impl ViewRange {
    pub const ALL: [ViewRange; 3] = [ViewRange::FirstHalf, ViewRange::SecondHalf, ViewRange::FullYear];

    pub fn months(self) -> &'static [Month] {
        match self {
            ViewRange::FirstHalf => &Month::ALL[..6],
            ViewRange::SecondHalf => &Month::ALL[6..],
            ViewRange::FullYear => &Month::ALL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewRange::FirstHalf => "JAN-JUN",
            ViewRange::SecondHalf => "JUL-DEC",
            ViewRange::FullYear => "FULL YEAR",
        }
    }

    pub fn next(self) -> ViewRange {
        match self {
            ViewRange::FirstHalf => ViewRange::SecondHalf,
            ViewRange::SecondHalf => ViewRange::FullYear,
            ViewRange::FullYear => ViewRange::FirstHalf,
        }
    }
}
