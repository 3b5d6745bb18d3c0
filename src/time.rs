// This file is part of tournament-engine.
//
// tournament-engine is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// tournament-engine is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{fmt, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const MINUTE: u32 = 60;

/// Moves assumed per game when estimating its length.
const ESTIMATED_MOVES: u32 = 40;

/// Base time plus Fischer increment, written `"3+2"`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeControl {
    pub minutes: u32,
    pub increment_seconds: u32,
}

impl TimeControl {
    #[must_use]
    pub fn new(minutes: u32, increment_seconds: u32) -> Self {
        Self {
            minutes,
            increment_seconds,
        }
    }

    /// Expected game length in seconds.
    #[must_use]
    pub fn estimated_seconds(self) -> u32 {
        self.minutes
            .saturating_mul(MINUTE)
            .saturating_add(ESTIMATED_MOVES.saturating_mul(self.increment_seconds))
    }

    #[must_use]
    pub fn speed(self) -> Speed {
        match self.estimated_seconds() {
            0..180 => Speed::Bullet,
            180..480 => Speed::Blitz,
            480..1500 => Speed::Rapid,
            _ => Speed::Classical,
        }
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.minutes, self.increment_seconds)
    }
}

impl FromStr for TimeControl {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let (minutes, increment) = string.trim().split_once('+').unwrap_or((string, "0"));

        let minutes = minutes
            .trim()
            .parse::<u32>()
            .with_context(|| format!("time_control: '{string}' minutes are not an integer"))?;
        let increment = increment
            .trim()
            .parse::<u32>()
            .with_context(|| format!("time_control: '{string}' increment is not an integer"))?;

        if minutes == 0 && increment == 0 {
            return Err(anyhow::Error::msg(format!(
                "time_control: '{string}' has no time at all"
            )));
        }

        Ok(Self::new(minutes, increment))
    }
}

impl TryFrom<String> for TimeControl {
    type Error = anyhow::Error;

    fn try_from(string: String) -> anyhow::Result<Self> {
        string.parse()
    }
}

impl From<TimeControl> for String {
    fn from(time_control: TimeControl) -> Self {
        time_control.to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Speed {
    Bullet,
    #[default]
    Blitz,
    Rapid,
    Classical,
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullet => write!(f, "bullet"),
            Self::Blitz => write!(f, "blitz"),
            Self::Rapid => write!(f, "rapid"),
            Self::Classical => write!(f, "classical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_print() -> anyhow::Result<()> {
        let time_control: TimeControl = "3+2".parse()?;
        assert_eq!(time_control, TimeControl::new(3, 2));
        assert_eq!(time_control.to_string(), "3+2");

        assert_eq!("15".parse::<TimeControl>()?, TimeControl::new(15, 0));
        assert!("0+0".parse::<TimeControl>().is_err());
        assert!("blitz".parse::<TimeControl>().is_err());

        Ok(())
    }

    #[test]
    fn speeds() {
        assert_eq!(TimeControl::new(1, 0).speed(), Speed::Bullet);
        assert_eq!(TimeControl::new(3, 2).speed(), Speed::Blitz);
        assert_eq!(TimeControl::new(10, 5).speed(), Speed::Rapid);
        assert_eq!(TimeControl::new(30, 20).speed(), Speed::Classical);
        assert_eq!(TimeControl::new(u32::MAX, u32::MAX).speed(), Speed::Classical);
    }
}
