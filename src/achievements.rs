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

//! Lifetime player statistics and the milestones they unlock.
//!
//! Every milestone fires at most once per player: a milestone already in
//! [`PlayerStats::achievements`] is never returned again, and each check is an
//! exact crossing or equality, so replaying an event cannot fire a second
//! milestone of the same kind either.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{rating::rating_delta, status::Outcome};

pub const RATING_MILESTONES: [i32; 10] = [
    1500, 1600, 1700, 1800, 1900, 2000, 2100, 2200, 2300, 2400,
];
pub const GAME_MILESTONES: [u32; 8] = [10, 50, 100, 250, 500, 1000, 2500, 5000];
pub const STREAK_MILESTONES: [u32; 5] = [5, 10, 15, 20, 25];

pub const WIN_RATE_GAMES: u32 = 20;
pub const WIN_RATE: f64 = 0.8;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Achievement {
    Rating(i32),
    Games(u32),
    WinStreak(u32),
    WinRate,
}

impl Achievement {
    /// A stable key, suitable for storage.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Rating(rating) => format!("rating_{rating}"),
            Self::Games(games) => format!("games_{games}"),
            Self::WinStreak(streak) => format!("win_streak_{streak}"),
            Self::WinRate => "win_rate_80".to_string(),
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rating(rating) => write!(f, "Rating {rating}"),
            Self::Games(games) => write!(f, "{games} Games"),
            Self::WinStreak(streak) => write!(f, "{streak} Win Streak"),
            Self::WinRate => write!(f, "Dominator: 80%+ wins over 20+ games"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerStats {
    pub rating: i32,
    #[serde(default)]
    pub peak_rating: i32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(1200)
    }
}

/// What a single game did to a player's stats.
#[derive(Clone, Debug, PartialEq)]
pub struct RatingChange {
    pub old_rating: i32,
    pub new_rating: i32,
    pub delta: i32,
    pub unlocked: Vec<Achievement>,
}

impl PlayerStats {
    #[must_use]
    pub fn new(rating: i32) -> Self {
        Self {
            rating,
            peak_rating: rating,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            current_streak: 0,
            best_streak: 0,
            achievements: Vec::new(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }

    #[must_use]
    pub fn has(&self, achievement: &Achievement) -> bool {
        self.achievements.contains(achievement)
    }

    /// Applies one rated game against an opponent of `opponent_rating`.
    ///
    /// Newly unlocked achievements are both stored and returned.
    pub fn record_game(&mut self, outcome: Outcome, opponent_rating: i32) -> RatingChange {
        let old_rating = self.rating;
        let delta = rating_delta(old_rating, opponent_rating, outcome, self.games_played);

        self.games_played += 1;
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
            }
            Outcome::Draw => {
                self.draws += 1;
                self.current_streak = 0;
            }
            Outcome::Loss => {
                self.losses += 1;
                self.current_streak = 0;
            }
        }

        self.rating = old_rating + delta;
        self.peak_rating = self.peak_rating.max(self.rating);

        let unlocked = check_achievements(self, outcome, self.rating, old_rating);
        self.achievements.extend(unlocked.iter().copied());

        RatingChange {
            old_rating,
            new_rating: self.rating,
            delta,
            unlocked,
        }
    }
}

/// The milestones a game just reached.
///
/// `stats` must already count the latest game. Rating milestones fire when
/// `new_rating` reaches a threshold `old_rating` was below; game and streak
/// milestones fire on exact equality.
#[must_use]
pub fn check_achievements(
    stats: &PlayerStats,
    latest: Outcome,
    new_rating: i32,
    old_rating: i32,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    for threshold in RATING_MILESTONES {
        if old_rating < threshold && new_rating >= threshold {
            unlocked.push(Achievement::Rating(threshold));
        }
    }

    if GAME_MILESTONES.contains(&stats.games_played) {
        unlocked.push(Achievement::Games(stats.games_played));
    }

    if latest == Outcome::Win && STREAK_MILESTONES.contains(&stats.current_streak) {
        unlocked.push(Achievement::WinStreak(stats.current_streak));
    }

    if stats.games_played >= WIN_RATE_GAMES && stats.win_rate() >= WIN_RATE {
        unlocked.push(Achievement::WinRate);
    }

    unlocked.retain(|achievement| !stats.has(achievement));
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_1800_fires_once() {
        let mut stats = PlayerStats::new(1805);
        stats.games_played = 3;

        let unlocked = check_achievements(&stats, Outcome::Win, 1805, 1795);
        assert_eq!(unlocked, vec![Achievement::Rating(1800)]);

        stats.achievements.extend(unlocked);
        assert!(check_achievements(&stats, Outcome::Win, 1805, 1795).is_empty());
    }

    #[test]
    fn staying_above_a_threshold_does_not_fire() {
        let stats = PlayerStats::new(1850);
        assert!(check_achievements(&stats, Outcome::Win, 1850, 1810).is_empty());
        assert!(check_achievements(&stats, Outcome::Loss, 1790, 1810).is_empty());
    }

    #[test]
    fn big_jumps_fire_every_threshold_passed() {
        let stats = PlayerStats::new(1720);
        assert_eq!(
            check_achievements(&stats, Outcome::Win, 1720, 1480),
            vec![
                Achievement::Rating(1500),
                Achievement::Rating(1600),
                Achievement::Rating(1700)
            ]
        );
    }

    #[test]
    fn game_count_milestones_need_exact_counts() {
        let mut stats = PlayerStats::new(1000);
        stats.games_played = 10;
        assert_eq!(
            check_achievements(&stats, Outcome::Loss, 990, 1000),
            vec![Achievement::Games(10)]
        );

        stats.games_played = 11;
        assert!(check_achievements(&stats, Outcome::Loss, 980, 990).is_empty());
    }

    #[test]
    fn streaks_only_fire_after_a_win() {
        let mut stats = PlayerStats::new(1000);
        stats.games_played = 7;
        stats.wins = 5;
        stats.current_streak = 5;
        assert_eq!(
            check_achievements(&stats, Outcome::Win, 1010, 1000),
            vec![Achievement::WinStreak(5)]
        );
        assert!(check_achievements(&stats, Outcome::Draw, 1000, 1000).is_empty());
    }

    #[test]
    fn win_rate_fires_once() {
        let mut stats = PlayerStats::new(1000);
        for _ in 0..19 {
            stats.record_game(Outcome::Win, 3000);
        }
        assert!(!stats.has(&Achievement::WinRate));

        let change = stats.record_game(Outcome::Loss, 3000);
        assert!(change.unlocked.contains(&Achievement::WinRate));

        let change = stats.record_game(Outcome::Win, 3000);
        assert!(!change.unlocked.contains(&Achievement::WinRate));
        assert_eq!(
            stats
                .achievements
                .iter()
                .filter(|achievement| **achievement == Achievement::WinRate)
                .count(),
            1
        );
    }

    #[test]
    fn record_game_tracks_streaks_and_peak() {
        let mut stats = PlayerStats::new(1500);

        let change = stats.record_game(Outcome::Win, 1500);
        assert_eq!(change.delta, 20);
        assert_eq!(stats.rating, 1520);
        assert_eq!(stats.current_streak, 1);

        stats.record_game(Outcome::Loss, 1500);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.peak_rating, 1520);
        assert_eq!(stats.games_played, 2);
        assert_eq!((stats.wins, stats.losses, stats.draws), (1, 1, 0));
    }

    #[test]
    fn rated_games_respect_the_floor() {
        let mut stats = PlayerStats::new(105);
        let change = stats.record_game(Outcome::Loss, 105);
        assert_eq!(change.new_rating, 100);
        assert_eq!(change.delta, -5);
    }
}
