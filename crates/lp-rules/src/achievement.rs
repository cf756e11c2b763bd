//! Post-episode scoring against a fixed milestone table.

use std::fmt::Write;

use lp_world::text::contains_phrase;
use lp_world::{EpisodeLog, Location, PigEvidence, Puzzle, WorldState, read_evidence};
use serde::Serialize;

/// Turn budget within which the game must be won.
pub const TURN_LIMIT: u32 = 40;

/// Text the game prints whenever its own score goes up.
pub const SCORE_MARKER: &str = "[Grunk score go up one.]";

/// A named milestone.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    /// Stable identifier.
    pub name: &'static str,
    /// What the player did.
    pub description: &'static str,
    /// Points awarded.
    pub points: u32,
    /// Predicate over the final state and the final observation.
    pub check: fn(&WorldState, &str) -> bool,
}

/// The Lost Pig milestones in evaluation order.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        name: "game_started",
        description: "Game started successfully",
        points: 1,
        check: game_started,
    },
    Achievement {
        name: "found_pig_location",
        description: "Found where the pig is (heard noise, fell in hole)",
        points: 1,
        check: found_pig_location,
    },
    Achievement {
        name: "got_torch",
        description: "Picked up the torch",
        points: 1,
        check: got_torch,
    },
    Achievement {
        name: "lit_torch",
        description: "Lit the torch using powder and water",
        points: 1,
        check: lit_torch,
    },
    Achievement {
        name: "got_key",
        description: "Got the key using the pole",
        points: 1,
        check: got_key,
    },
    Achievement {
        name: "opened_chest",
        description: "Opened the chest",
        points: 1,
        check: opened_chest,
    },
    Achievement {
        name: "caught_pig",
        description: "Caught the lost pig",
        points: 1,
        check: caught_pig,
    },
    Achievement {
        name: "brought_pig_back",
        description: "Brought pig back to farm (game complete)",
        points: 1,
        check: brought_pig_back,
    },
];

fn game_started(state: &WorldState, _: &str) -> bool {
    state.turn() > 0
}

fn found_pig_location(state: &WorldState, _: &str) -> bool {
    state.pig_found() || state.player_location() == Some(Location::Hole)
}

fn got_torch(state: &WorldState, _: &str) -> bool {
    state.has_item("torch")
}

fn lit_torch(state: &WorldState, _: &str) -> bool {
    state.puzzle_solved(Puzzle::LightTorch) || state.torch_is_lit()
}

fn got_key(state: &WorldState, _: &str) -> bool {
    state.has_item("key")
}

fn opened_chest(state: &WorldState, _: &str) -> bool {
    state.puzzle_solved(Puzzle::CaveChest)
}

fn caught_pig(state: &WorldState, obs: &str) -> bool {
    state.pig_caught() || read_evidence(obs, "").pig == PigEvidence::Caught
}

fn brought_pig_back(state: &WorldState, obs: &str) -> bool {
    caught_pig(state, obs) && back_at_farm(state, obs)
}

fn back_at_farm(state: &WorldState, obs: &str) -> bool {
    state.player_location() == Some(Location::Forest)
        || contains_phrase(&obs.to_lowercase(), "farm")
}

/// Result for one achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementDetail {
    /// Achievement name.
    pub name: &'static str,
    /// Achievement description.
    pub description: &'static str,
    /// Whether it was reached.
    pub achieved: bool,
    /// Points earned (zero when missed).
    pub points: u32,
}

/// Scoring of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Names of reached achievements.
    pub achieved: Vec<&'static str>,
    /// Names of missed achievements.
    pub missed: Vec<&'static str>,
    /// Points earned.
    pub total_points: u32,
    /// Points available.
    pub max_points: u32,
    /// `total_points / max_points`, or 0 with an empty table.
    pub normalized_score: f64,
    /// Pig caught, back at the farm, within the turn limit.
    pub success: bool,
    /// Turns in the episode log.
    pub turns_taken: u32,
    /// Turn budget the episode was judged against.
    pub turn_limit: u32,
    /// Score markers the game printed across the episode.
    pub game_score: u32,
    /// Distinct locations the player was seen in.
    pub locations_discovered: usize,
    /// Distinct items ever carried.
    pub items_collected: usize,
    /// Per-achievement results in table order.
    pub details: Vec<AchievementDetail>,
}

impl EvaluationReport {
    /// Human-readable report.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Lost Pig Achievements ({}/{} points) ===",
            self.total_points, self.max_points
        );
        let _ = writeln!(out, "Turns taken: {}/{}", self.turns_taken, self.turn_limit);
        let _ = writeln!(out, "Game score: {}", self.game_score);
        let _ = writeln!(out, "Locations discovered: {}", self.locations_discovered);
        let _ = writeln!(out, "Items collected: {}", self.items_collected);
        let _ = writeln!(out, "Normalized score: {:.2}", self.normalized_score);
        let _ = writeln!(out, "\nAchieved:");
        for detail in self.details.iter().filter(|d| d.achieved) {
            let _ = writeln!(out, "  + {} (+{} points)", detail.description, detail.points);
        }
        if !self.missed.is_empty() {
            let _ = writeln!(out, "\nMissed:");
            for detail in self.details.iter().filter(|d| !d.achieved) {
                let _ = writeln!(out, "  - {}", detail.description);
            }
        }
        out.push('\n');
        if self.success {
            let _ = write!(
                out,
                "SUCCESS: Caught pig and brought it back to farm within {} turns",
                self.turn_limit
            );
        } else {
            let _ = write!(out, "Did not complete the game within {} turns", self.turn_limit);
        }
        out
    }
}

/// Read-only reducer from a finished episode to a score.
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    achievements: Vec<Achievement>,
    turn_limit: u32,
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEvaluator {
    /// An evaluator over the Lost Pig table and the 40-turn limit.
    pub fn new() -> Self {
        Self {
            achievements: ACHIEVEMENTS.to_vec(),
            turn_limit: TURN_LIMIT,
        }
    }

    /// Judge success against a different turn budget.
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    /// The achievement table.
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Score an episode from its final belief state and log.
    pub fn evaluate(&self, state: &WorldState, log: &EpisodeLog) -> EvaluationReport {
        let final_obs = log.final_observation();

        let details: Vec<AchievementDetail> = self
            .achievements
            .iter()
            .map(|a| {
                let achieved = (a.check)(state, final_obs);
                AchievementDetail {
                    name: a.name,
                    description: a.description,
                    achieved,
                    points: if achieved { a.points } else { 0 },
                }
            })
            .collect();

        let total_points = details.iter().map(|d| d.points).sum();
        let max_points: u32 = self.achievements.iter().map(|a| a.points).sum();
        let normalized_score = if max_points > 0 {
            f64::from(total_points) / f64::from(max_points)
        } else {
            0.0
        };
        let turns_taken = log.turns();
        let progress = state.progress_metrics();
        let success = caught_pig(state, final_obs)
            && back_at_farm(state, final_obs)
            && turns_taken <= self.turn_limit;

        EvaluationReport {
            achieved: details.iter().filter(|d| d.achieved).map(|d| d.name).collect(),
            missed: details.iter().filter(|d| !d.achieved).map(|d| d.name).collect(),
            total_points,
            max_points,
            normalized_score,
            success,
            turns_taken,
            turn_limit: self.turn_limit,
            game_score: game_score(log),
            locations_discovered: progress.locations_discovered,
            items_collected: progress.items_collected,
            details,
        }
    }
}

/// Count the game's own score markers across every observation.
pub fn game_score(log: &EpisodeLog) -> u32 {
    log.observations()
        .map(|obs| obs.matches(SCORE_MARKER).count() as u32)
        .sum()
}
