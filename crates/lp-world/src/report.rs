//! Human-readable and predicate renderings of the belief state.

use crate::state::WorldState;

impl WorldState {
    /// Snapshot of the belief state for inclusion in a prompt.
    pub fn render_summary(&self) -> String {
        let mut lines = vec![
            format!("=== Lost Pig Game State (Turn {}) ===", self.turn()),
            format!(
                "Player (Grunk) Location: {}",
                self.player_location()
                    .map(|l| l.id().to_string())
                    .unwrap_or_else(|| "Unknown".to_string())
            ),
        ];

        if self.inventory().is_empty() {
            lines.push("Inventory: Empty".to_string());
        } else {
            lines.push(format!(
                "Inventory ({}): {}",
                self.inventory().len(),
                join(self.inventory().iter())
            ));
        }

        if self.has_item("torch") {
            let status = if self.torch_lit() { "LIT" } else { "UNLIT" };
            lines.push(format!("Torch: {status}"));
        }
        if self.has_item("pole") {
            lines.push(format!("Pole color: {}", self.pole_color()));
        }

        lines.push(match (self.pig_found(), self.pig_caught()) {
            (_, true) => "Pig Status: CAUGHT".to_string(),
            (true, false) => format!(
                "Pig Status: FOUND at {}",
                self.pig_location().map(|l| l.id()).unwrap_or("unknown")
            ),
            (false, false) => "Pig Status: NOT FOUND".to_string(),
        });

        if !self.puzzles_solved().is_empty() {
            lines.push(format!(
                "Puzzles Solved: {}",
                join(self.puzzles_solved().iter())
            ));
        }
        if self.secret_door_open() {
            lines.push("Secret door: OPEN".to_string());
        }

        let exits = self.exits();
        if !exits.is_empty() {
            lines.push(format!("Exits: {}", join(exits.iter())));
        }
        let items_here = self.items_here();
        if !items_here.is_empty() {
            lines.push(format!("Items here: {}", items_here.join(", ")));
        }

        if let Some(record) = self.player_location().and_then(|l| self.location_record(l)) {
            lines.push(format!("Visited here {} time(s)", record.visits));
        }
        let context = self.location_context();
        if !context.is_empty() {
            lines.push(context);
        }

        let others: Vec<String> = self
            .locations()
            .iter()
            .filter(|(loc, _)| Some(**loc) != self.player_location())
            .map(|(loc, record)| format!("  - {loc} (visited {}x)", record.visits))
            .collect();
        if !others.is_empty() {
            lines.push(format!("Discovered Locations ({}):", self.locations().len()));
            lines.extend(others);
        }

        lines.join("\n")
    }

    /// What has been tried and seen at the current location.
    pub fn location_context(&self) -> String {
        let Some(record) = self.player_location().and_then(|l| self.location_record(l)) else {
            return String::new();
        };

        let mut lines = Vec::new();
        if !record.commands_tried.is_empty() {
            lines.push(format!(
                "Commands tried here: {}",
                join(record.commands_tried.iter().take(8))
            ));
        }
        if !record.items_found.is_empty() {
            lines.push(format!(
                "Items found here: {}",
                join(record.items_found.iter().take(6))
            ));
        }
        lines.join("\n")
    }

    /// The belief state as logical predicates, e.g. `at(player, hole)`.
    pub fn to_predicates(&self) -> Vec<String> {
        let mut predicates = Vec::new();

        if let Some(loc) = self.player_location() {
            predicates.push(format!("at(player, {loc})"));
        }
        for item in self.inventory() {
            predicates.push(format!("has(player, {item})"));
        }
        for (from, tos) in self.connections() {
            for to in tos {
                predicates.push(format!("connected({from}, {to})"));
            }
        }
        if self.pig_found() {
            predicates.push("found(pig)".to_string());
            if let Some(loc) = self.pig_location() {
                predicates.push(format!("at(pig, {loc})"));
            }
            if self.pig_caught() {
                predicates.push("caught(pig)".to_string());
            }
        }
        for puzzle in self.puzzles_solved() {
            predicates.push(format!("solved({puzzle})"));
        }
        if self.has_item("torch") {
            predicates.push(format!("torch_lit({})", self.torch_lit()));
        }
        if self.has_item("pole") {
            predicates.push(format!("pole_color({})", self.pole_color()));
        }
        if self.secret_door_open() {
            predicates.push("secret_door_open".to_string());
        }

        predicates
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
