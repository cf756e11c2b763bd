//! Command equivalence used to avoid re-issuing the same command in a room.

use crate::text::normalize_command;

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Canonical direction name for a direction word or abbreviation.
pub fn canonical_direction(word: &str) -> Option<&'static str> {
    match word {
        "n" | "north" => Some("north"),
        "s" | "south" => Some("south"),
        "e" | "east" => Some("east"),
        "w" | "west" => Some("west"),
        "u" | "up" => Some("up"),
        "d" | "down" => Some("down"),
        "ne" | "northeast" => Some("northeast"),
        "nw" | "northwest" => Some("northwest"),
        "se" | "southeast" => Some("southeast"),
        "sw" | "southwest" => Some("southwest"),
        _ => None,
    }
}

/// Reduce a command to a canonical form so that near-duplicates compare
/// equal.
///
/// - `x pole`, `ex pole`, `inspect pole`, `look at pole` → `examine pole`
/// - `l` → `look`; `i`, `inv` → `inventory`
/// - `get torch`, `grab torch`, `pick up torch` → `take torch`
/// - `n`, `go n`, `walk north` → `north`
/// - articles are dropped
pub fn canonical_command(command: &str) -> String {
    let normalized = normalize_command(command);
    let words: Vec<&str> = normalized
        .split(' ')
        .filter(|w| !w.is_empty() && !ARTICLES.contains(w))
        .collect();

    let Some((&verb, rest)) = words.split_first() else {
        return String::new();
    };

    let (verb, rest): (&str, &[&str]) = match verb {
        "x" | "ex" | "examine" | "inspect" => ("examine", rest),
        "look" | "l" if rest.first() == Some(&"at") => ("examine", &rest[1..]),
        "look" | "l" if rest.is_empty() => ("look", rest),
        "i" | "inv" | "inventory" => ("inventory", rest),
        "get" | "grab" | "take" => ("take", rest),
        "pick" if rest.first() == Some(&"up") => ("take", &rest[1..]),
        "go" | "walk" | "move" | "run" => match rest {
            [dir] => match canonical_direction(dir) {
                Some(d) => return d.to_string(),
                None => ("go", rest),
            },
            _ => ("go", rest),
        },
        other => match canonical_direction(other) {
            Some(d) if rest.is_empty() => return d.to_string(),
            _ => (other, rest),
        },
    };

    if rest.is_empty() {
        verb.to_string()
    } else {
        format!("{verb} {}", rest.join(" "))
    }
}

/// Whether two commands fall in the same equivalence class.
pub fn commands_equivalent(a: &str, b: &str) -> bool {
    let a = canonical_command(a);
    !a.is_empty() && a == canonical_command(b)
}
