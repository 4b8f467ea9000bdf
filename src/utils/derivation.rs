use crate::models::{Bet, BetType};
use std::fmt;

/// Display grouping of a bet, computed on read and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Player,
    Team,
    Game,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Player => "Player",
            Category::Team => "Team",
            Category::Game => "Game",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bet enriched with its derived display fields
#[derive(Debug, Clone, PartialEq)]
pub struct BetView {
    pub bet: Bet,
    pub category: Category,
    pub display_description: String,
    pub display_line: String,
}

/// Make a prop-type token readable: the FIRST underscore becomes a space
/// and the first character is upper-cased ("three_pointers" becomes
/// "Three pointers"; later underscores stay as they are).
pub fn format_prop_type(raw: &str) -> String {
    let spaced = raw.replacen('_', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Compute the derived view of a single bet.
///
/// Total over every record the store can hand back: a malformed record
/// degrades to the "Unknown Prop" label instead of failing the listing.
pub fn enrich(bet: &Bet) -> BetView {
    let has_player = bet
        .player_name
        .as_deref()
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false);

    let category = if has_player && bet.prop_type.is_some() {
        Category::Player
    } else if bet.bet_type == BetType::GameTotal {
        Category::Game
    } else {
        Category::Team
    };

    let display_description = match category {
        Category::Player => format!(
            "{} {}",
            bet.player_name.as_deref().unwrap_or_default(),
            format_prop_type(bet.prop_type.map(|p| p.as_str()).unwrap_or_default()),
        ),
        _ => match bet.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => "Unknown Prop".to_string(),
        },
    };

    let display_line = match (bet.over_under, bet.prop_line) {
        (Some(side), Some(line)) => format!("{} {}", side.as_str().to_uppercase(), line),
        (_, Some(line)) if bet.bet_type == BetType::Spread => format!("Line: {}", line),
        (_, Some(line)) => line.to_string(),
        (_, None) => String::new(),
    };

    BetView {
        bet: bet.clone(),
        category,
        display_description,
        display_line,
    }
}
