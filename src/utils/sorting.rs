use crate::utils::derivation::BetView;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Column the ledger can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PlacedDate,
    Category,
    Team,
    Wager,
    Result,
    Payout,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed_date" | "date" => Ok(SortKey::PlacedDate),
            "category" => Ok(SortKey::Category),
            "team" => Ok(SortKey::Team),
            "wager" | "wager_amount" => Ok(SortKey::Wager),
            "result" => Ok(SortKey::Result),
            "payout" => Ok(SortKey::Payout),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The UI's current sort selection. Held by the caller between renders;
/// clicking a column header routes through [`SortState::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest wagers first, matching the listing order the API uses
    fn default() -> Self {
        SortState {
            key: SortKey::PlacedDate,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        SortState { key, direction }
    }

    /// Selecting the active column reverses direction; selecting a new
    /// column resets to descending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flip();
        } else {
            self.key = key;
            self.direction = SortDirection::Descending;
        }
    }
}

fn compare(a: &BetView, b: &BetView, key: SortKey) -> Ordering {
    match key {
        SortKey::PlacedDate => a.bet.bet_placed_date.cmp(&b.bet.bet_placed_date),
        SortKey::Category => a
            .category
            .as_str()
            .to_lowercase()
            .cmp(&b.category.as_str().to_lowercase()),
        SortKey::Team => a.bet.team.to_lowercase().cmp(&b.bet.team.to_lowercase()),
        SortKey::Wager => a.bet.wager_amount.cmp(&b.bet.wager_amount),
        SortKey::Result => a.bet.result.as_str().cmp(b.bet.result.as_str()),
        SortKey::Payout => a
            .bet
            .payout
            .unwrap_or(Decimal::ZERO)
            .cmp(&b.bet.payout.unwrap_or(Decimal::ZERO)),
    }
}

/// Order the enriched ledger in place. The sort is stable: rows with
/// equal keys keep their prior relative order, in both directions.
pub fn sort_views(views: &mut [BetView], state: &SortState) {
    views.sort_by(|a, b| {
        let ordering = compare(a, b, state.key);
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
