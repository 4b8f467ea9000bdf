use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of wager being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    PlayerProp,
    TeamProp,
    GameTotal,
    Spread,
    Moneyline,
}

impl BetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::PlayerProp => "player_prop",
            BetType::TeamProp => "team_prop",
            BetType::GameTotal => "game_total",
            BetType::Spread => "spread",
            BetType::Moneyline => "moneyline",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player_prop" => Ok(BetType::PlayerProp),
            "team_prop" => Ok(BetType::TeamProp),
            "game_total" => Ok(BetType::GameTotal),
            "spread" => Ok(BetType::Spread),
            "moneyline" => Ok(BetType::Moneyline),
            other => Err(format!("unknown bet type: {}", other)),
        }
    }
}

/// Outcome of a settled (or still open) wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetResult {
    Win,
    Loss,
    Push,
    Pending,
    Cancelled,
}

impl BetResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetResult::Win => "win",
            BetResult::Loss => "loss",
            BetResult::Push => "push",
            BetResult::Pending => "pending",
            BetResult::Cancelled => "cancelled",
        }
    }

    /// Anything other than `pending` counts as settled
    pub fn is_settled(&self) -> bool {
        !matches!(self, BetResult::Pending)
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(BetResult::Win),
            "loss" => Ok(BetResult::Loss),
            "push" => Ok(BetResult::Push),
            "pending" => Ok(BetResult::Pending),
            "cancelled" => Ok(BetResult::Cancelled),
            other => Err(format!("unknown bet result: {}", other)),
        }
    }
}

/// Statistical category a prop bet rides on.
/// Wire values match the frontend picker ("threes", not "three_pointers").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropType {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Threes,
    FieldGoalsMade,
    FreeThrowsMade,
    DoubleDouble,
    TripleDouble,
    Pra,
    Pr,
    Pa,
    Ra,
}

impl PropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropType::Points => "points",
            PropType::Rebounds => "rebounds",
            PropType::Assists => "assists",
            PropType::Steals => "steals",
            PropType::Blocks => "blocks",
            PropType::Turnovers => "turnovers",
            PropType::Threes => "threes",
            PropType::FieldGoalsMade => "field_goals_made",
            PropType::FreeThrowsMade => "free_throws_made",
            PropType::DoubleDouble => "double_double",
            PropType::TripleDouble => "triple_double",
            PropType::Pra => "pra",
            PropType::Pr => "pr",
            PropType::Pa => "pa",
            PropType::Ra => "ra",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(PropType::Points),
            "rebounds" => Ok(PropType::Rebounds),
            "assists" => Ok(PropType::Assists),
            "steals" => Ok(PropType::Steals),
            "blocks" => Ok(PropType::Blocks),
            "turnovers" => Ok(PropType::Turnovers),
            "threes" => Ok(PropType::Threes),
            "field_goals_made" => Ok(PropType::FieldGoalsMade),
            "free_throws_made" => Ok(PropType::FreeThrowsMade),
            "double_double" => Ok(PropType::DoubleDouble),
            "triple_double" => Ok(PropType::TripleDouble),
            "pra" => Ok(PropType::Pra),
            "pr" => Ok(PropType::Pr),
            "pa" => Ok(PropType::Pa),
            "ra" => Ok(PropType::Ra),
            other => Err(format!("unknown prop type: {}", other)),
        }
    }
}

/// Side of the line a prop bet takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverUnder {
    Over,
    Under,
}

impl OverUnder {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverUnder::Over => "over",
            OverUnder::Under => "under",
        }
    }
}

impl FromStr for OverUnder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "over" => Ok(OverUnder::Over),
            "under" => Ok(OverUnder::Under),
            other => Err(format!("unknown over/under value: {}", other)),
        }
    }
}

/// A stored wager, exactly as the bets API returns it.
///
/// Which optional fields are populated depends on `bet_type`; the
/// [`BetDetails`] sum type is the validated view without that ambiguity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: i64,
    pub bet_type: BetType,
    pub bet_placed_date: DateTime<Utc>,
    pub game_date: DateTime<Utc>,
    pub team: String,
    pub opponent: String,
    pub wager_amount: Decimal,
    pub odds: i32,
    pub result: BetResult,
    pub payout: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub player_name: Option<String>,
    pub prop_type: Option<PropType>,
    pub description: Option<String>,
    pub prop_line: Option<Decimal>,
    pub over_under: Option<OverUnder>,
    pub actual_value: Option<Decimal>,
}

impl Bet {
    /// Re-pack the record as a create payload, for merge-and-revalidate updates
    pub fn to_create(&self) -> BetCreate {
        BetCreate {
            bet_type: Some(self.bet_type),
            bet_placed_date: Some(self.bet_placed_date),
            game_date: Some(self.game_date),
            team: Some(self.team.clone()),
            opponent: Some(self.opponent.clone()),
            player_name: self.player_name.clone(),
            prop_type: self.prop_type,
            description: self.description.clone(),
            prop_line: self.prop_line.map(NumericInput::Number),
            over_under: self.over_under,
            wager_amount: Some(NumericInput::Number(self.wager_amount)),
            odds: Some(self.odds),
            result: Some(self.result),
            actual_value: self.actual_value.map(NumericInput::Number),
            payout: self.payout.map(NumericInput::Number),
            notes: self.notes.clone(),
        }
    }
}

/// A numeric field as it arrives off the wire: either a real number or a
/// string the user typed. Empty strings mean "not provided", not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(Decimal),
    Text(String),
}

impl NumericInput {
    /// Coerce to a decimal. `Ok(None)` for blank text, `Err` with the raw
    /// text when it is non-empty but not a number.
    pub fn to_decimal(&self) -> Result<Option<Decimal>, String> {
        match self {
            NumericInput::Number(d) => Ok(Some(*d)),
            NumericInput::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(trimmed).map(Some).map_err(|_| s.clone())
            }
        }
    }
}

impl From<Decimal> for NumericInput {
    fn from(d: Decimal) -> Self {
        NumericInput::Number(d)
    }
}

/// Payload for creating a bet. Every field is optional so the validator
/// can report all missing/invalid fields in a single pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BetCreate {
    pub bet_type: Option<BetType>,
    pub bet_placed_date: Option<DateTime<Utc>>,
    pub game_date: Option<DateTime<Utc>>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub player_name: Option<String>,
    pub prop_type: Option<PropType>,
    pub description: Option<String>,
    pub prop_line: Option<NumericInput>,
    pub over_under: Option<OverUnder>,
    pub wager_amount: Option<NumericInput>,
    pub odds: Option<i32>,
    pub result: Option<BetResult>,
    pub actual_value: Option<NumericInput>,
    pub payout: Option<NumericInput>,
    pub notes: Option<String>,
}

/// Partial update payload. Present fields overwrite, absent fields keep
/// their stored value; the merged record is re-validated as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BetUpdate {
    pub bet_type: Option<BetType>,
    pub bet_placed_date: Option<DateTime<Utc>>,
    pub game_date: Option<DateTime<Utc>>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub player_name: Option<String>,
    pub prop_type: Option<PropType>,
    pub description: Option<String>,
    pub prop_line: Option<NumericInput>,
    pub over_under: Option<OverUnder>,
    pub wager_amount: Option<NumericInput>,
    pub odds: Option<i32>,
    pub result: Option<BetResult>,
    pub actual_value: Option<NumericInput>,
    pub payout: Option<NumericInput>,
    pub notes: Option<String>,
}

impl BetUpdate {
    /// True when the patch changes a field the auto-generated description
    /// is built from
    pub fn affects_description(&self) -> bool {
        self.bet_type.is_some()
            || self.team.is_some()
            || self.player_name.is_some()
            || self.prop_type.is_some()
    }

    /// Overlay this patch onto an existing payload
    pub fn merge_into(&self, mut base: BetCreate) -> BetCreate {
        if let Some(v) = self.bet_type {
            base.bet_type = Some(v);
        }
        if let Some(v) = self.bet_placed_date {
            base.bet_placed_date = Some(v);
        }
        if let Some(v) = self.game_date {
            base.game_date = Some(v);
        }
        if let Some(v) = &self.team {
            base.team = Some(v.clone());
        }
        if let Some(v) = &self.opponent {
            base.opponent = Some(v.clone());
        }
        if let Some(v) = &self.player_name {
            base.player_name = Some(v.clone());
        }
        if let Some(v) = self.prop_type {
            base.prop_type = Some(v);
        }
        if let Some(v) = &self.description {
            base.description = Some(v.clone());
        }
        if let Some(v) = &self.prop_line {
            base.prop_line = Some(v.clone());
        }
        if let Some(v) = self.over_under {
            base.over_under = Some(v);
        }
        if let Some(v) = &self.wager_amount {
            base.wager_amount = Some(v.clone());
        }
        if let Some(v) = self.odds {
            base.odds = Some(v);
        }
        if let Some(v) = self.result {
            base.result = Some(v);
        }
        if let Some(v) = &self.actual_value {
            base.actual_value = Some(v.clone());
        }
        if let Some(v) = &self.payout {
            base.payout = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            base.notes = Some(v.clone());
        }
        base
    }
}

/// Type-specific fields of a validated bet. One variant per `bet_type`,
/// carrying only the fields that are meaningful for it.
#[derive(Debug, Clone, PartialEq)]
pub enum BetDetails {
    PlayerProp {
        player_name: String,
        prop_type: PropType,
        line: Decimal,
        over_under: Option<OverUnder>,
    },
    TeamProp {
        prop_type: Option<PropType>,
        line: Decimal,
        over_under: Option<OverUnder>,
    },
    GameTotal {
        line: Decimal,
        over_under: Option<OverUnder>,
    },
    Spread {
        line: Decimal,
    },
    Moneyline,
}

impl BetDetails {
    pub fn bet_type(&self) -> BetType {
        match self {
            BetDetails::PlayerProp { .. } => BetType::PlayerProp,
            BetDetails::TeamProp { .. } => BetType::TeamProp,
            BetDetails::GameTotal { .. } => BetType::GameTotal,
            BetDetails::Spread { .. } => BetType::Spread,
            BetDetails::Moneyline => BetType::Moneyline,
        }
    }

    pub fn line(&self) -> Option<Decimal> {
        match self {
            BetDetails::PlayerProp { line, .. }
            | BetDetails::TeamProp { line, .. }
            | BetDetails::GameTotal { line, .. }
            | BetDetails::Spread { line } => Some(*line),
            BetDetails::Moneyline => None,
        }
    }
}

/// A bet that passed validation. Invariants hold by construction:
/// the wager is positive, the odds are non-zero, team and opponent
/// differ, and `details` carries the fields its bet type requires.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBet {
    pub bet_placed_date: DateTime<Utc>,
    pub game_date: DateTime<Utc>,
    pub team: String,
    pub opponent: String,
    pub wager_amount: Decimal,
    pub odds: i32,
    pub result: BetResult,
    pub description: String,
    pub actual_value: Option<Decimal>,
    pub payout: Option<Decimal>,
    pub notes: Option<String>,
    pub details: BetDetails,
}

impl ValidatedBet {
    /// Flatten back into the stored wire record
    pub fn into_record(
        self,
        id: i64,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Bet {
        let bet_type = self.details.bet_type();
        let prop_line = self.details.line();
        let (player_name, prop_type, over_under) = match self.details {
            BetDetails::PlayerProp {
                player_name,
                prop_type,
                over_under,
                ..
            } => (Some(player_name), Some(prop_type), over_under),
            BetDetails::TeamProp {
                prop_type,
                over_under,
                ..
            } => (None, prop_type, over_under),
            BetDetails::GameTotal { over_under, .. } => (None, None, over_under),
            BetDetails::Spread { .. } | BetDetails::Moneyline => (None, None, None),
        };

        Bet {
            id,
            bet_type,
            bet_placed_date: self.bet_placed_date,
            game_date: self.game_date,
            team: self.team,
            opponent: self.opponent,
            wager_amount: self.wager_amount,
            odds: self.odds,
            result: self.result,
            payout: self.payout,
            notes: self.notes,
            created_at,
            updated_at,
            player_name,
            prop_type,
            description: Some(self.description),
            prop_line,
            over_under,
            actual_value: self.actual_value,
        }
    }
}

/// Build the stored description for a bet when the user did not supply one.
///
/// Player props label as "{player}-{prop}", team props as "{team}-{prop}",
/// everything else as "{team}-{bet_type}", degrading to the player name,
/// then the team, then "Unknown" when pieces are missing.
pub fn generate_description(
    bet_type: BetType,
    team: Option<&str>,
    player_name: Option<&str>,
    prop_type: Option<PropType>,
) -> String {
    let team = team.map(str::trim).filter(|t| !t.is_empty());
    let player = player_name.map(str::trim).filter(|p| !p.is_empty());

    match bet_type {
        BetType::PlayerProp => match (player, prop_type) {
            (Some(player), Some(prop)) => format!("{}-{}", player, prop.as_str()),
            (Some(player), None) => player.to_string(),
            (None, _) => team
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string()),
        },
        _ => match team {
            Some(team) => match (bet_type, prop_type) {
                (BetType::TeamProp, Some(prop)) => format!("{}-{}", team, prop.as_str()),
                _ => format!("{}-{}", team, bet_type.as_str()),
            },
            None => "Unknown".to_string(),
        },
    }
}
