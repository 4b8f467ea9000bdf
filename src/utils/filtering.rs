use crate::models::{Bet, BetResult, BetType, PropType};
use serde::{Deserialize, Serialize};

/// Optional, AND-combined criteria for narrowing the bet list, plus
/// offset/limit pagination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BetFilter {
    pub bet_type: Option<BetType>,
    pub team: Option<String>,
    pub player_name: Option<String>,
    pub prop_type: Option<PropType>,
    pub result: Option<BetResult>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl BetFilter {
    /// Whether one bet passes every present criterion. `bet_type`,
    /// `prop_type` and `result` match exactly; `team` and `player_name`
    /// are case-insensitive substring matches.
    pub fn matches(&self, bet: &Bet) -> bool {
        if let Some(bet_type) = self.bet_type {
            if bet.bet_type != bet_type {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !bet.team.to_lowercase().contains(&team.to_lowercase()) {
                return false;
            }
        }
        if let Some(player) = &self.player_name {
            let needle = player.to_lowercase();
            match &bet.player_name {
                Some(name) if name.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        if let Some(prop_type) = self.prop_type {
            if bet.prop_type != Some(prop_type) {
                return false;
            }
        }
        if let Some(result) = self.result {
            if bet.result != result {
                return false;
            }
        }
        true
    }

    /// Filter then paginate, without touching the source collection
    pub fn apply(&self, bets: &[Bet]) -> Vec<Bet> {
        let matched = bets.iter().filter(|b| self.matches(b)).skip(self.skip);
        match self.limit {
            Some(limit) => matched.take(limit).cloned().collect(),
            None => matched.cloned().collect(),
        }
    }

    /// Query parameters for a bets-API list request
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(bet_type) = self.bet_type {
            params.push(("bet_type", bet_type.as_str().to_string()));
        }
        if let Some(team) = &self.team {
            params.push(("team", team.clone()));
        }
        if let Some(player) = &self.player_name {
            params.push(("player_name", player.clone()));
        }
        if let Some(prop_type) = self.prop_type {
            params.push(("prop_type", prop_type.as_str().to_string()));
        }
        if let Some(result) = self.result {
            params.push(("result", result.as_str().to_string()));
        }
        if self.skip > 0 {
            params.push(("skip", self.skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Filter criteria as raw query-parameter strings, before lenient
/// parsing. Unknown keys are dropped by serde; values that fail to
/// parse are ignored rather than matching nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBetFilter {
    pub bet_type: Option<String>,
    pub team: Option<String>,
    pub player_name: Option<String>,
    pub prop_type: Option<String>,
    pub result: Option<String>,
    pub skip: Option<String>,
    pub limit: Option<String>,
}

impl From<RawBetFilter> for BetFilter {
    fn from(raw: RawBetFilter) -> Self {
        fn nonblank(value: Option<String>) -> Option<String> {
            value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        BetFilter {
            bet_type: nonblank(raw.bet_type).and_then(|s| s.parse().ok()),
            team: nonblank(raw.team),
            player_name: nonblank(raw.player_name),
            prop_type: nonblank(raw.prop_type).and_then(|s| s.parse().ok()),
            result: nonblank(raw.result).and_then(|s| s.parse().ok()),
            skip: nonblank(raw.skip)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            limit: nonblank(raw.limit).and_then(|s| s.parse().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn bet(id: i64, bet_type: BetType, team: &str, player: Option<&str>, result: BetResult) -> Bet {
        Bet {
            id,
            bet_type,
            bet_placed_date: Utc::now(),
            game_date: Utc::now(),
            team: team.to_string(),
            opponent: "OPP".to_string(),
            wager_amount: dec!(50),
            odds: -110,
            result,
            payout: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
            player_name: player.map(str::to_string),
            prop_type: player.map(|_| PropType::Points),
            description: None,
            prop_line: Some(dec!(25.5)),
            over_under: None,
            actual_value: None,
        }
    }

    fn sample() -> Vec<Bet> {
        vec![
            bet(1, BetType::PlayerProp, "LAL", Some("LeBron James"), BetResult::Win),
            bet(2, BetType::Spread, "MIL", None, BetResult::Pending),
            bet(3, BetType::PlayerProp, "GSW", Some("Stephen Curry"), BetResult::Loss),
            bet(4, BetType::Moneyline, "LAL", None, BetResult::Pending),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let bets = sample();
        assert_eq!(BetFilter::default().apply(&bets).len(), 4);
    }

    #[test]
    fn test_bet_type_exact_match() {
        let bets = sample();
        let filter = BetFilter {
            bet_type: Some(BetType::PlayerProp),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&bets).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_team_substring_case_insensitive() {
        let bets = sample();
        let filter = BetFilter {
            team: Some("la".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&bets).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_player_name_substring() {
        let bets = sample();
        let filter = BetFilter {
            player_name: Some("curry".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&bets).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_filters_are_and_combined() {
        let bets = sample();
        let filter = BetFilter {
            bet_type: Some(BetType::PlayerProp),
            result: Some(BetResult::Win),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&bets).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_skip_and_limit() {
        let bets = sample();
        let filter = BetFilter {
            skip: 1,
            limit: Some(2),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&bets).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unparseable_raw_values_are_ignored() {
        let raw = RawBetFilter {
            bet_type: Some("not_a_type".to_string()),
            result: Some("".to_string()),
            skip: Some("banana".to_string()),
            ..Default::default()
        };
        let filter = BetFilter::from(raw);
        // Nothing parsed, so nothing constrains the listing
        assert_eq!(filter, BetFilter::default());
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_to_query_round_trips_through_raw() {
        let filter = BetFilter {
            bet_type: Some(BetType::PlayerProp),
            team: Some("LAL".to_string()),
            result: Some(BetResult::Win),
            skip: 5,
            limit: Some(10),
            ..Default::default()
        };

        let mut raw = RawBetFilter::default();
        for (key, value) in filter.to_query() {
            match key {
                "bet_type" => raw.bet_type = Some(value),
                "team" => raw.team = Some(value),
                "player_name" => raw.player_name = Some(value),
                "prop_type" => raw.prop_type = Some(value),
                "result" => raw.result = Some(value),
                "skip" => raw.skip = Some(value),
                "limit" => raw.limit = Some(value),
                other => panic!("unexpected query key: {}", other),
            }
        }
        assert_eq!(BetFilter::from(raw), filter);
    }
}
