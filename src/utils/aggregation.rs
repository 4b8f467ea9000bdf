use crate::models::{Bet, BetResult};
use crate::utils::derivation::{enrich, Category};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count of bets per derived category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub player: usize,
    pub team: usize,
    pub game: usize,
}

/// Performance snapshot over a collection of bets. The server computes
/// the same shape for the whole dataset; fed the same records, the two
/// must agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub settled: usize,
    pub win_rate: f64,
    pub net_profit_loss: Decimal,
    pub categories: CategoryBreakdown,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of settled bets that won, in [0, 100] at two decimal
/// places. No settled bets means 0, not a division error.
pub fn win_rate(bets: &[Bet]) -> f64 {
    let settled = bets.iter().filter(|b| b.result.is_settled()).count();
    if settled == 0 {
        return 0.0;
    }
    let wins = bets
        .iter()
        .filter(|b| b.result == BetResult::Win)
        .count();
    round2(wins as f64 / settled as f64 * 100.0)
}

/// Sum of `payout - wager_amount` across bets with a recorded payout.
/// Bets still waiting on a payout contribute nothing. Positive means
/// net profit.
pub fn net_profit_loss(bets: &[Bet]) -> Decimal {
    bets.iter()
        .filter_map(|b| b.payout.map(|payout| payout - b.wager_amount))
        .sum::<Decimal>()
        .round_dp(2)
}

/// Count bets by their derived Player/Team/Game category
pub fn category_breakdown(bets: &[Bet]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();
    for bet in bets {
        match enrich(bet).category {
            Category::Player => breakdown.player += 1,
            Category::Team => breakdown.team += 1,
            Category::Game => breakdown.game += 1,
        }
    }
    breakdown
}

/// What a single bet returned, or the sentinel while it is still open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutDelta {
    Pending,
    Settled(Decimal),
}

/// Sign bucket of a settled delta, used to color the ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaClass {
    Profit,
    Loss,
    Push,
}

impl PayoutDelta {
    pub fn classify(&self) -> Option<DeltaClass> {
        match self {
            PayoutDelta::Pending => None,
            PayoutDelta::Settled(delta) => Some(if delta.is_sign_positive() && !delta.is_zero() {
                DeltaClass::Profit
            } else if delta.is_sign_negative() && !delta.is_zero() {
                DeltaClass::Loss
            } else {
                DeltaClass::Push
            }),
        }
    }
}

impl fmt::Display for PayoutDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutDelta::Pending => f.write_str("Pending"),
            PayoutDelta::Settled(delta) => write!(f, "{}", delta.round_dp(2)),
        }
    }
}

/// `payout - wager_amount` for one bet, or `Pending` when no payout has
/// been recorded yet
pub fn payout_delta(bet: &Bet) -> PayoutDelta {
    match bet.payout {
        Some(payout) => PayoutDelta::Settled((payout - bet.wager_amount).round_dp(2)),
        None => PayoutDelta::Pending,
    }
}

/// Fold a collection of bets into the full summary
pub fn summarize(bets: &[Bet]) -> Summary {
    Summary {
        total_bets: bets.len(),
        wins: bets
            .iter()
            .filter(|b| b.result == BetResult::Win)
            .count(),
        losses: bets
            .iter()
            .filter(|b| b.result == BetResult::Loss)
            .count(),
        settled: bets.iter().filter(|b| b.result.is_settled()).count(),
        win_rate: win_rate(bets),
        net_profit_loss: net_profit_loss(bets),
        categories: category_breakdown(bets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BetType, PropType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn bet(result: BetResult, wager: Decimal, payout: Option<Decimal>) -> Bet {
        Bet {
            id: 0,
            bet_type: BetType::Spread,
            bet_placed_date: Utc::now(),
            game_date: Utc::now(),
            team: "MIL".to_string(),
            opponent: "CHI".to_string(),
            wager_amount: wager,
            odds: -110,
            result,
            payout,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
            player_name: None,
            prop_type: None,
            description: Some("MIL-spread".to_string()),
            prop_line: Some(dec!(-5.5)),
            over_under: None,
            actual_value: None,
        }
    }

    #[test]
    fn test_win_rate_zero_division_is_zero() {
        assert_eq!(win_rate(&[]), 0.0);

        let pending_only = vec![
            bet(BetResult::Pending, dec!(50), None),
            bet(BetResult::Pending, dec!(25), None),
        ];
        assert_eq!(win_rate(&pending_only), 0.0);
    }

    #[test]
    fn test_win_rate_counts_all_settled_in_denominator() {
        let bets = vec![
            bet(BetResult::Win, dec!(50), Some(dec!(95.45))),
            bet(BetResult::Loss, dec!(50), Some(dec!(0))),
            bet(BetResult::Push, dec!(50), Some(dec!(50))),
            bet(BetResult::Pending, dec!(50), None),
        ];
        // 1 win out of 3 settled
        assert_eq!(win_rate(&bets), 33.33);
    }

    #[test]
    fn test_net_profit_loss_winning_week() {
        let bets = vec![
            bet(BetResult::Win, dec!(50), Some(dec!(95.45))),
            bet(BetResult::Win, dec!(35), Some(dec!(64.17))),
        ];
        assert_eq!(net_profit_loss(&bets), dec!(74.62));
    }

    #[test]
    fn test_net_profit_loss_losing_week() {
        let bets = vec![
            bet(BetResult::Loss, dec!(50), Some(dec!(0))),
            bet(BetResult::Loss, dec!(30), Some(dec!(0))),
        ];
        assert_eq!(net_profit_loss(&bets), dec!(-80.00));
    }

    #[test]
    fn test_net_profit_loss_ignores_pending() {
        let bets = vec![
            bet(BetResult::Pending, dec!(100), None),
            bet(BetResult::Win, dec!(50), Some(dec!(95.45))),
        ];
        assert_eq!(net_profit_loss(&bets), dec!(45.45));
    }

    #[test]
    fn test_payout_delta_sentinel_and_classes() {
        let open = bet(BetResult::Pending, dec!(50), None);
        assert_eq!(payout_delta(&open), PayoutDelta::Pending);
        assert_eq!(payout_delta(&open).classify(), None);
        assert_eq!(payout_delta(&open).to_string(), "Pending");

        let won = bet(BetResult::Win, dec!(50), Some(dec!(95.45)));
        assert_eq!(payout_delta(&won), PayoutDelta::Settled(dec!(45.45)));
        assert_eq!(payout_delta(&won).classify(), Some(DeltaClass::Profit));

        let lost = bet(BetResult::Loss, dec!(50), Some(dec!(0)));
        assert_eq!(payout_delta(&lost), PayoutDelta::Settled(dec!(-50)));
        assert_eq!(payout_delta(&lost).classify(), Some(DeltaClass::Loss));

        let pushed = bet(BetResult::Push, dec!(50), Some(dec!(50)));
        assert_eq!(payout_delta(&pushed), PayoutDelta::Settled(Decimal::ZERO));
        assert_eq!(payout_delta(&pushed).classify(), Some(DeltaClass::Push));
    }

    #[test]
    fn test_category_breakdown() {
        let mut player = bet(BetResult::Win, dec!(50), Some(dec!(95.45)));
        player.bet_type = BetType::PlayerProp;
        player.player_name = Some("LeBron James".to_string());
        player.prop_type = Some(PropType::Points);

        let mut game = bet(BetResult::Pending, dec!(20), None);
        game.bet_type = BetType::GameTotal;

        let team = bet(BetResult::Loss, dec!(30), Some(dec!(0)));

        let breakdown = category_breakdown(&[player, game, team]);
        assert_eq!(
            breakdown,
            CategoryBreakdown {
                player: 1,
                team: 1,
                game: 1,
            }
        );
    }

    #[test]
    fn test_summarize() {
        let bets = vec![
            bet(BetResult::Win, dec!(50), Some(dec!(95.45))),
            bet(BetResult::Loss, dec!(30), Some(dec!(0))),
            bet(BetResult::Pending, dec!(20), None),
        ];

        let summary = summarize(&bets);
        assert_eq!(summary.total_bets, 3);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.settled, 2);
        assert_eq!(summary.win_rate, 50.0);
        assert_eq!(summary.net_profit_loss, dec!(15.45));
        assert_eq!(summary.categories.team, 3);
    }
}
