use crate::models::Bet;
use crate::utils::aggregation::payout_delta;
use crate::utils::derivation::enrich;
use anyhow::{Context, Result};
use serde::Serialize;

/// Save the full bet list to a JSON snapshot file
pub fn save_snapshot(bets: &[Bet], path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(bets).context("Failed to serialize bet snapshot")?;
    std::fs::write(path, json).context("Failed to write snapshot file")?;
    Ok(())
}

/// Load a bet list from a JSON snapshot file
pub fn load_snapshot(path: &str) -> Result<Vec<Bet>> {
    let json = std::fs::read_to_string(path).context("Failed to read snapshot file")?;
    let bets: Vec<Bet> =
        serde_json::from_str(&json).context("Failed to deserialize bet snapshot")?;
    Ok(bets)
}

/// One CSV line of the exported ledger, with the derived display fields
/// already applied
#[derive(Debug, Serialize)]
struct LedgerRow {
    id: i64,
    placed: String,
    game: String,
    team: String,
    opponent: String,
    category: &'static str,
    description: String,
    line: String,
    wager: String,
    odds: String,
    result: &'static str,
    actual_value: String,
    payout: String,
    profit_loss: String,
}

/// Export the bet ledger to CSV
pub fn save_bets_to_csv(bets: &[Bet], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV file")?;

    for bet in bets {
        let view = enrich(bet);
        let row = LedgerRow {
            id: bet.id,
            placed: bet.bet_placed_date.format("%Y-%m-%d %H:%M").to_string(),
            game: bet.game_date.format("%Y-%m-%d %H:%M").to_string(),
            team: bet.team.clone(),
            opponent: bet.opponent.clone(),
            category: view.category.as_str(),
            description: view.display_description,
            line: view.display_line,
            wager: bet.wager_amount.to_string(),
            odds: format!("{:+}", bet.odds),
            result: bet.result.as_str(),
            actual_value: bet
                .actual_value
                .map(|v| v.to_string())
                .unwrap_or_default(),
            payout: bet.payout.map(|p| p.to_string()).unwrap_or_default(),
            profit_loss: payout_delta(bet).to_string(),
        };
        writer.serialize(row).context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BetResult, BetType, OverUnder, PropType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_bet() -> Bet {
        Bet {
            id: 7,
            bet_type: BetType::PlayerProp,
            bet_placed_date: Utc::now(),
            game_date: Utc::now(),
            team: "LAL".to_string(),
            opponent: "GSW".to_string(),
            wager_amount: dec!(50.00),
            odds: -110,
            result: BetResult::Win,
            payout: Some(dec!(95.45)),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
            player_name: Some("LeBron James".to_string()),
            prop_type: Some(PropType::Points),
            description: Some("LeBron James-points".to_string()),
            prop_line: Some(dec!(25.5)),
            over_under: Some(OverUnder::Over),
            actual_value: Some(dec!(28.0)),
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("bets_snapshot_{}.json", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        let bets = vec![sample_bet()];
        save_snapshot(&bets, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, bets);
    }

    #[test]
    fn test_csv_export_includes_derived_columns() {
        let path = std::env::temp_dir().join(format!("bets_export_{}.csv", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        save_bets_to_csv(&[sample_bet()], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(contents.contains("LeBron James Points"));
        assert!(contents.contains("OVER 25.5"));
        assert!(contents.contains("45.45"));
    }
}
