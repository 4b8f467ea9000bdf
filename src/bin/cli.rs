use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use nba_bet_tracker::aggregation::payout_delta;
use nba_bet_tracker::client::BetApiClient;
use nba_bet_tracker::data::{save_bets_to_csv, save_snapshot};
use nba_bet_tracker::derivation::BetView;
use nba_bet_tracker::filtering::BetFilter;
use nba_bet_tracker::models::{
    BetCreate, BetResult, BetType, BetUpdate, NumericInput, OverUnder, PropType,
};
use nba_bet_tracker::sorting::{SortDirection, SortKey, SortState};
use nba_bet_tracker::{fetch_dashboard, validation::validate};

#[derive(Parser)]
#[command(name = "nba-bets", about = "Personal NBA wager tracker")]
struct Cli {
    /// Base URL of the bets API (falls back to BETS_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bets, with optional filters and sorting
    List {
        #[arg(long)]
        bet_type: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        prop_type: Option<String>,
        #[arg(long)]
        result: Option<String>,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        limit: Option<usize>,
        /// Sort column: date, category, team, wager, result, payout
        #[arg(long, default_value = "date")]
        sort: String,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// Show a single bet
    Show { id: i64 },
    /// Record a new wager
    Add {
        #[arg(long)]
        bet_type: String,
        #[arg(long)]
        team: String,
        #[arg(long)]
        opponent: String,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        prop_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        line: Option<String>,
        #[arg(long)]
        over_under: Option<String>,
        #[arg(long)]
        wager: String,
        #[arg(long, allow_hyphen_values = true)]
        odds: i32,
        #[arg(long)]
        game_date: Option<DateTime<Utc>>,
        #[arg(long)]
        placed_date: Option<DateTime<Utc>>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Settle a bet with its result, actual value and payout
    Settle {
        id: i64,
        #[arg(long)]
        result: String,
        #[arg(long)]
        actual: Option<String>,
        #[arg(long)]
        payout: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a bet
    Delete { id: i64 },
    /// Show the performance summary
    Summary,
    /// Export the ledger to CSV (or a JSON snapshot with --json)
    Export {
        path: String,
        #[arg(long)]
        json: bool,
    },
    /// Load a handful of sample wagers
    Seed,
}

fn format_row(view: &BetView) -> String {
    let bet = &view.bet;
    format!(
        "#{} {} | {} vs {} | {} | {} | {} | ${} @ {:+} | {} | {}",
        bet.id,
        bet.game_date.format("%Y-%m-%d"),
        bet.team,
        bet.opponent,
        view.category,
        view.display_description,
        view.display_line,
        bet.wager_amount,
        bet.odds,
        bet.result,
        payout_delta(bet)
    )
}

fn sample_bets() -> Vec<BetCreate> {
    let game_date = Utc::now() - Duration::days(7);
    let placed_date = Utc::now() - Duration::days(10);

    let base = BetCreate {
        bet_placed_date: Some(placed_date),
        game_date: Some(game_date),
        ..Default::default()
    };

    vec![
        BetCreate {
            bet_type: Some(BetType::PlayerProp),
            team: Some("LAL".to_string()),
            opponent: Some("GSW".to_string()),
            player_name: Some("LeBron James".to_string()),
            prop_type: Some(PropType::Points),
            prop_line: Some(NumericInput::Text("25.5".to_string())),
            over_under: Some(OverUnder::Over),
            wager_amount: Some(NumericInput::Text("50.00".to_string())),
            odds: Some(-110),
            result: Some(BetResult::Win),
            actual_value: Some(NumericInput::Text("28.0".to_string())),
            payout: Some(NumericInput::Text("95.45".to_string())),
            ..base.clone()
        },
        BetCreate {
            bet_type: Some(BetType::PlayerProp),
            team: Some("GSW".to_string()),
            opponent: Some("LAL".to_string()),
            player_name: Some("Stephen Curry".to_string()),
            prop_type: Some(PropType::Threes),
            prop_line: Some(NumericInput::Text("4.5".to_string())),
            over_under: Some(OverUnder::Over),
            wager_amount: Some(NumericInput::Text("35.00".to_string())),
            odds: Some(120),
            result: Some(BetResult::Loss),
            actual_value: Some(NumericInput::Text("3.0".to_string())),
            payout: Some(NumericInput::Text("0".to_string())),
            ..base.clone()
        },
        BetCreate {
            bet_type: Some(BetType::TeamProp),
            team: Some("BOS".to_string()),
            opponent: Some("MIA".to_string()),
            prop_type: Some(PropType::Points),
            prop_line: Some(NumericInput::Text("112.5".to_string())),
            over_under: Some(OverUnder::Over),
            wager_amount: Some(NumericInput::Text("75.00".to_string())),
            odds: Some(-110),
            ..base.clone()
        },
        BetCreate {
            bet_type: Some(BetType::Spread),
            team: Some("MIL".to_string()),
            opponent: Some("CHI".to_string()),
            prop_line: Some(NumericInput::Text("-5.5".to_string())),
            wager_amount: Some(NumericInput::Text("100.00".to_string())),
            odds: Some(-110),
            result: Some(BetResult::Win),
            payout: Some(NumericInput::Text("190.91".to_string())),
            ..base.clone()
        },
        BetCreate {
            bet_type: Some(BetType::Moneyline),
            team: Some("PHX".to_string()),
            opponent: Some("DEN".to_string()),
            wager_amount: Some(NumericInput::Text("25.00".to_string())),
            odds: Some(150),
            ..base.clone()
        },
        BetCreate {
            bet_type: Some(BetType::GameTotal),
            team: Some("NYK".to_string()),
            opponent: Some("PHI".to_string()),
            prop_line: Some(NumericInput::Text("220".to_string())),
            over_under: Some(OverUnder::Under),
            wager_amount: Some(NumericInput::Text("40.00".to_string())),
            odds: Some(-105),
            result: Some(BetResult::Push),
            actual_value: Some(NumericInput::Text("220".to_string())),
            payout: Some(NumericInput::Text("40.00".to_string())),
            ..base
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let api_url = cli
        .api_url
        .or_else(|| std::env::var("BETS_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:3000".to_string());
    let client = BetApiClient::new(api_url);

    match cli.command {
        Command::List {
            bet_type,
            team,
            player,
            prop_type,
            result,
            skip,
            limit,
            sort,
            asc,
        } => {
            let filter = BetFilter {
                bet_type: parse_opt(bet_type, "bet type")?,
                team,
                player_name: player,
                prop_type: parse_opt(prop_type, "prop type")?,
                result: parse_opt(result, "result")?,
                skip,
                limit,
            };
            let key: SortKey = sort.parse().map_err(anyhow::Error::msg)?;
            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };

            let dashboard = fetch_dashboard(&client, &filter, &SortState::new(key, direction)).await?;

            if dashboard.bets.is_empty() {
                println!("No bets found.");
            } else {
                for (i, view) in dashboard.bets.iter().enumerate() {
                    println!("{}. {}", i + 1, format_row(view));
                }
                println!(
                    "\n{} bets | win rate {:.2}% | net {}",
                    dashboard.summary.total_bets,
                    dashboard.summary.win_rate,
                    dashboard.summary.net_profit_loss
                );
            }
        }

        Command::Show { id } => {
            let bet = client.get_bet(id).await?;
            let view = nba_bet_tracker::derivation::enrich(&bet);
            println!("{}", format_row(&view));
            if let Some(notes) = &bet.notes {
                println!("Notes: {}", notes);
            }
        }

        Command::Add {
            bet_type,
            team,
            opponent,
            player,
            prop_type,
            description,
            line,
            over_under,
            wager,
            odds,
            game_date,
            placed_date,
            notes,
        } => {
            let input = BetCreate {
                bet_type: Some(bet_type.parse::<BetType>().map_err(anyhow::Error::msg)?),
                bet_placed_date: Some(placed_date.unwrap_or_else(Utc::now)),
                game_date: Some(game_date.unwrap_or_else(Utc::now)),
                team: Some(team),
                opponent: Some(opponent),
                player_name: player,
                prop_type: parse_opt(prop_type, "prop type")?,
                description,
                prop_line: line.map(NumericInput::Text),
                over_under: parse_opt(over_under, "over/under")?,
                wager_amount: Some(NumericInput::Text(wager)),
                odds: Some(odds),
                result: None,
                actual_value: None,
                payout: None,
                notes,
            };

            // Report every problem before going to the server
            if let Err(errors) = validate(&input) {
                eprintln!("Bet is invalid:");
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                anyhow::bail!("{} validation error(s)", errors.len());
            }

            let bet = client.create_bet(&input).await?;
            println!("Created bet #{}", bet.id);
            println!(
                "{}",
                format_row(&nba_bet_tracker::derivation::enrich(&bet))
            );
        }

        Command::Settle {
            id,
            result,
            actual,
            payout,
            notes,
        } => {
            let patch = BetUpdate {
                result: Some(result.parse::<BetResult>().map_err(anyhow::Error::msg)?),
                actual_value: actual.map(NumericInput::Text),
                payout: payout.map(NumericInput::Text),
                notes,
                ..Default::default()
            };
            let bet = client.update_bet(id, &patch).await?;
            println!(
                "Settled bet #{}: {} ({})",
                bet.id,
                bet.result,
                payout_delta(&bet)
            );
        }

        Command::Delete { id } => {
            client.delete_bet(id).await?;
            println!("Deleted bet #{}", id);
        }

        Command::Summary => {
            let summary = client.get_summary().await?;
            println!("BETTING SUMMARY\n");
            println!("Total bets: {}", summary.total_bets);
            println!(
                "Record: {}-{} ({} settled)",
                summary.wins, summary.losses, summary.settled
            );
            println!("Win rate: {:.2}%", summary.win_rate);
            println!("Net profit/loss: {}", summary.net_profit_loss);
            println!(
                "Categories: {} player / {} team / {} game",
                summary.categories.player, summary.categories.team, summary.categories.game
            );
        }

        Command::Export { path, json } => {
            let bets = client.list_bets(&BetFilter::default()).await?;
            if json {
                save_snapshot(&bets, &path)?;
            } else {
                save_bets_to_csv(&bets, &path)?;
            }
            println!("Exported {} bets to {}", bets.len(), path);
        }

        Command::Seed => {
            for input in sample_bets() {
                let bet = client.create_bet(&input).await?;
                println!("Seeded bet #{}: {}", bet.id, bet.description.as_deref().unwrap_or(""));
            }
            println!("\nDone.");
        }
    }

    Ok(())
}

fn parse_opt<T>(value: Option<String>, what: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", what, e)),
    }
}
