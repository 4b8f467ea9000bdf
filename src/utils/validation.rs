use crate::models::{
    generate_description, BetCreate, BetDetails, BetResult, BetType, NumericInput, ValidatedBet,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// A single violated rule. Validation collects every violation in one
/// pass so the caller can surface all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} is required for {bet_type} bets")]
    RequiredForType {
        field: &'static str,
        bet_type: BetType,
    },
    #[error("team and opponent must be different")]
    TeamEqualsOpponent,
    #[error("wager_amount must be greater than zero")]
    NonPositiveWager,
    #[error("odds cannot be zero")]
    ZeroOdds,
    #[error("{field} must be a number, got \"{value}\"")]
    NotNumeric {
        field: &'static str,
        value: String,
    },
}

fn nonempty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Coerce an optional numeric field. Returns the parsed value plus a flag
/// marking whether a parse failure was recorded, so presence checks do not
/// double-report the same field.
fn coerce(
    value: &Option<NumericInput>,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> (Option<Decimal>, bool) {
    match value {
        None => (None, false),
        Some(raw) => match raw.to_decimal() {
            Ok(parsed) => (parsed, false),
            Err(text) => {
                errors.push(ValidationError::NotNumeric { field, value: text });
                (None, true)
            }
        },
    }
}

/// Check a create payload against every bet invariant and build the
/// validated record. All violations are returned together, never just the
/// first. A missing stored description is filled in via
/// [`generate_description`]; an explicit one always wins.
pub fn validate(input: &BetCreate) -> Result<ValidatedBet, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if input.bet_type.is_none() {
        errors.push(ValidationError::Required("bet_type"));
    }

    // Required fields that depend on the bet type
    let player_name = nonempty(&input.player_name);
    if let Some(bet_type) = input.bet_type {
        if bet_type == BetType::PlayerProp {
            if player_name.is_none() {
                errors.push(ValidationError::RequiredForType {
                    field: "player_name",
                    bet_type,
                });
            }
            if input.prop_type.is_none() {
                errors.push(ValidationError::RequiredForType {
                    field: "prop_type",
                    bet_type,
                });
            }
        }
    }

    let team = nonempty(&input.team);
    if team.is_none() {
        errors.push(ValidationError::Required("team"));
    }
    let opponent = nonempty(&input.opponent);
    if opponent.is_none() {
        errors.push(ValidationError::Required("opponent"));
    }
    if input.bet_placed_date.is_none() {
        errors.push(ValidationError::Required("bet_placed_date"));
    }
    if input.game_date.is_none() {
        errors.push(ValidationError::Required("game_date"));
    }

    // A team cannot face itself
    if let (Some(team), Some(opponent)) = (team, opponent) {
        if team.eq_ignore_ascii_case(opponent) {
            errors.push(ValidationError::TeamEqualsOpponent);
        }
    }

    let (wager, wager_bad) = coerce(&input.wager_amount, "wager_amount", &mut errors);
    match wager {
        Some(amount) if amount <= Decimal::ZERO => errors.push(ValidationError::NonPositiveWager),
        Some(_) => {}
        None if !wager_bad => errors.push(ValidationError::Required("wager_amount")),
        None => {}
    }

    match input.odds {
        None => errors.push(ValidationError::Required("odds")),
        Some(0) => errors.push(ValidationError::ZeroOdds),
        Some(_) => {}
    }

    // prop_line is required for everything except moneylines
    let (line, line_bad) = coerce(&input.prop_line, "prop_line", &mut errors);
    if let Some(bet_type) = input.bet_type {
        if bet_type != BetType::Moneyline && line.is_none() && !line_bad {
            errors.push(ValidationError::RequiredForType {
                field: "prop_line",
                bet_type,
            });
        }
    }

    let (actual_value, _) = coerce(&input.actual_value, "actual_value", &mut errors);
    let (payout, _) = coerce(&input.payout, "payout", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    // Everything below is guarded by the checks above
    let bet_type = input.bet_type.unwrap();
    let details = match bet_type {
        BetType::PlayerProp => BetDetails::PlayerProp {
            player_name: player_name.unwrap().to_string(),
            prop_type: input.prop_type.unwrap(),
            line: line.unwrap(),
            over_under: input.over_under,
        },
        BetType::TeamProp => BetDetails::TeamProp {
            prop_type: input.prop_type,
            line: line.unwrap(),
            over_under: input.over_under,
        },
        BetType::GameTotal => BetDetails::GameTotal {
            line: line.unwrap(),
            over_under: input.over_under,
        },
        BetType::Spread => BetDetails::Spread {
            line: line.unwrap(),
        },
        BetType::Moneyline => BetDetails::Moneyline,
    };

    let description = match nonempty(&input.description) {
        Some(explicit) => explicit.to_string(),
        None => generate_description(bet_type, team, player_name, input.prop_type),
    };

    Ok(ValidatedBet {
        bet_placed_date: input.bet_placed_date.unwrap(),
        game_date: input.game_date.unwrap(),
        team: team.unwrap().to_string(),
        opponent: opponent.unwrap().to_string(),
        wager_amount: wager.unwrap(),
        odds: input.odds.unwrap(),
        result: input.result.unwrap_or(BetResult::Pending),
        description,
        actual_value,
        payout,
        notes: input.notes.clone(),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OverUnder, PropType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn player_prop_input() -> BetCreate {
        BetCreate {
            bet_type: Some(BetType::PlayerProp),
            bet_placed_date: Some(Utc::now()),
            game_date: Some(Utc::now()),
            team: Some("LAL".to_string()),
            opponent: Some("GSW".to_string()),
            player_name: Some("LeBron James".to_string()),
            prop_type: Some(PropType::Points),
            prop_line: Some(NumericInput::Text("25.5".to_string())),
            over_under: Some(OverUnder::Over),
            wager_amount: Some(NumericInput::Text("50".to_string())),
            odds: Some(-110),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_player_prop_passes() {
        let validated = validate(&player_prop_input()).unwrap();
        assert_eq!(validated.team, "LAL");
        assert_eq!(validated.wager_amount, dec!(50));
        assert_eq!(validated.result, BetResult::Pending);
        assert_eq!(validated.description, "LeBron James-points");
        match validated.details {
            BetDetails::PlayerProp {
                ref player_name,
                prop_type,
                line,
                over_under,
            } => {
                assert_eq!(player_name, "LeBron James");
                assert_eq!(prop_type, PropType::Points);
                assert_eq!(line, dec!(25.5));
                assert_eq!(over_under, Some(OverUnder::Over));
            }
            other => panic!("wrong details variant: {:?}", other),
        }
    }

    #[test]
    fn test_player_prop_requires_player_fields() {
        let mut input = player_prop_input();
        input.player_name = None;
        input.prop_type = None;

        let errors = validate(&input).unwrap_err();
        assert!(errors.contains(&ValidationError::RequiredForType {
            field: "player_name",
            bet_type: BetType::PlayerProp,
        }));
        assert!(errors.contains(&ValidationError::RequiredForType {
            field: "prop_type",
            bet_type: BetType::PlayerProp,
        }));
    }

    #[test]
    fn test_team_cannot_face_itself() {
        let mut input = player_prop_input();
        input.opponent = Some("LAL".to_string());

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors, vec![ValidationError::TeamEqualsOpponent]);

        // Case differences do not make it a different team
        input.opponent = Some("lal".to_string());
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors, vec![ValidationError::TeamEqualsOpponent]);
    }

    #[test]
    fn test_all_violations_reported_together() {
        let input = BetCreate {
            bet_type: Some(BetType::PlayerProp),
            bet_placed_date: Some(Utc::now()),
            game_date: Some(Utc::now()),
            team: Some("LAL".to_string()),
            opponent: Some("LAL".to_string()),
            player_name: None,
            prop_type: None,
            prop_line: Some(NumericInput::Text("abc".to_string())),
            wager_amount: Some(NumericInput::Number(dec!(-5))),
            odds: Some(0),
            ..Default::default()
        };

        let errors = validate(&input).unwrap_err();
        assert!(errors.len() >= 5);
        assert!(errors.contains(&ValidationError::TeamEqualsOpponent));
        assert!(errors.contains(&ValidationError::NonPositiveWager));
        assert!(errors.contains(&ValidationError::ZeroOdds));
        assert!(errors.contains(&ValidationError::NotNumeric {
            field: "prop_line",
            value: "abc".to_string(),
        }));
    }

    #[test]
    fn test_wager_must_be_positive() {
        let mut input = player_prop_input();
        input.wager_amount = Some(NumericInput::Number(Decimal::ZERO));
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NonPositiveWager]);
    }

    #[test]
    fn test_empty_wager_is_missing_not_zero() {
        let mut input = player_prop_input();
        input.wager_amount = Some(NumericInput::Text("".to_string()));
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors, vec![ValidationError::Required("wager_amount")]);
    }

    #[test]
    fn test_moneyline_needs_no_line() {
        let input = BetCreate {
            bet_type: Some(BetType::Moneyline),
            bet_placed_date: Some(Utc::now()),
            game_date: Some(Utc::now()),
            team: Some("MIL".to_string()),
            opponent: Some("CHI".to_string()),
            wager_amount: Some(NumericInput::Number(dec!(25))),
            odds: Some(150),
            ..Default::default()
        };

        let validated = validate(&input).unwrap();
        assert_eq!(validated.details, BetDetails::Moneyline);
        assert_eq!(validated.description, "MIL-moneyline");
    }

    #[test]
    fn test_spread_requires_line() {
        let input = BetCreate {
            bet_type: Some(BetType::Spread),
            bet_placed_date: Some(Utc::now()),
            game_date: Some(Utc::now()),
            team: Some("MIL".to_string()),
            opponent: Some("CHI".to_string()),
            wager_amount: Some(NumericInput::Number(dec!(25))),
            odds: Some(-110),
            ..Default::default()
        };

        let errors = validate(&input).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequiredForType {
                field: "prop_line",
                bet_type: BetType::Spread,
            }]
        );
    }

    #[test]
    fn test_spread_line_may_be_negative() {
        let input = BetCreate {
            bet_type: Some(BetType::Spread),
            bet_placed_date: Some(Utc::now()),
            game_date: Some(Utc::now()),
            team: Some("MIL".to_string()),
            opponent: Some("CHI".to_string()),
            prop_line: Some(NumericInput::Text("-7.5".to_string())),
            wager_amount: Some(NumericInput::Number(dec!(25))),
            odds: Some(-110),
            ..Default::default()
        };

        let validated = validate(&input).unwrap();
        assert_eq!(validated.details, BetDetails::Spread { line: dec!(-7.5) });
    }

    #[test]
    fn test_explicit_description_wins() {
        let mut input = player_prop_input();
        input.description = Some("Custom Description".to_string());
        let validated = validate(&input).unwrap();
        assert_eq!(validated.description, "Custom Description");
    }
}
