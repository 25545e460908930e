use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The two sides of the net. `Player` is the human's team and defends z > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Player,
    Opponent,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::Player => Team::Opponent,
            Team::Opponent => Team::Player,
        }
    }

    /// Sign of z on this team's half of the court.
    pub fn side_sign(self) -> f64 {
        match self {
            Team::Player => 1.0,
            Team::Opponent => -1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Team::Player => "Player",
            Team::Opponent => "Opponent",
        }
    }
}

// === Core -> Presentation ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "score")]
    Score(ScoreMsg),
    #[serde(rename = "message")]
    Message(MessageMsg),
    #[serde(rename = "indicator")]
    Indicator(IndicatorMsg),
    #[serde(rename = "indicator_hidden")]
    IndicatorHidden,
    #[serde(rename = "serve_started")]
    ServeStarted(ServeStartedMsg),
    #[serde(rename = "match_over")]
    MatchOver(MatchOverMsg),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ScoreMsg {
    pub player_score: u32,
    pub opponent_score: u32,
    pub scoring_team: Team,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase")]
pub struct MessageMsg {
    pub text: String,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase")]
pub struct IndicatorMsg {
    /// Current power in [0, 1]
    pub power: f64,
    /// Aim angle in radians, 0 = toward the opponent
    pub angle: f64,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ServeStartedMsg {
    pub serving_team: Team,
    pub server_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase")]
pub struct MatchOverMsg {
    pub winner: Team,
    pub player_score: u32,
    pub opponent_score: u32,
}

/// Round to 4 decimal places for compact event JSON
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_other_flips() {
        assert_eq!(Team::Player.other(), Team::Opponent);
        assert_eq!(Team::Opponent.other(), Team::Player);
    }

    #[test]
    fn score_event_is_tagged() {
        let event = GameEvent::Score(ScoreMsg {
            player_score: 3,
            opponent_score: 1,
            scoring_team: Team::Player,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"score\""));
        assert!(json.contains("\"playerScore\":3"));
        assert!(json.contains("\"scoringTeam\":\"player\""));
    }

    #[test]
    fn indicator_hidden_has_no_payload() {
        let json = serde_json::to_string(&GameEvent::IndicatorHidden).unwrap();
        assert_eq!(json, r#"{"type":"indicator_hidden"}"#);
    }

    #[test]
    fn match_over_parses_from_client_json() {
        let parsed: GameEvent = serde_json::from_str(
            r#"{"type":"match_over","winner":"opponent","playerScore":7,"opponentScore":12}"#,
        )
        .unwrap();
        match parsed {
            GameEvent::MatchOver(m) => {
                assert_eq!(m.winner, Team::Opponent);
                assert_eq!(m.opponent_score, 12);
            }
            _ => panic!("Expected MatchOver"),
        }
    }

    #[test]
    fn round4_trims_precision() {
        assert_eq!(round4(0.123456), 0.1235);
    }
}
