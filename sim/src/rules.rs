//! Touch/fault rule engine.
//!
//! Tracks the live rally (touch count, last toucher, possessing team) and the
//! match score. Faults are ordinary rule outcomes: they award a point to the
//! other team, reset the rally and report `TouchOutcome::Rejected` so the
//! caller can cancel the action before any force reaches the ball.

use crate::actor::ActorId;
use crate::ball::Ball;
use crate::config::ServeRule;
use futevolei_shared::protocol::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Same actor touched the ball twice in a row
    DoubleTouch,
    /// Team exceeded the touch limit
    TooManyTouches,
}

impl Fault {
    pub fn describe(self) -> &'static str {
        match self {
            Fault::DoubleTouch => "Double touch!",
            Fault::TooManyTouches => "Too many touches!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointReason {
    /// Ball came to rest or left the court on the losing team's side
    Landed,
    Fault(Fault),
}

/// A point that was just awarded, with the score after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointAwarded {
    pub team: Team,
    pub player_score: u32,
    pub opponent_score: u32,
    pub reason: PointReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    Accepted { touch_count: u32 },
    /// The touch was a fault; the point is already awarded and the rally reset
    Rejected(PointAwarded),
}

impl TouchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TouchOutcome::Accepted { .. })
    }
}

/// How a rally ended when the ball landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RallyEnd {
    Point(PointAwarded),
    /// Ball settled exactly on the centerline: no point, same server
    Replay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RallyState {
    pub touch_count: u32,
    pub last_touch_actor: Option<ActorId>,
    pub current_team: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub player: u32,
    pub opponent: u32,
    pub last_scoring_team: Option<Team>,
}

impl MatchScore {
    pub fn of(&self, team: Team) -> u32 {
        match team {
            Team::Player => self.player,
            Team::Opponent => self.opponent,
        }
    }
}

/// Serving team as a pure function of the last point.
pub fn serving_team(last_scoring_team: Option<Team>, rule: ServeRule) -> Team {
    match (last_scoring_team, rule) {
        (None, _) => Team::Player,
        (Some(team), ServeRule::WinnerServes) => team,
        (Some(team), ServeRule::LoserServes) => team.other(),
    }
}

#[derive(Debug)]
pub struct RuleEngine {
    rally: RallyState,
    score: MatchScore,
    max_touches: u32,
    points_to_win: u32,
    serve_rule: ServeRule,
    /// Set by the point that first reaches `points_to_win`
    winner: Option<Team>,
}

impl RuleEngine {
    pub fn new(max_touches: u32, points_to_win: u32, serve_rule: ServeRule) -> Self {
        Self {
            rally: RallyState::default(),
            score: MatchScore::default(),
            max_touches,
            points_to_win,
            serve_rule,
            winner: None,
        }
    }

    /// Register a touch. Must run before the touching action applies any force.
    pub fn register_touch(&mut self, actor: ActorId, team: Team) -> TouchOutcome {
        if self.rally.current_team != Some(team) {
            self.rally.touch_count = 0;
            self.rally.last_touch_actor = None;
            self.rally.current_team = Some(team);
        }

        if self.rally.last_touch_actor == Some(actor) {
            tracing::info!("Fault: actor {} touched the ball twice in a row", actor.0);
            return TouchOutcome::Rejected(self.award_fault(team, Fault::DoubleTouch));
        }

        self.rally.touch_count += 1;
        self.rally.last_touch_actor = Some(actor);

        if self.rally.touch_count > self.max_touches {
            tracing::info!(
                "Fault: more than {} touches by {}",
                self.max_touches,
                team.label()
            );
            return TouchOutcome::Rejected(self.award_fault(team, Fault::TooManyTouches));
        }

        TouchOutcome::Accepted {
            touch_count: self.rally.touch_count,
        }
    }

    /// Check whether the ball has ended the rally. Call after the ball update.
    pub fn evaluate(&mut self, ball: &Ball) -> Option<RallyEnd> {
        let landed = ball.is_on_ground() && ball.is_stopped();
        if !landed && !ball.is_out_of_bounds() {
            return None;
        }

        let z = ball.position.z;
        let end = if z < 0.0 {
            RallyEnd::Point(self.award(Team::Player, PointReason::Landed))
        } else if z > 0.0 {
            RallyEnd::Point(self.award(Team::Opponent, PointReason::Landed))
        } else {
            tracing::info!("Ball settled on the centerline, replaying the rally");
            RallyEnd::Replay
        };

        self.reset_rally();
        Some(end)
    }

    pub fn serving_team(&self) -> Team {
        serving_team(self.score.last_scoring_team, self.serve_rule)
    }

    pub fn is_match_over(&self) -> bool {
        self.winner().is_some()
    }

    /// First team to reach the winning score. Later points never change it.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Start a new match.
    pub fn reset(&mut self) {
        self.score = MatchScore::default();
        self.winner = None;
        self.reset_rally();
    }

    pub fn score(&self) -> &MatchScore {
        &self.score
    }

    pub fn rally(&self) -> &RallyState {
        &self.rally
    }

    pub fn reset_rally(&mut self) {
        self.rally = RallyState::default();
    }

    fn award_fault(&mut self, fault_team: Team, fault: Fault) -> PointAwarded {
        let point = self.award(fault_team.other(), PointReason::Fault(fault));
        self.reset_rally();
        point
    }

    fn award(&mut self, team: Team, reason: PointReason) -> PointAwarded {
        match team {
            Team::Player => self.score.player += 1,
            Team::Opponent => self.score.opponent += 1,
        }
        self.score.last_scoring_team = Some(team);
        if self.winner.is_none() && self.score.of(team) >= self.points_to_win {
            self.winner = Some(team);
        }
        tracing::info!(
            "Point to {} ({:?}): {} - {}",
            team.label(),
            reason,
            self.score.player,
            self.score.opponent
        );
        PointAwarded {
            team,
            player_score: self.score.player,
            opponent_score: self.score.opponent,
            reason,
        }
    }
}
