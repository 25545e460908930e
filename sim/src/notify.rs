//! Presentation callbacks.
//!
//! The match state never calls into a HUD directly; it returns `GameEvent`s
//! from every tick and the caller forwards them here. Every method has a
//! no-op default so a notifier implements only what it shows.

use std::io::Write;

use futevolei_shared::protocol::{
    GameEvent, IndicatorMsg, MatchOverMsg, MessageMsg, ScoreMsg, ServeStartedMsg,
};

pub trait Notifier {
    fn score(&mut self, _msg: &ScoreMsg) {}
    fn message(&mut self, _msg: &MessageMsg) {}
    fn indicator(&mut self, _msg: &IndicatorMsg) {}
    fn hide_indicator(&mut self) {}
    fn serve_started(&mut self, _msg: &ServeStartedMsg) {}
    fn match_over(&mut self, _msg: &MatchOverMsg) {}
}

/// Forward events in order. A missing notifier drops them.
pub fn dispatch(events: &[GameEvent], notifier: Option<&mut (dyn Notifier + '_)>) {
    let Some(notifier) = notifier else {
        return;
    };
    for event in events {
        match event {
            GameEvent::Score(msg) => notifier.score(msg),
            GameEvent::Message(msg) => notifier.message(msg),
            GameEvent::Indicator(msg) => notifier.indicator(msg),
            GameEvent::IndicatorHidden => notifier.hide_indicator(),
            GameEvent::ServeStarted(msg) => notifier.serve_started(msg),
            GameEvent::MatchOver(msg) => notifier.match_over(msg),
        }
    }
}

/// Logs notifications. Indicator updates fire every aiming tick, so they go
/// to trace level.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn score(&mut self, msg: &ScoreMsg) {
        tracing::info!(
            "Score {} - {} (point to {})",
            msg.player_score,
            msg.opponent_score,
            msg.scoring_team.label()
        );
    }

    fn message(&mut self, msg: &MessageMsg) {
        tracing::info!("Message: {} ({} ms)", msg.text, msg.duration_ms);
    }

    fn indicator(&mut self, msg: &IndicatorMsg) {
        tracing::trace!("Indicator power={:.2} angle={:.2}", msg.power, msg.angle);
    }

    fn hide_indicator(&mut self) {
        tracing::trace!("Indicator hidden");
    }

    fn serve_started(&mut self, msg: &ServeStartedMsg) {
        tracing::info!(
            "{} serving, server {}",
            msg.serving_team.label(),
            msg.server_id
        );
    }

    fn match_over(&mut self, msg: &MatchOverMsg) {
        tracing::info!(
            "Match over: {} wins {} - {}",
            msg.winner.label(),
            msg.player_score,
            msg.opponent_score
        );
    }
}

/// Writes each event as one JSON line.
pub struct JsonLinesNotifier<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, event: GameEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                if let Err(e) = writeln!(self.out, "{}", line) {
                    tracing::warn!("Failed to write event: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize event: {}", e),
        }
    }
}

impl<W: Write> Notifier for JsonLinesNotifier<W> {
    fn score(&mut self, msg: &ScoreMsg) {
        self.write(GameEvent::Score(msg.clone()));
    }

    fn message(&mut self, msg: &MessageMsg) {
        self.write(GameEvent::Message(msg.clone()));
    }

    fn indicator(&mut self, msg: &IndicatorMsg) {
        self.write(GameEvent::Indicator(msg.clone()));
    }

    fn hide_indicator(&mut self) {
        self.write(GameEvent::IndicatorHidden);
    }

    fn serve_started(&mut self, msg: &ServeStartedMsg) {
        self.write(GameEvent::ServeStarted(msg.clone()));
    }

    fn match_over(&mut self, msg: &MatchOverMsg) {
        self.write(GameEvent::MatchOver(msg.clone()));
    }
}
