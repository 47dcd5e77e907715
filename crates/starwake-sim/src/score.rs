//! Running score for the current session.

use starwake_core::state::ScoreView;

/// Score tracking, reset on restart.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: u32,
    pub kills: u32,
    pub resources_mined: u32,
    pub credits_earned: u32,
}

impl ScoreState {
    pub fn record_kill(&mut self, bounty: u32) {
        self.kills += 1;
        self.score += bounty;
    }

    pub fn record_credits(&mut self, credits: u32) {
        self.credits_earned += credits;
    }

    pub fn view(&self, active_enemies: u32) -> ScoreView {
        ScoreView {
            score: self.score,
            kills: self.kills,
            resources_mined: self.resources_mined,
            credits_earned: self.credits_earned,
            active_enemies,
        }
    }
}
