//! Phase catalog and knockout routing.
//!
//! League-stage phases map 1:1 onto backend round numbers. Knockout phases
//! are appended after the league stage and resolve through a fixed table to
//! backend round ids that are not contiguous with the league stage. The
//! playoff phase is served by its own endpoint with no round id at all.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    LeagueStage,
    Knockout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    pub kind: PhaseKind,
}

impl Phase {
    pub fn is_league_stage(&self) -> bool {
        self.kind == PhaseKind::LeagueStage
    }
}

/// Where the matches of a phase come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRoute {
    /// League-stage round; backend round number equals the phase id.
    LeagueStage(u32),
    /// The dedicated playoff endpoint.
    Playoff,
    /// A knockout round addressed by its backend round id.
    Knockout(u32),
    /// Nothing is served for this phase.
    Unmapped,
}

pub const CUP_LEAGUE_STAGE_ROUNDS: u32 = 8;
pub const CUP_PLAYOFF_PHASE: u32 = 9;

/// Knockout phases shown after the playoff.
const CUP_KNOCKOUT_PHASES: [(u32, &str); 4] = [
    (10, "Round of 16"),
    (11, "Quarter-finals"),
    (12, "Semi-finals"),
    (13, "Final"),
];

/// UI phase id → backend round id. Phases missing here are `Unmapped` until
/// a deployment supplies their ids.
pub const DEFAULT_KNOCKOUT_ROUNDS: [(u32, u32); 1] = [(10, 5)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCatalog {
    phases: Vec<Phase>,
    league_stage_rounds: u32,
    playoff_phase: Option<u32>,
    knockout_rounds: Vec<(u32, u32)>,
}

impl PhaseCatalog {
    /// A plain league: every round is a league-stage phase.
    pub fn league(total_rounds: u32) -> Self {
        let total_rounds = total_rounds.max(1);
        Self {
            phases: (1..=total_rounds)
                .map(|id| Phase {
                    id,
                    name: format!("Round {id}"),
                    kind: PhaseKind::LeagueStage,
                })
                .collect(),
            league_stage_rounds: total_rounds,
            playoff_phase: None,
            knockout_rounds: Vec::new(),
        }
    }

    /// League stage of eight rounds, then playoffs and the knockout rounds.
    /// `knockout_rounds` maps knockout phase ids to backend round ids.
    pub fn cup(knockout_rounds: &[(u32, u32)]) -> Self {
        let mut catalog = Self::league(CUP_LEAGUE_STAGE_ROUNDS);
        catalog.phases.push(Phase {
            id: CUP_PLAYOFF_PHASE,
            name: "Playoffs".to_string(),
            kind: PhaseKind::Knockout,
        });
        catalog.playoff_phase = Some(CUP_PLAYOFF_PHASE);
        for (id, name) in CUP_KNOCKOUT_PHASES {
            catalog.phases.push(Phase {
                id,
                name: name.to_string(),
                kind: PhaseKind::Knockout,
            });
        }
        catalog.knockout_rounds = knockout_rounds
            .iter()
            .copied()
            .filter(|(id, _)| CUP_KNOCKOUT_PHASES.iter().any(|(phase, _)| phase == id))
            .collect();
        catalog
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn get(&self, id: u32) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Highest selectable phase id; the upper bound for stepping.
    pub fn max_phase(&self) -> u32 {
        self.phases.last().map(|p| p.id).unwrap_or(1)
    }

    pub fn league_stage_rounds(&self) -> u32 {
        self.league_stage_rounds
    }

    pub fn route(&self, id: u32) -> PhaseRoute {
        if (1..=self.league_stage_rounds).contains(&id) {
            return PhaseRoute::LeagueStage(id);
        }
        if self.playoff_phase == Some(id) {
            return PhaseRoute::Playoff;
        }
        self.knockout_rounds
            .iter()
            .find(|(phase, _)| *phase == id)
            .map(|(_, backend)| PhaseRoute::Knockout(*backend))
            .unwrap_or(PhaseRoute::Unmapped)
    }
}
