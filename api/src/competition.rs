//! Competition catalog. The single place where a competition's logical id
//! is mapped to the backend path segments it is served under. Deployments
//! disagree on casing (`ChampionsLeague` vs `champions-league`), so the
//! segments are data, overridable at startup, never literals at call sites.

use crate::phase::{DEFAULT_KNOCKOUT_ROUNDS, PhaseCatalog};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub country: String,
    /// League rounds, or league-stage rounds plus knockout phases for cups.
    pub total_rounds: u32,
    pub format: Format,
    /// Segment for `/matches/tournament/{segment}/...` (rounds, standings).
    pub tournament_segment: String,
    /// Segment for `/matches/{segment}/phase|qualification|playoff/...`.
    pub cup_segment: String,
    /// Knockout phase id → backend round id. Empty for leagues.
    pub knockout_rounds: Vec<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    League,
    /// League stage followed by knockout phases.
    Cup,
}

impl Competition {
    fn league(id: u32, slug: &str, name: &str, country: &str, total_rounds: u32) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: name.into(),
            country: country.into(),
            total_rounds,
            format: Format::League,
            tournament_segment: slug.into(),
            cup_segment: slug.into(),
            knockout_rounds: Vec::new(),
        }
    }

    pub fn is_cup(&self) -> bool {
        self.format == Format::Cup
    }

    pub fn phases(&self) -> PhaseCatalog {
        match self.format {
            Format::League => PhaseCatalog::league(self.total_rounds),
            Format::Cup => PhaseCatalog::cup(&self.knockout_rounds),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    competitions: Vec<Competition>,
}

impl Default for Catalog {
    fn default() -> Self {
        let champions_league = Competition {
            id: 7,
            slug: "champions-league".into(),
            name: "Champions League".into(),
            country: "Europe".into(),
            total_rounds: 13,
            format: Format::Cup,
            tournament_segment: "ChampionsLeague".into(),
            cup_segment: "champions-league".into(),
            knockout_rounds: DEFAULT_KNOCKOUT_ROUNDS.to_vec(),
        };

        Self {
            competitions: vec![
                Competition::league(17, "premier", "Premier League", "England", 38),
                Competition::league(8, "laliga", "La Liga", "Spain", 38),
                Competition::league(23, "seriea", "Serie A", "Italy", 38),
                Competition::league(34, "ligue1", "Ligue 1", "France", 34),
                Competition::league(35, "bundesliga", "Bundesliga", "Germany", 34),
                Competition::league(325, "brasileirao", "Brasileirão", "Brazil", 38),
                champions_league,
            ],
        }
    }
}

impl Catalog {
    pub fn all(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn leagues(&self) -> impl Iterator<Item = &Competition> {
        self.competitions.iter().filter(|c| !c.is_cup())
    }

    pub fn cups(&self) -> impl Iterator<Item = &Competition> {
        self.competitions.iter().filter(|c| c.is_cup())
    }

    /// Case-insensitive slug lookup.
    pub fn by_slug(&self, slug: &str) -> Option<&Competition> {
        self.competitions
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(slug))
    }

    pub fn by_id(&self, id: u32) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    /// Apply `slug=segment` overrides, e.g.
    /// `"champions-league=ChampionsLeague,premier=premier-league"`.
    /// A league gets both segments replaced; a cup only its tournament
    /// segment unless the override is written `slug:cup=segment`.
    /// Returns the entries that matched no competition.
    pub fn apply_overrides(&mut self, overrides: &str) -> Vec<String> {
        let mut unknown = Vec::new();
        let pairs: HashMap<&str, &str> = overrides
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|pair| {
                let parsed = pair.split_once('=').map(|(k, v)| (k.trim(), v.trim()));
                if parsed.is_none() {
                    unknown.push(pair.to_string());
                }
                parsed
            })
            .collect();

        for (key, segment) in pairs {
            let (slug, cup_only) = match key.strip_suffix(":cup") {
                Some(slug) => (slug, true),
                None => (key, false),
            };
            let Some(comp) = self
                .competitions
                .iter_mut()
                .find(|c| c.slug.eq_ignore_ascii_case(slug))
            else {
                unknown.push(key.to_string());
                continue;
            };
            if cup_only {
                comp.cup_segment = segment.to_string();
            } else {
                comp.tournament_segment = segment.to_string();
                if !comp.is_cup() {
                    comp.cup_segment = segment.to_string();
                }
            }
        }
        unknown.sort();
        unknown
    }

    /// Apply `slug:phase=round` knockout round ids, e.g.
    /// `"champions-league:11=6,champions-league:12=7"`. A configured phase
    /// replaces any default id it already had.
    /// Returns the entries that matched no cup or did not parse.
    pub fn apply_knockout_rounds(&mut self, overrides: &str) -> Vec<String> {
        let mut unknown = Vec::new();
        for entry in overrides.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let parsed = entry.split_once('=').and_then(|(key, round)| {
                let (slug, phase) = key.trim().rsplit_once(':')?;
                Some((slug, phase.trim().parse::<u32>().ok()?, round.trim().parse::<u32>().ok()?))
            });
            let Some((slug, phase, round)) = parsed else {
                unknown.push(entry.to_string());
                continue;
            };
            let Some(cup) = self
                .competitions
                .iter_mut()
                .find(|c| c.is_cup() && c.slug.eq_ignore_ascii_case(slug))
            else {
                unknown.push(entry.to_string());
                continue;
            };
            cup.knockout_rounds.retain(|(id, _)| *id != phase);
            cup.knockout_rounds.push((phase, round));
        }
        unknown.sort();
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseRoute;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.all().len(), 7);
        assert_eq!(catalog.leagues().count(), 6);
        let ucl = catalog.cups().next().unwrap();
        assert_eq!(ucl.slug, "champions-league");
        assert_eq!(ucl.total_rounds, 13);
        assert_eq!(ucl.tournament_segment, "ChampionsLeague");
        assert_eq!(ucl.cup_segment, "champions-league");
        assert_eq!(catalog.by_slug("Ligue1").map(|c| c.total_rounds), Some(34));
        assert_eq!(catalog.by_id(35).map(|c| c.name.as_str()), Some("Bundesliga"));
    }

    #[test]
    fn test_overrides_replace_segments() {
        let mut catalog = Catalog::default();
        let unknown = catalog.apply_overrides(
            "premier=PremierLeague, champions-league=champions-league, champions-league:cup=ChampionsLeague, nope=x, broken",
        );
        assert_eq!(unknown, vec!["broken".to_string(), "nope".to_string()]);

        let premier = catalog.by_slug("premier").unwrap();
        assert_eq!(premier.tournament_segment, "PremierLeague");
        assert_eq!(premier.cup_segment, "PremierLeague");

        let ucl = catalog.by_slug("champions-league").unwrap();
        assert_eq!(ucl.tournament_segment, "champions-league");
        assert_eq!(ucl.cup_segment, "ChampionsLeague");
    }

    #[test]
    fn test_phase_catalog_follows_format() {
        let catalog = Catalog::default();
        assert_eq!(catalog.by_slug("premier").unwrap().phases().max_phase(), 38);
        assert_eq!(catalog.by_slug("champions-league").unwrap().phases().max_phase(), 13);
    }

    #[test]
    fn test_knockout_round_overrides() {
        let mut catalog = Catalog::default();
        let unknown = catalog.apply_knockout_rounds("champions-league:11=6, champions-league:10=4, premier:11=2, ucl=3");
        assert_eq!(unknown, vec!["premier:11=2".to_string(), "ucl=3".to_string()]);

        let phases = catalog.by_slug("champions-league").unwrap().phases();
        assert_eq!(phases.route(10), PhaseRoute::Knockout(4));
        assert_eq!(phases.route(11), PhaseRoute::Knockout(6));
        assert_eq!(phases.route(12), PhaseRoute::Unmapped);
    }
}
