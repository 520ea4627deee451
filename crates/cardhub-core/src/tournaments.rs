//! Seasons, tournaments and standings.
//!
//! Results are entered per player (no rounds or pairings). Match points
//! default to three per win and one per draw.

use cardhub_model::{
    ArchetypeRanking, NewTournament, PlayerRanking, PlayerResult, Season, Tournament,
    TournamentPlayer, TournamentStatus, User, slugify,
};
use cardhub_store::tournaments;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::{Hub, HubError, Result, unique_slug};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingScope {
    Overall,
    /// Tournaments dated within the season, by slug.
    Season(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub season: Option<Season>,
    pub players: Vec<PlayerRanking>,
    pub archetypes: Vec<ArchetypeRanking>,
}

impl Hub {
    pub fn create_season(
        &mut self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Season> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HubError::invalid("season name is required"));
        }
        if end < start {
            return Err(HubError::invalid(format!(
                "season ends ({end}) before it starts ({start})"
            )));
        }
        self.store.write(|conn| {
            let slug = unique_slug(&slugify(name), |slug| {
                tournaments::season_slug_exists(conn, slug)
            })?;
            Ok(tournaments::create_season(conn, name, &slug, start, end)?)
        })
    }

    /// Latest first.
    pub fn seasons(&self) -> Result<Vec<Season>> {
        Ok(tournaments::list_seasons(self.store.conn())?)
    }

    pub fn season(&self, slug: &str) -> Result<Season> {
        Ok(tournaments::season_by_slug(self.store.conn(), slug)?)
    }

    pub fn create_tournament(&self, tournament: NewTournament) -> Result<Tournament> {
        let name = tournament.name.trim();
        if name.is_empty() {
            return Err(HubError::invalid("tournament name is required"));
        }
        if let Some(season_id) = tournament.season_id {
            tournaments::get_season(self.store.conn(), season_id)?;
        }
        let tournament = NewTournament {
            name: name.to_string(),
            location: tournament.location.trim().to_string(),
            description: tournament.description.trim().to_string(),
            ..tournament
        };
        Ok(tournaments::create_tournament(self.store.conn(), &tournament)?)
    }

    /// Latest date first.
    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(tournaments::list_tournaments(self.store.conn())?)
    }

    pub fn tournament(&self, id: i64) -> Result<Tournament> {
        Ok(tournaments::get_tournament(self.store.conn(), id)?)
    }

    /// Enter the final record of one player.
    pub fn register_result(
        &self,
        tournament_id: i64,
        result: PlayerResult,
    ) -> Result<TournamentPlayer> {
        let player_name = result.player_name.trim();
        if player_name.is_empty() {
            return Err(HubError::invalid("player name is required"));
        }
        let conn = self.store.conn();
        let tournament = tournaments::get_tournament(conn, tournament_id)?;
        let result = PlayerResult {
            player_name: player_name.to_string(),
            archetype: result.archetype.trim().to_string(),
            ..result
        };
        let player = tournaments::insert_player(conn, tournament.id, &result)?;
        info!(
            tournament_id,
            player = %player.player_name,
            points = player.points,
            "registered result"
        );
        Ok(player)
    }

    /// Players by points, OMW and OOMW (descending), then name.
    pub fn standings(&self, tournament_id: i64) -> Result<(Tournament, Vec<TournamentPlayer>)> {
        let conn = self.store.conn();
        let tournament = tournaments::get_tournament(conn, tournament_id)?;
        let players = tournaments::standings(conn, tournament.id)?;
        Ok((tournament, players))
    }

    /// Stop registration and mark the tournament as running.
    pub fn close_registration(&mut self, actor: &User, tournament_id: i64) -> Result<Tournament> {
        self.change_status(actor, tournament_id, TournamentStatus::Running)
    }

    pub fn finish_tournament(&mut self, actor: &User, tournament_id: i64) -> Result<Tournament> {
        self.change_status(actor, tournament_id, TournamentStatus::Finished)
    }

    fn change_status(
        &mut self,
        actor: &User,
        tournament_id: i64,
        status: TournamentStatus,
    ) -> Result<Tournament> {
        if !actor.is_staff {
            return Err(HubError::Forbidden("change a tournament's status"));
        }
        self.store.write(|conn| {
            let mut tournament = tournaments::get_tournament(conn, tournament_id)?;
            if tournament.status == TournamentStatus::Finished {
                return Err(HubError::TournamentFinished(tournament.id));
            }
            tournaments::set_status(conn, tournament.id, status)?;
            tournament.status = status;
            Ok(tournament)
        })
    }

    pub fn ranking(&self, scope: &RankingScope) -> Result<Ranking> {
        let conn = self.store.conn();
        let season = match scope {
            RankingScope::Overall => None,
            RankingScope::Season(slug) => Some(tournaments::season_by_slug(conn, slug)?),
        };
        let range = season
            .as_ref()
            .map(|season| (season.start_date, season.end_date));
        Ok(Ranking {
            players: tournaments::player_ranking(conn, range)?,
            archetypes: tournaments::archetype_ranking(conn, range)?,
            season,
        })
    }
}
