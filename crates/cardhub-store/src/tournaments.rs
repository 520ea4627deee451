//! Seasons, tournaments, player results and the rankings built from them.

use cardhub_model::{
    ArchetypeRanking, NewTournament, PlayerRanking, PlayerResult, Season, Tournament,
    TournamentPlayer, TournamentStatus,
};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::row::parsed;
use crate::{Result, StoreError};

const SEASON_COLUMNS: &str = "id, name, slug, start_date, end_date, active";
const TOURNAMENT_COLUMNS: &str =
    "id, name, game, date, location, description, season_id, status, created_at";
const PLAYER_COLUMNS: &str = "id, tournament_id, user_id, player_name, deck_id, archetype, \
     wins, draws, losses, points, omw, oomw";

fn row_to_season(row: &Row<'_>) -> rusqlite::Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        active: row.get(5)?,
    })
}

fn row_to_tournament(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        game: parsed(row, 2)?,
        date: row.get(3)?,
        location: row.get(4)?,
        description: row.get(5)?,
        season_id: row.get(6)?,
        status: parsed(row, 7)?,
        created_at: row.get(8)?,
    })
}

fn row_to_player(row: &Row<'_>) -> rusqlite::Result<TournamentPlayer> {
    Ok(TournamentPlayer {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        user_id: row.get(2)?,
        player_name: row.get(3)?,
        deck_id: row.get(4)?,
        archetype: row.get(5)?,
        wins: row.get(6)?,
        draws: row.get(7)?,
        losses: row.get(8)?,
        points: row.get(9)?,
        omw: row.get(10)?,
        oomw: row.get(11)?,
    })
}

fn row_to_player_ranking(row: &Row<'_>) -> rusqlite::Result<PlayerRanking> {
    Ok(PlayerRanking {
        player_name: row.get(0)?,
        tournaments_played: row.get(1)?,
        total_points: row.get(2)?,
        total_wins: row.get(3)?,
        total_draws: row.get(4)?,
        total_losses: row.get(5)?,
        avg_omw: row.get(6)?,
        avg_oomw: row.get(7)?,
    })
}

fn row_to_archetype_ranking(row: &Row<'_>) -> rusqlite::Result<ArchetypeRanking> {
    Ok(ArchetypeRanking {
        archetype: row.get(0)?,
        total_uses: row.get(1)?,
        sum_points: row.get(2)?,
        sum_wins: row.get(3)?,
        sum_draws: row.get(4)?,
        sum_losses: row.get(5)?,
    })
}

pub fn create_season(
    conn: &Connection,
    name: &str,
    slug: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Season> {
    conn.execute(
        "INSERT INTO seasons (name, slug, start_date, end_date, active) VALUES (?1, ?2, ?3, ?4, 1)",
        params![name, slug, start_date, end_date],
    )
    .map_err(StoreError::from_insert("season", slug))?;
    let id = conn.last_insert_rowid();
    info!(season_id = id, slug, "created season");
    Ok(Season {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        start_date,
        end_date,
        active: true,
    })
}

pub fn get_season(conn: &Connection, id: i64) -> Result<Season> {
    conn.query_row(
        &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = ?1"),
        [id],
        row_to_season,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("season", id))
}

pub fn season_slug_exists(conn: &Connection, slug: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM seasons WHERE slug = ?1)",
        [slug],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn season_by_slug(conn: &Connection, slug: &str) -> Result<Season> {
    conn.query_row(
        &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE slug = ?1"),
        [slug],
        row_to_season,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("season", slug))
}

/// Latest start first.
pub fn list_seasons(conn: &Connection) -> Result<Vec<Season>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SEASON_COLUMNS} FROM seasons ORDER BY start_date DESC, id DESC"
    ))?;
    let seasons = stmt
        .query_map([], row_to_season)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(seasons)
}

pub fn create_tournament(conn: &Connection, tournament: &NewTournament) -> Result<Tournament> {
    let created_at = Utc::now();
    let status = TournamentStatus::default();
    conn.execute(
        "INSERT INTO tournaments (name, game, date, location, description, season_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tournament.name,
            tournament.game.as_str(),
            tournament.date,
            tournament.location,
            tournament.description,
            tournament.season_id,
            status.as_str(),
            created_at,
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(tournament_id = id, name = %tournament.name, "created tournament");
    Ok(Tournament {
        id,
        name: tournament.name.clone(),
        game: tournament.game,
        date: tournament.date,
        location: tournament.location.clone(),
        description: tournament.description.clone(),
        season_id: tournament.season_id,
        status,
        created_at,
    })
}

pub fn get_tournament(conn: &Connection, id: i64) -> Result<Tournament> {
    conn.query_row(
        &format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1"),
        [id],
        row_to_tournament,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("tournament", id))
}

/// Latest date first.
pub fn list_tournaments(conn: &Connection) -> Result<Vec<Tournament>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY date DESC, id DESC"
    ))?;
    let tournaments = stmt
        .query_map([], row_to_tournament)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tournaments)
}

pub fn set_status(conn: &Connection, id: i64, status: TournamentStatus) -> Result<()> {
    let updated = conn.execute(
        "UPDATE tournaments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if updated == 0 {
        return Err(StoreError::not_found("tournament", id));
    }
    info!(tournament_id = id, status = %status, "tournament status changed");
    Ok(())
}

/// Player names are unique within a tournament.
pub fn insert_player(
    conn: &Connection,
    tournament_id: i64,
    result: &PlayerResult,
) -> Result<TournamentPlayer> {
    let points = result.match_points();
    conn.execute(
        &format!(
            "INSERT INTO tournament_players ({PLAYER_COLUMNS})
             VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            tournament_id,
            result.user_id,
            result.player_name,
            result.deck_id,
            result.archetype,
            result.wins,
            result.draws,
            result.losses,
            points,
            result.omw,
            result.oomw,
        ],
    )
    .map_err(StoreError::from_insert("player", &result.player_name))?;
    Ok(TournamentPlayer {
        id: conn.last_insert_rowid(),
        tournament_id,
        user_id: result.user_id,
        player_name: result.player_name.clone(),
        deck_id: result.deck_id,
        archetype: result.archetype.clone(),
        wins: result.wins,
        draws: result.draws,
        losses: result.losses,
        points,
        omw: result.omw,
        oomw: result.oomw,
    })
}

/// Ordered by points, OMW and OOMW (all descending), then name.
pub fn standings(conn: &Connection, tournament_id: i64) -> Result<Vec<TournamentPlayer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAYER_COLUMNS} FROM tournament_players WHERE tournament_id = ?1
         ORDER BY points DESC, omw DESC, oomw DESC, player_name"
    ))?;
    let players = stmt
        .query_map([tournament_id], row_to_player)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(players)
}

/// Totals per player name, optionally limited to tournaments dated
/// within `range` (inclusive).
pub fn player_ranking(
    conn: &Connection,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<PlayerRanking>> {
    let (from, to) = range.unzip();
    let mut stmt = conn.prepare(
        "SELECT p.player_name, COUNT(p.id), SUM(p.points), SUM(p.wins), SUM(p.draws),
                SUM(p.losses), AVG(p.omw), AVG(p.oomw)
         FROM tournament_players p
         JOIN tournaments t ON t.id = p.tournament_id
         WHERE (?1 IS NULL OR t.date >= ?1) AND (?2 IS NULL OR t.date <= ?2)
         GROUP BY p.player_name
         ORDER BY SUM(p.points) DESC, SUM(p.wins) DESC, p.player_name",
    )?;
    let ranking = stmt
        .query_map(params![from, to], row_to_player_ranking)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ranking)
}

/// Totals per non-empty archetype name, optionally limited by date.
pub fn archetype_ranking(
    conn: &Connection,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<ArchetypeRanking>> {
    let (from, to) = range.unzip();
    let mut stmt = conn.prepare(
        "SELECT p.archetype, COUNT(p.id), SUM(p.points), SUM(p.wins), SUM(p.draws), SUM(p.losses)
         FROM tournament_players p
         JOIN tournaments t ON t.id = p.tournament_id
         WHERE p.archetype <> ''
           AND (?1 IS NULL OR t.date >= ?1) AND (?2 IS NULL OR t.date <= ?2)
         GROUP BY p.archetype
         ORDER BY COUNT(p.id) DESC, SUM(p.points) DESC, p.archetype",
    )?;
    let ranking = stmt
        .query_map(params![from, to], row_to_archetype_ranking)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ranking)
}
