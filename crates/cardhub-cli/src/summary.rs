//! Terminal tables for command output.

use cardhub_core::{
    CardFacets, CardLimit, DeckView, HomeDashboard, LoyaltyOverview, NewsFeed, Ranking, SyncSummary,
};
use cardhub_model::{
    BanlistRule, Card, CardPrice, CopyRule, Deck, IssueSeverity, LegalityReport, LoyaltyEvent,
    NewsPost, PairBanRule, Reward, RewardRedemption, Season, Tournament, TournamentPlayer, User,
    UserProfile, format_cents,
};
use cardhub_validate::FormatLimits;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn users_table(users: &[User]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Username"),
        header_cell("Staff"),
        header_cell("Joined"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            flag_cell(user.is_staff),
            dim_cell(user.created_at.format(DATE_FORMAT)),
        ]);
    }
    table
}

pub fn cards_table(cards: &[Card]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Number"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Color"),
        header_cell("Lv"),
        header_cell("Cost"),
        header_cell("DP"),
        header_cell("Rarity"),
        header_cell("Pack"),
    ]);
    apply_table_style(&mut table);
    for index in 4..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for card in cards {
        table.add_row(vec![
            Cell::new(&card.cardnumber).add_attribute(Attribute::Bold),
            Cell::new(&card.name),
            Cell::new(&card.card_type),
            Cell::new(&card.color),
            number_cell(card.level),
            number_cell(card.play_cost),
            number_cell(card.dp),
            Cell::new(&card.rarity),
            dim_cell(&card.pack),
        ]);
    }
    table
}

/// One row per non-empty field of a card.
pub fn card_detail(card: &Card) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let numbers = [
        ("Level", card.level),
        ("Play cost", card.play_cost),
        ("DP", card.dp),
    ];
    let mut rows: Vec<(&str, String)> = vec![
        ("Number", card.cardnumber.to_string()),
        ("Name", card.name.clone()),
        ("Type", card.card_type.clone()),
        ("Color", card.color.clone()),
    ];
    rows.extend(
        numbers
            .iter()
            .filter_map(|(label, value)| value.map(|value| (*label, value.to_string()))),
    );
    for (slot, evolution) in card.evolution.iter().enumerate() {
        if let Some(cost) = evolution.cost {
            let level = evolution
                .level
                .map_or_else(String::new, |level| format!(" from Lv.{level}"));
            rows.push((
                if slot == 0 { "Digivolve" } else { "Digivolve 2" },
                format!("{cost} {}{level}", evolution.color).trim().to_string(),
            ));
        }
    }
    rows.extend([
        ("Attribute", card.attribute.clone()),
        ("Type (digi)", card.digitype.clone()),
        ("Form", card.form.clone()),
        ("Rarity", card.rarity.clone()),
        ("Pack", card.pack.clone()),
        ("Effect", card.effect.clone()),
        ("Inherited", card.inherit_effect.clone()),
        ("Security", card.security_effect.clone()),
        ("Image", card.cdn_image_url()),
        (
            "Synced",
            card.last_synced_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
    ]);
    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        table.add_row(vec![header_cell(label), Cell::new(value)]);
    }
    table
}

pub fn facets_table(facets: &CardFacets) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Filter"), header_cell("Values")]);
    apply_table_style(&mut table);
    for (label, values) in [
        ("Type", &facets.card_types),
        ("Color", &facets.colors),
        ("Pack", &facets.packs),
        ("Rarity", &facets.rarities),
        ("Attribute", &facets.attributes),
        ("Digitype", &facets.digitypes),
    ] {
        let cell = if values.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(values.join(", "))
        };
        table.add_row(vec![header_cell(label), cell]);
    }
    table
}

pub fn sync_summary(summary: &SyncSummary) -> String {
    format!(
        "Fetched {}, skipped {}, failed {}",
        summary.fetched, summary.skipped, summary.failed
    )
}

pub fn prices_table(prices: &[CardPrice], currency: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Number"),
        header_cell("Name"),
        header_cell("Price"),
        header_cell("Stock"),
        header_cell("Link"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for price in prices {
        table.add_row(vec![
            Cell::new(&price.cardnumber).add_attribute(Attribute::Bold),
            Cell::new(&price.name),
            Cell::new(money(price.price_cents, currency)),
            flag_cell(price.in_stock),
            dim_cell(&price.product_url),
        ]);
    }
    table
}

pub fn rules_table(
    copy_rules: &[&CopyRule],
    ban_rules: &[&BanlistRule],
    pair_bans: &[PairBanRule],
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Card"),
        header_cell("Limit"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for rule in copy_rules {
        table.add_row(vec![
            Cell::new("copy"),
            Cell::new(&rule.cardnumber).add_attribute(Attribute::Bold),
            Cell::new(rule.max_copies),
            dim_cell(&rule.notes),
        ]);
    }
    for rule in ban_rules {
        table.add_row(vec![
            Cell::new("banlist").fg(Color::Yellow),
            Cell::new(&rule.cardnumber).add_attribute(Attribute::Bold),
            limit_cell(rule.max_allowed()),
            dim_cell(&rule.notes),
        ]);
    }
    for rule in pair_bans {
        table.add_row(vec![
            Cell::new("pair").fg(Color::Magenta),
            Cell::new(format!("{} + {}", rule.card_a(), rule.card_b())),
            dim_cell("-"),
            dim_cell(&rule.notes),
        ]);
    }
    table
}

pub fn card_limit_table(limit: &CardLimit) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let banlist = limit
        .ban_status
        .map_or_else(|| dim_cell("not listed"), |status| Cell::new(status.label()));
    let pairs = if limit.pair_banned_with.is_empty() {
        dim_cell("-")
    } else {
        let partners: Vec<String> = limit
            .pair_banned_with
            .iter()
            .map(ToString::to_string)
            .collect();
        Cell::new(partners.join(", ")).fg(Color::Magenta)
    };
    table.add_row(vec![header_cell("Card"), Cell::new(&limit.cardnumber)]);
    table.add_row(vec![header_cell("Copy limit"), Cell::new(limit.copy_limit)]);
    table.add_row(vec![header_cell("Banlist"), banlist]);
    table.add_row(vec![header_cell("Effective"), limit_cell(limit.effective)]);
    table.add_row(vec![header_cell("Pair bans"), pairs]);
    table
}

pub fn decks_table(decks: &[Deck]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Game"),
        header_cell("Archetype"),
        header_cell("Public"),
        header_cell("Updated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for deck in decks {
        table.add_row(vec![
            Cell::new(deck.id),
            Cell::new(&deck.name).add_attribute(Attribute::Bold),
            Cell::new(deck.game.label()),
            Cell::new(&deck.archetype),
            flag_cell(deck.public),
            dim_cell(deck.updated_at.format(TIMESTAMP_FORMAT)),
        ]);
    }
    table
}

/// Deck header, its lines with prices, and the totals.
pub fn deck_view(view: &DeckView, currency: &str, limits: &FormatLimits) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Section"),
        header_cell("Qty"),
        header_cell("Number"),
        header_cell("Name"),
        header_cell("Unit"),
        header_cell("Subtotal"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for (line, row) in view.lines.iter().zip(&view.pricing.rows) {
        table.add_row(vec![
            dim_cell(line.id),
            Cell::new(line.section.label()),
            Cell::new(line.quantity),
            Cell::new(&line.cardnumber).add_attribute(Attribute::Bold),
            Cell::new(&line.card_name),
            optional_money(row.unit_cents, currency),
            optional_money(row.subtotal_cents, currency),
        ]);
    }
    table.add_row(vec![
        header_cell("TOTAL"),
        dim_cell("-"),
        Cell::new(view.main_total + view.egg_total).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        header_cell(&money(view.pricing.total_cents, currency)),
    ]);

    let mut out = format!(
        "Deck #{}: {} ({})\nMain {}/{}  Egg {}/{}\n",
        view.deck.id,
        view.deck.name,
        view.deck.game.label(),
        view.main_total,
        limits.main_limit,
        view.egg_total,
        limits.egg_limit,
    );
    if !view.deck.archetype.is_empty() {
        out.push_str(&format!("Archetype: {}\n", view.deck.archetype));
    }
    out.push_str(&table.to_string());
    if view.pricing.missing > 0 {
        out.push_str(&format!(
            "\n{} line(s) without a price",
            view.pricing.missing
        ));
    }
    out
}

pub fn legality_report(report: &LegalityReport) -> String {
    let status = if report.is_legal() { "LEGAL" } else { "NOT LEGAL" };
    let mut out = format!(
        "Deck: {}\nMain: {}  Egg: {}\nStatus: {status} ({} error(s), {} warning(s))",
        report.deck,
        report.main_total,
        report.egg_total,
        report.error_count(),
        report.warning_count(),
    );
    if report.issues.is_empty() {
        return out;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Card"),
        header_cell("Section"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for issue in &report.issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.code),
            issue
                .cardnumber
                .as_ref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            issue
                .section
                .map_or_else(|| dim_cell("-"), |section| Cell::new(section.label())),
            issue.count.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
        ]);
    }
    out.push('\n');
    out.push_str(&table.to_string());
    out
}

pub fn events_table(events: &[LoyaltyEvent]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Kind"),
        header_cell("Points"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for event in events {
        table.add_row(vec![
            dim_cell(event.created_at.format(TIMESTAMP_FORMAT)),
            Cell::new(event.kind.label()),
            points_cell(event.points),
            Cell::new(&event.description),
        ]);
    }
    table
}

pub fn rewards_table(rewards: &[Reward]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Reward"),
        header_cell("Cost"),
        header_cell("Active"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for reward in rewards {
        table.add_row(vec![
            Cell::new(reward.id),
            Cell::new(&reward.name).add_attribute(Attribute::Bold),
            Cell::new(reward.cost_points),
            flag_cell(reward.active),
            dim_cell(&reward.description),
        ]);
    }
    table
}

pub fn redemptions_table(redemptions: &[RewardRedemption], rewards: &[Reward]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Reward"),
        header_cell("Points"),
        header_cell("Completed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for redemption in redemptions {
        let reward = rewards
            .iter()
            .find(|reward| reward.id == redemption.reward_id)
            .map_or_else(|| format!("#{}", redemption.reward_id), |reward| reward.name.clone());
        table.add_row(vec![
            dim_cell(redemption.created_at.format(TIMESTAMP_FORMAT)),
            Cell::new(reward),
            Cell::new(redemption.points_used),
            flag_cell(redemption.completed),
        ]);
    }
    table
}

pub fn loyalty_overview(overview: &LoyaltyOverview) -> String {
    let mut out = format!("Balance: {} points\n", overview.balance);
    out.push_str(&events_table(&overview.events).to_string());
    if !overview.rewards.is_empty() {
        out.push_str("\nRewards\n");
        out.push_str(&rewards_table(&overview.rewards).to_string());
    }
    out
}

pub fn news_table(posts: &[NewsPost]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Published"),
        header_cell("Title"),
        header_cell("Slug"),
        header_cell("Summary"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for post in posts {
        let title = if post.highlight {
            Cell::new(&post.title)
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&post.title)
        };
        table.add_row(vec![
            Cell::new(post.id),
            dim_cell(post.published_at.format(DATE_FORMAT)),
            title,
            dim_cell(&post.slug),
            Cell::new(&post.summary),
        ]);
    }
    table
}

pub fn news_feed(feed: &NewsFeed) -> String {
    let mut out = String::from("Featured\n");
    out.push_str(&news_table(&feed.featured).to_string());
    out.push_str("\nLatest\n");
    out.push_str(&news_table(&feed.others).to_string());
    out
}

pub fn news_post(post: &NewsPost) -> String {
    let mut out = format!(
        "{}\n{}\n",
        post.title,
        post.published_at.format(TIMESTAMP_FORMAT)
    );
    if !post.summary.is_empty() {
        out.push_str(&format!("\n{}\n", post.summary));
    }
    if !post.body.is_empty() {
        out.push_str(&format!("\n{}\n", post.body));
    }
    out.trim_end().to_string()
}

pub fn seasons_table(seasons: &[Season]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Season"),
        header_cell("Slug"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Active"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for season in seasons {
        table.add_row(vec![
            Cell::new(season.id),
            Cell::new(&season.name).add_attribute(Attribute::Bold),
            dim_cell(&season.slug),
            Cell::new(season.start_date.format(DATE_FORMAT)),
            Cell::new(season.end_date.format(DATE_FORMAT)),
            flag_cell(season.active),
        ]);
    }
    table
}

pub fn tournaments_table(tournaments: &[Tournament]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Date"),
        header_cell("Tournament"),
        header_cell("Game"),
        header_cell("Location"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for tournament in tournaments {
        table.add_row(vec![
            Cell::new(tournament.id),
            Cell::new(tournament.date.format(DATE_FORMAT)),
            Cell::new(&tournament.name).add_attribute(Attribute::Bold),
            Cell::new(tournament.game.label()),
            dim_cell(&tournament.location),
            Cell::new(tournament.status.label()),
        ]);
    }
    table
}

pub fn standings(tournament: &Tournament, players: &[TournamentPlayer]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Player"),
        header_cell("Archetype"),
        header_cell("W-D-L"),
        header_cell("Points"),
        header_cell("OMW%"),
        header_cell("OOMW%"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [0, 4, 5, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 3, CellAlignment::Center);
    for (rank, player) in players.iter().enumerate() {
        table.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&player.player_name).add_attribute(Attribute::Bold),
            Cell::new(&player.archetype),
            Cell::new(format!(
                "{}-{}-{}",
                player.wins, player.draws, player.losses
            )),
            Cell::new(player.points),
            Cell::new(format!("{:.2}", player.omw)),
            Cell::new(format!("{:.2}", player.oomw)),
        ]);
    }
    format!(
        "{} ({}, {})\n{table}",
        tournament.name,
        tournament.date.format(DATE_FORMAT),
        tournament.status.label()
    )
}

pub fn ranking(ranking: &Ranking) -> String {
    let title = ranking
        .season
        .as_ref()
        .map_or_else(|| "Overall ranking".to_string(), |season| {
            format!(
                "{} ({} to {})",
                season.name,
                season.start_date.format(DATE_FORMAT),
                season.end_date.format(DATE_FORMAT)
            )
        });

    let mut players = Table::new();
    players.set_header(vec![
        header_cell("#"),
        header_cell("Player"),
        header_cell("Events"),
        header_cell("Points"),
        header_cell("W-D-L"),
        header_cell("Avg OMW%"),
        header_cell("Avg OOMW%"),
    ]);
    apply_summary_table_style(&mut players);
    for index in [0, 2, 3, 5, 6] {
        align_column(&mut players, index, CellAlignment::Right);
    }
    for (rank, player) in ranking.players.iter().enumerate() {
        players.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&player.player_name).add_attribute(Attribute::Bold),
            Cell::new(player.tournaments_played),
            Cell::new(player.total_points),
            Cell::new(format!(
                "{}-{}-{}",
                player.total_wins, player.total_draws, player.total_losses
            )),
            Cell::new(format!("{:.2}", player.avg_omw)),
            Cell::new(format!("{:.2}", player.avg_oomw)),
        ]);
    }

    let mut archetypes = Table::new();
    archetypes.set_header(vec![
        header_cell("Archetype"),
        header_cell("Uses"),
        header_cell("Points"),
        header_cell("W-D-L"),
    ]);
    apply_summary_table_style(&mut archetypes);
    align_column(&mut archetypes, 1, CellAlignment::Right);
    align_column(&mut archetypes, 2, CellAlignment::Right);
    for archetype in &ranking.archetypes {
        archetypes.add_row(vec![
            Cell::new(&archetype.archetype).add_attribute(Attribute::Bold),
            Cell::new(archetype.total_uses),
            Cell::new(archetype.sum_points),
            Cell::new(format!(
                "{}-{}-{}",
                archetype.sum_wins, archetype.sum_draws, archetype.sum_losses
            )),
        ]);
    }
    format!("{title}\n{players}\nArchetypes\n{archetypes}")
}

pub fn profile(user: &User, profile: &UserProfile) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("User"), Cell::new(&user.username)]);
    table.add_row(vec![
        header_cell("Display name"),
        Cell::new(profile.display_name(user)),
    ]);
    table.add_row(vec![header_cell("Full name"), text_cell(&profile.full_name)]);
    table.add_row(vec![header_cell("Phone"), text_cell(&profile.phone)]);
    table.add_row(vec![header_cell("Nickname"), text_cell(&profile.nickname)]);
    table.add_row(vec![header_cell("News mail"), flag_cell(profile.receive_news)]);
    table
}

pub fn home(dashboard: &HomeDashboard, user: Option<&User>) -> String {
    let mut out = String::new();
    if let Some(user) = user {
        out.push_str(&format!(
            "Hello, {}! Balance: {} points\n",
            user.username, dashboard.balance
        ));
        out.push_str("Recent activity\n");
        out.push_str(&events_table(&dashboard.recent_events).to_string());
        out.push_str("\nRecent decks\n");
        out.push_str(&decks_table(&dashboard.recent_decks).to_string());
        out.push('\n');
    }
    out.push_str("News\n");
    out.push_str(&news_table(&dashboard.news).to_string());
    out
}

pub fn money(cents: i64, currency: &str) -> String {
    if currency.is_empty() {
        format_cents(cents)
    } else {
        format!("{currency} {}", format_cents(cents))
    }
}

fn optional_money(cents: Option<i64>, currency: &str) -> Cell {
    cents.map_or_else(|| dim_cell("-"), |cents| Cell::new(money(cents, currency)))
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn limit_cell(limit: u32) -> Cell {
    match limit {
        0 => Cell::new("banned").fg(Color::Red).add_attribute(Attribute::Bold),
        limit => Cell::new(limit),
    }
}

fn points_cell(points: i64) -> Cell {
    if points < 0 {
        Cell::new(points).fg(Color::Red)
    } else {
        Cell::new(format!("+{points}")).fg(Color::Green)
    }
}

fn number_cell(value: Option<u32>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use cardhub_model::{CardNumber, DeckSection, IssueCode, LegalityIssue};

    use super::*;

    #[test]
    fn money_prefixes_currency() {
        assert_eq!(money(1250, "R$"), "R$ 12.50");
        assert_eq!(money(5, ""), "0.05");
    }

    #[test]
    fn legal_report_has_no_issue_table() {
        let report = LegalityReport {
            deck: "Red".to_string(),
            main_total: 50,
            egg_total: 5,
            issues: Vec::new(),
        };
        let text = legality_report(&report);
        assert!(text.contains("Status: LEGAL (0 error(s), 0 warning(s))"));
        assert!(!text.contains("Severity"));
    }

    #[test]
    fn report_lists_issue_messages() {
        let report = LegalityReport {
            deck: "Red".to_string(),
            main_total: 4,
            egg_total: 0,
            issues: vec![LegalityIssue {
                code: IssueCode::Banned,
                severity: IssueSeverity::Error,
                message: "banned card".to_string(),
                cardnumber: CardNumber::new("EX1-001").ok(),
                section: Some(DeckSection::Main),
                count: None,
            }],
        };
        let text = legality_report(&report);
        assert!(text.contains("NOT LEGAL (1 error(s), 0 warning(s))"));
        assert!(text.contains("banned card"));
        assert!(text.contains("EX1-001"));
    }
}
