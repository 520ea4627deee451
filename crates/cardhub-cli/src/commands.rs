//! Command execution.
//!
//! Every command writes either a human-readable rendering or, with
//! `--json`, the underlying value as pretty JSON.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use cardhub_core::{CardFilter, Hub, JsonFileSource, RankingScope};
use cardhub_model::{
    BanlistRule, CopyRule, NewDeck, NewNewsPost, NewTournament, PairBanRule, PlayerResult,
    ProfileUpdate, Tournament, TournamentPlayer, User,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{
    BanRuleCommand, CardCommand, Cli, Command, CopyRuleCommand, DeckCommand, LoyaltyCommand,
    NewsCommand, PairBanCommand, PriceCommand, ProfileCommand, ResultArgs, RewardCommand,
    RuleCommand, SearchArgs, SeasonCommand, TournamentCommand, UserCommand,
};
use crate::config::{DB_ENV, HubConfig};
use crate::summary;

/// Exit code of a command that ran but found a problem to report.
pub const EXIT_FAILURE: i32 = 1;

/// An open hub plus the per-invocation options.
pub struct Session<W> {
    pub hub: Hub,
    pub config: HubConfig,
    /// Username of the acting user, if any.
    pub user: Option<String>,
    pub json: bool,
    pub out: W,
}

impl<W: Write> Session<W> {
    pub fn new(hub: Hub, config: HubConfig, user: Option<String>, json: bool, out: W) -> Self {
        let user = user.or_else(|| config.default_user.clone());
        Self {
            hub,
            config,
            user,
            json,
            out,
        }
    }

    fn current_user(&self) -> Result<User> {
        let Some(username) = self.user.as_deref() else {
            bail!("no user selected; pass --user or set default_user in the config file");
        };
        self.hub
            .user(username)
            .with_context(|| format!("look up user {username}"))
    }

    fn optional_user(&self) -> Result<Option<User>> {
        match self.user {
            Some(_) => self.current_user().map(Some),
            None => Ok(None),
        }
    }

    fn currency(&self) -> &str {
        &self.config.display.currency
    }

    /// JSON of `value`, or the text produced by `render`.
    fn emit<T: Serialize>(&mut self, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            let text = serde_json::to_string_pretty(value).context("serialize output")?;
            writeln!(self.out, "{text}")?;
        } else {
            writeln!(self.out, "{}", render(value))?;
        }
        Ok(())
    }
}

/// Parse a price such as `12`, `12.5` or `12,50` into cents.
pub fn parse_price(text: &str) -> Result<i64> {
    let normalized = text.trim().replace(',', ".");
    let (whole, fraction) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    if whole.is_empty() && fraction.is_empty() {
        bail!("price is empty");
    }
    if !whole.chars().chain(fraction.chars()).all(|ch| ch.is_ascii_digit()) {
        bail!("invalid price {text:?}");
    }
    if fraction.len() > 2 {
        bail!("price {text:?} has more than two decimals");
    }
    let invalid = || format!("invalid price {text:?}");
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse::<u32>().with_context(invalid)?.into()
    };
    let cents: i64 = if fraction.is_empty() {
        0
    } else {
        let value = i64::from(fraction.parse::<u8>().with_context(invalid)?);
        if fraction.len() == 1 { value * 10 } else { value }
    };
    Ok(whole * 100 + cents)
}

/// Open the database named by the flags, environment and config file.
pub fn open_hub(config: &HubConfig, db: Option<&Path>) -> Result<Hub> {
    let path = config.database_path(db, std::env::var(DB_ENV).ok());
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create database folder {}", parent.display()))?;
    }
    debug!(path = %path.display(), "opening database");
    Hub::open(&path, config.settings())
        .with_context(|| format!("open database {}", path.display()))
}

/// Run a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> Result<i32> {
    run_with_output(cli, io::stdout().lock())
}

pub fn run_with_output<W: Write>(cli: Cli, mut out: W) -> Result<i32> {
    let config = HubConfig::load(cli.config.as_deref())?;
    if let Command::Config = cli.command {
        if cli.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        } else {
            write!(out, "{}", config.to_toml()?)?;
        }
        return Ok(0);
    }
    let hub = open_hub(&config, cli.db.as_deref())?;
    let mut session = Session::new(hub, config, cli.user, cli.json, out);
    execute(&mut session, cli.command)
}

pub fn execute<W: Write>(session: &mut Session<W>, command: Command) -> Result<i32> {
    match command {
        Command::Users(command) => run_users(session, command).map(|()| 0),
        Command::Cards(command) => run_cards(session, command).map(|()| 0),
        Command::Prices(command) => run_prices(session, command).map(|()| 0),
        Command::Rules(command) => run_rules(session, command).map(|()| 0),
        Command::Decks(command) => run_decks(session, command),
        Command::Loyalty(command) => run_loyalty(session, command).map(|()| 0),
        Command::Rewards(command) => run_rewards(session, command).map(|()| 0),
        Command::News(command) => run_news(session, command).map(|()| 0),
        Command::Seasons(command) => run_seasons(session, command).map(|()| 0),
        Command::Tournaments(command) => run_tournaments(session, command).map(|()| 0),
        Command::Profile(command) => run_profile(session, command).map(|()| 0),
        Command::Home => run_home(session).map(|()| 0),
        Command::Config => {
            let text = session.config.to_toml()?;
            let config = session.config.clone();
            session.emit(&config, |_| text.trim_end().to_string())?;
            Ok(0)
        }
    }
}

fn run_users<W: Write>(session: &mut Session<W>, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Add { username, staff } => {
            let user = session.hub.create_user(&username, staff)?;
            info!(username = %user.username, staff, "user created");
            session.emit(&user, |user| {
                format!("Created user {} (#{})", user.username, user.id)
            })
        }
        UserCommand::List => {
            let users = session.hub.users()?;
            session.emit(&users, |users| summary::users_table(users).to_string())
        }
    }
}

fn run_cards<W: Write>(session: &mut Session<W>, command: CardCommand) -> Result<()> {
    match command {
        CardCommand::Show { cardnumber } => {
            let card = session.hub.card(&cardnumber)?;
            session.emit(&card, |card| summary::card_detail(card).to_string())
        }
        CardCommand::Fetch {
            cardnumber,
            source,
            refresh,
        } => {
            let source = JsonFileSource::open(&source.path)
                .with_context(|| format!("load card source {}", source.path.display()))?;
            let cached = session.hub.get_or_fetch(&source, &cardnumber, refresh)?;
            session.emit(&cached, |cached| {
                format!(
                    "{} ({:?})\n{}",
                    cached.card.cardnumber,
                    cached.outcome,
                    summary::card_detail(&cached.card)
                )
            })
        }
        CardCommand::Sync {
            source,
            missing_only,
            limit,
        } => {
            let source = JsonFileSource::open(&source.path)
                .with_context(|| format!("load card source {}", source.path.display()))?;
            let result = session.hub.sync_cards(&source, missing_only, limit)?;
            session.emit(&result, summary::sync_summary)
        }
        CardCommand::Search(args) => {
            let cards = session.hub.search_cards(&card_filter(args))?;
            session.emit(&cards, |cards| {
                format!("{}\n{} card(s)", summary::cards_table(cards), cards.len())
            })
        }
        CardCommand::Facets => {
            let facets = session.hub.card_facets()?;
            session.emit(&facets, |facets| summary::facets_table(facets).to_string())
        }
    }
}

fn card_filter(args: SearchArgs) -> CardFilter {
    CardFilter {
        text: args.text,
        name: args.name,
        card_type: args.card_type,
        cardnumber: args.cardnumber,
        color: args.card_color,
        digitype: args.digitype,
        attribute: args.attribute,
        rarity: args.rarity,
        pack: args.pack,
        level: args.level,
        play_cost_min: args.play_cost_min,
        play_cost_max: args.play_cost_max,
        dp_min: args.dp_min,
        dp_max: args.dp_max,
        evo_cost_min: args.evo_cost_min,
        evo_cost_max: args.evo_cost_max,
        evo_color: args.evo_color,
        limit: args.limit,
    }
}

fn run_prices<W: Write>(session: &mut Session<W>, command: PriceCommand) -> Result<()> {
    match command {
        PriceCommand::Set {
            cardnumber,
            price,
            url,
            out_of_stock,
        } => {
            let cents = parse_price(&price)?;
            let price = session
                .hub
                .set_price(&cardnumber, cents, &url, !out_of_stock)?;
            let currency = session.currency().to_string();
            session.emit(&price, |price| {
                format!(
                    "{}: {}",
                    price.cardnumber,
                    summary::money(price.price_cents, &currency)
                )
            })
        }
        PriceCommand::List => {
            let prices = session.hub.prices()?;
            let currency = session.currency().to_string();
            session.emit(&prices, |prices| {
                summary::prices_table(prices, &currency).to_string()
            })
        }
        PriceCommand::Remove { cardnumber } => {
            session.hub.remove_price(&cardnumber)?;
            session.emit(&cardnumber, |cardnumber| {
                format!("Removed price of {cardnumber}")
            })
        }
    }
}

#[derive(Serialize)]
struct RuleListing<'a> {
    copy_rules: Vec<&'a CopyRule>,
    ban_rules: Vec<&'a BanlistRule>,
    pair_bans: &'a [PairBanRule],
}

#[derive(Serialize)]
struct Standings<'a> {
    tournament: &'a Tournament,
    players: &'a [TournamentPlayer],
}

fn run_rules<W: Write>(session: &mut Session<W>, command: RuleCommand) -> Result<()> {
    match command {
        RuleCommand::Copy(CopyRuleCommand::Set {
            cardnumber,
            max_copies,
            notes,
        }) => {
            let rule = session.hub.set_copy_rule(cardnumber, max_copies, &notes)?;
            session.emit(&rule, |rule| {
                format!("{}: up to {} copies", rule.cardnumber, rule.max_copies)
            })
        }
        RuleCommand::Copy(CopyRuleCommand::Remove { cardnumber }) => {
            session.hub.remove_copy_rule(&cardnumber)?;
            session.emit(&cardnumber, |cardnumber| {
                format!("Removed copy rule of {cardnumber}")
            })
        }
        RuleCommand::Ban(BanRuleCommand::Set {
            cardnumber,
            status,
            notes,
        }) => {
            let rule = session.hub.set_ban_rule(cardnumber, status, &notes)?;
            session.emit(&rule, |rule| {
                format!("{}: {}", rule.cardnumber, rule.status.label())
            })
        }
        RuleCommand::Ban(BanRuleCommand::Remove { cardnumber }) => {
            session.hub.remove_ban_rule(&cardnumber)?;
            session.emit(&cardnumber, |cardnumber| {
                format!("Removed banlist entry of {cardnumber}")
            })
        }
        RuleCommand::Pair(PairBanCommand::Add {
            card_a,
            card_b,
            notes,
        }) => {
            let rule = session.hub.add_pair_ban(card_a, card_b, &notes)?;
            session.emit(&rule, ToString::to_string)
        }
        RuleCommand::Pair(PairBanCommand::Remove { card_a, card_b }) => {
            session.hub.remove_pair_ban(card_a.clone(), card_b.clone())?;
            session.emit(&[card_a, card_b], |[a, b]| {
                format!("Removed pair ban {a} + {b}")
            })
        }
        RuleCommand::List => {
            let rulebook = session.hub.rulebook()?;
            let listing = RuleListing {
                copy_rules: rulebook.copy_rules().collect(),
                ban_rules: rulebook.ban_rules().collect(),
                pair_bans: rulebook.pair_bans(),
            };
            session.emit(&listing, |listing| {
                summary::rules_table(&listing.copy_rules, &listing.ban_rules, listing.pair_bans)
                    .to_string()
            })
        }
        RuleCommand::Check { cardnumber } => {
            let limit = session.hub.card_limit(&cardnumber)?;
            session.emit(&limit, |limit| summary::card_limit_table(limit).to_string())
        }
    }
}

fn run_decks<W: Write>(session: &mut Session<W>, command: DeckCommand) -> Result<i32> {
    let owner = session.current_user()?;
    match command {
        DeckCommand::Create {
            name,
            game,
            archetype,
            description,
            public,
        } => {
            let deck = session.hub.create_deck(
                &owner,
                NewDeck {
                    name,
                    game,
                    archetype,
                    description,
                    public,
                },
            )?;
            session.emit(&deck, |deck| format!("Created deck {} (#{})", deck.name, deck.id))?;
        }
        DeckCommand::List => {
            let decks = session.hub.list_decks(&owner)?;
            session.emit(&decks, |decks| summary::decks_table(decks).to_string())?;
        }
        DeckCommand::Show { deck_id } => {
            let view = session.hub.show_deck(&owner, deck_id)?;
            let currency = session.currency().to_string();
            let limits = session.hub.settings().limits;
            session.emit(&view, |view| summary::deck_view(view, &currency, &limits))?;
        }
        DeckCommand::Add {
            deck_id,
            cardnumber,
            quantity,
        } => {
            let line = session
                .hub
                .add_card(&owner, deck_id, &cardnumber, quantity)
                .with_context(|| format!("add {cardnumber} to deck #{deck_id}"))?;
            session.emit(&line, |line| {
                format!(
                    "{}: {}x {} {} (line #{})",
                    line.section.label(),
                    line.quantity,
                    line.cardnumber,
                    line.card_name,
                    line.id
                )
            })?;
        }
        DeckCommand::Remove { deck_id, line_id } => {
            session.hub.remove_card(&owner, deck_id, line_id)?;
            session.emit(&line_id, |line_id| {
                format!("Removed line #{line_id} from deck #{deck_id}")
            })?;
        }
        DeckCommand::Delete { deck_id } => {
            session.hub.delete_deck(&owner, deck_id)?;
            session.emit(&deck_id, |deck_id| format!("Deleted deck #{deck_id}"))?;
        }
        DeckCommand::Validate { deck_id } => {
            let report = session.hub.validate_deck(&owner, deck_id)?;
            session.emit(&report, summary::legality_report)?;
            if report.has_errors() {
                return Ok(EXIT_FAILURE);
            }
        }
    }
    Ok(0)
}

fn run_loyalty<W: Write>(session: &mut Session<W>, command: LoyaltyCommand) -> Result<()> {
    match command {
        LoyaltyCommand::Balance => {
            let user = session.current_user()?;
            let balance = session.hub.balance(&user)?;
            session.emit(&balance, |balance| format!("{balance} points"))
        }
        LoyaltyCommand::History { limit } => {
            let user = session.current_user()?;
            let events = session.hub.loyalty_events(&user, limit)?;
            session.emit(&events, |events| summary::events_table(events).to_string())
        }
        LoyaltyCommand::Overview => {
            let user = session.current_user()?;
            let overview = session.hub.loyalty_overview(&user)?;
            session.emit(&overview, summary::loyalty_overview)
        }
        LoyaltyCommand::Award {
            username,
            points,
            kind,
            description,
        } => {
            let user = session.hub.user(&username)?;
            let event = session.hub.award_points(&user, kind, points, &description)?;
            session.emit(&event, |event| {
                format!("{}: {event}", user.username)
            })
        }
    }
}

fn run_rewards<W: Write>(session: &mut Session<W>, command: RewardCommand) -> Result<()> {
    match command {
        RewardCommand::Add {
            name,
            cost,
            description,
        } => {
            let reward = session.hub.create_reward(&name, &description, cost)?;
            session.emit(&reward, |reward| {
                format!(
                    "Created reward {} (#{}) for {} points",
                    reward.name, reward.id, reward.cost_points
                )
            })
        }
        RewardCommand::List { all } => {
            let rewards = session.hub.rewards(!all)?;
            session.emit(&rewards, |rewards| summary::rewards_table(rewards).to_string())
        }
        RewardCommand::Redeem { reward_id } => {
            let user = session.current_user()?;
            let redemption = session.hub.redeem(&user, reward_id)?;
            let balance = session.hub.balance(&user)?;
            session.emit(&redemption, |redemption| {
                format!(
                    "Redeemed reward #{} for {} points; balance {balance}",
                    redemption.reward_id, redemption.points_used
                )
            })
        }
        RewardCommand::Enable { reward_id } => set_reward_active(session, reward_id, true),
        RewardCommand::Disable { reward_id } => set_reward_active(session, reward_id, false),
        RewardCommand::History => {
            let user = session.current_user()?;
            let redemptions = session.hub.redemptions(&user)?;
            let rewards = session.hub.rewards(false)?;
            session.emit(&redemptions, |redemptions| {
                summary::redemptions_table(redemptions, &rewards).to_string()
            })
        }
    }
}

fn set_reward_active<W: Write>(
    session: &mut Session<W>,
    reward_id: i64,
    active: bool,
) -> Result<()> {
    session.hub.set_reward_active(reward_id, active)?;
    let state = if active { "enabled" } else { "disabled" };
    session.emit(&reward_id, |reward_id| format!("Reward #{reward_id} {state}"))
}

fn run_news<W: Write>(session: &mut Session<W>, command: NewsCommand) -> Result<()> {
    match command {
        NewsCommand::Publish {
            title,
            summary,
            body,
            highlight,
            draft,
        } => {
            let post = session.hub.publish_news(NewNewsPost {
                title,
                summary,
                body,
                highlight,
                is_published: !draft,
            })?;
            session.emit(&post, |post| {
                let state = if post.is_published { "Published" } else { "Saved draft" };
                format!("{state} {} as {}", post.title, post.slug)
            })
        }
        NewsCommand::Feed => {
            let feed = session.hub.news_feed()?;
            session.emit(&feed, summary::news_feed)
        }
        NewsCommand::Show { slug } => {
            let post = session.hub.news_post(&slug)?;
            session.emit(&post, summary::news_post)
        }
        NewsCommand::Delete { post_id } => {
            session.hub.delete_news(post_id)?;
            session.emit(&post_id, |post_id| format!("Deleted news post #{post_id}"))
        }
    }
}

fn run_seasons<W: Write>(session: &mut Session<W>, command: SeasonCommand) -> Result<()> {
    match command {
        SeasonCommand::Add { name, start, end } => {
            let season = session.hub.create_season(&name, start, end)?;
            session.emit(&season, |season| {
                format!("Created season {} ({})", season.name, season.slug)
            })
        }
        SeasonCommand::List => {
            let seasons = session.hub.seasons()?;
            session.emit(&seasons, |seasons| summary::seasons_table(seasons).to_string())
        }
    }
}

fn run_tournaments<W: Write>(session: &mut Session<W>, command: TournamentCommand) -> Result<()> {
    match command {
        TournamentCommand::Add {
            name,
            date,
            game,
            location,
            description,
            season,
        } => {
            let season_id = season
                .map(|slug| session.hub.season(&slug).map(|season| season.id))
                .transpose()?;
            let tournament = session.hub.create_tournament(NewTournament {
                name,
                game,
                date,
                location,
                description,
                season_id,
            })?;
            session.emit(&tournament, |tournament| {
                format!("Created tournament {} (#{})", tournament.name, tournament.id)
            })
        }
        TournamentCommand::List => {
            let tournaments = session.hub.tournaments()?;
            session.emit(&tournaments, |tournaments| {
                summary::tournaments_table(tournaments).to_string()
            })
        }
        TournamentCommand::Record(args) => register_result(session, args),
        TournamentCommand::Standings { tournament_id } => {
            let (tournament, players) = session.hub.standings(tournament_id)?;
            let standings = Standings {
                tournament: &tournament,
                players: &players,
            };
            session.emit(&standings, |standings| {
                summary::standings(standings.tournament, standings.players)
            })
        }
        TournamentCommand::Close { tournament_id } => {
            let actor = session.current_user()?;
            let tournament = session.hub.close_registration(&actor, tournament_id)?;
            session.emit(&tournament, |tournament| {
                format!("{}: {}", tournament.name, tournament.status.label())
            })
        }
        TournamentCommand::Finish { tournament_id } => {
            let actor = session.current_user()?;
            let tournament = session.hub.finish_tournament(&actor, tournament_id)?;
            session.emit(&tournament, |tournament| {
                format!("{}: {}", tournament.name, tournament.status.label())
            })
        }
        TournamentCommand::Ranking { season } => {
            let scope = season.map_or(RankingScope::Overall, RankingScope::Season);
            let ranking = session.hub.ranking(&scope)?;
            session.emit(&ranking, summary::ranking)
        }
    }
}

fn register_result<W: Write>(session: &mut Session<W>, args: ResultArgs) -> Result<()> {
    let user_id = args
        .player_user
        .as_deref()
        .map(|username| session.hub.user(username).map(|user| user.id))
        .transpose()?;
    let player = session.hub.register_result(
        args.tournament_id,
        PlayerResult {
            player_name: args.player,
            user_id,
            deck_id: args.deck,
            archetype: args.archetype,
            wins: args.wins,
            draws: args.draws,
            losses: args.losses,
            points: args.points,
            omw: args.omw,
            oomw: args.oomw,
        },
    )?;
    session.emit(&player, |player| {
        format!(
            "{}: {}-{}-{}, {} points",
            player.player_name, player.wins, player.draws, player.losses, player.points
        )
    })
}

fn run_profile<W: Write>(session: &mut Session<W>, command: ProfileCommand) -> Result<()> {
    let user = session.current_user()?;
    let profile = match command {
        ProfileCommand::Show => session.hub.profile(&user)?,
        ProfileCommand::Update {
            full_name,
            phone,
            nickname,
            receive_news,
        } => session.hub.update_profile(
            &user,
            ProfileUpdate {
                full_name,
                phone,
                nickname,
                receive_news,
            },
        )?,
    };
    session.emit(&profile, |profile| summary::profile(&user, profile).to_string())
}

fn run_home<W: Write>(session: &mut Session<W>) -> Result<()> {
    let user = session.optional_user()?;
    let dashboard = session.hub.home(user.as_ref())?;
    session.emit(&dashboard, |dashboard| summary::home(dashboard, user.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_parse_to_cents() {
        assert_eq!(parse_price("12").unwrap(), 1200);
        assert_eq!(parse_price("12.5").unwrap(), 1250);
        assert_eq!(parse_price(" 12,05 ").unwrap(), 1205);
        assert_eq!(parse_price(".99").unwrap(), 99);
        assert_eq!(parse_price("0").unwrap(), 0);
    }

    #[test]
    fn malformed_prices_are_rejected() {
        for text in ["", "abc", "1.234", "-3", "1.x", ".", "1.+5", "+12", "1.-5"] {
            assert!(parse_price(text).is_err(), "{text}");
        }
    }
}
