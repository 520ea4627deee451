//! CLI argument definitions for the `cardhub` binary.

use std::path::PathBuf;

use cardhub_model::{BanStatus, CardNumber, Game, LoyaltyKind};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cardhub",
    version,
    about = "CardHub - card cache, deck builder and tournaments for a TCG store",
    long_about = "Community hub of a trading card game store.\n\n\
                  Caches card data, builds decks under the format's copy limits,\n\
                  banlist and pair bans, and keeps loyalty points, news and\n\
                  tournament results."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: config.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database (overrides CARDHUB_DB and the config file).
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Act as this user (default: `default_user` from the config file).
    #[arg(long = "user", value_name = "USERNAME", global = true)]
    pub user: Option<String>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage accounts.
    #[command(subcommand)]
    Users(UserCommand),

    /// Card cache: fetch, sync, search.
    #[command(subcommand)]
    Cards(CardCommand),

    /// Shop prices of single cards.
    #[command(subcommand)]
    Prices(PriceCommand),

    /// Copy limits, banlist and pair bans.
    #[command(subcommand)]
    Rules(RuleCommand),

    /// Build and check decks.
    #[command(subcommand)]
    Decks(DeckCommand),

    /// Loyalty points of the current user.
    #[command(subcommand)]
    Loyalty(LoyaltyCommand),

    /// Rewards that can be bought with loyalty points.
    #[command(subcommand)]
    Rewards(RewardCommand),

    #[command(subcommand)]
    News(NewsCommand),

    #[command(subcommand)]
    Seasons(SeasonCommand),

    #[command(subcommand)]
    Tournaments(TournamentCommand),

    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Balance, recent activity and news.
    Home,

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Subcommand)]
pub enum UserCommand {
    Add {
        username: String,
        /// Allow tournament management.
        #[arg(long)]
        staff: bool,
    },
    List,
}

#[derive(Subcommand)]
pub enum CardCommand {
    /// Show a cached card.
    Show { cardnumber: CardNumber },

    /// Cache one card from a card source.
    Fetch {
        cardnumber: CardNumber,
        #[command(flatten)]
        source: SourceArgs,
        /// Fetch again when the cached copy is stale.
        #[arg(long)]
        refresh: bool,
    },

    /// Cache every card a source offers.
    Sync {
        #[command(flatten)]
        source: SourceArgs,
        /// Skip cards that are already cached.
        #[arg(long = "missing-only")]
        missing_only: bool,
        /// Stop after this many fetches.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    Search(SearchArgs),

    /// Distinct values for the search filters.
    Facets,
}

#[derive(Args)]
pub struct SourceArgs {
    /// JSON file with card payloads (an array of card objects).
    #[arg(long = "source", value_name = "FILE")]
    pub path: PathBuf,
}

#[derive(Args, Default)]
pub struct SearchArgs {
    /// Matches name, number, type, color, traits, pack and effects.
    pub text: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "type")]
    pub card_type: Option<String>,
    #[arg(long)]
    pub cardnumber: Option<String>,
    #[arg(long = "card-color", value_name = "COLOR")]
    pub card_color: Option<String>,
    #[arg(long)]
    pub digitype: Option<String>,
    #[arg(long)]
    pub attribute: Option<String>,
    #[arg(long)]
    pub rarity: Option<String>,
    #[arg(long)]
    pub pack: Option<String>,
    #[arg(long)]
    pub level: Option<u32>,
    #[arg(long = "play-cost-min", value_name = "N")]
    pub play_cost_min: Option<u32>,
    #[arg(long = "play-cost-max", value_name = "N")]
    pub play_cost_max: Option<u32>,
    #[arg(long = "dp-min", value_name = "N")]
    pub dp_min: Option<u32>,
    #[arg(long = "dp-max", value_name = "N")]
    pub dp_max: Option<u32>,
    #[arg(long = "evo-cost-min", value_name = "N")]
    pub evo_cost_min: Option<u32>,
    #[arg(long = "evo-cost-max", value_name = "N")]
    pub evo_cost_max: Option<u32>,
    #[arg(long = "evo-color")]
    pub evo_color: Option<String>,
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum PriceCommand {
    Set {
        cardnumber: CardNumber,
        /// Unit price, e.g. `12.50`.
        price: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long = "out-of-stock")]
        out_of_stock: bool,
    },
    List,
    Remove { cardnumber: CardNumber },
}

#[derive(Subcommand)]
pub enum RuleCommand {
    /// Per-card copy limit.
    #[command(subcommand)]
    Copy(CopyRuleCommand),

    /// Banlist entries.
    #[command(subcommand)]
    Ban(BanRuleCommand),

    /// Cards that may not share a deck.
    #[command(subcommand)]
    Pair(PairBanCommand),

    /// Every stored rule.
    List,

    /// Effective limit of a card.
    Check { cardnumber: CardNumber },
}

#[derive(Subcommand)]
pub enum CopyRuleCommand {
    Set {
        cardnumber: CardNumber,
        max_copies: u32,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove { cardnumber: CardNumber },
}

#[derive(Subcommand)]
pub enum BanRuleCommand {
    Set {
        cardnumber: CardNumber,
        /// BANNED, LIMITED_1, LIMITED_2 or LIMITED_3 (or 0 to 3).
        status: BanStatus,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove { cardnumber: CardNumber },
}

#[derive(Subcommand)]
pub enum PairBanCommand {
    Add {
        card_a: CardNumber,
        card_b: CardNumber,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        card_a: CardNumber,
        card_b: CardNumber,
    },
}

#[derive(Subcommand)]
pub enum DeckCommand {
    Create {
        name: String,
        #[arg(long, default_value = "digimon")]
        game: Game,
        #[arg(long, default_value = "")]
        archetype: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        public: bool,
    },
    List,
    Show { deck_id: i64 },
    /// Add copies of a cached card.
    Add {
        deck_id: i64,
        cardnumber: CardNumber,
        /// Copies to add, clamped to 1..=20.
        #[arg(long = "qty", default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a deck line by its id.
    Remove { deck_id: i64, line_id: i64 },
    Delete { deck_id: i64 },
    /// Report every legality problem of a deck.
    Validate { deck_id: i64 },
}

#[derive(Subcommand)]
pub enum LoyaltyCommand {
    Balance,
    /// Ledger entries, newest first.
    History {
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Balance, recent entries and the cheapest rewards.
    Overview,
    /// Book points for a user (negative values deduct).
    Award {
        username: String,
        #[arg(allow_negative_numbers = true)]
        points: i64,
        #[arg(long, default_value = "bonus")]
        kind: LoyaltyKind,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum RewardCommand {
    Add {
        name: String,
        cost: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    List {
        /// Include inactive rewards.
        #[arg(long)]
        all: bool,
    },
    Redeem { reward_id: i64 },
    Enable { reward_id: i64 },
    Disable { reward_id: i64 },
    /// Redemptions of the current user.
    History,
}

#[derive(Subcommand)]
pub enum NewsCommand {
    Publish {
        title: String,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long, default_value = "")]
        body: String,
        /// Show in the featured block.
        #[arg(long)]
        highlight: bool,
        /// Store without publishing.
        #[arg(long)]
        draft: bool,
    },
    /// Featured posts, then the rest.
    Feed,
    Show { slug: String },
    Delete { post_id: i64 },
}

#[derive(Subcommand)]
pub enum SeasonCommand {
    Add {
        name: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: NaiveDate,
    },
    List,
}

#[derive(Subcommand)]
pub enum TournamentCommand {
    Add {
        name: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[arg(long, default_value = "digimon")]
        game: Game,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Season slug.
        #[arg(long)]
        season: Option<String>,
    },
    List,
    /// Enter a player's final record.
    #[command(name = "result")]
    Record(ResultArgs),
    Standings { tournament_id: i64 },
    /// Close registration (staff only).
    Close { tournament_id: i64 },
    /// Mark as finished (staff only).
    Finish { tournament_id: i64 },
    /// Player and archetype ranking, overall or for a season.
    Ranking {
        /// Season slug.
        #[arg(long)]
        season: Option<String>,
    },
}

#[derive(Args)]
pub struct ResultArgs {
    pub tournament_id: i64,
    pub player: String,
    #[arg(long, default_value_t = 0)]
    pub wins: u32,
    #[arg(long, default_value_t = 0)]
    pub draws: u32,
    #[arg(long, default_value_t = 0)]
    pub losses: u32,
    /// Match points (default: 3 per win, 1 per draw).
    #[arg(long)]
    pub points: Option<i64>,
    #[arg(long, default_value = "")]
    pub archetype: String,
    #[arg(long, default_value_t = 0.0)]
    pub omw: f64,
    #[arg(long, default_value_t = 0.0)]
    pub oomw: f64,
    /// Link the result to a registered user.
    #[arg(long = "player-user", value_name = "USERNAME")]
    pub player_user: Option<String>,
    #[arg(long)]
    pub deck: Option<i64>,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long = "full-name")]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long = "receive-news")]
        receive_news: Option<bool>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
