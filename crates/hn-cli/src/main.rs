use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hn_client::{CancellationToken, Client, ClientConfig, StoryList, WorkerLimit};
use hn_core::{
    project_all, sort_by, Ask, Comment, Direction, Item, ItemId, ItemKind, Job, Poll, PollOption,
    SortKey, Sortable, Story,
};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_LIST_LIMIT: usize = 30;

#[derive(Debug, Parser)]
#[command(name = "hn")]
#[command(about = "Read-only Hacker News API client")]
struct Cli {
    /// API root, e.g. https://hacker-news.firebaseio.com/v0
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Concurrent item fetches; zero or negative means unbounded
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_workers: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one item
    Item(ItemArgs),
    /// Print several items in the given order
    Items(ItemsArgs),
    /// Print a user profile
    User(UserArgs),
    /// Print a user's submissions
    Submissions(SubmissionsArgs),
    Top(ListArgs),
    New(ListArgs),
    Best(ListArgs),
    Ask(ListArgs),
    Show(ListArgs),
    Job(ListArgs),
    /// Print the latest changed items and profiles
    Updates(UpdatesArgs),
    /// Print the newest item ID
    MaxId,
    /// Print the newest OFFSET + 1 items
    Recent(RecentArgs),
}

#[derive(Debug, Args)]
struct SortArgs {
    /// id, score, time or type
    #[arg(long, value_parser = SortKey::parse)]
    sort: Option<SortKey>,

    /// asc or desc
    #[arg(long, value_parser = Direction::parse, default_value = "asc")]
    order: Direction,
}

#[derive(Debug, Args)]
struct ItemArgs {
    id: ItemId,

    /// Fail unless the item has this type
    #[arg(long, value_parser = parse_kind)]
    kind: Option<ItemKind>,
}

#[derive(Debug, Args)]
struct ItemsArgs {
    #[arg(required = true)]
    ids: Vec<ItemId>,

    #[arg(long, value_parser = parse_kind)]
    kind: Option<ItemKind>,

    #[command(flatten)]
    sort: SortArgs,
}

#[derive(Debug, Args)]
struct UserArgs {
    name: String,
}

#[derive(Debug, Args)]
struct SubmissionsArgs {
    name: String,

    #[arg(long, value_parser = parse_kind)]
    kind: Option<ItemKind>,

    #[command(flatten)]
    sort: SortArgs,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Number of ranked entries to fetch; 0 fetches the whole list
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
    limit: usize,

    /// Print only the ranked IDs
    #[arg(long, default_value_t = false)]
    ids_only: bool,

    #[command(flatten)]
    sort: SortArgs,
}

#[derive(Debug, Args)]
struct UpdatesArgs {
    /// Fetch the changed items instead of printing their IDs
    #[arg(long, default_value_t = false)]
    items: bool,

    #[command(flatten)]
    sort: SortArgs,
}

#[derive(Debug, Args)]
struct RecentArgs {
    offset: u64,

    #[command(flatten)]
    sort: SortArgs,
}

fn parse_kind(value: &str) -> Result<ItemKind, String> {
    ItemKind::parse(value.trim()).ok_or_else(|| {
        format!("unknown item type `{value}` (expected story, comment, ask, job, poll or pollopt)")
    })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(max_workers) = cli.max_workers {
        config = config.with_max_workers(WorkerLimit::from_signed(max_workers));
    }
    config
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit_sorted<T: Sortable + Serialize>(mut items: Vec<T>, sort: &SortArgs) -> Result<()> {
    if let Some(key) = sort.sort {
        sort_by(&mut items, key, sort.order);
    }
    emit_json(&items)
}

fn emit_kind(items: Vec<Item>, kind: Option<ItemKind>, sort: &SortArgs) -> Result<()> {
    match kind {
        None => emit_sorted(items, sort),
        Some(ItemKind::Story) => emit_sorted(project_all::<Story>(items), sort),
        Some(ItemKind::Comment) => emit_sorted(project_all::<Comment>(items), sort),
        Some(ItemKind::Ask) => emit_sorted(project_all::<Ask>(items), sort),
        Some(ItemKind::Job) => emit_sorted(project_all::<Job>(items), sort),
        Some(ItemKind::Poll) => emit_sorted(project_all::<Poll>(items), sort),
        Some(ItemKind::PollOption) => emit_sorted(project_all::<PollOption>(items), sort),
    }
}

/// Cancels `token` on the first Ctrl-C.
fn cancel_on_interrupt(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = client_config(&cli);
    debug!(base_url = %config.base_url, max_workers = %config.max_workers, "starting");
    let client = Client::new(&config).context("failed to create API client")?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(&cancel);
    run(&client, cli.command, &cancel).await
}

async fn run(client: &Client, command: Command, cancel: &CancellationToken) -> Result<()> {
    match command {
        Command::Item(args) => run_item(client, &args).await,
        Command::Items(args) => {
            let items = client.items.list(&args.ids, None, cancel).await?;
            emit_kind(items, args.kind, &args.sort)
        }
        Command::User(args) => emit_json(&client.users.get(&args.name).await?),
        Command::Submissions(args) => run_submissions(client, &args, cancel).await,
        Command::Top(args) => run_list(client, StoryList::Top, &args, cancel).await,
        Command::New(args) => run_list(client, StoryList::New, &args, cancel).await,
        Command::Best(args) => run_list(client, StoryList::Best, &args, cancel).await,
        Command::Ask(args) => run_list(client, StoryList::Ask, &args, cancel).await,
        Command::Show(args) => run_list(client, StoryList::Show, &args, cancel).await,
        Command::Job(args) => run_list(client, StoryList::Job, &args, cancel).await,
        Command::Updates(args) => {
            if args.items {
                emit_sorted(client.live.update_list(None, cancel).await?, &args.sort)
            } else {
                emit_json(&client.live.updates().await?)
            }
        }
        Command::MaxId => emit_json(&client.live.max_id().await?),
        Command::Recent(args) => {
            emit_sorted(client.live.recent(args.offset, cancel).await?, &args.sort)
        }
    }
}

async fn run_item(client: &Client, args: &ItemArgs) -> Result<()> {
    let items = &client.items;
    match args.kind {
        None => emit_json(&items.get(args.id).await?),
        Some(ItemKind::Story) => emit_json(&items.get_as::<Story>(args.id).await?),
        Some(ItemKind::Comment) => emit_json(&items.get_as::<Comment>(args.id).await?),
        Some(ItemKind::Ask) => emit_json(&items.get_as::<Ask>(args.id).await?),
        Some(ItemKind::Job) => emit_json(&items.get_as::<Job>(args.id).await?),
        Some(ItemKind::Poll) => emit_json(&items.get_as::<Poll>(args.id).await?),
        Some(ItemKind::PollOption) => emit_json(&items.get_as::<PollOption>(args.id).await?),
    }
}

async fn run_submissions(
    client: &Client,
    args: &SubmissionsArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let users = &client.users;
    let name = args.name.as_str();
    let sort = &args.sort;
    match args.kind {
        None => emit_sorted(users.items(name, None, cancel).await?, sort),
        Some(ItemKind::Story) => emit_sorted(users.stories(name, cancel).await?, sort),
        Some(ItemKind::Comment) => emit_sorted(users.comments(name, cancel).await?, sort),
        Some(ItemKind::Ask) => emit_sorted(users.asks(name, cancel).await?, sort),
        Some(ItemKind::Job) => emit_sorted(users.jobs(name, cancel).await?, sort),
        Some(ItemKind::Poll) => emit_sorted(users.polls(name, cancel).await?, sort),
        Some(ItemKind::PollOption) => emit_sorted(users.poll_options(name, cancel).await?, sort),
    }
}

async fn run_list(
    client: &Client,
    list: StoryList,
    args: &ListArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut ids = client.live.ids(list).await?;
    if args.limit > 0 {
        ids.truncate(args.limit);
    }
    if args.ids_only {
        return emit_json(&ids);
    }

    let items = client.items.list(&ids, None, cancel).await?;
    match list {
        StoryList::Ask => emit_sorted(project_all::<Ask>(items), &args.sort),
        StoryList::Show => emit_sorted(project_all::<Story>(items), &args.sort),
        StoryList::Job => emit_sorted(project_all::<Job>(items), &args.sort),
        StoryList::Top | StoryList::New | StoryList::Best => emit_sorted(items, &args.sort),
    }
}
