use color_eyre::eyre::{
    Result,
    eyre,
};
use loteria_client::{
    ActorFactory,
    AppConfig,
    CreateGameParams,
    GameService,
    GameStore,
    IdentityConfig,
    NetworkTarget,
    Session,
    TokenService,
    config,
    registry,
    types::{
        GameMode,
        GameSummary,
        TokenKind,
    },
};
use tracing_subscriber::EnvFilter;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: loteria [--local | --mainnet] [--url <url>] [--canister <id>]\n\
         [--identity <pem>] [--config <path>] <command>\n\
         \n\
         Flags:\n\
           --local             Target a local replica (default {})\n\
           --mainnet           Target mainnet (default {})\n\
           --url <url>         Override the replica URL for the selected network\n\
           --canister <id>     Backend canister id (or set {})\n\
           --identity <pem>    PEM file to sign with (anonymous otherwise)\n\
           --config <path>     Load network/canister/identity from a JSON file\n\
         \n\
         Commands:\n\
           open-games [page]         List joinable games\n\
           active-games [page]       List games in progress\n\
           game <id>                 Show one game with players and draw history\n\
           tablas                    List tablas available for rent\n\
           balances                  Show wallet balances (requires --identity)\n\
           create <name> <fee> <pct> Create a line-mode ICP game\n\
           stats                     Show platform volume and largest pots\n\
           whoami                    Print the signed-in principal",
        config::DEFAULT_LOCAL_URL,
        config::DEFAULT_MAINNET_URL,
        config::BACKEND_CANISTER_ENV,
    );
    std::process::exit(0);
}

struct CliArgs {
    config: AppConfig,
    command: Vec<String>,
}

fn parse_cli_args() -> Result<CliArgs> {
    #[derive(Clone, Copy)]
    enum NetworkFlag {
        Local,
        Mainnet,
    }

    let mut args = std::env::args().skip(1);
    let mut network_flag: Option<NetworkFlag> = None;
    let mut custom_url: Option<String> = None;
    let mut canister: Option<String> = None;
    let mut identity_pem: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut command: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--local" => {
                if network_flag.is_some() {
                    return Err(eyre!("Choose one of --local/--mainnet"));
                }
                network_flag = Some(NetworkFlag::Local);
            }
            "--mainnet" => {
                if network_flag.is_some() {
                    return Err(eyre!("Choose one of --local/--mainnet"));
                }
                network_flag = Some(NetworkFlag::Mainnet);
            }
            "--url" => {
                let url = args.next().ok_or_else(|| eyre!("--url requires a URL"))?;
                if custom_url.is_some() {
                    return Err(eyre!("--url may only be specified once"));
                }
                custom_url = Some(url);
            }
            "--canister" => {
                let id = args
                    .next()
                    .ok_or_else(|| eyre!("--canister requires a canister id"))?;
                canister = Some(id);
            }
            "--identity" => {
                let pem = args
                    .next()
                    .ok_or_else(|| eyre!("--identity requires a PEM path"))?;
                identity_pem = Some(pem);
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--config requires a file path"))?;
                config_path = Some(path);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other if other.starts_with("--") => {
                return Err(eyre!("Unknown argument: {other}"));
            }
            other => {
                command.push(other.to_string());
                command.extend(args.by_ref());
            }
        }
    }

    if command.is_empty() {
        print_usage_and_exit();
    }

    let config = if let Some(path) = config_path {
        AppConfig::load(std::path::Path::new(&path))?
    } else {
        let network = match network_flag {
            Some(NetworkFlag::Mainnet) => NetworkTarget::Mainnet {
                url: custom_url
                    .unwrap_or_else(|| config::DEFAULT_MAINNET_URL.to_string()),
            },
            Some(NetworkFlag::Local) | None => NetworkTarget::Local {
                url: custom_url.unwrap_or_else(|| config::DEFAULT_LOCAL_URL.to_string()),
            },
        };
        let canister = canister
            .or_else(|| std::env::var(config::BACKEND_CANISTER_ENV).ok())
            .ok_or_else(|| {
                eyre!(
                    "Specify --canister <id> or set {}",
                    config::BACKEND_CANISTER_ENV
                )
            })?;
        let identity = match identity_pem.as_deref() {
            Some(raw) => IdentityConfig::PemFile {
                path: config::resolve_pem_path(raw),
            },
            None => IdentityConfig::Anonymous,
        };
        AppConfig::new(network, &canister, identity)?
    };

    Ok(CliArgs { config, command })
}

fn print_games(games: &[GameSummary]) {
    if games.is_empty() {
        println!("(none)");
        return;
    }
    for game in games {
        println!(
            "{}  {}  {} {}  fee {} {}  host {}%  {} player(s)",
            game.game_id,
            game.name,
            game.mode,
            game.status,
            game.entry_fee_tokens,
            game.token.symbol(),
            game.host_fee_percent,
            game.players.len(),
        );
    }
}

async fn run_command(args: CliArgs) -> Result<()> {
    let session = Session::restore(&args.config.identity)?;
    let factory = ActorFactory::new(args.config.clone());
    let service = if session.is_authenticated() {
        GameService::connect(&factory, &session).await?
    } else {
        GameService::connect_anonymous(&factory).await?
    };

    let command: Vec<&str> = args.command.iter().map(String::as_str).collect();
    match command.as_slice() {
        ["open-games"] | ["open-games", _] => {
            let page = command.get(1).map(|p| p.parse()).transpose()?.unwrap_or(0);
            let mut store = GameStore::new(service);
            store.fetch_open_games(page).await?;
            print_games(store.open_games());
        }
        ["active-games"] | ["active-games", _] => {
            let page = command.get(1).map(|p| p.parse()).transpose()?.unwrap_or(0);
            let mut store = GameStore::new(service);
            store.fetch_active_games(page).await?;
            print_games(store.active_games());
        }
        ["game", game_id] => {
            let mut store = GameStore::new(service);
            store.fetch_game_by_id(game_id).await?;
            match store.current_game_detail() {
                None => println!("game {game_id} not found"),
                Some(detail) => {
                    println!(
                        "{} hosted by {}",
                        detail.summary.name,
                        detail.host.display_name()
                    );
                    for player in &detail.players {
                        println!("  {} with tablas {:?}", player.display_name(), player.tablas);
                    }
                    let drawn: Vec<String> = detail
                        .draw_history
                        .iter()
                        .map(|&card| registry::card_name(card))
                        .collect();
                    println!("  drawn: {}", drawn.join(", "));
                }
            }
        }
        ["tablas"] => {
            for tabla in service.get_available_tablas().await {
                println!(
                    "tabla {}  {}  rent {} base units  owner {}",
                    tabla.tabla_id,
                    tabla.rarity,
                    tabla.rental_fee,
                    tabla.owner.to_text(),
                );
            }
        }
        ["balances"] => {
            let principal = session
                .principal()
                .ok_or_else(|| eyre!("balances requires --identity"))?;
            let tokens = TokenService::connect(&factory, &session).await?;
            for balance in tokens.all_balances(principal).await? {
                println!("{:>8}  {}", balance.token.symbol(), balance.formatted());
            }
        }
        ["create", name, fee, pct] => {
            let params = CreateGameParams {
                name: name.to_string(),
                mode: GameMode::Line,
                token: TokenKind::Icp,
                entry_fee_tokens: fee.parse()?,
                host_fee_percent: pct.parse()?,
            };
            let mut store = GameStore::new(service);
            let game_id = store.create_game(&params).await?;
            println!("created game {game_id}");
        }
        ["stats"] => {
            for volume in service.get_platform_volume().await? {
                println!(
                    "volume {:>8}  {}",
                    volume.token.symbol(),
                    volume.base_units
                );
            }
            for pot in service.get_largest_pots().await? {
                println!(
                    "pot {:>8}  {}  game {}",
                    pot.token.symbol(),
                    pot.base_units,
                    pot.game_id
                );
            }
        }
        ["whoami"] => match session.principal_text() {
            Some(principal) => println!("{principal}"),
            None => println!("anonymous"),
        },
        _ => return Err(eyre!("Unknown command: {}", command.join(" "))),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
    let args = parse_cli_args()?;
    run_command(args).await
}
