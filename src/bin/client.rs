use drone_miner::config::ClientConfig;
use drone_miner::game::display::StatusLine;
use drone_miner::network::SaveClient;
use drone_miner::session::{Command, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env();
    let client = match SaveClient::new(config.server_url.clone(), config.request_timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Playing against {}", client.base_url());
    info!("Commands: [c]lick (or Enter), [b]uy, [s]ave, status (?), [q]uit");

    let (command_tx, command_rx) = mpsc::unbounded_channel::<Command>();

    // ── Stdin reader ────────────────────────────────────────────────
    let stdin_tx = command_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(command) => {
                        if stdin_tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => warn!("Unknown command: {}", line.trim()),
                },
                Ok(None) => {
                    let _ = stdin_tx.send(Command::Quit);
                    break;
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    let _ = stdin_tx.send(Command::Quit);
                    break;
                }
            }
        }
    });

    // ── Ctrl-C ──────────────────────────────────────────────────────
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = command_tx.send(Command::Quit);
        }
    });

    let final_state = Session::new(client, config).run(command_rx).await;
    println!("{}", StatusLine(&final_state));

    // A pending blocking stdin read would otherwise hold the runtime open.
    std::process::exit(0);
}
