use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use clash8_core::{
    crypto::{BoxKeypair, CryptoProvider},
    keys,
    protocol::{ClientMessage, Command as TurnCommand, EndClientTurn, Login, ServerMessage, ShutdownInfo},
};
use clash8_crypto_sodium::SodiumCryptoProvider;
use clash8_net_tokio::{accept, connect, NetError, ServerConn};

#[derive(Parser)]
#[command(name = "clash8", version, about = "v8 protocol server and demo client")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    // Run the listening server.
    Serve {
        // Bind address, e.g. 127.0.0.1:9339
        #[arg(long)]
        bind: String,

        /// Server box secret key file (32 bytes hex / 64 hex chars, with a
        /// matching .pub next to it). Defaults to the bundled standard
        /// custom-server keypair.
        #[arg(long)]
        key: Option<PathBuf>,

        /// Announce a shutdown this many seconds away to every client.
        #[arg(long)]
        shutdown_secs: Option<i32>,
    },

    // Log in, exchange a keep-alive, optionally send one hero speed-up.
    Client {
        // Server address, e.g. 127.0.0.1:9339
        #[arg(long)]
        connect: String,

        /// Server public key file (32 bytes hex / 64 hex chars). Defaults
        /// to the bundled standard custom-server public key.
        #[arg(long)]
        server_pub: Option<PathBuf>,

        // Account id to log in as
        #[arg(long, default_value_t = 1)]
        account: i64,

        /// Send a speed-up command for this hero after logging in.
        #[arg(long)]
        speed_up_hero: Option<i32>,
    },

    // Generate a box keypair
    Keygen {
        // Output directory
        #[arg(long)]
        out_dir: PathBuf,

        // Prefix for filenames (e.g. "server" -> server.key / server.pub)
        #[arg(long)]
        name: String,

        // Overwrite existing files
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve {
            bind,
            key,
            shutdown_secs,
        } => run_serve(bind, key, shutdown_secs).await,
        Command::Client {
            connect,
            server_pub,
            account,
            speed_up_hero,
        } => run_client(connect, server_pub, account, speed_up_hero).await,
        Command::Keygen {
            out_dir,
            name,
            force,
        } => run_keygen(out_dir, name, force).await,
    }
}

async fn run_serve(
    bind: String,
    key: Option<PathBuf>,
    shutdown_secs: Option<i32>,
) -> Result<()> {
    let crypto = Arc::new(SodiumCryptoProvider::new());

    let keypair = match key {
        Some(path) => load_box_keypair(&path)?,
        None => {
            warn!("no --key given; using the standard custom-server keypair");
            keys::standard_keypair()
        }
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    info!("clash8 server listening on {bind}");
    info!("server public key: {}", hex::encode(keypair.public));

    loop {
        let conn = accept(&listener, keypair.clone(), crypto.clone()).await?;
        let peer = conn.peer();
        tokio::spawn(async move {
            if let Err(e) = handle_conn(conn, shutdown_secs).await {
                match e {
                    NetError::Framing(_) => debug!(%peer, "client disconnected: {e}"),
                    other => warn!(%peer, "connection ended: {other}"),
                }
            }
        });
    }
}

async fn handle_conn(mut conn: ServerConn, shutdown_secs: Option<i32>) -> Result<(), NetError> {
    let mut announced = false;

    loop {
        let msg = conn.next_message().await?;

        if !announced {
            if let Some(secs) = shutdown_secs {
                conn.send(&ServerMessage::ShutdownInfo(ShutdownInfo {
                    seconds_remaining: secs,
                }))
                .await?;
                announced = true;
            }
        }

        match msg {
            ClientMessage::EndClientTurn(turn) => {
                for cmd in &turn.commands {
                    match cmd {
                        TurnCommand::SpeedUpHero { hero_id } => {
                            info!(peer = %conn.peer(), hero_id, "speeding up hero upgrade");
                        }
                    }
                }
            }
            other => debug!(peer = %conn.peer(), ?other, "unhandled message"),
        }
    }
}

async fn run_client(
    addr: String,
    server_pub: Option<PathBuf>,
    account: i64,
    speed_up_hero: Option<i32>,
) -> Result<()> {
    let crypto = Arc::new(SodiumCryptoProvider::new());

    let server_public = match server_pub {
        Some(path) => load_pubkey32(&path)?,
        None => keys::STANDARD_PUBLIC_KEY,
    };

    let login = Login {
        account_id: account,
        pass_token: None,
        major_version: 8,
        minor_version: 551,
        build_version: 1,
        resource_sha: None,
        device: Some("clash8-cli".into()),
        locale: Some("EN".into()),
    };

    let mut conn = connect(&addr, &server_public, &login, crypto).await?;
    let ok = conn.login_ok();
    println!("logged in: account={} home={}", ok.account_id, ok.home_id);

    conn.send(&ClientMessage::KeepAlive).await?;
    match conn.recv().await? {
        ServerMessage::KeepAliveOk => println!("keep-alive acknowledged"),
        other => println!("server sent: {other:?}"),
    }

    if let Some(hero_id) = speed_up_hero {
        conn.send(&ClientMessage::EndClientTurn(EndClientTurn {
            subtick: 0,
            checksum: 0,
            commands: vec![TurnCommand::SpeedUpHero { hero_id }],
        }))
        .await?;
        println!("sent speed-up for hero {hero_id}");
    }

    Ok(())
}

async fn run_keygen(out_dir: PathBuf, name: String, force: bool) -> Result<()> {
    let crypto = SodiumCryptoProvider::new();

    let kp = crypto.box_keypair().await?;

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let key_path = out_dir.join(format!("{name}.key"));
    let pub_path = out_dir.join(format!("{name}.pub"));

    if !force && (key_path.exists() || pub_path.exists()) {
        return Err(anyhow!("key files already exist (use --force to overwrite)"));
    }

    fs::write(&key_path, hex::encode(kp.secret))
        .with_context(|| format!("failed to write {}", key_path.display()))?;
    fs::write(&pub_path, hex::encode(kp.public))
        .with_context(|| format!("failed to write {}", pub_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&key_path, fs::Permissions::from_mode(0o600))?;
        fs::set_permissions(&pub_path, fs::Permissions::from_mode(0o644))?;
    }

    println!("generated:");
    println!("  secret: {}", key_path.display());
    println!("  public: {}", pub_path.display());

    Ok(())
}

fn load_hex_bytes(path: &PathBuf, expected_len: usize) -> Result<Vec<u8>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let s = s.trim();

    let bytes = hex::decode(s).with_context(|| format!("invalid hex in {}", path.display()))?;
    if bytes.len() != expected_len {
        return Err(anyhow!(
            "wrong length in {}: got {} bytes, expected {}",
            path.display(),
            bytes.len(),
            expected_len
        ));
    }
    Ok(bytes)
}

fn load_box_keypair(path: &PathBuf) -> Result<BoxKeypair> {
    let sk = load_hex_bytes(path, 32)?;
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&sk);

    // Public key is loaded from the sibling .pub file.
    let pub_path = path.with_extension("pub");
    let public = load_pubkey32(&pub_path)?;

    Ok(BoxKeypair { public, secret })
}

fn load_pubkey32(path: &PathBuf) -> Result<[u8; 32]> {
    let pk = load_hex_bytes(path, 32)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&pk);
    Ok(out)
}
