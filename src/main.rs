//! Entry point for **iconsnake**.
//!
//! Locates the desktop, asks the operator to arrange the anchor icons,
//! minimises the console and hands over to the
//! [`Session`](iconsnake::session::Session).  The console comes back before
//! the desktop is restored so the result can be read while the board is
//! still on screen.

use iconsnake::config::Config;
use log::info;
use std::path::PathBuf;

const USAGE: &str = "\
Usage: iconsnake [--config <path>] [--no-prompt]

Plays Snake with your desktop icons and puts them back afterwards.

Before starting, make sure that:
  1. \"Align icons to grid\" is enabled (desktop context menu > View).
  2. One icon sits in the top-left corner of the screen.
  3. A second icon sits directly below it.
  4. A third icon sits directly to its right.
  5. Another icon further down the left column marks the bottom of the play area.

Controls: W/A/S/D or the arrow keys steer, Esc or Ctrl+C stops and restores the desktop.

Options:
  --config <path>  read settings from <path> instead of %APPDATA%\\iconsnake\\config.json
  --no-prompt      start immediately, without waiting for Enter
  -h, --help       show this help
";

/// Resolve the config directory (`%APPDATA%\iconsnake`).
fn config_dir() -> PathBuf {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("iconsnake")
}

/// Load the config from `--config <path>` or the default location, falling
/// back to compiled-in defaults.
fn load_config(args: &[String]) -> Config {
    let path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("config.json"));
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", USAGE);
        return;
    }
    let prompt = !args.iter().any(|a| a == "--no-prompt");
    let config = load_config(&args);

    std::process::exit(run(config, prompt));
}

//  Windows

#[cfg(windows)]
fn run(config: Config, prompt: bool) -> i32 {
    use iconsnake::desktop::channel::DesktopIcons;
    use iconsnake::desktop::console::{self, Console};
    use iconsnake::desktop::keyboard::Keyboard;
    use iconsnake::desktop::locator;
    use iconsnake::game::MIN_ICONS;
    use iconsnake::session::{Session, StopSignal};
    use iconsnake::traits::IconHost;
    use log::{error, warn};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    console::set_dpi_awareness();
    println!("iconsnake needs administrator rights to move desktop icons.");
    println!("Press Esc at any time to stop and restore the desktop.");

    let handle = match locator::locate() {
        Ok(h) => h,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };
    let icons = DesktopIcons::new(handle);

    let count = icons.icon_count();
    if count < MIN_ICONS {
        error!(
            "only {} desktop icon(s), at least {} are needed",
            count, MIN_ICONS
        );
        return 1;
    }
    info!("found {} desktop icons", count);

    if prompt {
        print!("{}", USAGE);
        println!("\nPress Enter when the icons are in place...");
        let mut line = String::new();
        if let Err(e) = std::io::stdin().read_line(&mut line) {
            error!("failed to read from stdin: {}", e);
            return 1;
        }
    }

    let stop = StopSignal::new();
    if let Err(e) = console::forward_stop_events(stop.clone()) {
        warn!("Ctrl+C will not restore the desktop: {}", e);
    }

    let console = Console::attach();
    if let Some(c) = &console {
        std::thread::sleep(Duration::from_millis(300));
        c.minimize();
    }

    let result = Session::new(icons, Keyboard::new(), config)
        .with_stop_signal(stop)
        .on_finish(|end| {
            if let Some(c) = &console {
                c.restore();
            }
            println!("{}", end);
            println!("Restoring the desktop...");
        })
        .run(StdRng::from_entropy());

    if let Some(c) = &console {
        c.restore();
    }
    match result {
        Ok(_) => {
            println!("Desktop restored.");
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

#[cfg(not(windows))]
fn run(_config: Config, _prompt: bool) -> i32 {
    log::error!("iconsnake drives the Windows desktop and cannot run on this platform");
    1
}
