use clap::Parser;
use wasm_bindgen::prelude::*;

mod backend;
mod game;
mod leaderboard;
mod settings;
mod timers;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&']))
        .map_err(|err| JsValue::from_str(&format!("could not parse args: {err}")))?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| JsValue::from_str(&format!("could not initialize logger: {err}")))?;
    }

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| JsValue::from_str("could not find id=\"game\" element"))?;

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
    Ok(())
}
