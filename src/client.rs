use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::bounds::MarkerGrid;
use crate::piece::Cell;
use crate::settings::GameSettings;
use crate::versus::{TickOutcome, Versus};

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

fn log(msg: &str) {
    console::log_1(&JsValue::from_str(msg));
}

#[wasm_bindgen]
pub struct GameClient {
    versus: Versus<StdRng>,
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings: JsValue,
        player_markers: JsValue,
        opponent_markers: JsValue,
        seed: Option<u64>,
    ) -> Result<GameClient, JsValue> {
        let settings: GameSettings = from_value(settings).unwrap_or_default();
        let player: Vec<Cell> = from_value(player_markers)?;
        let opponent: Vec<Cell> = from_value(opponent_markers)?;
        let player: MarkerGrid = player.into_iter().collect();
        let opponent: MarkerGrid = opponent.into_iter().collect();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let versus = Versus::new(&player, &opponent, settings, rng)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { versus })
    }

    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self) -> bool {
        match self.versus.tick() {
            TickOutcome::Advanced {
                player_cleared,
                opponent_cleared,
            } => {
                if player_cleared.is_some() {
                    log(&format!("[duel] player streak {}", self.versus.streak()));
                }
                if opponent_cleared.is_some() {
                    log("[duel] opponent cleared a row");
                }
                true
            }
            TickOutcome::Waiting | TickOutcome::Halted => false,
        }
    }

    #[wasm_bindgen(js_name = takeFrame)]
    pub fn take_frame(&mut self) -> Result<JsValue, JsValue> {
        match self.versus.take_frame() {
            Some(frame) => to_value(&frame).map_err(|e| e.into()),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.versus.is_dirty()
    }

    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.versus.frame()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) -> bool {
        self.versus.move_left()
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) -> bool {
        self.versus.move_right()
    }

    #[wasm_bindgen(js_name = rotate)]
    pub fn rotate(&mut self) -> bool {
        self.versus.rotate()
    }

    #[wasm_bindgen(js_name = hardDrop)]
    pub fn hard_drop(&mut self) -> bool {
        self.versus.hard_drop()
    }

    #[wasm_bindgen(js_name = toggleCell)]
    pub fn toggle_cell(&mut self, x: i32, y: i32) -> bool {
        self.versus.toggle_cell(Cell::new(x, y))
    }

    #[wasm_bindgen(js_name = score)]
    pub fn score(&self) -> u32 {
        self.versus.score()
    }

    #[wasm_bindgen(js_name = difficulty)]
    pub fn difficulty(&self) -> u32 {
        self.versus.difficulty()
    }

    #[wasm_bindgen(js_name = statusLine)]
    pub fn status_line(&self) -> String {
        self.versus.frame().status_line()
    }
}
