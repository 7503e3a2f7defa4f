mod renderthing;

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use libgame::{board::TileState, pos::Position};
use log::{debug, warn};
use renderthing::{Renderer, frame::RenderFrame, window::RendererWindowConfig};
use winit::event::{MouseButton, WindowEvent};

use crate::{State, config::WindowConfig, read_state, write_state};

const BACKGROUND_COLOR: [u8; 4] = [10, 10, 10, 255];
const ALIVE_COLOR: [u8; 4] = [0x98, 0xE3, 0x5B, 255];
const DEAD_COLOR: [u8; 4] = [0, 0, 0, 255];

// Gap between neighboring tiles, which makes up the grid lines.
const HALF_TILE_MARGIN: u32 = 1;

pub fn run(state_arc: Arc<RwLock<State>>, window_config: WindowConfig) -> anyhow::Result<()> {
    let renderer_state = RendererState {
        global_state: state_arc,
        mouse_tile_pos: None,
        mouse_pressed: false,
        width: 0,
        height: 0,
    };

    let renderer_state_arc = Arc::new(Mutex::new(renderer_state));
    let draw_state_arc = renderer_state_arc.clone();
    let event_state_arc = renderer_state_arc.clone();

    let renderer = Renderer::new(RendererWindowConfig {
        title: window_config.title,
        width: window_config.width,
        height: window_config.height,
        target_fps: window_config.target_fps,
        draw_callback: Box::new(move |frame| {
            let mut state = draw_state_arc.lock().unwrap_or_else(PoisonError::into_inner);
            draw(&mut state, frame);
        }),
        event_callback: Some(Box::new(move |event| {
            let mut state = event_state_arc.lock().unwrap_or_else(PoisonError::into_inner);
            on_event(&mut state, event);
        })),
    })?;

    renderer.run()
}

fn draw(state: &mut RendererState, mut frame: RenderFrame) {
    state.width = frame.width;
    state.height = frame.height;

    frame.fill(BACKGROUND_COLOR);

    let Ok(global_state) = read_state(&state.global_state) else {
        return;
    };
    let board = global_state.play_field.board();

    if board.width() == 0 || board.height() == 0 {
        return;
    }

    let tile_width = frame.width / board.width() as u32;
    let tile_height = frame.height / board.height() as u32;

    for (tile_pos, tile) in board.enumerate_tiles() {
        let tile_screen_x = tile_pos.x as u32 * tile_width;
        let tile_screen_y = tile_pos.y as u32 * tile_height;

        let color = match tile {
            TileState::Alive => ALIVE_COLOR,
            TileState::Dead => DEAD_COLOR,
        };

        frame.draw_square(
            tile_screen_x + HALF_TILE_MARGIN,
            tile_screen_y + HALF_TILE_MARGIN,
            tile_width.saturating_sub(HALF_TILE_MARGIN * 2),
            tile_height.saturating_sub(HALF_TILE_MARGIN * 2),
            color,
        );
    }
}

fn on_event(state: &mut RendererState, event: &WindowEvent) {
    let click = match event {
        WindowEvent::MouseInput {
            state: mouse_state,
            button,
            ..
        } => {
            if *button == MouseButton::Left {
                state.mouse_pressed = mouse_state.is_pressed();
                state.mouse_pressed
            } else {
                false
            }
        }
        WindowEvent::CursorMoved { position, .. } => {
            let prev_tile_pos = state.mouse_tile_pos;
            state.mouse_tile_pos = state.tile_at(position.x, position.y);

            state.mouse_pressed && prev_tile_pos != state.mouse_tile_pos
        }
        WindowEvent::CursorLeft { .. } => {
            state.mouse_tile_pos = None;
            false
        }
        _ => false,
    };

    if click && let Some(Position { x, y }) = state.mouse_tile_pos {
        let Ok(mut global_state) = write_state(&state.global_state) else {
            return;
        };

        match global_state.play_field.toggle_cell(x, y) {
            Ok(alive) => {
                global_state.play_field.living_cells();
                debug!("Toggled ({x}, {y}), alive: {alive}");
            }
            Err(e) => warn!("{e}"),
        }
    }
}

struct RendererState {
    global_state: Arc<RwLock<State>>,
    mouse_tile_pos: Option<Position>,
    mouse_pressed: bool,
    width: u32,
    height: u32,
}

impl RendererState {
    fn tile_at(&self, screen_x: f64, screen_y: f64) -> Option<Position> {
        if self.width == 0 || self.height == 0 || screen_x < 0.0 || screen_y < 0.0 {
            return None;
        }

        let global_state = read_state(&self.global_state).ok()?;
        let board = global_state.play_field.board();

        let x = (screen_x as u64 * board.width() as u64 / self.width as u64) as usize;
        let y = (screen_y as u64 * board.height() as u64 / self.height as u64) as usize;

        board.tile([x, y]).map(|_| Position { x, y })
    }
}
