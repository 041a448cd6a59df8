//! Ripple Grid demo driver
//!
//! Ripples a procedural shape onto a board, runs it at a fixed timestep and
//! prints the final lighting. Pass a JSON config path to override defaults.

use std::process::ExitCode;

use glam::Vec3;

use ripple_grid::GridConfig;
use ripple_grid::consts::SIM_DT;
use ripple_grid::sim::{Element, Grid, GridEvent, Rgb, ShapeImage};

/// Ticks to keep running after the ripple completes, so pings settle
const SETTLE_TICKS: u32 = 30;
/// Hard stop in case the ripple never reaches the whole board
const MAX_TICKS: u32 = 10_000;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Ripple Grid (native) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> ripple_grid::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };

    let mut grid = Grid::new(config)?;
    let image = diamond(grid.board().width(), grid.board().height());

    let centre = grid.board().all_cells().map(|c| c.position()).sum::<Vec3>()
        / grid.board().len() as f32;
    grid.set_shape(&image, Element::Water, centre)?;

    let mut ticks = 0;
    let mut settle = SETTLE_TICKS;
    let mut changes = 0usize;
    while settle > 0 && ticks < MAX_TICKS {
        grid.tick(SIM_DT);
        ticks += 1;
        if !grid.is_rippling() {
            settle -= 1;
        }
        changes += grid
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GridEvent::CellChanged { .. }))
            .count();
    }
    log::info!("Ran {ticks} ticks, {changes} cell changes");

    if let Some(target) = grid.random_cell_from_shape_for_ai(&image)? {
        log::info!("AI picks cell ({}, {})", target.x, target.y);
        grid.tap_tile(Some(target))?;
        for event in grid.drain_events() {
            log::info!("{event:?}");
        }
    }

    print_board(&grid);
    Ok(())
}

/// Diamond of lit pixels fading out from the centre; black elsewhere
fn diamond(width: usize, height: usize) -> ShapeImage {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let reach = cx.min(cy);
    ShapeImage::from_fn(width, height, |x, y| {
        let d = (x as f32 + 0.5 - cx).abs() + (y as f32 + 0.5 - cy).abs();
        if d > reach {
            return Rgb::BLACK;
        }
        let v = (255.0 * (1.0 - d / (reach + 1.0))) as u8;
        Rgb::new(v, v, v.max(1))
    })
}

fn print_board(grid: &Grid) {
    const RAMP: &[u8] = b" .:-=+*#%@";
    let board = grid.board();
    for y in 0..board.height() {
        let row: String = (0..board.width())
            .map(|x| match board.get(x, y) {
                Ok(cell) if cell.enabled => {
                    let i = (cell.brightness.clamp(0.0, 1.0) * (RAMP.len() - 1) as f32) as usize;
                    RAMP[i] as char
                }
                _ => '·',
            })
            .collect();
        println!("{row}");
    }
}
