//! Fixed-size board of cells
//!
//! Cells are stored row-major (`y * width + x`). Coordinates are assigned
//! once at construction and never change.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellCoord, CellParams};
use super::element::Element;
use crate::error::{GridError, Result};

/// W×H grid of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    params: CellParams,
}

impl Board {
    /// Build a board from a flat, ordered list of cell positions.
    ///
    /// Positions fill column by column: index `i` becomes cell
    /// `(i / height, i % height)`, so `x * height + y` gives back `i`.
    pub fn from_positions<I>(width: usize, height: usize, positions: I, params: CellParams) -> Result<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        params.validate()?;
        let positions: Vec<Vec3> = positions.into_iter().collect();
        let expected = width * height;
        if positions.len() != expected {
            return Err(GridError::LayoutMismatch {
                expected,
                actual: positions.len(),
            });
        }

        let cells = (0..expected)
            .map(|i| {
                let coord = CellCoord::new(i % width, i / width);
                Cell::new(coord, positions[coord.x * height + coord.y], &params)
            })
            .collect();

        Ok(Self {
            width,
            height,
            cells,
            params,
        })
    }

    /// Lay cells out on the XY plane, `spacing` apart, cell (0, 0) at the origin
    pub fn from_grid_layout(width: usize, height: usize, spacing: f32, params: CellParams) -> Result<Self> {
        params.validate()?;
        let cells = (0..width * height)
            .map(|i| {
                let coord = CellCoord::new(i % width, i / width);
                let pos = Vec3::new(coord.x as f32 * spacing, coord.y as f32 * spacing, 0.0);
                Cell::new(coord, pos, &params)
            })
            .collect();

        Ok(Self {
            width,
            height,
            cells,
            params,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (width * height)
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn params(&self) -> &CellParams {
        &self.params
    }

    /// Storage index of (x, y)
    pub fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&Cell> {
        let i = self.index(x, y)?;
        Ok(&self.cells[i])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell> {
        let i = self.index(x, y)?;
        Ok(&mut self.cells[i])
    }

    /// Cell by storage index (as yielded by `all_cells` order)
    pub(crate) fn cell_at_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    pub fn set_on(&mut self, x: usize, y: usize, element: Element, brightness: f32) -> Result<()> {
        self.get_mut(x, y)?.on(element, brightness);
        Ok(())
    }

    pub fn set_off(&mut self, x: usize, y: usize) -> Result<()> {
        let off = self.params.off_brightness;
        self.get_mut(x, y)?.off(off);
        Ok(())
    }

    pub fn ping(&mut self, x: usize, y: usize, element: Element) -> Result<()> {
        let params = self.params;
        self.get_mut(x, y)?.ping(element, &params);
        Ok(())
    }

    /// Every cell in row-major order. The iterator is cheap to clone, so it
    /// can be restarted.
    pub fn all_cells(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Closest cell to `point`, skipping disabled cells unless
    /// `include_disabled`. Ties go to the first cell in row-major order.
    pub fn nearest(&self, point: Vec3, include_disabled: bool) -> Option<&Cell> {
        let mut nearest: Option<&Cell> = None;
        let mut closest = f32::MAX;

        for cell in self.all_cells() {
            if !cell.enabled && !include_disabled {
                continue;
            }
            let dist = cell.position().distance(point);
            if dist < closest {
                nearest = Some(cell);
                closest = dist;
            }
        }
        nearest
    }

    /// Advance per-cell pings and flicker. Returns the cells that changed.
    pub fn tick_cells<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Vec<CellCoord> {
        let params = self.params;
        self.cells
            .iter_mut()
            .filter_map(|cell| cell.tick(dt, &params, rng).then_some(cell.coord))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn board(width: usize, height: usize) -> Board {
        Board::from_grid_layout(width, height, 1.0, CellParams::default()).unwrap()
    }

    #[test]
    fn test_from_positions_fills_column_by_column() {
        let positions = (0..6).map(|i| Vec3::new(i as f32, 0.0, 0.0));
        let board = Board::from_positions(3, 2, positions, CellParams::default()).unwrap();

        assert_eq!(board.get(0, 0).unwrap().position().x, 0.0);
        assert_eq!(board.get(0, 1).unwrap().position().x, 1.0);
        assert_eq!(board.get(1, 0).unwrap().position().x, 2.0);
        assert_eq!(board.get(2, 1).unwrap().position().x, 5.0);
        assert_eq!(board.get(2, 1).unwrap().coord, CellCoord::new(2, 1));
    }

    #[test]
    fn test_constructors_reject_bad_params() {
        let params = CellParams {
            min_flicker_interval: 2.0,
            max_flicker_interval: 0.5,
            ..CellParams::default()
        };
        assert!(matches!(
            Board::from_grid_layout(2, 2, 1.0, params),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            Board::from_positions(2, 2, vec![Vec3::ZERO; 4], params),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_positions_rejects_wrong_length() {
        let positions = vec![Vec3::ZERO; 5];
        let err = Board::from_positions(3, 2, positions, CellParams::default()).unwrap_err();
        assert!(matches!(err, GridError::LayoutMismatch { expected: 6, actual: 5 }));
    }

    #[test]
    fn test_get_out_of_range() {
        let board = board(4, 3);
        assert!(board.get(3, 2).is_ok());
        assert!(matches!(board.get(4, 0), Err(GridError::OutOfRange { x: 4, y: 0, .. })));
        assert!(matches!(board.get(0, 3), Err(GridError::OutOfRange { .. })));
    }

    #[test]
    fn test_set_on_and_off() {
        let mut board = board(2, 2);
        board.set_on(1, 0, Element::Fire, 0.3).unwrap();
        let cell = board.get(1, 0).unwrap();
        assert!(cell.enabled);
        assert_eq!(cell.element, Element::Fire);
        assert_eq!(cell.brightness, 0.3);

        board.set_off(1, 0).unwrap();
        let cell = board.get(1, 0).unwrap();
        assert!(!cell.enabled);
        assert_eq!(cell.element, Element::None);
        assert_eq!(cell.brightness, crate::consts::OFF_BRIGHTNESS);

        assert!(board.set_on(2, 0, Element::Fire, 1.0).is_err());
    }

    #[test]
    fn test_nearest_skips_disabled() {
        let mut board = board(3, 3);
        assert!(board.nearest(Vec3::ZERO, false).is_none());
        assert_eq!(board.nearest(Vec3::ZERO, true).unwrap().coord, CellCoord::new(0, 0));

        board.set_on(2, 2, Element::Water, 1.0).unwrap();
        let nearest = board.nearest(Vec3::ZERO, false).unwrap();
        assert_eq!(nearest.coord, CellCoord::new(2, 2));
    }

    #[test]
    fn test_nearest_tie_goes_to_first() {
        let board = board(2, 2);
        // Equidistant from all four cells
        let nearest = board.nearest(Vec3::new(0.5, 0.5, 0.0), true).unwrap();
        assert_eq!(nearest.coord, CellCoord::new(0, 0));
    }

    #[test]
    fn test_all_cells_restartable() {
        let board = board(3, 2);
        let iter = board.all_cells();
        let first: Vec<_> = iter.clone().map(|c| c.coord).collect();
        let second: Vec<_> = iter.map(|c| c.coord).collect();
        assert_eq!(first, second);
        assert_eq!(first[1], CellCoord::new(1, 0));
    }

    proptest! {
        #[test]
        fn prop_all_cells_cover_board(width in 1usize..=32, height in 1usize..=32) {
            let board = board(width, height);
            let coords: HashSet<CellCoord> = board.all_cells().map(|c| c.coord).collect();
            prop_assert_eq!(board.all_cells().count(), width * height);
            prop_assert_eq!(coords.len(), width * height);
            for y in 0..height {
                for x in 0..width {
                    prop_assert!(coords.contains(&CellCoord::new(x, y)));
                    prop_assert_eq!(board.get(x, y).unwrap().coord, CellCoord::new(x, y));
                }
            }
        }
    }
}
