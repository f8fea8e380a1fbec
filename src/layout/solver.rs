use crate::foundation::core::{Axis, Position, Size};
use crate::foundation::error::{WireError, WireResult};
use crate::options::Direction;

/// Canvas size and one top-left placement per input image, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Output canvas size.
    pub canvas: Size,
    /// Placement of image `i` at index `i`.
    pub placements: Vec<Position>,
}

/// Pure layout rules over a list of image extents.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSolver<'a> {
    sizes: &'a [Size],
    direction: Direction,
    gap: u32,
}

impl<'a> LayoutSolver<'a> {
    /// Solver for `sizes` stacked along `direction` with `gap` pixels in between.
    pub fn new(sizes: &'a [Size], direction: Direction, gap: u32) -> Self {
        Self {
            sizes,
            direction,
            gap,
        }
    }

    /// Sum of the extents of images `[0, upto)` along `axis`, with `gap` between each consecutive
    /// pair. No gap is added before the first image.
    pub fn computed_size(&self, axis: Axis, upto: usize) -> WireResult<u32> {
        let mut total = 0u32;
        for (i, s) in self.sizes.iter().take(upto).enumerate() {
            let step = if i == 0 {
                Some(s.along(axis))
            } else {
                s.along(axis).checked_add(self.gap)
            };
            total = step
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| WireError::validation("canvas extent overflows u32"))?;
        }
        Ok(total)
    }

    /// Largest single extent along `axis`.
    pub fn static_size(&self, axis: Axis) -> u32 {
        self.sizes.iter().map(|s| s.along(axis)).max().unwrap_or(0)
    }

    /// Output canvas size.
    pub fn canvas(&self) -> WireResult<Size> {
        let main = self.direction.main_axis();
        let cross = self.direction.cross_axis();
        let along = self.computed_size(main, self.sizes.len())?;
        let across = self.static_size(cross);
        Ok(match main {
            Axis::Width => Size::new(along, across),
            Axis::Height => Size::new(across, along),
        })
    }

    /// Top-left placement of image `i`.
    ///
    /// The cross-axis offset is always 0: smaller images hug the top (horizontal) or left
    /// (vertical) edge instead of being centred.
    pub fn placement(&self, i: usize) -> WireResult<Position> {
        if i == 0 {
            return Ok(Position::new(0, 0));
        }
        let main = self.direction.main_axis();
        let offset = self
            .computed_size(main, i)?
            .checked_add(self.gap)
            .ok_or_else(|| WireError::validation("placement offset overflows u32"))?;
        Ok(match main {
            Axis::Width => Position::new(offset, 0),
            Axis::Height => Position::new(0, offset),
        })
    }

    /// Canvas size plus every placement.
    pub fn solve(&self) -> WireResult<Layout> {
        if self.sizes.is_empty() {
            return Err(WireError::validation("layout needs at least one image"));
        }
        let canvas = self.canvas()?;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(WireError::validation(format!(
                "canvas would be {}x{}; every image must have a non-zero size",
                canvas.width, canvas.height
            )));
        }
        let placements = (0..self.sizes.len())
            .map(|i| self.placement(i))
            .collect::<WireResult<Vec<_>>>()?;
        Ok(Layout { canvas, placements })
    }
}

/// Convenience wrapper around [`LayoutSolver::solve`].
pub fn solve_layout(sizes: &[Size], direction: Direction, gap: u32) -> WireResult<Layout> {
    LayoutSolver::new(sizes, direction, gap).solve()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
