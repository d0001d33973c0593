//! # Visual Collaborator
//!
//! The decorative layer sits outside the simulation. The core only pushes
//! notifications into it and never reads anything back, so every method has
//! a no-op default and `NoDecorations` stands in when no layer is attached.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::CellCoord;
use crate::dig::DamageStage;

/// Receiver of cosmetic notifications from the core.
pub trait DecorationSink {
    /// A cell broke during play.
    fn place_decoration(&mut self, _cell: CellCoord) {}

    /// A cell was carved during generation.
    fn place_decoration_immediate(&mut self, _cell: CellCoord) {}

    /// A solid cell moved to a different damage stage.
    fn damage_stage_changed(&mut self, _cell: CellCoord, _stage: DamageStage) {}
}

/// The absent visual layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDecorations;

impl DecorationSink for NoDecorations {}

/// Sink that records every notification, for headless inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordedDecorations {
    /// Cells passed to `place_decoration`.
    pub dug: Vec<CellCoord>,
    /// Cells passed to `place_decoration_immediate`.
    pub carved: Vec<CellCoord>,
    /// Damage stage changes in arrival order.
    pub stages: Vec<(CellCoord, DamageStage)>,
}

impl DecorationSink for RecordedDecorations {
    fn place_decoration(&mut self, cell: CellCoord) {
        self.dug.push(cell);
    }

    fn place_decoration_immediate(&mut self, cell: CellCoord) {
        self.carved.push(cell);
    }

    fn damage_stage_changed(&mut self, cell: CellCoord, stage: DamageStage) {
        self.stages.push((cell, stage));
    }
}

impl<S: DecorationSink + ?Sized> DecorationSink for Box<S> {
    fn place_decoration(&mut self, cell: CellCoord) {
        (**self).place_decoration(cell);
    }

    fn place_decoration_immediate(&mut self, cell: CellCoord) {
        (**self).place_decoration_immediate(cell);
    }

    fn damage_stage_changed(&mut self, cell: CellCoord, stage: DamageStage) {
        (**self).damage_stage_changed(cell, stage);
    }
}

/// Shared handle, so the caller can inspect a sink after handing it to a
/// `World`.
impl<S: DecorationSink> DecorationSink for Rc<RefCell<S>> {
    fn place_decoration(&mut self, cell: CellCoord) {
        self.borrow_mut().place_decoration(cell);
    }

    fn place_decoration_immediate(&mut self, cell: CellCoord) {
        self.borrow_mut().place_decoration_immediate(cell);
    }

    fn damage_stage_changed(&mut self, cell: CellCoord, stage: DamageStage) {
        self.borrow_mut().damage_stage_changed(cell, stage);
    }
}
