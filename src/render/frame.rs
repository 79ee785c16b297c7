use crate::core::{Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    EllipsePrimitive, LinePrimitive, PieSlicePrimitive, PolygonPrimitive, PolylinePrimitive,
    RectPrimitive, TextPrimitive,
};

/// One entry of a frame's ordered display list.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line(LinePrimitive),
    Polyline(PolylinePrimitive),
    Polygon(PolygonPrimitive),
    Rect(RectPrimitive),
    Ellipse(EllipsePrimitive),
    PieSlice(PieSlicePrimitive),
    Text(TextPrimitive),
    PushClip(Rect),
    PopClip,
}

/// Per-kind primitive counts of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub lines: usize,
    pub polylines: usize,
    pub polygons: usize,
    pub rects: usize,
    pub ellipses: usize,
    pub pie_slices: usize,
    pub texts: usize,
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Commands are kept in paint order: later commands draw on top of earlier
/// ones. Clip regions nest and must be balanced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.commands.push(DrawCommand::Line(line));
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.commands.push(DrawCommand::Rect(rect));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.commands.push(DrawCommand::Text(text));
        self
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn pie_slices(&self) -> impl Iterator<Item = &PieSlicePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::PieSlice(slice) => Some(slice),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &PolylinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Polyline(polyline) => Some(polyline),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &PolygonPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Polygon(polygon) => Some(polygon),
            _ => None,
        })
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        let mut stats = FrameStats::default();
        for command in &self.commands {
            match command {
                DrawCommand::Line(_) => stats.lines += 1,
                DrawCommand::Polyline(_) => stats.polylines += 1,
                DrawCommand::Polygon(_) => stats.polygons += 1,
                DrawCommand::Rect(_) => stats.rects += 1,
                DrawCommand::Ellipse(_) => stats.ellipses += 1,
                DrawCommand::PieSlice(_) => stats.pie_slices += 1,
                DrawCommand::Text(_) => stats.texts += 1,
                DrawCommand::PushClip(_) | DrawCommand::PopClip => {}
            }
        }
        stats
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let mut clip_depth = 0_usize;
        for command in &self.commands {
            match command {
                DrawCommand::Line(line) => line.validate()?,
                DrawCommand::Polyline(polyline) => polyline.validate()?,
                DrawCommand::Polygon(polygon) => polygon.validate()?,
                DrawCommand::Rect(rect) => rect.validate()?,
                DrawCommand::Ellipse(ellipse) => ellipse.validate()?,
                DrawCommand::PieSlice(slice) => slice.validate()?,
                DrawCommand::Text(text) => text.validate()?,
                DrawCommand::PushClip(_) => clip_depth += 1,
                DrawCommand::PopClip => {
                    clip_depth = clip_depth.checked_sub(1).ok_or_else(|| {
                        ChartError::Render("clip pop without matching push".to_owned())
                    })?;
                }
            }
        }
        if clip_depth != 0 {
            return Err(ChartError::Render(format!(
                "{clip_depth} clip region(s) left open"
            )));
        }

        Ok(())
    }

    /// True when the frame paints nothing. Clip commands alone do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands
            .iter()
            .all(|command| matches!(command, DrawCommand::PushClip(_) | DrawCommand::PopClip))
    }
}
