use crate::render::{Color, DashStyle, Stroke};

use super::{SeriesStyle, Theme};

/// Which index selects the theme palette entry once both styles miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteKey {
    #[default]
    Series,
    Element,
}

/// Fully resolved paint for one data element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub fill: Color,
    pub stroke: Stroke,
}

/// Per-attribute fallback: renderer-local style, then the plot style, then
/// the theme.
#[derive(Debug, Clone, Copy)]
pub struct StyleChain<'a> {
    local: Option<&'a SeriesStyle>,
    plot: Option<&'a SeriesStyle>,
    theme: &'a Theme,
    palette_key: PaletteKey,
}

impl<'a> StyleChain<'a> {
    #[must_use]
    pub fn new(
        local: Option<&'a SeriesStyle>,
        plot: Option<&'a SeriesStyle>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            local,
            plot,
            theme,
            palette_key: PaletteKey::Series,
        }
    }

    #[must_use]
    pub fn with_palette_key(mut self, key: PaletteKey) -> Self {
        self.palette_key = key;
        self
    }

    fn lookup<T>(
        &self,
        series_index: usize,
        data_index: usize,
        attribute: impl Fn(&SeriesStyle, usize, usize) -> Option<T>,
    ) -> Option<T> {
        self.local
            .and_then(|style| attribute(style, series_index, data_index))
            .or_else(|| {
                self.plot
                    .and_then(|style| attribute(style, series_index, data_index))
            })
    }

    fn palette_index(&self, series_index: usize, data_index: usize) -> usize {
        match self.palette_key {
            PaletteKey::Series => series_index,
            PaletteKey::Element => data_index,
        }
    }

    #[must_use]
    pub fn fill(&self, series_index: usize, data_index: usize) -> Color {
        self.lookup(series_index, data_index, SeriesStyle::fill)
            .unwrap_or_else(|| {
                self.theme
                    .palette_fill(self.palette_index(series_index, data_index))
            })
    }

    #[must_use]
    pub fn stroke(&self, series_index: usize, data_index: usize) -> Color {
        self.lookup(series_index, data_index, SeriesStyle::stroke)
            .unwrap_or_else(|| {
                self.theme
                    .palette_stroke(self.palette_index(series_index, data_index))
            })
    }

    #[must_use]
    pub fn stroke_thickness(&self, series_index: usize, data_index: usize) -> f64 {
        self.lookup(series_index, data_index, SeriesStyle::stroke_thickness)
            .unwrap_or(self.theme.series_stroke_thickness)
    }

    #[must_use]
    pub fn stroke_dash_style(&self, series_index: usize, data_index: usize) -> DashStyle {
        self.lookup(series_index, data_index, SeriesStyle::stroke_dash_style)
            .unwrap_or(self.theme.series_stroke_dash_style)
    }

    #[must_use]
    pub fn resolve(&self, series_index: usize, data_index: usize) -> ResolvedStyle {
        ResolvedStyle {
            fill: self.fill(series_index, data_index),
            stroke: Stroke::new(
                self.stroke(series_index, data_index),
                self.stroke_thickness(series_index, data_index),
                self.stroke_dash_style(series_index, data_index),
            ),
        }
    }
}
