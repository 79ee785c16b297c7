use crate::error::{ChartError, ChartResult};

/// Linear mapping between a data domain and a pixel span starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub const UNIT: Self = Self {
        domain_start: 0.0,
        domain_end: 1.0,
    };

    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    /// Maps `value` onto `[0, span_px]`. Values outside the domain extrapolate.
    #[must_use]
    pub fn domain_to_pixel(self, value: f64, span_px: f64) -> f64 {
        let normalized = (value - self.domain_start) / self.span();
        normalized * span_px
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64, span_px: f64) -> f64 {
        if span_px == 0.0 {
            return self.domain_start;
        }
        let normalized = pixel / span_px;
        self.domain_start + normalized * self.span()
    }

    /// Converts a pixel distance into a domain distance.
    #[must_use]
    pub fn pixels_to_domain_delta(self, pixels: f64, span_px: f64) -> f64 {
        if span_px == 0.0 {
            return 0.0;
        }
        pixels / span_px * self.span()
    }
}
