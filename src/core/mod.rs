pub mod axis;
pub mod geometry;
pub mod primitives;
pub mod scale;
pub mod series;
pub mod types;

pub use axis::{Axis, AxisId, AxisSet, IntervalIter, MAX_INTERVAL_TICKS, NumberFormat};
pub use geometry::{Margins, Point, Rect, Size, point_in_pie, point_in_poly};
pub use scale::LinearScale;
pub use series::{
    DataBoundSeries, DataSource, JsonRecords, LabelFormatter, LabelKind, LabelKinds, Series,
    SeriesData, SeriesLabels, SeriesRef,
};
pub use types::{DataPoint, Viewport};
