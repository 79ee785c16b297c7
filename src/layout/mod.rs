mod component;
mod panel;
mod text;

pub use component::{
    Component, HorizontalAlignment, LayoutProps, VerticalAlignment, shrink_extent,
};
pub use panel::{GridLength, GridPanel, Orientation, SimplePanel, StackPanel};
pub(crate) use panel::resolve_tracks;
pub use text::TextComponent;
