use std::cell::RefCell;
use std::rc::Rc;

use plotkit::collections::{CollectionChange, ObservableCollection};
use plotkit::core::{Series, Viewport};
use plotkit::render::NullRenderer;
use plotkit::renderers::{BarLayout, ScatterRenderer, SeriesRenderer};
use plotkit::{Chart, ChartConfig, ChartError, ChartKind};

#[test]
fn every_mutation_is_reported_in_order() {
    let mut items = ObservableCollection::from_vec(vec!['a', 'b']);
    assert!(!items.has_pending_changes());

    assert_eq!(items.push('c'), CollectionChange::Added { index: 2 });
    items.insert(0, 'z').expect("insert at front");
    let (removed, _) = items.remove(1).expect("remove");
    assert_eq!(removed, 'a');
    let (previous, _) = items.replace(0, 'y').expect("replace");
    assert_eq!(previous, 'z');
    items.update(1, |item| *item = 'B').expect("update");
    assert_eq!(items.as_slice(), &['y', 'B', 'c']);

    assert_eq!(
        items.take_changes(),
        vec![
            CollectionChange::Added { index: 2 },
            CollectionChange::Added { index: 0 },
            CollectionChange::Removed { index: 1 },
            CollectionChange::Replaced { index: 0 },
            CollectionChange::Replaced { index: 1 },
        ]
    );
    assert!(items.take_changes().is_empty());

    assert_eq!(items.clear(), CollectionChange::Cleared { previous_len: 3 });
    assert!(items.is_empty());
}

#[test]
fn out_of_range_mutations_fail_without_side_effects() {
    let mut items: ObservableCollection<u32> = (0..3).collect();

    assert!(matches!(items.insert(4, 9), Err(ChartError::InvalidData(_))));
    assert!(items.remove(3).is_err());
    assert!(items.replace(7, 1).is_err());
    assert!(items.update(3, |item| *item += 1).is_err());

    assert_eq!(items.len(), 3);
    assert!(!items.has_pending_changes());
}

#[test]
fn subscribers_see_changes_until_unsubscribed() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut items = ObservableCollection::new();
    let sink = Rc::clone(&seen);
    let id = items.subscribe(move |change| sink.borrow_mut().push(*change));

    items.push(1);
    items.push(2);
    assert!(items.unsubscribe(id));
    assert!(!items.unsubscribe(id));
    items.push(3);

    assert_eq!(
        *seen.borrow(),
        vec![
            CollectionChange::Added { index: 0 },
            CollectionChange::Added { index: 1 },
        ]
    );
    assert_eq!(items.take_changes().len(), 3);
}

#[test]
fn adding_a_renderer_remeasures_axes() {
    let config = ChartConfig::new(Viewport::new(300, 200), ChartKind::Bar);
    let mut chart = Chart::bar_chart(
        NullRenderer::default(),
        &config,
        vec![Rc::new(Series::simple(vec![1.0, 2.0]))],
    )
    .expect("bar chart");
    chart.update_layout();
    let y_axis = chart.plot().as_cartesian().expect("cartesian").y_axis();
    assert_eq!(chart.axes().get(y_axis).expect("y").effective_range(), (0.0, 2.0));

    chart
        .plot_mut()
        .as_cartesian_mut()
        .expect("cartesian")
        .renderers_mut()
        .push(ScatterRenderer::new([Rc::new(Series::simple(vec![10.0]))]).into());
    chart.update_layout();

    assert_eq!(chart.axes().get(y_axis).expect("y").effective_range(), (0.0, 10.0));
}

#[test]
fn switching_bar_layout_remeasures_axes() {
    let config = ChartConfig::new(Viewport::new(300, 200), ChartKind::Bar);
    let mut chart = Chart::bar_chart(
        NullRenderer::default(),
        &config,
        vec![
            Rc::new(Series::simple(vec![2.0, 1.0])),
            Rc::new(Series::simple(vec![3.0, -1.0])),
        ],
    )
    .expect("bar chart");
    chart.update_layout();
    let y_axis = chart.plot().as_cartesian().expect("cartesian").y_axis();
    assert_eq!(chart.axes().get(y_axis).expect("y").effective_range(), (-1.0, 3.0));

    let plot = chart.plot_mut().as_cartesian_mut().expect("cartesian");
    if let Some(SeriesRenderer::Bar(bars)) = plot.renderers_mut().get_mut(0) {
        bars.set_layout(BarLayout::Stack);
    }
    chart.update_layout();

    assert_eq!(chart.axes().get(y_axis).expect("y").effective_range(), (-1.0, 5.0));
}
