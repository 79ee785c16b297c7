use std::rc::Rc;

use chrono::{TimeZone, Utc};
use plotkit::ChartError;
use plotkit::core::{
    DataBoundSeries, DataPoint, JsonRecords, LabelKind, Series, SeriesLabels,
};
use rust_decimal::Decimal;

#[test]
fn xy_series_requires_matching_lengths() {
    let err = Series::xy(vec![1.0, 2.0], vec![1.0]).expect_err("mismatch");
    assert!(matches!(err, ChartError::InvalidData(_)));

    let series = Series::xy(vec![3.0, 1.0], vec![10.0, 20.0]).expect("xy");
    assert_eq!(series.dimensions(), 2);
    assert!(!series.is_domain_sorted());
    assert_eq!(series.domain_range(), Some((1.0, 3.0)));
    assert_eq!(series.plotted_range(), Some((10.0, 20.0)));
}

#[test]
fn date_time_series_maps_times_to_unix_seconds() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date");
    let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).single().expect("date");
    let series = Series::date_time(vec![start, later], vec![4.0, 5.0]).expect("series");

    assert_eq!(series.x_value(0), Some(1_704_067_200.0));
    assert_eq!(series.x_value(1), Some(1_704_067_260.0));
    assert_eq!(series.y_value(1), Some(5.0));
    assert!(Series::date_time(vec![start], Vec::new()).is_err());
}

#[test]
fn decimal_values_convert_to_floats() {
    let values = [Decimal::new(1_25, 2), Decimal::new(-3, 0)];
    let series = Series::from_decimals(&values).expect("decimals");
    assert_eq!(series.y_value(0), Some(1.25));
    assert_eq!(series.plotted_range(), Some((-3.0, 1.25)));
}

#[test]
fn non_finite_values_are_left_out_of_ranges() {
    let series = Series::points(vec![
        DataPoint::new(0.0, 1.0),
        DataPoint::new(1.0, f64::NAN),
        DataPoint::new(2.0, -4.0),
    ]);
    assert_eq!(series.plotted_range(), Some((-4.0, 1.0)));
    assert_eq!(Series::simple(Vec::new()).plotted_range(), None);
}

#[test]
fn stored_labels_are_looked_up_by_kind() {
    let series = Series::bar(
        vec![1.0, 2.0],
        vec!["in 0".to_owned(), "in 1".to_owned()],
        Vec::new(),
        vec!["Q1".to_owned(), "Q2".to_owned()],
    );
    assert_eq!(series.label(1, LabelKind::InnerLabel).as_deref(), Some("in 1"));
    assert_eq!(series.label(0, LabelKind::XAxisLabel).as_deref(), Some("Q1"));
    assert_eq!(series.label(0, LabelKind::OuterLabel), None);

    let tooltips = SeriesLabels {
        tooltips: vec!["first".to_owned()],
        ..SeriesLabels::default()
    };
    let series = Series::simple(vec![1.0])
        .with_labels(tooltips)
        .expect("labels");
    assert_eq!(series.label(0, LabelKind::ToolTip).as_deref(), Some("first"));
}

#[test]
fn data_bound_series_reads_fields_from_records() {
    let records = JsonRecords::from_json_str(
        r#"[
            {"month": 1, "sales": 10.5, "name": "Jan"},
            {"month": 2, "sales": "12", "name": "Feb"},
            {"month": 3, "sales": null, "name": null}
        ]"#,
    )
    .expect("records");
    let bound = DataBoundSeries::new(Rc::new(records), "sales")
        .with_x_field("month")
        .with_label_field(LabelKind::XAxisLabel, "name");
    let series = Series::data_bound(bound)
        .with_supported_labels(LabelKind::XAxisLabel.into());

    assert_eq!(series.size(), 3);
    assert_eq!(series.x_value(1), Some(2.0));
    assert_eq!(series.y_value(1), Some(12.0));
    assert_eq!(series.y_value(2), None);
    assert_eq!(series.label(0, LabelKind::XAxisLabel).as_deref(), Some("Jan"));
    assert_eq!(series.label(2, LabelKind::XAxisLabel), None);
    assert_eq!(series.plotted_range(), Some((10.5, 12.0)));

    assert!(series.with_labels(SeriesLabels::default()).is_err());
    assert!(JsonRecords::from_json_str("{}").is_err());
}

#[test]
fn series_json_keeps_values_labels_and_title() {
    let series = Series::pie(
        vec![1.0, 3.0],
        vec!["a".to_owned(), "b".to_owned()],
        Vec::new(),
    )
    .with_title("Share")
    .with_emphasized([1]);

    let json = series.to_json().expect("serialize");
    let loaded = Series::from_json(&json).expect("parse");
    assert_eq!(loaded.title(), "Share");
    assert!(loaded.is_emphasized(1));
    assert_eq!(loaded.y_value(1), Some(3.0));
    assert_eq!(loaded.label(0, LabelKind::InnerLabel).as_deref(), Some("a"));
}
