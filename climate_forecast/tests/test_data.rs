use chrono::NaiveDate;
use climate_forecast::data::{following_days, format_date, parse_date};
use climate_forecast::{DataLoader, ForecastError, Observation, ObservationSeries};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_date_keys() {
    assert_eq!(parse_date("20240229").unwrap(), date(2024, 2, 29));
    assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
    assert_eq!(parse_date(" 20231231 ").unwrap(), date(2023, 12, 31));
    assert!(parse_date("20230229").is_err());
    assert!(parse_date("yesterday").is_err());

    assert_eq!(format_date(date(2024, 3, 5)), "20240305");
}

#[test]
fn test_following_days_cross_month_and_year() {
    let days = following_days(date(2023, 12, 30), 3).unwrap();
    assert_eq!(
        days,
        vec![date(2023, 12, 31), date(2024, 1, 1), date(2024, 1, 2)]
    );
    assert!(following_days(date(2023, 12, 30), 0).unwrap().is_empty());
}

#[test]
fn test_observation_fields() {
    let observation = Observation::new(date(2024, 1, 1))
        .with_field("T2M", Some(4.5))
        .with_field("PRECTOT", None);

    assert_eq!(observation.value("T2M"), Some(4.5));
    assert_eq!(observation.value("PRECTOT"), None);
    assert_eq!(observation.value("WS2M"), None);
}

#[test]
fn test_series_requires_increasing_dates() {
    let ordered = vec![
        Observation::new(date(2024, 1, 1)),
        Observation::new(date(2024, 1, 3)),
    ];
    assert!(ObservationSeries::new(ordered).is_ok());

    let duplicate = vec![
        Observation::new(date(2024, 1, 1)),
        Observation::new(date(2024, 1, 1)),
    ];
    assert!(matches!(
        ObservationSeries::new(duplicate),
        Err(ForecastError::DataError(_))
    ));

    let reversed = vec![
        Observation::new(date(2024, 1, 2)),
        Observation::new(date(2024, 1, 1)),
    ];
    assert!(ObservationSeries::new(reversed).is_err());
}

#[test]
fn test_series_extraction() {
    let series = ObservationSeries::new(vec![
        Observation::new(date(2024, 1, 1))
            .with_field("T2M", Some(1.0))
            .with_field("RH2M", Some(70.0)),
        Observation::new(date(2024, 1, 2)).with_field("T2M", None),
        Observation::new(date(2024, 1, 5)).with_field("T2M", Some(-3.0)),
    ])
    .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values_for("T2M"), vec![1.0, -3.0]);
    assert_eq!(series.values_for("RH2M"), vec![70.0]);
    assert!(series.values_for("WS2M").is_empty());
    assert_eq!(series.field_names(), vec!["RH2M", "T2M"]);
    assert_eq!(series.last_date(), Some(date(2024, 1, 5)));
    assert!(series.has_field("RH2M"));
    assert!(!series.has_field("WS2M"));
}

#[test]
fn test_from_values() {
    let series = ObservationSeries::from_values(date(2024, 2, 27), "T2M", &[1.0, 2.0, 3.0]).unwrap();

    assert_eq!(series.last_date(), Some(date(2024, 2, 29)));
    assert_eq!(series.values_for("T2M"), vec![1.0, 2.0, 3.0]);
    assert!(ObservationSeries::from_values(date(2024, 1, 1), "T2M", &[])
        .unwrap()
        .is_empty());
}

#[test]
fn test_load_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "DATE,T2M,PRECTOT").unwrap();
    writeln!(file, "20240101,3.5,0.0").unwrap();
    writeln!(file, "20240102,,1.25").unwrap();
    writeln!(file, "2024-01-03, 4.0 ,").unwrap();
    writeln!(file, "20240104,-999,2.0").unwrap();

    let series = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series.field_names(), vec!["PRECTOT", "T2M"]);
    // The sentinel is the upstream collaborator's concern and stays a number here.
    assert_eq!(series.values_for("T2M"), vec![3.5, 4.0, -999.0]);
    assert_eq!(series.values_for("PRECTOT"), vec![0.0, 1.25, 2.0]);
    assert_eq!(series.last_date(), Some(date(2024, 1, 4)));
}

#[test]
fn test_load_csv_errors() {
    let bad_number = "date,T2M\n20240101,warm\n";
    assert!(matches!(
        DataLoader::from_reader(bad_number.as_bytes()),
        Err(ForecastError::DataError(_))
    ));

    let bad_date = "date,T2M\n2024/01/01,1.0\n";
    assert!(matches!(
        DataLoader::from_reader(bad_date.as_bytes()),
        Err(ForecastError::DateError(_))
    ));

    let unordered = "date,T2M\n20240102,1.0\n20240101,2.0\n";
    assert!(DataLoader::from_reader(unordered.as_bytes()).is_err());

    let ragged = "date,T2M\n20240101,1.0,2.0\n";
    assert!(matches!(
        DataLoader::from_reader(ragged.as_bytes()),
        Err(ForecastError::CsvError(_))
    ));

    assert!(matches!(
        DataLoader::from_csv("/nonexistent/climate.csv"),
        Err(ForecastError::IoError(_))
    ));
}
