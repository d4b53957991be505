use climate_forecast::output;
use climate_forecast::{
    DataLoader, EnsembleForecaster, ForecastError, ForecastSummary, ForecasterConfig,
};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::process;

const USAGE: &str = "Usage: climate-forecast <data.csv> [--fields F1,F2] [--horizon N] \
[--insight FILE] [--config FILE] [--summary]";

#[derive(Debug)]
struct Options {
    data: String,
    fields: Vec<String>,
    horizon: usize,
    insight: Option<String>,
    config: Option<String>,
    summary: bool,
}

fn parse_args(args: &[String]) -> Result<Options, ForecastError> {
    let mut data = None;
    let mut fields = Vec::new();
    let mut horizon = 7;
    let mut insight = None;
    let mut config = None;
    let mut summary = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next().cloned().ok_or_else(|| {
                ForecastError::InvalidParameter(format!("{} needs a value", flag))
            })
        };
        match arg.as_str() {
            "--fields" => {
                fields = value("--fields")?
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
            }
            "--horizon" => {
                let raw = value("--horizon")?;
                horizon = raw.parse().map_err(|_| {
                    ForecastError::InvalidParameter(format!("Invalid horizon '{}'", raw))
                })?;
            }
            "--insight" => insight = Some(value("--insight")?),
            "--config" => config = Some(value("--config")?),
            "--summary" => summary = true,
            other if other.starts_with("--") => {
                return Err(ForecastError::InvalidParameter(format!(
                    "Unknown option '{}'",
                    other
                )));
            }
            other => data = Some(other.to_string()),
        }
    }

    let data = data.ok_or_else(|| ForecastError::InvalidParameter(USAGE.to_string()))?;
    Ok(Options {
        data,
        fields,
        horizon,
        insight,
        config,
        summary,
    })
}

fn run(options: Options) -> Result<(), ForecastError> {
    let config = match &options.config {
        Some(path) => ForecasterConfig::from_file(path)?,
        None => ForecasterConfig::default(),
    };
    let insight = match &options.insight {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let series = DataLoader::from_csv(&options.data)?;
    let fields = if options.fields.is_empty() {
        series.field_names()
    } else {
        options.fields
    };
    for field in &fields {
        output::check_field_name(field)?;
    }
    info!(
        "Loaded {} observations from {}; forecasting {:?} for {} days",
        series.len(),
        options.data,
        fields,
        options.horizon
    );

    let forecaster = EnsembleForecaster::new(config)?;
    let forecasts = forecaster.forecast_fields(&series, &fields, options.horizon, &insight);

    println!("{}", output::to_json(&forecasts)?);

    if options.summary {
        let summaries: BTreeMap<&str, ForecastSummary> = forecasts
            .iter()
            .filter_map(|(field, points)| {
                ForecastSummary::summarize(points).map(|summary| (field.as_str(), summary))
            })
            .collect();
        for (field, summary) in &summaries {
            println!("{}", field);
            print!("{}", summary);
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return;
    }

    let result = parse_args(&args).and_then(run);
    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
