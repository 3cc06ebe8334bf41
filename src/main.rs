//! owmcast - OpenWeatherMap weather from the terminal
//!
//! Fetches current weather, forecasts and the UV index for the selected
//! city, caches the raw responses in a preference file and prints them
//! using the stored display preferences.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use owmcast::api::{
    ApiConfig, CitySearch, FixedLocation, ReqwestFetcher, WeatherError, WeatherService,
};
use owmcast::cache::{DisplayPreferences, WeatherCache, WeatherPresentation, WeatherRepository};
use owmcast::cli::{Cli, Command, PrefsArgs};
use owmcast::data::{partition, CityCandidate, WeatherRecord};
use owmcast::format::{
    format_humidity, format_pressure, format_temperature, format_wind, formatter_for,
    last_update_label, rain_summary, status_bar_temperature, uv_summary, DisplayStrings,
};
use owmcast::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use owmcast::store::{KeyValueStore, PreferenceStore};

type Service = WeatherService<ReqwestFetcher>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never mix with printed weather
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store: Arc<dyn KeyValueStore> = Arc::new(open_store(cli.data_dir.as_deref()));
    let cache = Arc::new(WeatherCache::new(store));
    let strings = DisplayStrings::default();

    match &cli.command {
        Command::Current => {
            refresh_if_stale(&cli, &cache).await;
            let repository = WeatherRepository::new(cache.clone());
            print_current(&repository.current(), &strings, cli.json)?;
        }
        Command::Forecast => {
            refresh_if_stale(&cli, &cache).await;
            print_forecast(&cache, &strings, cli.json)?;
        }
        Command::Search { name } => {
            let service = build_service(&cli, &cache)?;
            match service.search_city(name).await? {
                CitySearch::Selected(city) => print_selected(&city, cli.json)?,
                CitySearch::Ambiguous(cities) => print_candidates(&cities, cli.json)?,
            }
        }
        Command::Locate { lat, lon } => {
            let service = build_service(&cli, &cache)?;
            let location = FixedLocation {
                latitude: *lat,
                longitude: *lon,
            };
            let city = service.locate_device(&location).await?;
            print_selected(&city, cli.json)?;
        }
        Command::SetCity { id } => {
            cache.select_city(*id);
            println!("Selected city {}", id);
        }
        Command::Prefs(args) => {
            update_preferences(&cache, args, cli.json)?;
        }
        Command::Watch { interval } => {
            let service = Arc::new(build_service(&cli, &cache)?);
            watch(service, Duration::from_secs((*interval).max(1)), &strings, cli.json).await?;
        }
    }

    Ok(())
}

/// Opens the preference store in `data_dir`, or the platform data directory
fn open_store(data_dir: Option<&Path>) -> PreferenceStore {
    match data_dir {
        Some(dir) => PreferenceStore::with_dir(dir.to_path_buf()),
        None => PreferenceStore::open_default().unwrap_or_else(|| {
            warn!("No data directory available, preferences will not be saved");
            PreferenceStore::in_memory()
        }),
    }
}

fn build_service(cli: &Cli, cache: &Arc<WeatherCache>) -> Result<Service, WeatherError> {
    if cli.offline {
        return Err(WeatherError::Offline);
    }
    let api_key = cli.api_key.clone().ok_or(WeatherError::MissingApiKey)?;
    let config = ApiConfig::new(api_key).with_language(cli.lang.clone());
    Ok(WeatherService::new(
        ReqwestFetcher::new(),
        config,
        cache.clone(),
    ))
}

/// Refreshes stale data unless offline; failures keep the cached data
async fn refresh_if_stale(cli: &Cli, cache: &Arc<WeatherCache>) {
    if cli.offline {
        return;
    }
    let result = match build_service(cli, cache) {
        Ok(service) => service.refresh_if_stale(Utc::now()).await.map(|_| ()),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        eprintln!("Could not refresh weather: {}", e);
    }
}

fn print_current(
    presentation: &WeatherPresentation,
    strings: &DisplayStrings,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(presentation)?);
        return Ok(());
    }

    let Some(record) = &presentation.observation else {
        println!("{}", strings.no_data);
        return Ok(());
    };
    let prefs = &presentation.preferences;

    if !record.city_name.is_empty() {
        if record.country_code.is_empty() {
            println!("{}", record.city_name);
        } else {
            println!("{}, {}", record.city_name, record.country_code);
        }
    }
    let headline = [
        format_temperature(record, &prefs.temperature_unit, prefs.round_temperature),
        record.description.clone(),
        rain_summary(
            record.rain_mm,
            record.chance_of_precipitation,
            &prefs.length_unit,
        ),
    ];
    print_joined(&headline, "  ");
    for line in [
        format_wind(record, prefs, strings),
        format_pressure(record, &prefs.pressure_unit, strings),
        format_humidity(record, strings),
    ] {
        if !line.is_empty() {
            println!("{}", line);
        }
    }
    println!("UV index: {}", uv_summary(record.uv_index, strings));
    if let Some(at) = presentation.last_update {
        println!("Updated {}", last_update_label(at, &Local::now()));
    }
    Ok(())
}

fn print_forecast(
    cache: &WeatherCache,
    strings: &DisplayStrings,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let records = cache.last_forecast().unwrap_or_default();
    let groups = partition(&records, &Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    if groups.is_empty() {
        println!("{}", strings.no_data);
        return Ok(());
    }

    let prefs = cache.display_preferences();
    for (title, entries) in [
        ("Today", &groups.today),
        ("Tomorrow", &groups.tomorrow),
        ("Later", &groups.later),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!("{}", title);
        for record in entries {
            print_forecast_entry(record, &prefs);
        }
    }
    Ok(())
}

fn print_forecast_entry(record: &WeatherRecord, prefs: &DisplayPreferences) {
    let time = record
        .observed_at
        .map(|at| at.with_timezone(&Local).format("%a %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string());
    let fields = [
        format!("  {}", time),
        format_temperature(record, &prefs.temperature_unit, prefs.round_temperature),
        record.description.clone(),
        rain_summary(
            record.rain_mm,
            record.chance_of_precipitation,
            &prefs.length_unit,
        ),
    ];
    print_joined(&fields, "  ");
}

fn print_selected(city: &CityCandidate, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(city)?);
    } else {
        println!("Selected {} ({})", describe_city(city), city.id);
    }
    Ok(())
}

fn print_candidates(cities: &[CityCandidate], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(cities)?);
        return Ok(());
    }
    println!("{} cities match; pick one with `owmcast set-city <id>`:", cities.len());
    for city in cities {
        println!("  {:>10}  {}", city.id, describe_city(city));
    }
    Ok(())
}

fn describe_city(city: &CityCandidate) -> String {
    let mut text = city.name.clone();
    if !city.country_code.is_empty() {
        text.push_str(&format!(", {}", city.country_code));
    }
    if let (Some(lat), Some(lon)) = (city.latitude, city.longitude) {
        text.push_str(&format!(" [{:.2}, {:.2}]", lat, lon));
    }
    text
}

fn update_preferences(
    cache: &WeatherCache,
    args: &PrefsArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut prefs = cache.display_preferences();
    if args.apply(&mut prefs) {
        prefs.save(cache.store().as_ref());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
        return Ok(());
    }
    println!("Temperature unit:   {}", prefs.temperature_unit);
    println!("Round temperature:  {}", prefs.round_temperature);
    println!("Pressure unit:      {}", prefs.pressure_unit);
    println!("Wind speed unit:    {}", prefs.wind_speed_unit);
    println!("Wind direction:     {}", prefs.wind_direction_format.key());
    println!("Length unit:        {}", prefs.length_unit);
    println!("Status bar:         {}", prefs.show_temperature_in_status_bar);
    println!("Notification type:  {}", prefs.notification_style.key());
    Ok(())
}

/// Keeps refreshing in the background and prints every presentation change
/// until interrupted
async fn watch(
    service: Arc<Service>,
    interval: Duration,
    strings: &DisplayStrings,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let repository = WeatherRepository::new(service.cache().clone());
    let mut subscription = repository.subscribe();
    let mut refresh = RefreshHandle::spawn(
        service,
        RefreshConfig {
            interval,
            enabled: true,
        },
    );

    loop {
        tokio::select! {
            Some(presentation) = subscription.recv() => {
                print_notification(&presentation, strings, json)?;
            }
            Some(message) = refresh.receiver.recv() => {
                if let RefreshMessage::RefreshError(e) = message {
                    eprintln!("Could not refresh weather: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            else => break,
        }
    }

    refresh.shutdown().await;
    subscription.unsubscribe();
    Ok(())
}

/// One line per presentation, laid out by the chosen notification type
fn print_notification(
    presentation: &WeatherPresentation,
    strings: &DisplayStrings,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(presentation)?);
        return Ok(());
    }
    let Some(record) = &presentation.observation else {
        println!("{}", strings.no_data);
        return Ok(());
    };

    let prefs = &presentation.preferences;
    let rendered = formatter_for(prefs.notification_style).render(record, prefs, strings, Utc::now());
    let badge = status_bar_temperature(record, prefs)
        .map(|t| format!("[{}]", t))
        .unwrap_or_default();
    let updated = presentation
        .last_update
        .map(|at| last_update_label(at, &Local::now()))
        .unwrap_or_default();
    print_joined(
        &[
            badge,
            rendered.temperature,
            rendered.description,
            rendered.wind,
            rendered.pressure,
            rendered.humidity,
            updated,
        ],
        "  ",
    );
    Ok(())
}

fn print_joined(parts: &[String], separator: &str) {
    let line = parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator);
    println!("{}", line);
}
