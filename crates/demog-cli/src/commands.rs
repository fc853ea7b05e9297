use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info_span;

use demog_map::{Crosswalk, JoinReport, join_by_country_code, un_keyed_tables};
use demog_model::{CodeKind, CountryCode, IndicatorTable, SourceRegistry};
use demog_normalize::{available_countries, extract_demography, extract_series};
use demog_store::{SourceSelection, TableQuery, TableStore, load_csv_directory, load_sources};

use demog_cli::render::{
    catalog_table, frame_table, join_table, load_summary_table, series_plain, series_table,
    sources_table,
};

use crate::cli::{
    CountryArgs, IndicatorArgs, LoadArgs, LoadCsvArgs, MapArgs, QueryArgs, SeriesArgs,
};

fn open_store(root: &Path) -> Result<TableStore> {
    TableStore::open(root).with_context(|| format!("open store {}", root.display()))
}

fn indicator_table(args: &IndicatorArgs) -> IndicatorTable {
    match args.state {
        Some(state) => IndicatorTable::new(args.indicator, state.into()),
        None => args.indicator.default_table(),
    }
}

/// Translates `country` into the code space `table` is keyed by.
fn resolve_country(
    store: &TableStore,
    table: &IndicatorTable,
    country: &CountryCode,
) -> Result<CountryCode> {
    if country.kind() == table.code_kind() {
        return Ok(country.clone());
    }
    let crosswalk = Crosswalk::build(store).context("build crosswalk")?;
    let translated = match (country, table.code_kind()) {
        (CountryCode::Iso3(iso3), CodeKind::Un) => crosswalk.un_code(iso3).map(CountryCode::Un),
        (CountryCode::Un(code), CodeKind::Iso3) => {
            crosswalk.iso3(*code).cloned().map(CountryCode::Iso3)
        }
        _ => None,
    };
    translated.ok_or_else(|| {
        anyhow!(
            "country {country} has no {} code in the crosswalk",
            table.code_kind()
        )
    })
}

pub fn run_sources() -> Result<()> {
    let registry = SourceRegistry::standard().context("source registry")?;
    println!("{}", sources_table(&registry));
    Ok(())
}

pub fn run_load(store_root: &Path, args: &LoadArgs) -> Result<()> {
    let registry = SourceRegistry::standard().context("source registry")?;
    let mut store = open_store(store_root)?;
    let selection = if args.sources.is_empty() {
        SourceSelection::All
    } else {
        SourceSelection::Only(&args.sources)
    };
    let summary = load_sources(&mut store, &registry, &args.input_dir, selection)
        .with_context(|| format!("load sources from {}", args.input_dir.display()))?;
    println!("{}", load_summary_table(&summary));
    Ok(())
}

pub fn run_load_csv(store_root: &Path, args: &LoadCsvArgs) -> Result<()> {
    let mut store = open_store(store_root)?;
    let summary = load_csv_directory(&mut store, &args.input_dir)
        .with_context(|| format!("load CSV files from {}", args.input_dir.display()))?;
    println!("{}", load_summary_table(&summary));
    Ok(())
}

pub fn run_map(store_root: &Path, args: &MapArgs) -> Result<()> {
    let mut store = open_store(store_root)?;
    let crosswalk = Crosswalk::build(&store).context("build crosswalk")?;
    let tables: Vec<String> = if args.tables.is_empty() {
        un_keyed_tables().into_iter().map(str::to_string).collect()
    } else {
        args.tables.clone()
    };

    let mut reports: Vec<JoinReport> = Vec::with_capacity(tables.len());
    for table in &tables {
        let span = info_span!("map", table = %table);
        let _guard = span.enter();
        let report = join_by_country_code(&mut store, table, &crosswalk)
            .with_context(|| format!("map {table}"))?;
        reports.push(report);
    }
    println!("{}", join_table(&reports));
    Ok(())
}

pub fn run_tables(store_root: &Path) -> Result<()> {
    let store = open_store(store_root)?;
    println!("{}", catalog_table(store.tables()));
    Ok(())
}

pub fn run_query(store_root: &Path, args: &QueryArgs) -> Result<()> {
    let store = open_store(store_root)?;
    let mut query = TableQuery::new(args.table.as_str());
    if let Some((column, value)) = &args.filter {
        query = query.filter_eq(column.as_str(), value.as_str());
    }
    if !args.columns.is_empty() {
        query = query.columns(args.columns.iter().map(String::as_str));
    }
    let df = store
        .query(&query)
        .with_context(|| format!("query {}", args.table))?;
    println!("{}", frame_table(&df, args.limit));
    if df.height() > args.limit {
        println!("({} of {} rows shown)", args.limit, df.height());
    }
    Ok(())
}

pub fn run_series(store_root: &Path, args: &SeriesArgs) -> Result<()> {
    let store = open_store(store_root)?;
    let table = indicator_table(&args.target.indicator);
    let country = resolve_country(&store, &table, &args.target.country)?;
    let series = extract_series(&store, table, &country)
        .with_context(|| format!("extract {} for {country}", table.indicator))?;
    if args.plain {
        println!("{}", series_plain(&series));
    } else if series.is_empty() {
        println!("no data for {country} in {}", table.table_name());
    } else {
        println!("{}", series_table(&series));
    }
    Ok(())
}

pub fn run_demography(store_root: &Path, args: &CountryArgs) -> Result<()> {
    let store = open_store(store_root)?;
    let table = indicator_table(&args.indicator);
    let country = resolve_country(&store, &table, &args.country)?;
    let frame = extract_demography(&store, table, &country)
        .with_context(|| format!("reshape {} for {country}", table.indicator))?;
    if frame.is_empty() {
        println!("no data for {country} in {}", table.table_name());
    } else {
        println!("{}", frame_table(&frame.data, usize::MAX));
    }
    Ok(())
}

pub fn run_countries(store_root: &Path, args: &IndicatorArgs) -> Result<()> {
    let store = open_store(store_root)?;
    let table = indicator_table(args);
    let countries = available_countries(&store, table)
        .with_context(|| format!("list countries in {}", table.table_name()))?;
    for code in countries {
        println!("{code}");
    }
    Ok(())
}
