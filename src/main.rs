use anyhow::{bail, Context, Result};
use heritage_guide::config::Config;
use heritage_guide::context::LanguageContext;
use heritage_guide::gateway::DataGateway;
use heritage_guide::i18n::Language;
use heritage_guide::language_store::FileLanguageStore;
use heritage_guide::models::SiteQuery;
use heritage_guide::translation::{TranslatableTextSet, TranslationGateway};
use heritage_guide::view::{failure_notice, TranslationWrapper};
use std::sync::Arc;
use tracing::info;

/// Command line: `heritage-guide [--language <Name>] [<place>]`
struct Args {
    language: Option<String>,
    place: String,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut language = None;
        let mut place = None;
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--language" | "-l" => {
                    language = Some(args.next().context("--language needs a value")?);
                }
                flag if flag.starts_with('-') => bail!("Unknown option: {}", flag),
                _ => place = Some(arg),
            }
        }

        Ok(Self {
            language,
            place: place.unwrap_or_else(|| "Chennai".to_string()),
        })
    }
}

fn home_texts() -> TranslatableTextSet {
    [
        ("title", "Discover Heritage"),
        ("subtitle", "Explore historical places around you"),
        ("featured", "Featured Sites"),
        ("popular", "Popular"),
        ("search", "Search"),
        ("listen", "Listen"),
        ("map", "View on Map"),
    ]
    .into_iter()
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heritage_guide=info".parse()?),
        )
        .init();

    let args = Args::parse()?;
    let config = Config::from_env()?;
    info!("Starting heritage guide");

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let store = Arc::new(FileLanguageStore::new(&config.language_store_path));
    let translator = Arc::new(TranslationGateway::from_config(&client, &config));
    let context = LanguageContext::initialize(store, translator);

    if let Some(name) = &args.language {
        let language = Language::from_name(name)?;
        context.select_language(language);
    }
    let language = context.language();

    // Step 1: Home screen labels
    let home = TranslationWrapper::new(home_texts());
    home.resolve(&context).await;
    home.render(&context, |texts| {
        println!("== {} ({}) ==", texts.text("title"), language.native_name());
        println!("{}", texts.text("subtitle"));
        println!();
    });

    // Step 2: Search
    let gateway = DataGateway::from_config(&client, &config);
    let query = SiteQuery::new(&args.place);
    let results = gateway.search_sites(&query, language).await;
    let sites = results.data().cloned().unwrap_or_default();

    if let Some(notice) = failure_notice(&context, &results).await {
        println!("{}", notice);
        return Ok(());
    }

    let popular = home.render(&context, |texts| texts.text("popular").to_string());
    for site in &sites {
        let badge = if site.is_popular {
            format!(" [{}]", popular)
        } else {
            String::new()
        };
        println!("- {}{} ({})", site.title, badge, site.location);
    }
    info!("Found {} sites for {:?}", sites.len(), args.place);

    // Step 3: Details and location of the first featured site
    let featured = gateway.catalog().featured_sites();
    let Some(first) = featured.first() else {
        return Ok(());
    };

    let details = gateway.site_details(&first.id, language).await;
    match details.data() {
        Some(site) => {
            println!();
            println!("{}", site.title);
            println!("{}", context.translate(&site.description).await);
        }
        None => {
            if let Some(notice) = failure_notice(&context, &details).await {
                println!("{}", notice);
            }
        }
    }

    let coordinates = gateway.coordinates(&first.title, language).await;
    match coordinates.data() {
        Some(coords) => {
            let label = home.render(&context, |texts| texts.text("map").to_string());
            println!("{}: {:.4}, {:.4}", label, coords.latitude, coords.longitude);
        }
        None => {
            if let Some(notice) = failure_notice(&context, &coordinates).await {
                println!("{}", notice);
            }
        }
    }

    let report = context.gateway().metrics().report();
    info!(
        "Translations: {} remote calls, {} fallbacks",
        report.remote_calls,
        report.fallbacks()
    );
    Ok(())
}
