//! Interactive site chat over stdin
//!
//! Usage:
//!   cargo run --bin heritage-chat                # Chat about Fort St. George
//!   cargo run --bin heritage-chat -- --site 2    # Chat about Mahabalipuram
//!
//! Type `exit`, `quit` or `bye` to leave. Changing the language from another
//! process (for example `heritage-guide --language Tamil`) reloads the
//! prompts while the chat is open.

use anyhow::{bail, Context, Result};
use heritage_guide::chat::{is_exit_word, ChatSession};
use heritage_guide::config::Config;
use heritage_guide::context::LanguageContext;
use heritage_guide::gateway::DataGateway;
use heritage_guide::language_store::FileLanguageStore;
use heritage_guide::speech::{LoggingSpeech, SpeechEngine};
use heritage_guide::translation::{TranslatableTextSet, TranslationGateway};
use heritage_guide::view::{failure_notice, TranslationWrapper};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

fn parse_site_id() -> Result<String> {
    let mut args = std::env::args().skip(1);
    let mut site_id = "1".to_string();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--site" | "-s" => site_id = args.next().context("--site needs a value")?,
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(site_id)
}

fn prompt_texts() -> TranslatableTextSet {
    [
        ("prompt", "Ask a question..."),
        ("goodbye", "Thank you for exploring with us!"),
        ("language_changed", "Changing language"),
    ]
    .into_iter()
    .collect()
}

fn show_prompt(prompts: &TranslationWrapper, context: &LanguageContext) {
    let prompt = prompts.render(context, |texts| {
        format!("{} > ", texts.text("prompt"))
    });
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heritage_guide=info".parse()?),
        )
        .init();

    let site_id = parse_site_id()?;
    let config = Config::from_env()?;

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let store = Arc::new(FileLanguageStore::new(&config.language_store_path));
    let translator = Arc::new(TranslationGateway::from_config(&client, &config));
    let context = LanguageContext::initialize(store, translator);
    let gateway = DataGateway::from_config(&client, &config);

    let details = gateway.site_details(&site_id, context.language()).await;
    let Some(site) = details.data().cloned() else {
        if let Some(notice) = failure_notice(&context, &details).await {
            println!("{}", notice);
        }
        return Ok(());
    };
    info!("Opening chat for {} ({})", site.title, site.id);

    let prompts = TranslationWrapper::new(prompt_texts());
    prompts.resolve(&context).await;

    let speech = LoggingSpeech::new();
    let welcome = context
        .translate(&format!(
            "Hello! I'm your guide for {}. Ask me anything about its history, timings, or nearby attractions.",
            site.title
        ))
        .await;
    let mut session = ChatSession::new(&site.title, welcome);
    if !site.image.is_empty() {
        session = session.with_welcome_image(&site.image);
    }
    for turn in session.turns() {
        println!("{}", turn.text);
        if let Some(image) = &turn.image {
            println!("[{}]", image);
        }
        speech.speak(&turn.text, context.language());
    }

    let (changes_tx, mut changes_rx) = mpsc::unbounded_channel();
    let watcher = context.watch(config.staleness_poll_interval, move |change| {
        let _ = changes_tx.send(change);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show_prompt(&prompts, &context);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let question = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                if is_exit_word(&question) {
                    break;
                }
                if question.trim().is_empty() {
                    show_prompt(&prompts, &context);
                    continue;
                }

                speech.stop_speaking();
                let reply = session.ask(&gateway, &context, &question).await;
                println!("{}", reply.text);
                speech.speak(&reply.text, context.language());
                show_prompt(&prompts, &context);
            }
            Some(change) = changes_rx.recv() => {
                info!("Language changed to {}, reloading prompts", change.current);
                prompts.resolve(&context).await;
                let notice = prompts.render(&context, |texts| texts.text("language_changed").to_string());
                println!();
                println!("{} ({})", notice, change.current.native_name());
                show_prompt(&prompts, &context);
            }
        }
    }

    watcher.stop();
    speech.stop_speaking();
    let goodbye = prompts.render(&context, |texts| texts.text("goodbye").to_string());
    println!("{}", goodbye);
    info!("Chat closed after {} turns", session.turns().len());
    Ok(())
}
