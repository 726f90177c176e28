use std::sync::Arc;

use feedflow::api::{AddFeedSource, RssConfig};
use feedflow::{ApiClient, Config, FeedStore, GroupBy, MergePolicy, ReadLedger, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Only show warnings and errors by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config = Config::load()?;
    let client = Arc::new(ApiClient::new(&config));

    // Register a subscription and exit.
    if args.len() >= 4 && args[1] == "--add" {
        let id = client
            .add_source(AddFeedSource {
                name: args[2].clone(),
                rss: RssConfig {
                    url: Some(args[3].clone()),
                    rsshub_route_path: None,
                },
                interval: Some("1h".to_string()),
                labels: None,
            })
            .await?;
        println!("Added source #{id}");
        return Ok(());
    }

    // Print filter facets and exit.
    if args.len() >= 2 && args[1] == "--facets" {
        let options = client.sources_options().await?;
        println!("Categories: {}", options.categories.join(", "));
        println!("Sources:    {}", options.sources.join(", "));
        return Ok(());
    }

    let ledger = ReadLedger::new(&config.read_ledger_path);
    let mut store = FeedStore::new(client, ledger, MergePolicy::default(), config.page_size);

    store.load_initial().await;
    if let Some(error) = store.error() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }

    if let Some(i) = args.iter().position(|a| a == "--search") {
        if let Some(query) = args.get(i + 1) {
            store.set_search_query(Some(query.clone()));
        }
    }

    if let Some(i) = args.iter().position(|a| a == "--group") {
        let mode = match args.get(i + 1).map(String::as_str) {
            Some("category") => GroupBy::Category,
            Some("source") => GroupBy::Source,
            Some("hour") => GroupBy::Hour,
            _ => GroupBy::None,
        };
        store.set_group_by(mode);
    }

    for (key, bucket) in store.grouped() {
        println!("== {key} ({}) ==", bucket.len());
        for article in bucket {
            let marker = if store.read_links().contains(&article.link) {
                "*"
            } else {
                " "
            };
            println!(
                "{marker} {}  [{}]  {}",
                article.published_at.format("%Y-%m-%d %H:%M"),
                article.source,
                article.title
            );
        }
    }

    if store.pagination().has_more {
        println!("(more articles available)");
    }

    Ok(())
}
