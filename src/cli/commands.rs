use std::rc::Rc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{AppContext, FreshetError, Result};
use crate::presenter::ConsoleView;
use crate::store::Store;
use crate::validation::validate;

/// Subscribe to `urls`, then poll until Ctrl-C. Lines typed on stdin are
/// submitted as additional feeds while polling runs.
///
/// Must run inside a [`tokio::task::LocalSet`].
pub async fn watch(ctx: Rc<AppContext>, urls: &[String]) -> Result<()> {
    ctx.store.subscribe(ConsoleView::new().into_listener());

    for url in urls {
        // Failures were already reported through the store.
        let _ = ctx.submissions.submit(url).await;
    }

    let scheduler = ctx.scheduler();
    let handle = scheduler.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        handle.stop();
    });

    let input_ctx = ctx.clone();
    let input = tokio::task::spawn_local(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            let _ = input_ctx.submissions.submit(&line).await;
        }
    });

    println!(
        "Watching {} feeds every {}ms. Type a feed URL to add it, Ctrl-C to quit.",
        ctx.store.get_all_feeds().len(),
        ctx.config.polling.interval_ms
    );
    scheduler.run().await;
    input.abort();

    println!(
        "Stopped: {} feeds, {} posts",
        ctx.store.get_all_feeds().len(),
        ctx.store.get_all_posts().len()
    );
    Ok(())
}

/// Fetch and parse a feed once and print what it contains.
pub async fn check(ctx: &AppContext, url: &str) -> Result<()> {
    let url = url.trim();
    validate(url, &Default::default()).map_err(FreshetError::Validation)?;

    let (meta, items) = ctx.engine.load(url).await?;

    println!("{}", meta.title.as_deref().unwrap_or(url));
    if let Some(description) = meta.description {
        println!("  {}", description);
    }
    println!("{} items", items.len());

    for item in items {
        let title = item
            .title_key()
            .or(item.description_key())
            .unwrap_or("(Untitled)");
        let date = item
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        println!("  {} {} {}", date, title, item.link);
    }

    Ok(())
}
