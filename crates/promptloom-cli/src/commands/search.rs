use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use colored::Colorize;
use promptloom_search::{
    suggested_query, SearchAdapter, SearchOutcome, SearchSession, SUGGESTED_QUERIES,
};

use crate::context::AppContext;
use crate::render;
use crate::SearchArgs;

pub async fn run(ctx: &AppContext, args: SearchArgs) -> anyhow::Result<()> {
    let surprise = args.surprise.then(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        suggested_query(seed)
    });
    let query = surprise.or_else(|| args.query.as_deref().filter(|q| !q.trim().is_empty()));

    let Some(query) = query else {
        println!("{}", "Try one of:".cyan());
        for suggestion in SUGGESTED_QUERIES {
            println!("  {}", suggestion);
        }
        return Ok(());
    };

    let client = Arc::new(ctx.search_client()?);
    let source_name = client.source_name().to_string();
    tracing::debug!("Searching via {}", client.base_url());
    let session = SearchSession::new(client);

    println!("{}", format!("🔍 Searching {} for {:?}", source_name, query).cyan());
    let images = match session.search(query).await {
        Ok(SearchOutcome::Current(images)) => images,
        Ok(SearchOutcome::Superseded) => return Ok(()),
        Err(err) => {
            render::failure(format!("Search failed: {}", err));
            std::process::exit(1);
        }
    };

    if images.is_empty() {
        println!("{}", "No results".dimmed());
        return Ok(());
    }

    for (index, image) in images.iter().take(args.limit).enumerate() {
        println!(
            "{} {} {}",
            format!("{:>2}.", index + 1).bold(),
            image.prompt,
            format!("({}x{})", image.width, image.height).dimmed()
        );
        println!("    {}", image.preview_url().dimmed());
    }

    for position in args.save {
        let Some(image) = position.checked_sub(1).and_then(|i| images.get(i)) else {
            render::failure(format!("No result at position {}", position));
            continue;
        };
        let new = image.to_new_prompt(
            ctx.formatter.config(),
            args.aspect_ratio.as_deref(),
            args.version.as_deref(),
            &source_name,
        );
        let saved = ctx.prompts.save_prompt(new).await?;
        render::success(format!("Saved result {} as {}", position, saved.id));
    }
    Ok(())
}
