use colored::Colorize;
use promptloom_core::analyze_prompt;
use promptloom_store::{NewPrompt, PromptFilter, PromptPatch, PromptSource};

use crate::context::AppContext;
use crate::render;
use crate::PromptCommands;

pub async fn run(ctx: &AppContext, command: PromptCommands) -> anyhow::Result<()> {
    let store = &ctx.prompts;

    match command {
        PromptCommands::List {
            query,
            group,
            ungrouped,
            favorites,
            sort,
        } => {
            let mut filter = PromptFilter::new().sorted_by(sort);
            if let Some(query) = query {
                filter = filter.with_query(query);
            }
            if let Some(group) = group {
                filter = filter.with_group(group);
            }
            if favorites {
                filter = filter.favorites_only();
            }

            let mut prompts = store.filter_prompts(&filter).await?;
            if ungrouped {
                prompts.retain(|p| p.group_id.is_none());
            }

            if prompts.is_empty() {
                println!("{}", "No prompts found".dimmed());
                return Ok(());
            }
            let groups = store.list_groups().await?;
            for prompt in &prompts {
                render::prompt_line(prompt, &groups);
            }
        }
        PromptCommands::Save {
            text,
            title,
            group,
            tags,
            favorite,
        } => {
            let mut new = NewPrompt::new(text)
                .with_source(PromptSource::Imported)
                .with_tags(tags);
            if let Some(title) = title {
                new = new.with_title(title);
            }
            if let Some(group) = group {
                new = new.with_group(group);
            }
            if favorite {
                new = new.favorite();
            }
            let saved = store.save_prompt(new).await?;
            render::success(format!("Saved as {}", saved.id));
        }
        PromptCommands::Show { id } => {
            let Some(prompt) = store.get_prompt(&id).await? else {
                render::failure(format!("Prompt not found: {}", id));
                std::process::exit(1);
            };
            let groups = store.list_groups().await?;
            render::prompt_detail(&prompt, &groups);
            println!();
            render::analysis(&analyze_prompt(&prompt.prompt_text));
        }
        PromptCommands::Update {
            id,
            text,
            title,
            tags,
        } => {
            let mut patch = PromptPatch::new();
            if let Some(text) = text {
                patch = patch.prompt_text(text);
            }
            if let Some(title) = title {
                patch = patch.title(title);
            }
            if let Some(tags) = tags {
                patch = patch.tags(tags);
            }
            match store.update_prompt(&id, patch).await? {
                Some(prompt) => render::success(format!("Updated {}", prompt.id)),
                None => {
                    render::failure(format!("Prompt not found: {}", id));
                    std::process::exit(1);
                }
            }
        }
        PromptCommands::Favorite { id } => match store.toggle_favorite(&id).await? {
            Some(true) => render::success("Marked as favorite"),
            Some(false) => render::success("Removed from favorites"),
            None => {
                render::failure(format!("Prompt not found: {}", id));
                std::process::exit(1);
            }
        },
        PromptCommands::Move { id, group } => {
            if let Some(ref group_id) = group {
                if store.get_group(group_id).await?.is_none() {
                    render::failure(format!("Group not found: {}", group_id));
                    std::process::exit(1);
                }
            }
            if store.move_prompt_to_group(&id, group.clone()).await? {
                match group {
                    Some(group_id) => render::success(format!("Moved {} to {}", id, group_id)),
                    None => render::success(format!("{} is now ungrouped", id)),
                }
            } else {
                render::failure(format!("Prompt not found: {}", id));
                std::process::exit(1);
            }
        }
        PromptCommands::Delete { id } => {
            if store.delete_prompt(&id).await? {
                render::success(format!("Deleted {}", id));
            } else {
                render::failure(format!("Prompt not found: {}", id));
                std::process::exit(1);
            }
        }
        PromptCommands::Export { output } => {
            let snapshot = store.export_history().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, snapshot).await?;
                    render::success(format!("Exported to {}", path));
                }
                None => println!("{}", snapshot),
            }
        }
        PromptCommands::Import { file } => {
            let payload = tokio::fs::read_to_string(&file).await?;
            let summary = store.import_history(&payload).await?;
            render::success(format!(
                "Imported {} prompts and {} groups",
                summary.prompts, summary.groups
            ));
        }
        PromptCommands::Stats => {
            let stats = store
                .statistics()
                .await?
                .with_template_count(ctx.templates.count().await?);
            println!("{}", "📊 Statistics".cyan().bold());
            println!("  Prompts:    {}", stats.total_prompts);
            println!("  Favorites:  {}", stats.favorite_count);
            println!("  Groups:     {}", stats.group_count);
            println!("  Generated:  {}", stats.generated_count);
            println!("  Imported:   {}", stats.imported_count);
            println!("  Templates:  {}", stats.template_count);
        }
    }

    Ok(())
}
