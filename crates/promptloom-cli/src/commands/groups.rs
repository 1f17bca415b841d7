use colored::Colorize;
use promptloom_store::{GroupPatch, GROUP_COLORS};

use crate::context::AppContext;
use crate::render;
use crate::GroupCommands;

pub async fn run(ctx: &AppContext, command: GroupCommands) -> anyhow::Result<()> {
    let store = &ctx.prompts;

    match command {
        GroupCommands::List => {
            let groups = store.list_groups().await?;
            if groups.is_empty() {
                println!("{}", "No groups yet".dimmed());
                return Ok(());
            }
            let prompts = store.list_prompts().await?;
            for group in &groups {
                let members = prompts
                    .iter()
                    .filter(|p| p.group_id.as_deref() == Some(group.id.as_str()))
                    .count();
                render::group_line(group, members);
            }
            let ungrouped = prompts.iter().filter(|p| p.group_id.is_none()).count();
            println!("{}", format!("{} ungrouped prompts", ungrouped).dimmed());
        }
        GroupCommands::Create { name, color } => {
            // rotate through the palette when no colour is given
            let color = match color {
                Some(color) => color,
                None => {
                    let count = store.list_groups().await?.len();
                    GROUP_COLORS[count % GROUP_COLORS.len()].to_string()
                }
            };
            let group = store.create_group(&name, Some(&color)).await?;
            render::success(format!("Created group {} ({})", group.name, group.id));
        }
        GroupCommands::Rename { id, name, color } => {
            let patch = GroupPatch {
                name: Some(name),
                color_token: color,
            };
            match store.update_group(&id, patch).await? {
                Some(group) => render::success(format!("Renamed to {}", group.name)),
                None => {
                    render::failure(format!("Group not found: {}", id));
                    std::process::exit(1);
                }
            }
        }
        GroupCommands::Delete { id } => {
            if store.delete_group(&id).await? {
                render::success(format!("Deleted group {}", id));
            } else {
                render::failure(format!("Group not found: {}", id));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
