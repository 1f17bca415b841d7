use colored::Colorize;
use promptloom_store::{NewPrompt, NewTemplate};

use crate::context::AppContext;
use crate::render;
use crate::TemplateCommands;

pub async fn run(ctx: &AppContext, command: TemplateCommands) -> anyhow::Result<()> {
    let store = &ctx.templates;

    match command {
        TemplateCommands::List => {
            let templates = store.list_templates().await?;
            if templates.is_empty() {
                println!("{}", "No templates yet".dimmed());
            }
            for template in &templates {
                render::template_line(template);
            }
        }
        TemplateCommands::Save { name, settings } => {
            let mut request = ctx.formatter.request(String::new());
            settings.apply_to(&mut request);
            let template = store
                .save_template(NewTemplate::from_request(name, &request))
                .await?;
            render::success(format!("Saved template {} ({})", template.name, template.id));
        }
        TemplateCommands::Apply {
            template,
            idea,
            save,
        } => {
            let Some(found) = store.find_template(&template).await? else {
                render::failure(format!("Template not found: {}", template));
                std::process::exit(1);
            };
            let prompt = ctx.formatter.format(&found.to_request(idea));
            println!("{}", prompt);

            if save {
                let saved = ctx.prompts.save_prompt(NewPrompt::new(prompt)).await?;
                render::success(format!("Saved as {}", saved.id));
            }
        }
        TemplateCommands::Delete { id } => {
            if store.delete_template(&id).await? {
                render::success(format!("Deleted template {}", id));
            } else {
                render::failure(format!("Template not found: {}", id));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
