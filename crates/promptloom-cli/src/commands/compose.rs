use colored::Colorize;
use promptloom_core::{analyze_prompt, catalog, AdvancedParams, PromptRequest};
use promptloom_store::NewPrompt;

use crate::context::AppContext;
use crate::render;
use crate::{ComposeArgs, SettingsArgs};

impl SettingsArgs {
    /// Overlay the given settings onto `request`. Known styles and moods are normalized
    /// to their catalogue spelling.
    pub fn apply_to(&self, request: &mut PromptRequest) {
        if let Some(ref style) = self.style {
            let canonical = catalog::find_style(style);
            request.style = Some(canonical.map_or_else(|| style.clone(), str::to_string));
        }
        if let Some(ref mood) = self.mood {
            let canonical = catalog::find_mood(mood);
            request.mood = Some(canonical.map_or_else(|| mood.clone(), str::to_string));
        }
        if let Some(ref aspect_ratio) = self.aspect_ratio {
            request.aspect_ratio = aspect_ratio.clone();
        }
        if let Some(ref version) = self.version {
            request.version = version.clone();
        }
        request.advanced.merge(&self.advanced());
    }

    fn advanced(&self) -> AdvancedParams {
        AdvancedParams {
            stylize: self.stylize,
            chaos: self.chaos,
            weird: self.weird,
            quality: self.quality,
            seed: self.seed,
            stop: self.stop,
            tile: self.tile,
            negative_prompt_text: self.negative.clone().unwrap_or_default(),
            style_reference_code: self.sref.clone().unwrap_or_default(),
            style_reference_weight: self.sw,
        }
    }
}

pub async fn compose(ctx: &AppContext, args: ComposeArgs) -> anyhow::Result<()> {
    let mut request = match args.template {
        Some(ref name) => match ctx.templates.find_template(name).await? {
            Some(template) => template.to_request(args.idea.clone()),
            None => anyhow::bail!("template not found: {}", name),
        },
        None => ctx.formatter.request(args.idea.clone()),
    };
    args.settings.apply_to(&mut request);

    let prompt = ctx.formatter.format(&request);
    println!("{}", prompt);

    if args.save {
        let mut new = NewPrompt::new(prompt).with_tags(args.tags);
        if let Some(title) = args.title {
            new = new.with_title(title);
        }
        if let Some(group) = args.group {
            new = new.with_group(group);
        }
        let saved = ctx.prompts.save_prompt(new).await?;
        render::success(format!("Saved as {}", saved.id));
    }
    Ok(())
}

pub fn analyze(ctx: &AppContext, text: &str, json: bool) -> anyhow::Result<()> {
    let analysis = analyze_prompt(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if analysis.is_empty() {
        println!("{}", "Nothing to analyze".dimmed());
        return Ok(());
    }
    render::analysis(&analysis);

    // what the composer would rebuild from this analysis
    let mut request = ctx.formatter.request(String::new());
    analysis.apply_to(&mut request);
    if !request.idea.is_empty() {
        println!();
        println!("{} {}", "Recomposed:".dimmed(), ctx.formatter.format(&request));
    }
    Ok(())
}
