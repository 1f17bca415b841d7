//! Terminal output helpers.

use colored::Colorize;
use promptloom_core::ParsedPromptAnalysis;
use promptloom_store::{Group, SavedPrompt, Template};

pub fn success(message: impl AsRef<str>) {
    println!("{}", format!("✅ {}", message.as_ref()).green());
}

pub fn failure(message: impl AsRef<str>) {
    eprintln!("{}", format!("❌ {}", message.as_ref()).red());
}

pub fn prompt_line(prompt: &SavedPrompt, groups: &[Group]) {
    let star = if prompt.is_favorite { "★" } else { " " };
    let group = prompt
        .group_id
        .as_deref()
        .and_then(|id| groups.iter().find(|g| g.id == id))
        .map(|g| format!(" [{}]", g.name))
        .unwrap_or_default();

    println!(
        "{} {} {}{} {}",
        star.yellow(),
        prompt.id.dimmed(),
        prompt.title.bold(),
        group.cyan(),
        prompt.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );
}

pub fn prompt_detail(prompt: &SavedPrompt, groups: &[Group]) {
    prompt_line(prompt, groups);
    println!("  {}", prompt.prompt_text);
    println!("  {} {}", "source:".dimmed(), prompt.source);
    if let Some(ref name) = prompt.external_source_name {
        println!("  {} {}", "from:".dimmed(), name);
    }
    if let Some(ref url) = prompt.image_url {
        println!("  {} {}", "image:".dimmed(), url);
    }
    if !prompt.tags.is_empty() {
        println!("  {} {}", "tags:".dimmed(), prompt.tags.join(", "));
    }
    println!(
        "  {} {}",
        "updated:".dimmed(),
        prompt.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
}

pub fn group_line(group: &Group, members: usize) {
    println!(
        "{} {} {} {}",
        group.id.dimmed(),
        group.name.bold(),
        group.color_token.dimmed(),
        format!("({} prompts)", members).dimmed()
    );
}

pub fn template_line(template: &Template) {
    let mut settings = vec![
        format!("--ar {}", template.aspect_ratio),
        format!("v {}", template.version),
    ];
    if !template.style.is_empty() {
        settings.insert(0, template.style.clone());
    }
    if !template.mood.is_empty() {
        settings.insert(1.min(settings.len()), template.mood.clone());
    }
    println!(
        "{} {} {}",
        template.id.dimmed(),
        template.name.bold(),
        settings.join(" · ").dimmed()
    );
}

pub fn analysis(analysis: &ParsedPromptAnalysis) {
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".dimmed().to_string()
        } else {
            items.join(", ")
        }
    };

    println!("{} {}", "Subject:".green().bold(), analysis.subject);
    println!("{} {}", "Styles:".blue().bold(), list(&analysis.styles));
    println!("{} {}", "Moods:".magenta().bold(), list(&analysis.moods));
    println!("{} {}", "Modifiers:".yellow().bold(), list(&analysis.modifiers));
    if analysis.parameters.is_empty() {
        println!("{} {}", "Parameters:".cyan().bold(), "-".dimmed());
    } else {
        println!("{}", "Parameters:".cyan().bold());
        for (key, value) in &analysis.parameters {
            println!("  --{} {}", key, value);
        }
    }
    println!("{} {}", "Negatives:".red().bold(), list(&analysis.negatives));
}
