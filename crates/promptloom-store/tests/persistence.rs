use std::sync::Arc;

use promptloom_core::PromptRequest;
use promptloom_store::{
    FileBackend, LoadStatus, NewPrompt, NewTemplate, PromptFilter, PromptSource, PromptStore,
    SortBy, StoreError, TemplateStore, DEFAULT_HISTORY_KEY,
};
use tempfile::TempDir;

fn stores(dir: &TempDir) -> (PromptStore, TemplateStore) {
    let backend = Arc::new(FileBackend::new(dir.path()));
    (PromptStore::new(backend.clone()), TemplateStore::new(backend))
}

#[tokio::test]
async fn history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let saved_id = {
        let (prompts, templates) = stores(&dir);
        let group = prompts.create_group("Night", Some("#6366f1")).await.unwrap();
        let saved = prompts
            .save_prompt(
                NewPrompt::new("/imagine prompt: a neon alley, cyberpunk --ar 16:9")
                    .with_group(group.id)
                    .with_tags(vec!["city", "neon"]),
            )
            .await
            .unwrap();
        templates
            .save_template(NewTemplate::from_request(
                "wide",
                &PromptRequest::new("").with_aspect_ratio("21:9"),
            ))
            .await
            .unwrap();
        saved.id
    };

    let (prompts, templates) = stores(&dir);
    let reopened = prompts.get_prompt(&saved_id).await.unwrap().unwrap();
    assert_eq!(reopened.title, "a neon alley, cyberpunk --ar 16:9...");
    assert_eq!(reopened.tags, vec!["city", "neon"]);
    assert_eq!(prompts.load_status().await, LoadStatus::Loaded);
    assert_eq!(prompts.list_groups().await.unwrap().len(), 1);
    assert_eq!(templates.count().await.unwrap(), 1);
}

#[tokio::test]
async fn corrupt_history_starts_empty_and_is_overwritten_on_save() {
    let dir = TempDir::new().unwrap();
    let path = FileBackend::new(dir.path())
        .path_for_key(DEFAULT_HISTORY_KEY)
        .unwrap();
    std::fs::write(&path, "{\"prompts\": [{\"id\": 1}], \"groups\": ").unwrap();

    let (prompts, _) = stores(&dir);
    assert!(prompts.list_prompts().await.unwrap().is_empty());
    assert_eq!(prompts.load_status().await, LoadStatus::Recovered);

    prompts.save_prompt(NewPrompt::new("fresh")).await.unwrap();
    assert_eq!(prompts.load_status().await, LoadStatus::Loaded);
    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["prompts"].as_array().unwrap().len(), 1);
    assert_eq!(value["groups"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_group_keeps_members() {
    let dir = TempDir::new().unwrap();
    let (prompts, _) = stores(&dir);
    let group = prompts.create_group("Temp", None).await.unwrap();
    for text in ["one", "two", "three"] {
        prompts
            .save_prompt(NewPrompt::new(text).with_group(group.id.clone()))
            .await
            .unwrap();
    }

    assert!(prompts.delete_group(&group.id).await.unwrap());

    let (reopened, _) = stores(&dir);
    let all = reopened.list_prompts().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|p| p.group_id.is_none()));
    assert!(reopened.list_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn filter_by_group_favorites_and_title() {
    let dir = TempDir::new().unwrap();
    let (prompts, _) = stores(&dir);
    let group = prompts.create_group("Animals", None).await.unwrap();

    prompts
        .save_prompt(NewPrompt::new("zebra").with_title("zebra").with_group(group.id.clone()))
        .await
        .unwrap();
    prompts
        .save_prompt(
            NewPrompt::new("Antelope")
                .with_title("Antelope")
                .with_group(group.id.clone())
                .favorite(),
        )
        .await
        .unwrap();
    prompts
        .save_prompt(NewPrompt::new("mountain").with_title("mountain").favorite())
        .await
        .unwrap();

    let in_group = prompts
        .filter_prompts(
            &PromptFilter::new()
                .with_group(group.id.clone())
                .sorted_by(SortBy::Alphabetical),
        )
        .await
        .unwrap();
    let titles: Vec<_> = in_group.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Antelope", "zebra"]);

    let favorites = prompts
        .filter_prompts(&PromptFilter::new().favorites_only())
        .await
        .unwrap();
    assert_eq!(favorites.len(), 2);
    assert!(favorites.iter().all(|p| p.is_favorite));

    let none = prompts
        .filter_prompts(&PromptFilter::new().with_query("dragon"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn import_replaces_and_rejects_without_mutation() {
    let dir = TempDir::new().unwrap();
    let (prompts, _) = stores(&dir);
    prompts.save_prompt(NewPrompt::new("original")).await.unwrap();
    let before = prompts.export_history().await.unwrap();

    let err = prompts
        .import_history(r#"{"groups": []}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidImport(_)));

    let err = prompts
        .import_history(r#"{"prompts": [{"id": "x"}], "groups": []}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidImport(_)));
    assert_eq!(prompts.export_history().await.unwrap(), before);

    let payload = r#"{
        "prompts": [{
            "id": "1700000000000-abcdefg",
            "prompt": "/imagine prompt: lighthouse",
            "title": "lighthouse",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "isFavorite": false,
            "groupId": null,
            "tags": [],
            "source": "external",
            "externalSource": "Lexica.art",
            "imageUrl": "https://example.com/a.jpg"
        }],
        "groups": []
    }"#;
    let summary = prompts.import_history(payload).await.unwrap();
    assert_eq!(summary.prompts, 1);

    let (reopened, _) = stores(&dir);
    let all = reopened.list_prompts().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source, PromptSource::External);
    assert_eq!(all[0].external_source_name.as_deref(), Some("Lexica.art"));
}
