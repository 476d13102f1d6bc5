// Tests for the repositories

use sukhi_admin::db::{
    AdminRepository, AgentRepository, AgentUpdate, Database, NewAgent, NewPrompt,
    PromptRepository, PromptUpdate, GLOBAL_PROFILE_ID, MAX_PROMPT_ID,
};
use sukhi_admin::Error;
use tempfile::TempDir;

fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path).unwrap();
    (db, temp_dir)
}

fn new_prompt(title: &str) -> NewPrompt {
    NewPrompt {
        id: None,
        title: title.to_string(),
        content: format!("{} content", title),
    }
}

fn new_agent(id: &str) -> NewAgent {
    NewAgent {
        id: id.to_string(),
        name: format!("Agent {}", id),
        about: None,
        photo_url: None,
    }
}

#[tokio::test]
async fn test_database_initialization() {
    let (db, _temp) = create_test_db();
    assert!(db.path().contains("test.db"));
    assert!(db.health_check().await);
}

#[tokio::test]
async fn test_create_and_get_prompt() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    let prompt = repo.create(new_prompt("greeting")).await.unwrap();
    assert!(prompt.id > 0);
    assert!(prompt.updated_at.is_none());

    let fetched = repo.get(prompt.id).await.unwrap();
    assert_eq!(fetched.title, "greeting");
    assert_eq!(fetched.content, "greeting content");
    assert_eq!(fetched.created_at, prompt.created_at);
}

#[tokio::test]
async fn test_prompt_not_found() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    assert!(matches!(repo.get(42).await, Err(Error::NotFound("Prompt"))));
    assert!(matches!(
        repo.update(42, PromptUpdate::default()).await,
        Err(Error::NotFound("Prompt"))
    ));
    assert!(matches!(repo.delete(42).await, Err(Error::NotFound("Prompt"))));
}

#[tokio::test]
async fn test_prompt_with_explicit_id_conflicts() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    let mut req = new_prompt("fixed");
    req.id = Some(7);
    let prompt = repo.create(req.clone()).await.unwrap();
    assert_eq!(prompt.id, 7);

    let result = repo.create(req).await;
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Auto ids continue after the explicit one
    let next = repo.create(new_prompt("next")).await.unwrap();
    assert!(next.id > 7);
}

#[tokio::test]
async fn test_prompt_explicit_id_out_of_range() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    for id in [0, -1, MAX_PROMPT_ID + 1, i64::MAX] {
        let mut req = new_prompt("bad id");
        req.id = Some(id);
        assert!(matches!(repo.create(req).await, Err(Error::Validation(_))));
    }

    // The largest allowed id leaves room for automatic ids
    let mut req = new_prompt("top");
    req.id = Some(MAX_PROMPT_ID);
    assert_eq!(repo.create(req).await.unwrap().id, MAX_PROMPT_ID);

    let next = repo.create(new_prompt("after top")).await.unwrap();
    assert!(next.id > MAX_PROMPT_ID);
    assert_eq!(repo.list(0, 100).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_prompt_blank_title_rejected() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    let result = repo.create(new_prompt("   ")).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_partial_update_only_touches_given_fields() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    let created = repo.create(new_prompt("before")).await.unwrap();
    let before = repo.get(created.id).await.unwrap();

    let updated = repo
        .update(
            created.id,
            PromptUpdate {
                title: Some("X".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "X");

    let after = repo.get(created.id).await.unwrap();
    assert_eq!(after.title, "X");
    assert_eq!(after.content, before.content);
    assert_eq!(after.created_at, before.created_at);
    let first_update = after.updated_at.expect("updated_at set on update");
    assert!(first_update >= after.created_at);

    let again = repo
        .update(
            created.id,
            PromptUpdate {
                title: None,
                content: Some("new body".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(again.title, "X");
    assert_eq!(again.content, "new body");
    assert!(again.updated_at.unwrap() >= first_update);
}

#[tokio::test]
async fn test_list_prompts_paging() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    for i in 0..5 {
        repo.create(new_prompt(&format!("p{}", i))).await.unwrap();
    }

    let all = repo.list(0, 100).await.unwrap();
    let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["p0", "p1", "p2", "p3", "p4"]);

    let page = repo.list(1, 2).await.unwrap();
    let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["p1", "p2"]);

    assert!(repo.list(10, 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_prompt_returns_snapshot() {
    let (db, _temp) = create_test_db();
    let repo = PromptRepository::new(db);

    let prompt = repo.create(new_prompt("gone")).await.unwrap();
    let deleted = repo.delete(prompt.id).await.unwrap();
    assert_eq!(deleted.title, "gone");
    assert!(matches!(repo.get(prompt.id).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_create_agent_duplicate_id() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    let agent = repo.create(new_agent("coach-1")).await.unwrap();
    assert_eq!(agent.id, "coach-1");
    assert!(agent.prompts.is_empty());

    let result = repo.create(new_agent("coach-1")).await;
    match result {
        Err(Error::Conflict(msg)) => assert!(msg.contains("coach-1")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_agent_empty_id_rejected() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    let result = repo.create(new_agent("")).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_update_agent_partial_and_clear() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    repo.create(NewAgent {
        id: "coach".to_string(),
        name: "Coach".to_string(),
        about: Some("Helps".to_string()),
        photo_url: Some("http://x/p.png".to_string()),
    })
    .await
    .unwrap();

    let updated = repo
        .update(
            "coach",
            AgentUpdate {
                name: Some("Head Coach".to_string()),
                ..AgentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Head Coach");
    assert_eq!(updated.about.as_deref(), Some("Helps"));
    assert_eq!(updated.photo_url.as_deref(), Some("http://x/p.png"));

    let cleared = repo
        .update(
            "coach",
            AgentUpdate {
                about: Some(None),
                ..AgentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.name, "Head Coach");
    assert!(cleared.about.is_none());
    assert_eq!(cleared.photo_url.as_deref(), Some("http://x/p.png"));

    let missing = repo.update("nobody", AgentUpdate::default()).await;
    assert!(matches!(missing, Err(Error::NotFound("Agent"))));
}

#[tokio::test]
async fn test_list_agents_insertion_order() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    for id in ["zeta", "alpha", "mid"] {
        repo.create(new_agent(id)).await.unwrap();
    }

    let agents = repo.list(0, 100).await.unwrap();
    let ids: Vec<_> = agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_delete_agent() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    repo.create(new_agent("temp")).await.unwrap();
    let deleted = repo.delete("temp").await.unwrap();
    assert_eq!(deleted.id, "temp");
    assert!(matches!(repo.get("temp").await, Err(Error::NotFound("Agent"))));
    assert!(matches!(repo.delete("temp").await, Err(Error::NotFound("Agent"))));
}

#[tokio::test]
async fn test_global_profile_created_on_first_read() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db);

    let profile = repo.get_or_create_global().await.unwrap();
    assert_eq!(profile.id, GLOBAL_PROFILE_ID);
    assert_eq!(profile.name, "Sukhi");
    assert_eq!(profile.about.as_deref(), Some(""));

    repo.update(
        GLOBAL_PROFILE_ID,
        AgentUpdate {
            name: Some("Sukhi v2".to_string()),
            ..AgentUpdate::default()
        },
    )
    .await
    .unwrap();

    // A second read does not reset the profile
    let profile = repo.get_or_create_global().await.unwrap();
    assert_eq!(profile.name, "Sukhi v2");
}

#[tokio::test]
async fn test_global_profile_cannot_be_deleted() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db.clone());
    let prompts = PromptRepository::new(db);

    repo.get_or_create_global().await.unwrap();
    repo.update(
        GLOBAL_PROFILE_ID,
        AgentUpdate {
            name: Some("Custom".to_string()),
            ..AgentUpdate::default()
        },
    )
    .await
    .unwrap();
    prompts.create(new_prompt("p")).await.unwrap();

    let result = repo.delete(GLOBAL_PROFILE_ID).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    assert_eq!(repo.list(0, 100).await.unwrap().len(), 1);
    let profile = repo.get_or_create_global().await.unwrap();
    assert_eq!(profile.name, "Custom");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_global_profile_creation() {
    let (db, _temp) = create_test_db();
    let repo = AgentRepository::new(db.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move { repo.get_or_create_global().await }));
    }
    for handle in handles {
        let profile = handle.await.unwrap().unwrap();
        assert_eq!(profile.id, GLOBAL_PROFILE_ID);
    }

    let count: i64 = db
        .run(|conn| {
            conn.query_row("SELECT COUNT(*) FROM agents", [], |row| row.get(0))
                .map_err(Error::from)
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_create_admin_and_verify() {
    let (db, _temp) = create_test_db();
    let repo = AdminRepository::new(db);

    let admin = repo.create("root", "correct horse").await.unwrap();
    assert_eq!(admin.username, "root");
    assert_ne!(admin.hashed_password, "correct horse");

    let found = repo.find_by_username("root").await.unwrap().unwrap();
    assert_eq!(found.id, admin.id);

    // Lookups are case-sensitive
    assert!(repo.find_by_username("Root").await.unwrap().is_none());

    assert!(repo
        .verify_credentials("root", "correct horse")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .verify_credentials("root", "wrong")
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .verify_credentials("ghost", "correct horse")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_admin_username() {
    let (db, _temp) = create_test_db();
    let repo = AdminRepository::new(db);

    repo.create("root", "pw").await.unwrap();
    let result = repo.create("root", "other").await;
    assert!(matches!(result, Err(Error::DuplicateUsername(name)) if name == "root"));
}
