use coral_orm::{Database, Entity, Error, FindAll, Model, Value};

#[derive(Entity, Debug, Clone, PartialEq)]
struct User {
    #[orm(primary_key)]
    id: i64,
    username: String,
    email: String,
    password: String,
}

#[derive(Entity, Debug, Clone, PartialEq)]
struct Blog {
    #[orm(primary_key, size = 50, default = "coral_orm::defaults::next_id")]
    id: Option<String>,
    name: String,
    #[orm(text)]
    summary: Option<String>,
    published: bool,
    score: f64,
    #[orm(default = "coral_orm::defaults::now")]
    created_at: Option<f64>,
}

fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "secret".to_string(),
    }
}

async fn setup() -> Result<Database, Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::builder().max_connections(1).connect("sqlite::memory:").await?;
    db.migrator().register::<User>().register::<Blog>().run().await?;
    Ok(db)
}

#[tokio::test]
async fn test_user_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let mut sly = user(8, "sly");
    assert_eq!(sly.save(&db).await?, 1);

    let found = User::find(&db, 8).await?;
    assert_eq!(found, Some(sly.clone()));

    assert_eq!(sly.remove(&db).await?, 1);
    assert_eq!(User::find(&db, 8).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_update_changes_only_mutated_field() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let mut sly = user(8, "sly");
    sly.save(&db).await?;

    sly.email = "sly@example.org".to_string();
    assert_eq!(sly.update(&db).await?, 1);

    let found = User::find(&db, 8).await?.ok_or("user not found")?;
    assert_eq!(found.email, "sly@example.org");
    assert_eq!(found.username, "sly");
    assert_eq!(found.password, "secret");
    Ok(())
}

#[tokio::test]
async fn test_generated_defaults_survive_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let mut blog = Blog {
        id: None,
        name: "first post".to_string(),
        summary: None,
        published: true,
        score: 4.5,
        created_at: None,
    };
    blog.save(&db).await?;

    let id = blog.id.clone().ok_or("id was not generated")?;
    assert_eq!(id.len(), 50);
    assert!(blog.created_at.is_some());

    let found = Blog::find(&db, id.clone()).await?.ok_or("blog not found")?;
    assert_eq!(found.id.as_deref(), Some(id.as_str()));
    assert_eq!(found.name, "first post");
    assert_eq!(found.summary, None);
    assert!(found.published);
    assert_eq!(found.score, 4.5);
    assert_eq!(found.created_at, blog.created_at);

    // update must not regenerate the key
    let mut changed = found.clone();
    changed.summary = Some("short".to_string());
    changed.update(&db).await?;
    let again = Blog::find(&db, id).await?.ok_or("blog not found")?;
    assert_eq!(again.id, found.id);
    assert_eq!(again.summary.as_deref(), Some("short"));
    Ok(())
}

#[tokio::test]
async fn test_boolean_fields_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    for (name, published) in [("draft", false), ("live", true)] {
        let mut blog = Blog { id: None, name: name.to_string(), summary: None, published, score: 0.0, created_at: None };
        blog.save(&db).await?;
    }

    let blogs = Blog::find_all(&db, FindAll::new().order_by("`name`")).await?;
    assert_eq!(blogs.iter().map(|b| (b.name.as_str(), b.published)).collect::<Vec<_>>(), vec![("draft", false), ("live", true)]);

    let live = Blog::find_all(&db, FindAll::new().filter("`published` = ?").bind(true)).await?;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].name, "live");
    Ok(())
}

#[tokio::test]
async fn test_find_missing_returns_none() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    assert_eq!(User::find(&db, 404).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_find_all_limits() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    for id in 1..=15 {
        user(id, &format!("user{}", id)).save(&db).await?;
    }

    let all = User::find_all(&db, FindAll::new()).await?;
    assert_eq!(all.len(), 15);

    let first_five = User::find_all(&db, FindAll::new().order_by("id").limit(5)).await?;
    assert_eq!(first_five.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

    let page = User::find_all(&db, FindAll::new().order_by("id").range(10, 5)).await?;
    assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![11, 12, 13, 14, 15]);

    let tail = User::find_all(&db, FindAll::new().order_by("id").range(13, 5)).await?;
    assert_eq!(tail.len(), 2);

    let filtered = User::find_all(
        &db,
        FindAll::new().filter("`id` > ? and `username` != ?").bind(10).bind("user12").order_by("id desc"),
    )
    .await?;
    assert_eq!(filtered.iter().map(|u| u.id).collect::<Vec<_>>(), vec![15, 14, 13, 11]);

    let by_values = User::find_all(&db, FindAll::new().order_by("id").limit_values(&[Value::Int(3)])?).await?;
    assert_eq!(by_values.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_find_all_rejects_malformed_limit() -> Result<(), Box<dyn std::error::Error>> {
    let empty = FindAll::new().limit_values(&[]);
    assert!(matches!(empty, Err(Error::InvalidLimit(_))));

    let three = FindAll::new().limit_values(&[Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert!(matches!(three, Err(Error::InvalidLimit(_))));

    let text = FindAll::new().limit_values(&[Value::from("ten")]);
    assert!(matches!(text, Err(Error::InvalidLimit(_))));
    Ok(())
}

#[tokio::test]
async fn test_find_number() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    for id in 1..=4 {
        user(id, &format!("user{}", id)).save(&db).await?;
    }

    let count = User::find_number(&db, "count(id)", None, Vec::new()).await?;
    assert_eq!(count, Some(Value::Int(4)));

    let above = User::find_number(&db, "count(id)", Some("`id` > ?"), vec![Value::Int(2)]).await?;
    assert_eq!(above, Some(Value::Int(2)));

    let none = User::find_number(&db, "`id`", Some("`id` = ?"), vec![Value::Int(99)]).await?;
    assert_eq!(none, None);
    Ok(())
}

#[tokio::test]
async fn test_mismatched_writes_are_not_errors_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let ghost = user(77, "ghost");
    assert_eq!(ghost.update(&db).await?, 0);
    assert_eq!(ghost.remove(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_strict_mode_reports_mismatched_writes() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::builder().max_connections(1).strict(true).connect("sqlite::memory:").await?;
    db.migrator().register::<User>().run().await?;

    let ghost = user(77, "ghost");
    let result = ghost.update(&db).await;
    assert!(matches!(result, Err(Error::RowsAffected { actual: 0, .. })));

    let result = ghost.remove(&db).await;
    assert!(matches!(result, Err(Error::RowsAffected { actual: 0, .. })));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_key_is_a_query_error() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    user(1, "first").save(&db).await?;
    let result = user(1, "second").save(&db).await;
    assert!(matches!(result, Err(Error::Query(_))));

    let kept = User::find(&db, 1).await?.ok_or("user not found")?;
    assert_eq!(kept.username, "first");
    Ok(())
}

#[tokio::test]
async fn test_instances_are_independent() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    user(3, "three").save(&db).await?;

    let mut a = User::find(&db, 3).await?.ok_or("user not found")?;
    let b = User::find(&db, 3).await?.ok_or("user not found")?;

    a.username = "changed".to_string();
    a.update(&db).await?;
    assert_eq!(b.username, "three");
    Ok(())
}
