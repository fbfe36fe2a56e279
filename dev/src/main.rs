use coral_orm::{Database, Entity, FindAll, Model, PoolConfig};

#[derive(Entity, Debug, Clone, PartialEq)]
struct User {
    #[orm(primary_key)]
    id: i64,
    username: String,
    email: String,
    password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // DATABASE_URL wins over the DB_* pool settings.
    let db = match std::env::var("DATABASE_URL") {
        Ok(url) => Database::connect(&url).await?,
        Err(_) => Database::create_pool(&PoolConfig::from_env()?).await?,
    };

    db.migrator().register::<User>().run().await?;

    let mut user = User {
        id: 8,
        username: "sly".to_string(),
        email: "sly@example.com".to_string(),
        password: "secret".to_string(),
    };
    user.save(&db).await?;

    let found = User::find(&db, 8).await?;
    log::info!("found: {:?}", found);

    user.email = "sly@example.org".to_string();
    user.update(&db).await?;

    let count = User::find_number(&db, "count(id)", None, Vec::new()).await?;
    log::info!("users: {:?}", count);

    let listed = User::find_all(&db, FindAll::new().order_by("id").limit(10)).await?;
    log::info!("listed {} users", listed.len());

    user.remove(&db).await?;
    log::info!("after remove: {:?}", User::find(&db, 8).await?);

    db.destroy_pool().await;
    Ok(())
}
