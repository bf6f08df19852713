//! Populate the database with a small demo dataset: users `teste` and
//! `admin`, one example project and a task in each status. Safe to run
//! repeatedly; existing entries are left alone.

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use tarefas_api::auth::{password, token};
use tarefas_api::config::Config;
use tarefas_api::db;
use tarefas_api::models::{TaskStatus, User};

const EXAMPLE_PROJECT: &str = "Projeto de Exemplo";

struct SeedUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
}

const USERS: [SeedUser; 2] = [
    SeedUser {
        username: "teste",
        email: "teste@email.com",
        password: "123456",
        first_name: "Usuário",
        last_name: "Teste",
    },
    SeedUser {
        username: "admin",
        email: "admin@email.com",
        password: "admin123",
        first_name: "Admin",
        last_name: "Sistema",
    },
];

const TASKS: [(&str, &str, TaskStatus); 3] = [
    (
        "Tarefa Pendente",
        "Esta é uma tarefa pendente",
        TaskStatus::Pending,
    ),
    (
        "Tarefa em Progresso",
        "Esta tarefa está em andamento",
        TaskStatus::InProgress,
    ),
    (
        "Tarefa Concluída",
        "Esta tarefa já foi finalizada",
        TaskStatus::Completed,
    ),
];

async fn ensure_user(pool: &PgPool, seed: &SeedUser) -> Result<User, Box<dyn std::error::Error>> {
    if let Some(user) = db::users::find_by_username(pool, seed.username).await? {
        tracing::info!("User already exists: {}", user.username);
        return Ok(user);
    }

    let pw_hash = password::hash(seed.password)?;
    let user = db::users::create(
        pool,
        seed.username,
        seed.email,
        &pw_hash,
        seed.first_name,
        seed.last_name,
    )
    .await?;
    tracing::info!("User created: {}", user.username);
    Ok(user)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    let pool = db::connect(&config.database_url, 2).await?;

    let mut users = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        let user = ensure_user(&pool, seed).await?;
        let stored = db::auth_tokens::get_or_create(&pool, user.id, &token::generate_key()).await?;
        println!("{}: Token {}", user.username, stored.key);
        users.push(user);
    }
    let owner = &users[0];

    let projects = db::projects::list(&pool).await?;
    if projects.iter().any(|p| p.name == EXAMPLE_PROJECT) {
        tracing::info!("Project already exists: {EXAMPLE_PROJECT}");
    } else {
        let project = db::projects::create(
            &pool,
            EXAMPLE_PROJECT,
            "Este é um projeto de exemplo para demonstrar o sistema",
            owner.id,
        )
        .await?;
        tracing::info!("Project created: {}", project.name);

        for (title, description, status) in TASKS {
            let task =
                db::tasks::create(&pool, title, Some(description), status, project.id, Some(owner.id))
                    .await?;
            tracing::info!("Task created: {} ({})", task.title, task.status);
        }
    }

    pool.close().await;
    Ok(())
}
