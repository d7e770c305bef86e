use actix_cors::Cors;
use actix_web::{get, http, web, App, HttpResponse, HttpServer, Responder};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

use backboletin::auth::password;
use backboletin::models::AppState;
use backboletin::{auth, boletines, catalogo, usuarios};

#[get("/api/ping")]
async fn ping() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "message": "Boletín Digital API operativa",
    }))
}

// Crea un usuario administrador inicial si no existe ninguno.
async fn asegurar_admin_inicial(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let existe = sqlx::query_scalar::<_, i32>(
        "SELECT id_usuario FROM usuarios WHERE rol = 'admin' LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    if existe.is_some() {
        tracing::info!("admin inicial: ya existe al menos un usuario admin");
        return Ok(());
    }

    let usuario = "admin";
    let password_plano = "Admin123!";
    let hash = password::hash_password(password_plano)?;

    sqlx::query(
        "INSERT INTO usuarios \
           (usuario, contrasena_hash, nombre_completo, email, dni, rol, id_curso, estado_cuenta) \
         VALUES ($1, $2, 'Administrador del sistema', 'admin@boletin.local', '00000000', \
                 'admin', NULL, 'aprobado')",
    )
    .bind(usuario)
    .bind(&hash)
    .execute(pool)
    .await?;

    tracing::info!(usuario, password = password_plano, "admin inicial creado");
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL no configurada");
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let pool: PgPool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .expect("No se pudo conectar a la base de datos");

    if let Err(err) = asegurar_admin_inicial(&pool).await {
        tracing::error!("error al asegurar admin inicial: {err}");
    }

    let state = AppState { pool: pool.clone() };

    tracing::info!(%bind_addr, "API Boletín Digital escuchando");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(ping)
            .configure(auth::routes::config)
            .configure(usuarios::routes::config)
            .configure(catalogo::routes::config)
            .configure(boletines::routes::config)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    // El pool se cierra recién cuando el servidor terminó de atender.
    pool.close().await;
    Ok(())
}
