use dotenvy::dotenv;
use pedidos_service::{build_server, create_pool, order_service, run_migrations, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database).map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{} (pool size {})",
        config.host,
        config.port,
        config.database.pool_max_size
    );

    build_server(order_service(pool), &config.host, config.port)?.await?;

    log::info!("Server stopped");
    Ok(())
}
