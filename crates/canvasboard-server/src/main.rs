use canvasboard_server::{routes, ServerConfig, ShapeBoard};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!("Backend listening on http://localhost:{}", config.port);
    warp::serve(routes(ShapeBoard::seeded()))
        .run(config.socket_addr())
        .await;
}
