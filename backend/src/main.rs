#[tokio::main]
async fn main() -> Result<(), leaderboard::error::AppError> {
    leaderboard::start_server().await
}
