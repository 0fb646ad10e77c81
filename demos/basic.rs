use agrimarket_http::{market, AgriClient, LoginRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let email = std::env::var("AGRIMARKET_EMAIL")?;
    let password = std::env::var("AGRIMARKET_PASSWORD")?;

    let client = AgriClient::from_env()?;

    let login = client.login(&LoginRequest::new(email, password)).await;
    if let Some(error) = login.error() {
        anyhow::bail!("login failed: {error}");
    }

    let farmers = client.farmers().await.into_result().map_err(anyhow::Error::msg)?;
    for farmer in &farmers {
        println!("{} ({})", farmer.name, farmer.region.as_deref().unwrap_or("-"));
    }

    let stats = client
        .regional_statistics("Rift Valley")
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    println!("{stats:?}");

    let prices = vec![
        market::PriceRecord {
            crop: "maize".to_owned(),
            region: stats.region.clone(),
            price: 40.0,
            volume: 120.0,
            date: "2024-03-01".to_owned(),
        },
        market::PriceRecord {
            crop: "maize".to_owned(),
            region: stats.region,
            price: 44.0,
            volume: 80.0,
            date: "2024-03-08".to_owned(),
        },
    ];
    println!("stability: {:?}", market::price_stability(&prices));
    print!("{}", market::to_csv(&prices));

    client.logout();
    Ok(())
}
