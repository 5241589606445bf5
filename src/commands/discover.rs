use clap::Args;
use futures::future::join_all;

use traveler::discover::{
    self, Coordinate, DiscoverStatus, FixedLocation, GoogleDirectionsClient, GooglePlacesClient,
};
use traveler::{Config, Error, Result};

#[derive(Args)]
pub struct DiscoverArgs {
    /// Latitude to search around (default: `home` from the config)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude to search around
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    /// What to look for
    #[arg(short, long)]
    query: Option<String>,
    /// Also show distance, driving time and a directions link per spot
    #[arg(short, long)]
    details: bool,
}

pub async fn run(args: DiscoverArgs, config: &Config) -> Result<()> {
    let api_key = config.places.api_key.clone().ok_or(Error::MissingApiKey)?;
    let directions = GoogleDirectionsClient::new(api_key.clone());
    let client = GooglePlacesClient::with_base_url(
        api_key,
        config.places.placeholder_url.clone(),
        config.places.base_url.clone(),
    );

    let here = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinate {
            latitude,
            longitude,
        }),
        _ => config.home,
    };
    let query = args.query.as_deref().unwrap_or(config.places.query.as_str());

    println!("Fetching vacation spots...");
    let status = discover::discover_nearby(
        &FixedLocation::new(here),
        &client,
        &client,
        query,
        config.places.radius_m,
    )
    .await;

    match status {
        DiscoverStatus::Spots { spots, .. } if spots.is_empty() => {
            println!("Nothing found nearby.");
        }
        DiscoverStatus::Spots { near, spots } => {
            let details: Vec<Option<discover::SpotDetail>> = if args.details {
                join_all(
                    spots
                        .iter()
                        .map(|spot| discover::spot_detail(&directions, near, spot)),
                )
                .await
                .into_iter()
                .map(Some)
                .collect()
            } else {
                vec![None; spots.len()]
            };

            println!("Recommended Vacation Spots Near {near}");
            for (spot, detail) in spots.iter().zip(details) {
                println!("{}", spot.name);
                println!("    {}", spot.description);
                println!("    {}", spot.coordinate);
                println!("    {}", spot.image_url);
                if let Some(detail) = detail {
                    let kind = if detail.by_road { "by road" } else { "straight line" };
                    println!(
                        "    Distance: {} ({}, {kind})",
                        detail.miles_text(),
                        detail.kilometers_text()
                    );
                    if let Some(time) = detail.travel_time_text() {
                        println!("    Travel time: {time}");
                    }
                    println!("    Open in Maps: {}", detail.maps_url);
                }
            }
        }
        DiscoverStatus::Failed(message) => println!("{message}"),
    }
    Ok(())
}
