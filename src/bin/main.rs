use std::error::Error;

use bstmap::BstMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sketch(map: &BstMap<u32, &str>) -> Result<String, Box<dyn Error>> {
    let mut out = String::new();
    map.print(&mut out, true)?;
    Ok(out)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bstmap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut map: BstMap<u32, &str> = BstMap::new();

    for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
        *map.at_or_insert(key) = value;
        map.sanity_check()?;
    }

    tracing::info!(len = map.len(), height = ?map.height(), "built map");
    println!("{:?}", map.keys().collect::<Vec<_>>());
    print!("{}", sketch(&map)?);

    let copy = map.clone();

    let removed = map.find_mut(&3).erase();
    map.sanity_check()?;
    tracing::info!(?removed, len = map.len(), "erased key 3");

    println!("{:?}", map.keys().collect::<Vec<_>>());
    print!("{}", sketch(&map)?);

    // The copy still holds every entry.
    println!("{copy:?}");

    let moved = map.take();
    tracing::info!(source = map.len(), target = moved.len(), "moved map");

    Ok(())
}
