use std::time::Duration;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};

// Create a static client to reuse connections
pub static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(45))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .user_agent(concat!("chronicles-of-yore/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
});
