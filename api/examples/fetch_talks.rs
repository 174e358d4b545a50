use pretalx_api::{PretalxClient, QueryParams};
use std::env;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let (Ok(url), Ok(token), Ok(event)) = (
        env::var("PRETALX_URL"),
        env::var("PRETALX_TOKEN"),
        env::var("PRETALX_EVENT"),
    ) else {
        eprintln!("Error: PRETALX_URL, PRETALX_TOKEN or PRETALX_EVENT not set.");
        eprintln!("Create a .env file with:");
        eprintln!("PRETALX_URL=https://pretalx.com");
        eprintln!("PRETALX_TOKEN=your_token_here");
        eprintln!("PRETALX_EVENT=your_event_slug\n");
        return;
    };

    let client = match PretalxClient::with_token(&url, &token) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating client: {}", e);
            return;
        }
    };

    println!("Fetching talks of {} from {}...\n", event, url);

    match client.talks(&event, None, &QueryParams::new()).await {
        Ok(body) => {
            let talks = body["results"].as_array().cloned().unwrap_or_default();
            println!("Found {} talks:", talks.len());
            for (i, talk) in talks.iter().enumerate() {
                println!(
                    "{}. {} (code: {})",
                    i + 1,
                    talk["title"].as_str().unwrap_or("<untitled>"),
                    talk["code"].as_str().unwrap_or("?")
                );
            }
        }
        Err(e) => {
            eprintln!("Error fetching talks: {}", e);
        }
    }
}
