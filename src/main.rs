use std::{env, process::ExitCode};

use dotenv::dotenv;
use itertools::Itertools;
use wikimate::{ClientConfigBuilder, WikiError, Wikimate};

pub const DEFAULT_API_URL: &str = "http://localhost/mediawiki/api.php";
pub const DEFAULT_PAGE: &str = "Sausages";

const MEAT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
const VEGGIE: &str = "Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

fn initial_text() -> String {
    format!(
        "Intro about '''sausages'''.\n\n== Meat ==\n{}\n\n== Veggie ==\n{}\n",
        MEAT, VEGGIE
    )
}

async fn run() -> wikimate::Result<()> {
    let api_url = env::var("WIKIMATE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
    let title = env::var("WIKIMATE_PAGE").unwrap_or_else(|_| DEFAULT_PAGE.to_owned());

    let mut builder = ClientConfigBuilder::default();
    builder.api_url(url::Url::parse(&api_url)?);
    if let Ok(agent) = env::var("WIKIMATE_USER_AGENT") {
        builder.user_agent(agent);
    }
    let config = builder
        .build()
        .map_err(|e| WikiError::Config(e.to_string()))?;

    println!("Connecting to: {}", config.api_url);
    let wiki = Wikimate::from_config(&config)?;

    println!("Fetching {:?}...", title);
    let mut page = wiki.get_page(title.as_str()).await?;
    if page.is_invalid() {
        return Err(WikiError::InvalidTitle(title));
    }

    if !page.exists() {
        println!("{:?} doesn't exist. Creating...", title);
        page.set_text(&initial_text(), None, false, Some("Create initial page"))
            .await?;
        println!("{:?} created.", title);
        return Ok(());
    }

    println!("Title: {}", page.title());
    println!("Number of sections: {}", page.get_num_sections());
    println!(
        "Section offsets:\n{}",
        page.get_section_offsets()
            .iter()
            .map(|(name, s)| format!("  {:<20} offset {:>6} length {:>6}", name, s.offset, s.length))
            .join("\n")
    );

    let intro = format!(
        "{}\nMore about sausage variants.\n",
        page.section(0usize).unwrap_or_default()
    );
    page.set_section(&intro, 0usize, Some("Update intro section"), true)
        .await?;
    println!("{:?} intro updated.", title);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
