//! One-shot commands: run a single browser action and print the surface.

use anyhow::Context;

use whiskers_core::carousel::CarouselItem;
use whiskers_core::ui::Surface;
use whiskers_core::{Browser, ViewOutcome, WhiskersConfig};

use crate::CliCommand;

pub async fn run(command: CliCommand, config: &WhiskersConfig) -> anyhow::Result<()> {
    let browser = Browser::connect(config, Vec::new()).context("Failed to build catalog client")?;

    match command {
        CliCommand::Serve { .. } => anyhow::bail!("serve is not a one-shot command"),
        CliCommand::Breeds => {
            let breeds = browser
                .catalog()
                .list_breeds()
                .await
                .context("Failed to list breeds")?;
            for breed in &breeds {
                println!("{:<6} {}", breed.id, breed.name);
            }
            println!("\n{} breeds", breeds.len());
        }
        CliCommand::Browse { breed } => {
            let outcome = match breed {
                Some(id) => browser.select_breed(&id).await,
                None => browser.initial_load().await,
            }
            .context("Failed to load breed")?;
            print_view(browser.surface(), outcome);
        }
        CliCommand::Favourites => {
            let outcome = browser
                .load_favourites()
                .await
                .context("Failed to load favourites")?;
            print_view(browser.surface(), outcome);
        }
        CliCommand::Toggle { image_id } => {
            let outcome = browser
                .toggle_favourite(&image_id)
                .await
                .with_context(|| format!("Failed to toggle favourite for {}", image_id))?;
            if outcome.is_favourite() {
                println!("♥ {} is now favourite {}", image_id, outcome.favourite_id);
            } else {
                println!("♡ {} removed (was favourite {})", image_id, outcome.favourite_id);
            }
        }
    }

    Ok(())
}

fn print_view(surface: &Surface, outcome: ViewOutcome) {
    let info = surface.info().render_text();
    if !info.is_empty() {
        println!("{}\n", info);
    }
    if let ViewOutcome::Shown { .. } = outcome {
        for line in item_lines(&surface.carousel_state().items) {
            println!("{}", line);
        }
    }
}

fn item_lines(items: &[CarouselItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let heart = if item.favourite { "♥" } else { "♡" };
            format!("{:>3}. {} {} {}", i + 1, heart, item.image_id, item.src)
        })
        .collect()
}
