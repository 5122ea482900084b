use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;

use pantry_client::api::{community, ingredient, nutrition, recipe, shopping};
use pantry_client::config::{CliArgs, Config};
use pantry_client::format;
use pantry_client::http_client::ApiClient;
use pantry_client::session::Session;
use pantry_client::storage::SqliteStorage;
use pantry_client::ui::UiHandler;
use pantry_client::validate;

#[derive(Parser, Debug)]
#[command(author, version, about = "Command-line client for the Pantry recipe & nutrition app")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session locally
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create an account and sign in
    Register,
    /// Drop the stored session
    Logout,
    /// Show the signed-in user's profile
    Profile,
    /// Browse recipes
    Recipes {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Show one recipe
    Recipe { id: u64 },
    /// Ingredients in season this month (or a given one)
    Seasonal {
        #[arg(long)]
        month: Option<u32>,
    },
    /// Show the shopping list
    Shopping,
    /// Add every ingredient of a recipe to the shopping list
    ShoppingGenerate { recipe_id: u64 },
    /// Mark a shopping list item as purchased
    ShoppingDone { id: u64 },
    /// Remove a shopping list item
    ShoppingRemove { id: u64 },
    /// Browse community posts
    Posts {
        #[arg(long)]
        page: Option<u32>,
    },
    /// Nutrition diary for a day (defaults to today)
    Diary {
        #[arg(long)]
        date: Option<String>,
    },
}

/// Terminal-facing UI surface: toasts go to stderr, the sign-in redirect
/// becomes a hint on what to run next
struct TerminalUi;

impl UiHandler for TerminalUi {
    fn toast(&self, message: &str) {
        eprintln!("! {}", message);
    }

    fn redirect_to_login(&self) {
        eprintln!("Session ended. Run `pantry-client login` to sign in again.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_args(&cli.args)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let storage = Arc::new(
        SqliteStorage::open(&config.storage_file).context("Failed to open local storage")?,
    );
    let client = Arc::new(ApiClient::new(&config, storage, Arc::new(TerminalUi))?);
    let session = Session::new(client.clone());

    match cli.command {
        Command::Login { username } => {
            let username = match username {
                Some(name) => name,
                None => dialoguer::Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .context("Failed to read username")?,
            };
            validate::validate_username(&username).map_err(anyhow::Error::msg)?;

            let password: String = dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password")?;
            validate::validate_password(&password).map_err(anyhow::Error::msg)?;

            session.login(&username, &password).await?;
            println!("Signed in as {}", session.nickname());
        }

        Command::Register => {
            let username: String = dialoguer::Input::new()
                .with_prompt("Username")
                .interact_text()
                .context("Failed to read username")?;
            validate::validate_username(&username).map_err(anyhow::Error::msg)?;

            let email: String = dialoguer::Input::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read email")?;
            if !email.is_empty() {
                validate::validate_email(&email).map_err(anyhow::Error::msg)?;
            }

            let password: String = dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password")?;
            validate::validate_password(&password).map_err(anyhow::Error::msg)?;

            let confirm: String = dialoguer::Password::new()
                .with_prompt("Confirm password")
                .interact()
                .context("Failed to read password confirmation")?;
            validate::validate_password_confirm(&password, &confirm)
                .map_err(anyhow::Error::msg)?;

            let email = if email.is_empty() { None } else { Some(email.as_str()) };
            session.register(&username, &password, email).await?;
            println!("Account created. Signed in as {}", session.nickname());
        }

        Command::Logout => {
            session.logout();
            println!("Signed out");
        }

        Command::Profile => {
            let response = session.fetch_profile().await?;
            print_json(&response["data"]);
        }

        Command::Recipes {
            page,
            search,
            category,
            difficulty,
        } => {
            let query = recipe::RecipeQuery {
                page,
                search,
                category,
                difficulty,
                ..Default::default()
            };
            let response = recipe::recipe_list(&client, &query).await?;
            print_recipe_list(&response);
        }

        Command::Recipe { id } => {
            let response = recipe::recipe_detail(&client, id).await?;
            print_json(&response["data"]);
        }

        Command::Seasonal { month } => {
            let response = ingredient::seasonal_ingredients(&client, month).await?;
            print_json(&response["data"]);
        }

        Command::Shopping => {
            let response = shopping::shopping_list(&client).await?;
            print_json(&response["data"]);
        }

        Command::ShoppingGenerate { recipe_id } => {
            shopping::generate_shopping_list(&client, recipe_id).await?;
            println!("Shopping list updated from recipe {}", recipe_id);
        }

        Command::ShoppingDone { id } => {
            shopping::update_shopping_item(&client, id, serde_json::json!({"is_purchased": true}))
                .await?;
            println!("Item {} marked as purchased", id);
        }

        Command::ShoppingRemove { id } => {
            shopping::delete_shopping_item(&client, id).await?;
            println!("Item {} removed", id);
        }

        Command::Posts { page } => {
            let response = community::post_list(&client, page, None).await?;
            print_json(&response["data"]);
        }

        Command::Diary { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let response = nutrition::diary_by_date(&client, &date).await?;
            print_json(&response["data"]);
        }
    }

    Ok(())
}

/// One compact line per recipe; falls back to raw JSON for unexpected shapes
fn print_recipe_list(response: &Value) {
    let data = &response["data"];
    let items = data["results"]
        .as_array()
        .or_else(|| data.as_array())
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        print_json(data);
        return;
    }

    for item in &items {
        let id = item["id"].as_u64().unwrap_or_default();
        let title = item["title"].as_str().or_else(|| item["name"].as_str()).unwrap_or("?");
        let difficulty = item["difficulty"].as_str().unwrap_or("");
        let minutes = item["cooking_time"].as_u64().unwrap_or(0) as u32;
        let likes = item["like_count"].as_u64().unwrap_or(0);

        println!(
            "#{:<5} {:<40} {:<8} {:<10} {} likes",
            id,
            format::truncate_text(title, 38),
            format::format_difficulty(difficulty),
            format::format_cooking_time(minutes),
            format::format_large_number(likes),
        );
    }

    if let Some(total) = data["count"].as_u64() {
        println!("-- {} recipes total", format::format_number(total as i64));
    }
}

fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}
