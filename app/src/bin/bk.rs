use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use structopt::StructOpt;

use barkeep::cocktails::ShowCocktails;
use barkeep::config;
use barkeep::ingredients::{AddIngredient, ShowIngredients};
use barkeep::reply::Body;
use barkeep::services::{Commandable, Queryable};
use barkeep::Barkeep;

#[derive(Debug, StructOpt)]
#[structopt(name = "bk", about = "Barkeep CLI")]
struct Opt {
    /// Configuration file; environment variables are used when omitted.
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    command: Commands,
}

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "setup", about = "Initialize the document store")]
    Setup,
    #[structopt(name = "show-ingredients", about = "List the stocked ingredients")]
    ShowIngredients,
    #[structopt(name = "show-cocktails", about = "List the cocktail catalogue")]
    ShowCocktails,
    #[structopt(name = "add-ingredient", about = "Stock one ingredient from a JSON file")]
    AddIngredient {
        id: String,
        #[structopt(parse(from_os_str))]
        body: PathBuf,
    },
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(flatten)]
    barkeep: config::Config,
    env_logger: Option<config::EnvLogger>,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    let config = match &opt.config {
        Some(path) => {
            let mut config_buf = String::new();
            File::open(path)?.read_to_string(&mut config_buf)?;
            let config: Config = toml::from_str(&config_buf)?;

            match &config.env_logger {
                Some(logger) => logger.builder().init(),
                None => env_logger::init(),
            }
            config.barkeep
        }
        None => {
            env_logger::init();
            config::Config::from_env()?
        }
    };

    let bar = Barkeep::new(&config)?;

    match opt.command {
        Commands::Setup => {
            bar.setup()?;
        }
        Commands::ShowIngredients => {
            for (id, ingredient) in bar.ingredients().query(ShowIngredients)? {
                println!("{}: {}", id, ingredient.name);
            }
        }
        Commands::ShowCocktails => {
            for (id, cocktail) in bar.cocktails().query(ShowCocktails)? {
                println!("{}: {} ({})", id, cocktail.name, cocktail.category);
            }
        }
        Commands::AddIngredient { id, body } => {
            let mut body_buf = String::new();
            File::open(&body)?.read_to_string(&mut body_buf)?;
            let body: Value = serde_json::from_str(&body_buf)?;

            let reply = bar.ingredients().execute(AddIngredient { id, body })?;
            match reply.body {
                Body::Text(text) => println!("{} ({})", text, reply.status),
                Body::Json(json) => println!("{}", json),
            }
        }
    }

    Ok(())
}
