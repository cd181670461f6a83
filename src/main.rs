mod analyzer;
mod api;
mod chart;
mod domain;
mod error;
mod llm;
mod metrics;
mod record;
mod report;
mod search;
mod settings;
mod synthesis;
mod web;

use std::process::exit;

use analyzer::Analyzer;
use clap::Parser;
use settings::{Args, Settings};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    info!("Startup Trend Dashboard Server");

    let args = Args::parse();

    let settings = match Settings::from_file(&args.config) {
        Ok(ret) => ret,
        Err(error) => {
            error!("Problem while loading settings. {error}");
            exit(1);
        }
    };

    if settings.llm.api_key.is_none() {
        info!("No API key configured; requests must supply `apiKey`.");
    }

    let analyzer = match Analyzer::from_settings(&settings) {
        Ok(ret) => ret,
        Err(error) => {
            error!("Problem while creating the analyzer. {error:#}");
            exit(1);
        }
    };

    let tls = match (args.cert, args.key) {
        (Some(cert), Some(key)) => Some(web::Tls { cert, key }),
        _ => None,
    };

    let schema = api::schema(analyzer);
    web::serve(schema, settings.web.address, tls).await;
}
