use anyhow::Context;
use clap::Parser;
use http_kit::utils::{logger, validation::Validate};
use http_kit::{CliConfig, Command, Http};
use std::sync::mpsc;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    cli.validate().context("invalid command line")?;
    let config = cli.http_config().context("failed to load client settings")?;
    Http::install(config).context("failed to build HTTP client")?;

    match cli.command {
        Command::Get {
            url,
            params,
            callback,
        } => {
            let params = params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            if callback {
                let (tx, rx) = mpsc::channel();
                http_kit::get_async(&url, params, move |result: http_kit::Result<String>| {
                    let _ = tx.send(result);
                });
                print_callback_result(rx)?;
            } else {
                println!("{}", http_kit::get_with_params(&url, params));
            }
        }
        Command::Post {
            url,
            params,
            callback,
        } => {
            let params = params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            if callback {
                let (tx, rx) = mpsc::channel();
                http_kit::post_async(&url, params, move |result: http_kit::Result<String>| {
                    let _ = tx.send(result);
                });
                print_callback_result(rx)?;
            } else {
                println!("{}", http_kit::post(&url, params));
            }
        }
        Command::PostBody {
            url,
            body,
            content_type,
        } => {
            let text = match content_type {
                Some(content_type) => http_kit::post_body_with_type(&url, body, &content_type),
                None => http_kit::post_body(&url, body),
            };
            println!("{}", text);
        }
        Command::Stream { url, body } => {
            let mut stream = http_kit::post_body_stream(&url, body)
                .with_context(|| format!("request to {} failed", url))?;
            tracing::info!("Streaming response (status {})", stream.status());
            std::io::copy(&mut stream, &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}

fn print_callback_result(rx: mpsc::Receiver<http_kit::Result<String>>) -> anyhow::Result<()> {
    let body = rx
        .recv()
        .context("callback was dropped without firing")?
        .context("request failed")?;
    println!("{}", body);
    Ok(())
}
