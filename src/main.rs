use anyhow::Context;
use clap::Parser;
use fx_converter::config::validate_provider;
use fx_converter::core::converter::EXPIRED_NOTICE;
use fx_converter::core::ConfigProvider;
use fx_converter::utils::error::ErrorSeverity;
use fx_converter::utils::logger::{self, LogFormat};
use fx_converter::{
    CliConfig, Converter, ConverterError, ConverterSettings, CurrencyRole, HttpCurrencyApi, Submit,
    TomlConfig, Update,
};
use std::sync::Arc;

/// Report an alert the way the widget would, then exit by severity.
fn fail(e: &ConverterError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, format);

    tracing::info!("Starting fx-convert");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let provider: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => Box::new(
            TomlConfig::from_file(path).with_context(|| format!("loading config file {}", path))?,
        ),
        None => Box::new(cli.clone()),
    };
    if let Err(e) = validate_provider(provider.as_ref()) {
        fail(&e);
    }

    let api = Arc::new(HttpCurrencyApi::from_config(provider.as_ref())?);
    let mut converter = Converter::new(api, ConverterSettings::from_config(provider.as_ref()));

    converter.mount();
    match converter.pump().await {
        Some(Ok(Update::CurrenciesLoaded { count })) => {
            tracing::debug!(count, "currencies available");
        }
        Some(Err(e)) => fail(&e),
        other => anyhow::bail!("currency list did not load: {:?}", other),
    }

    if cli.list {
        converter.toggle_dropdown(CurrencyRole::Base);
        if let Some(search) = &cli.search {
            converter.search(CurrencyRole::Base, search);
        }
        for row in converter
            .dropdown(CurrencyRole::Base)
            .render_rows(converter.state())
        {
            println!("{}", row);
        }
        return Ok(());
    }

    for (role, code) in [(CurrencyRole::Base, &cli.from), (CurrencyRole::Target, &cli.to)] {
        if let Some(code) = code {
            if let Err(e) = converter.select(role, &code.to_uppercase()) {
                fail(&e);
            }
        }
    }
    if cli.swap {
        converter.swap();
    }

    let amount = cli
        .amount
        .as_deref()
        .context("--amount is required unless --list is given")?;
    converter.set_amount(amount);

    match converter.submit() {
        Ok(Submit::Started) => tracing::info!("{}", converter.submit_caption()),
        Ok(other) => anyhow::bail!("nothing to convert ({:?})", other),
        Err(e) => fail(&e),
    }

    while let Some(update) = converter.pump().await {
        match update {
            Ok(Update::Converted(conversion)) => {
                tracing::debug!(receipt = %serde_json::to_string(&conversion)?, "conversion receipt");
                println!("{}", conversion.summary());
                println!(
                    "Rate {} valid until {}",
                    conversion.rate,
                    conversion.expires_at.format("%H:%M:%S UTC")
                );
                if !cli.watch {
                    break;
                }
            }
            Ok(Update::CountdownTick { remaining, .. }) => {
                println!("Expires in: {:02}'{:02}''", remaining / 60, remaining % 60);
            }
            Ok(Update::Expired) => {
                println!("{}", EXPIRED_NOTICE);
                break;
            }
            Ok(Update::ConversionFailed) => {
                eprintln!("❌ The conversion could not be completed, see the log for details");
                std::process::exit(2);
            }
            Ok(Update::CurrenciesLoaded { .. }) => {}
            Err(e) => fail(&e),
        }
    }

    converter.unmount();
    Ok(())
}
