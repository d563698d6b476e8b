use alttrend::{
    chart::SvgChartRenderer,
    clock::TokioSleeper,
    config::{AppConfig, LogFormat},
    liveness,
    logging::{init_json_logging, init_logging},
    observer::TracingObserver,
    scanner::Scanner,
};
use alttrend_data::exchange::binance::BinanceMarketData;
use alttrend_notify::telegram::TelegramNotifier;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            init_logging();
            error!(%error, "invalid configuration");
            std::process::exit(1);
        }
    };

    match config.log_format {
        LogFormat::Text => init_logging(),
        LogFormat::Json => init_json_logging(),
    }

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            tokio::spawn(async move {
                if let Err(error) = liveness::serve(listener).await {
                    error!(?error, "liveness listener stopped");
                }
            });
        }
        Err(error) => error!(%addr, ?error, "failed to bind liveness listener"),
    }

    if config.telegram.is_none() {
        warn!("BOT_TOKEN & CHAT_ID not set, alerts will only be logged");
    }

    let mut scanner = Scanner::new(
        &config.scanner,
        BinanceMarketData::new(&config.binance),
        config.telegram.as_ref().map(TelegramNotifier::new),
        config
            .scanner
            .chart_enabled
            .then(SvgChartRenderer::temp_dir),
        TokioSleeper,
        TracingObserver,
    );

    tokio::select! {
        _ = scanner.run() => {}
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("shutdown signal received, stopping scanner"),
            Err(error) => error!(?error, "failed to listen for shutdown signal"),
        },
    }
}
