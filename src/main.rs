use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vaani::server::upstream::OpenAiCompletion;
use vaani::widget::console::{ConsoleRecognizer, ConsoleSynthesizer};
use vaani::widget::{
    ConversationRelay, HttpBackend, InputCoordinator, OutputCoordinator, PlaybackEvent,
    RecognitionEvent, Widget,
};
use vaani::{AppState, Config, Error, Locale, PreferenceStore};

/// Vaani - bilingual voice chat widget and relay gateway
#[derive(Parser)]
#[command(name = "vaani", version, about)]
struct Cli {
    /// Port for the relay gateway
    #[arg(long, env = "VAANI_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the widget in the terminal against a gateway
    Chat {
        /// Gateway base URL
        #[arg(long, env = "VAANI_GATEWAY_URL")]
        gateway: Option<String>,
    },
    /// Classify a text utterance by script
    Detect {
        /// Text to classify
        text: String,
    },
    /// Clear a gateway session's held context
    ClearContext {
        /// Gateway base URL
        #[arg(long, env = "VAANI_GATEWAY_URL")]
        gateway: Option<String>,
        /// Session key
        #[arg(short, long, default_value = "default")]
        session: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,vaani=info",
        1 => "info,vaani=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Chat { gateway } => {
                chat(gateway.unwrap_or_else(|| config.gateway_url.clone()), &config).await
            }
            Command::Detect { text } => {
                println!("{}", Locale::detect(&text));
                Ok(())
            }
            Command::ClearContext { gateway, session } => {
                let backend =
                    HttpBackend::new(gateway.unwrap_or_else(|| config.gateway_url.clone()));
                let relay = ConversationRelay::new(backend, session);
                relay.clear_context().await?;
                println!("context cleared");
                Ok(())
            }
        };
    }

    serve(cli.port.unwrap_or(config.port), &config).await
}

/// Run the relay gateway
async fn serve(port: u16, config: &Config) -> anyhow::Result<()> {
    let api_key = config
        .upstream
        .api_key
        .clone()
        .ok_or_else(|| Error::Config("upstream API key required (VAANI_UPSTREAM_KEY)".into()))?;

    let upstream = OpenAiCompletion::new(
        config.upstream.base_url.clone(),
        api_key,
        config.upstream.model.clone(),
        config.upstream.max_tokens,
    )?;

    tracing::info!(
        model = %config.upstream.model,
        upstream = %config.upstream.base_url,
        "starting relay gateway"
    );

    let state = Arc::new(AppState::new(Arc::new(upstream)));
    vaani::server::run(state, port).await?;
    Ok(())
}

/// Run the widget loop in the terminal
///
/// Console capabilities stand in for platform speech services: a line
/// read while listening is the recognized utterance, and synthesized
/// speech is printed. Commands: `/mic`, `/lang`, `/clear`, `/quit`.
async fn chat(gateway: String, config: &Config) -> anyhow::Result<()> {
    let mut prefs = PreferenceStore::load(config.data_dir.as_deref());
    let locale = prefs.locale();

    let (recognizer, pending) = ConsoleRecognizer::new();
    let input = InputCoordinator::new(Box::new(recognizer), locale);
    let output = OutputCoordinator::new(Box::new(ConsoleSynthesizer));

    let session = format!("cli-{}", uuid::Uuid::new_v4());
    let relay = ConversationRelay::new(HttpBackend::new(gateway), session);

    let mut widget = Widget::new(input, output, relay, locale);

    println!("vaani chat — /mic to toggle listening, /lang to switch language,");
    println!("/clear to reset the conversation, /quit to exit");

    let stdin = std::io::stdin();
    loop {
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "/quit" => break,
            "/mic" => {
                if widget.toggle_mic().is_none() {
                    println!("🎙  mic off");
                }
                continue;
            }
            "/lang" => {
                let next = match widget.locale() {
                    Locale::En => Locale::Kn,
                    Locale::Kn => Locale::En,
                };
                widget.set_locale(next);
                prefs.set_locale(next);
                println!("language: {next}");
                continue;
            }
            "/clear" => {
                widget.clear_conversation().await;
                println!("conversation cleared");
                continue;
            }
            "" => continue,
            _ => {}
        }

        // A pending recognition session consumes the line as its
        // transcript; otherwise the line is a typed message
        if let Some(token) = pending.take() {
            widget
                .on_recognition(token, RecognitionEvent::Transcript(line.to_string()))
                .await;
        } else {
            widget.submit_utterance(line).await;
        }
        prefs.set_locale(widget.locale());

        // Console playback is instantaneous; complete it and honor the
        // resume debounce
        if let Some(resume) = widget.on_playback(PlaybackEvent::Ended) {
            tokio::time::sleep(resume.after).await;
            widget.resume_listening();
        }
    }

    widget.close();
    Ok(())
}
