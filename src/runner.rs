use std::fs;
use std::io;
use std::path::Path;

use faq_chat::{
    AppConfig, ChatSession, FaqError, LogEvent, Matcher, Reply, Result, evaluate_cases,
    load_cases,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::cli::{Cli, Command};
use crate::output::{self, CatalogStats, Format};

/// Dispatch a parsed command line. Returns the process exit code.
pub fn run(cli: &Cli) -> Result<i32> {
    let format = Format::parse(&cli.output)?;
    let config = cli.resolve_config()?;

    match &cli.command {
        Command::Ask { text } => {
            let matcher = config.matcher()?;
            let outcome = matcher.match_input(text);
            output::print_match(format, text, &outcome, &config.session.fallback_message)?;
        }
        Command::Answer { question } => {
            let matcher = config.matcher()?;
            let answer = matcher.knowledge().get_answer(question)?;
            output::print_answer(format, question, answer)?;
        }
        Command::Chat {
            transcript,
            no_fallback,
            ..
        } => {
            let matcher = config.matcher()?;
            run_chat(&config, &matcher, format, *no_fallback, transcript.as_deref())?;
        }
        Command::Check => {
            let stats = catalog_stats(&config)?;
            output::print_check(format, &stats)?;
        }
        Command::Export { path } => {
            let catalog = config.load_catalog()?;
            catalog.save(path)?;
            let stats = catalog_stats(&config)?;
            output::print_export(format, path, &stats)?;
        }
        Command::Eval {
            cases,
            min_pass_rate,
        } => {
            let matcher = config.matcher()?;
            let cases = load_cases(cases)?;
            let summary = evaluate_cases(&matcher, &cases);
            output::print_eval(format, &summary, *min_pass_rate)?;
            if !summary.meets(*min_pass_rate) {
                return Ok(1);
            }
        }
        Command::Config => output::print_config(&config)?,
    }

    Ok(0)
}

fn catalog_stats(config: &AppConfig) -> Result<CatalogStats> {
    let (kb, keywords) = config.load_catalog()?.build()?;
    Ok(CatalogStats {
        source: config
            .catalog
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        questions: kb.len(),
        keywords: keywords.len(),
    })
}

fn run_chat(
    config: &AppConfig,
    matcher: &Matcher,
    format: Format,
    no_fallback: bool,
    transcript: Option<&Path>,
) -> Result<()> {
    let mut session = ChatSession::new(matcher, config.session.clone())?;
    if !no_fallback {
        if let Some(responder) = config.fallback.responder()? {
            session = session.with_fallback(responder);
        }
    }

    for message in session.log().render() {
        output::print_message(format, message)?;
    }
    session.log_mut().subscribe(move |event| {
        let printed = match event {
            LogEvent::Appended(message) => output::print_message(format, message),
            LogEvent::Cleared => {
                if format == Format::Text {
                    println!("-- conversation reset --");
                }
                Ok(())
            }
        };
        if let Err(err) = printed {
            tracing::warn!(error = %err, "failed to render chat message");
        }
    });

    let mut rl = DefaultEditor::new().map_err(readline_error)?;
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(readline_error(err)),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_ascii_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        rl.add_history_entry(trimmed).ok();

        if trimmed == "/reset" {
            session.reset()?;
            continue;
        }

        // A number picks an active suggestion; anything else is a message.
        let picked = trimmed
            .parse::<usize>()
            .ok()
            .and_then(|number| session.suggestion(number))
            .map(str::to_string);
        if let Some(question) = picked {
            match session.select(&question) {
                // Stale pick: the session already logged it.
                Ok(_) | Err(FaqError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
            continue;
        }

        if let Some(Reply::Suggestions(suggestions)) = session.submit(trimmed)? {
            output::print_suggestions(format, &suggestions)?;
        }
    }

    if let Some(path) = transcript {
        write_transcript(path, &session)?;
    }
    Ok(())
}

fn write_transcript(path: &Path, session: &ChatSession<'_>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(session.log().render())?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), messages = session.log().len(), "wrote transcript");
    Ok(())
}

fn readline_error(err: ReadlineError) -> FaqError {
    FaqError::Io(io::Error::other(err.to_string()))
}
