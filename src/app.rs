// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::Path;

use console::style;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::server::{self, AppState};
use crate::services::dispatcher::ServiceDispatcher;
use crate::services::evaluation::UseCase;
use crate::services::intent::IntentExtractor;
use crate::services::patterns::PatternRegistry;

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            bind_addr = %config.bind_addr,
            provider = %config.provider,
            model = %config.model,
            inference = %config.inference.base_url,
            "config loaded"
        );
        Ok(Self {
            cli,
            config,
            cancel_token: CancellationToken::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Ctrl+C stops the server gracefully
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        match self.cli.command {
            None | Some(Commands::Serve) => self.serve().await,
            Some(ref cmd) => self.handle_command(cmd).await,
        }
    }

    async fn serve(&self) -> Result<()> {
        let state = AppState::from_config(&self.config)?;
        self.print_status(&format!("Serving on http://{}", self.config.bind_addr));
        server::serve(state, &self.config.bind_addr, self.cancel_token.clone()).await
    }

    async fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Serve => self.serve().await,
            Commands::Scan { category, text } => {
                let registry = PatternRegistry::with_custom(&self.config.patterns.custom)?;
                let found = registry.find(category, text)?;
                println!("{}", serde_json::to_string(&found)?);
                Ok(())
            }
            Commands::Ask {
                llm,
                intent,
                prompt,
            } => self.ask(prompt, *llm, *intent).await,
            Commands::Evaluate {
                usecase,
                text,
                text_file,
            } => self.evaluate(usecase, text.as_deref(), text_file.as_deref()).await,
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                self.print_config();
                Ok(())
            }
            #[cfg(feature = "secure-storage")]
            Commands::SetKey { account } => self.set_api_key(account),
        }
    }

    async fn ask(&self, prompt: &str, use_llm: bool, show_intent: bool) -> Result<()> {
        if use_llm {
            let state = AppState::from_config(&self.config)?;
            self.print_status(&format!(
                "Contacting {} ({})...",
                self.config.provider, self.config.model
            ));
            let reply = state.assistant.assist(prompt, true).await?;
            println!("{}", reply.answer);
            return Ok(());
        }

        let extractor = IntentExtractor::from_config(&self.config.intent);
        let intent = extractor.extract(prompt)?;
        if show_intent {
            println!("{}", serde_json::to_string_pretty(&intent)?);
            return Ok(());
        }

        let dispatcher = ServiceDispatcher::new(extractor.reference().clone());
        println!("{}", dispatcher.dispatch(&intent).message);
        Ok(())
    }

    async fn evaluate(
        &self,
        usecase: &Path,
        text: Option<&str>,
        text_file: Option<&Path>,
    ) -> Result<()> {
        let usecase = UseCase::from_file(usecase)?;
        let output = match (text, text_file) {
            (Some(text), _) => text.to_string(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => return Err(Error::MissingInput { field: "text" }),
        };

        let state = AppState::from_config(&self.config)?;
        self.print_status(&format!(
            "Evaluating against {} validated outputs...",
            usecase.validated_output.len()
        ));
        let report = state.evaluator.evaluate(&output, &usecase).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn print_config(&self) {
        let redact = |key: &Option<String>| if key.is_some() { "(set)" } else { "(not set)" };
        let c = &self.config;

        println!("Bind address: {}", c.bind_addr);
        println!("Provider: {}", c.provider);
        println!("Model: {}", c.model);
        println!("Ollama host: {}", c.ollama_host);
        if let Some(ref base) = c.openai_base_url {
            println!("OpenAI base URL: {base}");
        }
        println!("API key: {}", redact(&c.api_key));
        println!("Timeout: {}s", c.timeout_secs);
        println!("Temperature: {}", c.temperature);
        println!("Max tokens: {}", c.num_predict);
        println!();
        println!("[intent]");
        println!("  skip_leading_match: {}", c.intent.skip_leading_match);
        println!("  users: {}", c.intent.users.join(", "));
        println!(
            "  subscription_services: {}",
            c.intent.subscription_services.join(", ")
        );
        println!();
        println!("[inference]");
        println!("  base_url: {}", c.inference.base_url);
        println!("  api_key: {}", redact(&c.inference.api_key));
        println!("  sentiment_model: {}", c.inference.sentiment_model);
        println!("  emotion_model: {}", c.inference.emotion_model);
        println!("  toxicity_model: {}", c.inference.toxicity_model);
        println!("  toxic_word_model: {}", c.inference.toxic_word_model);
        println!("  embedding_model: {}", c.inference.embedding_model);
        println!("  max_concurrency: {}", c.inference.max_concurrency);
        if !c.patterns.custom.is_empty() {
            println!();
            println!("[patterns.custom]");
            for (name, pattern) in &c.patterns.custom {
                println!("  {name}: {pattern}");
            }
        }
    }

    #[cfg(feature = "secure-storage")]
    fn set_api_key(&self, account: &str) -> Result<()> {
        let account = account.to_lowercase();
        if account != "openai" && account != "inference" {
            return Err(Error::Config(format!(
                "Keyring storage is for 'openai' or 'inference', got '{account}'"
            )));
        }

        eprintln!(
            "Enter API key for {} (input will be hidden):",
            style(&account).bold()
        );

        let key = dialoguer::Password::new()
            .with_prompt("API key")
            .interact()?;

        if key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".into()));
        }

        let entry = keyring::Entry::new("riskdesk", &account)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(&key)
            .map_err(|e| Error::Keyring(e.to_string()))?;

        eprintln!("{} API key stored for {}", style("✓").green().bold(), account);
        Ok(())
    }

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }
}
