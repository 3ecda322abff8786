// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "riskdesk")]
#[command(version)]
#[command(about = "Banking-intent dispatcher, PII scanner and GenAI risk assessment service", long_about = None)]
pub struct Cli {
    /// Assistant LLM provider (ollama, openai)
    #[arg(short, long, env = "RISKDESK_PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Assistant model name
    #[arg(short, long, env = "RISKDESK_MODEL", global = true)]
    pub model: Option<String>,

    /// Listen address for `serve`
    #[arg(long, env = "RISKDESK_BIND_ADDR", global = true)]
    pub bind: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Find sensitive data of one category in a text
    Scan {
        /// Category: credit_card, ssn, account_balance, address, age, gender
        #[arg(short, long)]
        category: String,
        text: String,
    },
    /// Map a banking request to a service operation and print the reply
    Ask {
        /// Route the request through the assistant LLM
        #[arg(long)]
        llm: bool,
        /// Print the extracted intent instead of the reply
        #[arg(long, conflicts_with = "llm")]
        intent: bool,
        prompt: String,
    },
    /// Score an LLM output against a use-case template
    Evaluate {
        /// Use-case JSON (validated_output, thresholds, sensitive_info)
        #[arg(long)]
        usecase: PathBuf,
        /// Text to evaluate
        #[arg(long, conflicts_with = "text_file", required_unless_present = "text_file")]
        text: Option<String>,
        /// Read the text to evaluate from a file
        #[arg(long)]
        text_file: Option<PathBuf>,
    },
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Store an upstream API key in the system keychain
    #[cfg(feature = "secure-storage")]
    SetKey {
        /// Key owner: openai or inference
        account: String,
    },
}
