//! Terminal chain prompt

use std::io::{self, BufRead, Write};

use anyhow::Context;
use async_trait::async_trait;

use crate::domain::repositories::ChainChoicePrompt;
use crate::shared::types::ChainTag;

/// Asks on stdout and reads one line from stdin; blocks the operation until answered
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinChainPrompt;

impl StdinChainPrompt {
    pub fn new() -> Self {
        Self
    }
}

pub fn render_prompt(token_symbol: &str, candidates: &[ChainTag]) -> String {
    let chains: Vec<&str> = candidates.iter().map(|chain| chain.as_str()).collect();
    format!(
        "To which blockchain do you wish to withdraw {}? Write the exact chain.\n[{}]\n> ",
        token_symbol,
        chains.join(", ")
    )
}

#[async_trait]
impl ChainChoicePrompt for StdinChainPrompt {
    async fn prompt_chain_choice(&self, token_symbol: &str, candidates: &[ChainTag]) -> anyhow::Result<String> {
        let prompt = render_prompt(token_symbol, candidates);

        tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
            let mut stdout = io::stdout();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;

            let mut line = String::new();
            let read = io::stdin().lock().read_line(&mut line).context("reading chain choice")?;
            if read == 0 {
                anyhow::bail!("stdin closed before a chain was chosen");
            }
            Ok(line.trim().to_string())
        })
        .await
        .context("chain prompt task failed")?
    }
}
