use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_embed::Embed;
use thiserror::Error;

use crate::config::Config;
use crate::generator::normalize::normalize;

/// Built-in practice content bundled into the binary. The local provider
/// reads from here, which is what makes it infallible.
#[derive(Embed)]
#[folder = "assets/content/"]
struct ContentAssets;

/// Separator line between snippets in the bundled code content files.
const SNIPPET_SEPARATOR: &str = "\n%%\n";

/// Emergency content if an asset is somehow missing from the build.
const FALLBACK_SENTENCE: &str = "The quick brown fox jumps over the lazy dog";

/// Recoverable content-provider failure. Every variant is absorbed by chain
/// fallback; none of them escapes the pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty output")]
    Empty,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("command exited with status {0}")]
    CommandFailed(i32),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed response")]
    Malformed,
    #[error("unrecognized ai provider type {0:?}")]
    UnknownAiProvider(String),
    #[cfg(not(feature = "network"))]
    #[error("built without network support")]
    NetworkDisabled,
}

pub type ProviderResult = Result<String, ProviderError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentDomain {
    Sentences,
    Code,
}

/// One content provider in a chain.
#[derive(Clone, Debug)]
pub enum Provider {
    Local,
    File {
        path: PathBuf,
    },
    Command {
        command: String,
        timeout: Duration,
    },
    Network {
        url: String,
        timeout: Duration,
    },
    Ai {
        endpoint: String,
        api_type: String,
        model: String,
        api_key: String,
        timeout: Duration,
    },
}

impl Provider {
    fn kind(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::File { .. } => "file",
            Provider::Command { .. } => "command",
            Provider::Network { .. } => "network",
            Provider::Ai { .. } => "ai",
        }
    }
}

/// Ordered provider fallback chain for one content domain. The constructor
/// always appends the local provider, so `fetch` cannot come back empty.
pub struct SourceChain {
    domain: ContentDomain,
    providers: Vec<Provider>,
    language: Option<String>,
}

impl SourceChain {
    pub fn sentences(config: &Config) -> Self {
        let mut providers = Vec::new();
        for kind in &config.sentence_sources {
            match kind.as_str() {
                "network" | "api" => providers.push(Provider::Network {
                    url: config.quote_api_url.clone(),
                    timeout: config.source_timeout(),
                }),
                "file" => providers.push(Provider::File {
                    path: PathBuf::from(&config.sentences_file),
                }),
                "command" | "cmd" => {
                    if !config.sentence_command.is_empty() {
                        providers.push(Provider::Command {
                            command: config.sentence_command.clone(),
                            timeout: config.source_timeout(),
                        });
                    }
                }
                "local" => providers.push(Provider::Local),
                other => {
                    log::debug!("skipping unrecognized sentence source {other:?}");
                }
            }
        }
        providers.push(Provider::Local);
        Self {
            domain: ContentDomain::Sentences,
            providers,
            language: None,
        }
    }

    pub fn code(config: &Config, language: &str) -> Self {
        let mut providers = Vec::new();
        for kind in &config.code_sources {
            match kind.as_str() {
                "file" => providers.push(Provider::File {
                    path: PathBuf::from(&config.snippets_file),
                }),
                "command" | "cmd" => {
                    if !config.code_command.is_empty() {
                        providers.push(Provider::Command {
                            command: config.code_command.clone(),
                            timeout: config.source_timeout(),
                        });
                    }
                }
                "ai" => providers.push(Provider::Ai {
                    endpoint: config.ai_endpoint.clone(),
                    api_type: config.ai_api_type.clone(),
                    model: config.ai_model.clone(),
                    api_key: config.ai_api_key.clone(),
                    timeout: config.source_timeout(),
                }),
                "local" => providers.push(Provider::Local),
                other => {
                    log::debug!("skipping unrecognized code source {other:?}");
                }
            }
        }
        providers.push(Provider::Local);
        Self {
            domain: ContentDomain::Code,
            providers,
            language: Some(language.to_string()),
        }
    }

    /// Chain with an explicit provider list; the local terminator is still
    /// appended. Used by tests and anywhere a custom chain is needed.
    #[allow(dead_code)]
    pub fn with_providers(
        domain: ContentDomain,
        providers: Vec<Provider>,
        language: Option<String>,
    ) -> Self {
        let mut providers = providers;
        providers.push(Provider::Local);
        Self {
            domain,
            providers,
            language,
        }
    }

    /// Try each provider in order until one yields non-empty normalized
    /// content. The trailing local provider guarantees termination.
    pub fn fetch(&self, rng: &mut SmallRng) -> String {
        for provider in &self.providers {
            match self.run(provider, rng) {
                Ok(raw) => {
                    let text = normalize(&raw);
                    if !text.is_empty() {
                        return text;
                    }
                    log::debug!("{} provider produced empty content", provider.kind());
                }
                Err(err) => {
                    log::debug!("{} provider failed: {err}", provider.kind());
                }
            }
        }
        // Unreachable while the local assets ship content; kept as a floor.
        FALLBACK_SENTENCE.to_string()
    }

    fn run(&self, provider: &Provider, rng: &mut SmallRng) -> ProviderResult {
        match provider {
            Provider::Local => Ok(self.fetch_local(rng)),
            Provider::File { path } => self.fetch_file(path, rng),
            Provider::Command { command, timeout } => fetch_command(command, *timeout),
            Provider::Network { url, timeout } => fetch_network(url, *timeout),
            Provider::Ai {
                endpoint,
                api_type,
                model,
                api_key,
                timeout,
            } => fetch_ai(
                endpoint,
                api_type,
                model,
                api_key,
                self.language.as_deref().unwrap_or("python"),
                *timeout,
            ),
        }
    }

    fn fetch_local(&self, rng: &mut SmallRng) -> String {
        match self.domain {
            ContentDomain::Sentences => {
                let content = embedded_asset("sentences.txt");
                let lines: Vec<&str> = content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect();
                lines
                    .choose(rng)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| FALLBACK_SENTENCE.to_string())
            }
            ContentDomain::Code => {
                let language = self.language.as_deref().unwrap_or("python");
                let content = embedded_asset(&format!("snippets-{language}.txt"));
                let snippets: Vec<&str> = content
                    .split(SNIPPET_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                snippets
                    .choose(rng)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| FALLBACK_SENTENCE.to_string())
            }
        }
    }

    fn fetch_file(&self, path: &PathBuf, rng: &mut SmallRng) -> ProviderResult {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(ProviderError::Empty);
        }
        match self.domain {
            ContentDomain::Sentences => {
                let lines: Vec<&str> = content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect();
                lines
                    .choose(rng)
                    .map(|s| s.to_string())
                    .ok_or(ProviderError::Empty)
            }
            ContentDomain::Code => {
                let snippets: Vec<&str> = content
                    .split(SNIPPET_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                snippets
                    .choose(rng)
                    .map(|s| s.to_string())
                    .ok_or(ProviderError::Empty)
            }
        }
    }
}

fn embedded_asset(name: &str) -> String {
    ContentAssets::get(name)
        .and_then(|file| String::from_utf8(file.data.into_owned()).ok())
        .unwrap_or_default()
}

/// Run a shell command with a bounded timeout, polling for exit. A child
/// still running at the deadline is killed and reported as a timeout.
fn fetch_command(command: &str, timeout: Duration) -> ProviderResult {
    #[cfg(unix)]
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()?;
    #[cfg(windows)]
    let mut child = Command::new("cmd")
        .arg("/C")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => {
                if !status.success() {
                    return Err(ProviderError::CommandFailed(status.code().unwrap_or(-1)));
                }
                let mut output = String::new();
                if let Some(mut stdout) = child.stdout.take() {
                    stdout.read_to_string(&mut output)?;
                }
                if output.trim().is_empty() {
                    return Err(ProviderError::Empty);
                }
                return Ok(output);
            }
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProviderError::Timeout(timeout));
            }
            None => std::thread::sleep(Duration::from_millis(25)),
        }
    }
}

/// GET the configured quote endpoint and pull `{text, author}` out of the
/// response, appending the author on its own line when present.
#[cfg(feature = "network")]
fn fetch_network(url: &str, timeout: Duration) -> ProviderResult {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ProviderError::HttpStatus(response.status().as_u16()));
    }
    let body = response
        .text()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|_| ProviderError::Malformed)?;
    let text = value
        .get("text")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ProviderError::Malformed);
    }
    match value.get("author").and_then(|v| v.as_str()) {
        Some(author) if !author.trim().is_empty() => Ok(format!("{text}\n{author}")),
        _ => Ok(text.to_string()),
    }
}

#[cfg(not(feature = "network"))]
fn fetch_network(_url: &str, _timeout: Duration) -> ProviderResult {
    Err(ProviderError::NetworkDisabled)
}

/// Resolve the AI provider type: explicit, or detected from the endpoint
/// path when set to "auto" (defaulting to ollama).
fn resolve_ai_api_type(declared: &str, endpoint: &str) -> Result<&'static str, ProviderError> {
    match declared {
        "openai" => Ok("openai"),
        "ollama" => Ok("ollama"),
        "auto" => {
            if endpoint.contains("/chat/completions") {
                Ok("openai")
            } else {
                Ok("ollama")
            }
        }
        other => Err(ProviderError::UnknownAiProvider(other.to_string())),
    }
}

#[cfg(feature = "network")]
fn fetch_ai(
    endpoint: &str,
    api_type: &str,
    model: &str,
    api_key: &str,
    language: &str,
    timeout: Duration,
) -> ProviderResult {
    let api_type = resolve_ai_api_type(api_type, endpoint)?;
    let prompt = format!(
        "Provide a short {language} code snippet for typing practice. \
         Return only code, no explanations, commentary, or markdown formatting."
    );

    let payload = if api_type == "openai" {
        serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": 200,
            "temperature": 0.7,
        })
    } else {
        serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        })
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    let mut request = client
        .post(endpoint)
        .header("content-type", "application/json")
        .body(payload.to_string());
    if !api_key.is_empty() {
        request = request.header("authorization", format!("Bearer {api_key}"));
    }

    let response = request
        .send()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ProviderError::HttpStatus(response.status().as_u16()));
    }
    let body = response
        .text()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|_| ProviderError::Malformed)?;

    let text = if api_type == "openai" {
        value
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    } else {
        value
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    };
    if text.trim().is_empty() {
        return Err(ProviderError::Malformed);
    }
    Ok(text.to_string())
}

#[cfg(not(feature = "network"))]
fn fetch_ai(
    _endpoint: &str,
    api_type: &str,
    _model: &str,
    _api_key: &str,
    _language: &str,
    _timeout: Duration,
) -> ProviderResult {
    // Still validate the declared type so misconfiguration surfaces the
    // same way in both builds.
    resolve_ai_api_type(api_type, "")?;
    Err(ProviderError::NetworkDisabled)
}
